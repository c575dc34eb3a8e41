use colored::Colorize;
use markup_diff_core::{format_summary, format_text, PatchTree};

/// Render a patch tree for terminal output.
pub fn render_text(tree: &PatchTree) -> String {
    let raw = format_text(tree);
    let mut out = Vec::new();

    for line in raw.lines() {
        let body = line.trim_start();
        let colored = if body.starts_with('+') {
            line.green().to_string()
        } else if body.starts_with('-') {
            line.red().to_string()
        } else if body.starts_with('~') {
            line.yellow().to_string()
        } else if body.starts_with('=') {
            line.cyan().to_string()
        } else if body.starts_with('x') {
            line.magenta().to_string()
        } else {
            line.bold().to_string()
        };
        out.push(colored);
    }

    out.join("\n")
}

/// Render operation counts for terminal output.
pub fn render_summary(tree: &PatchTree) -> String {
    format_summary(tree).cyan().to_string()
}
