use std::fs;

use anyhow::{bail, Context, Result};
use clap::Parser;
use markup_diff_core::{
    apply_patch, decode_patch_tree, diff_with_options, encode_patch_tree, format_text, parse_file,
    write, write_file,
};
use tracing_subscriber::filter::LevelFilter;

mod cli;
mod config;
mod output;
mod report;

use cli::{ApplyArgs, CheckArgs, Cli, Command, DiffArgs, OutputFormat};
use output::{guard_output, Input};
use report::{render_summary, render_text};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Diff(args) => run_diff(args),
        Command::Apply(args) => run_apply(args),
        Command::Check(args) => run_check(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        LevelFilter::TRACE
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_diff(args: DiffArgs) -> Result<()> {
    let before = parse_file(&args.before)
        .with_context(|| format!("failed to parse {}", args.before.display()))?;
    let after = parse_file(&args.after)
        .with_context(|| format!("failed to parse {}", args.after.display()))?;
    let opts = config::load_options(args.config.as_deref())?;

    let patch = diff_with_options(args.start_index, &before, &after, &opts);

    if let Some(output) = &args.output {
        guard_output(
            output,
            &[
                Input::new("before", &args.before),
                Input::new("after", &args.after),
            ],
        )?;
        let rendered = match args.format {
            OutputFormat::Text => format_text(&patch),
            OutputFormat::Json => encode_patch_tree(&patch),
        };
        fs::write(output, rendered)
            .with_context(|| format!("failed to write {}", output.display()))?;
        println!("{}", render_summary(&patch));
        return Ok(());
    }

    if args.summary {
        println!("{}", render_summary(&patch));
        return Ok(());
    }

    match args.format {
        OutputFormat::Text => println!("{}", render_text(&patch)),
        OutputFormat::Json => println!("{}", encode_patch_tree(&patch)),
    }
    Ok(())
}

fn run_apply(args: ApplyArgs) -> Result<()> {
    let before = parse_file(&args.before)
        .with_context(|| format!("failed to parse {}", args.before.display()))?;
    let raw = fs::read_to_string(&args.patch)
        .with_context(|| format!("failed to read {}", args.patch.display()))?;
    let patch = decode_patch_tree(&raw)
        .with_context(|| format!("failed to decode patch {}", args.patch.display()))?;

    let patched = apply_patch(&before, &patch)
        .with_context(|| format!("patch does not apply to {}", args.before.display()))?;

    match &args.output {
        Some(output) => {
            guard_output(
                output,
                &[
                    Input::new("before", &args.before),
                    Input::new("patch", &args.patch),
                ],
            )?;
            write_file(&patched, output)
                .with_context(|| format!("failed to write {}", output.display()))?;
        }
        None => {
            let bytes = write(&patched).context("failed to serialize patched tree")?;
            let xml = String::from_utf8(bytes).context("patched tree is not valid UTF-8")?;
            println!("{xml}");
        }
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    let before = parse_file(&args.before)
        .with_context(|| format!("failed to parse {}", args.before.display()))?;
    let after = parse_file(&args.after)
        .with_context(|| format!("failed to parse {}", args.after.display()))?;
    let opts = config::load_options(args.config.as_deref())?;

    let patch = diff_with_options(1, &before, &after, &opts);
    let replayed = apply_patch(&before, &patch).context("generated patch does not apply")?;

    if replayed.normalized() != after.normalized() {
        bail!(
            "round trip mismatch: patching {} does not reproduce {}",
            args.before.display(),
            args.after.display()
        );
    }

    println!("round trip ok: {} operations", patch.operations().len());
    Ok(())
}
