use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "markup-diff")]
#[command(about = "Compute, apply and verify patch trees between markup documents")]
pub struct Cli {
    /// Log diff decisions to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Diff two XML files and print the patch tree.
    Diff(DiffArgs),
    /// Apply a JSON patch tree to an XML file.
    Apply(ApplyArgs),
    /// Diff two files, replay the patch and confirm the result matches.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
pub struct DiffArgs {
    pub before: PathBuf,
    pub after: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Print operation counts only.
    #[arg(long)]
    pub summary: bool,
    /// Index given to the root patch tree.
    #[arg(long, default_value_t = 1)]
    pub start_index: usize,
    /// TOML file with a `[diff]` table overriding diff conventions.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Write the patch tree here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ApplyArgs {
    pub before: PathBuf,
    /// JSON patch tree, as written by `diff --format json`.
    pub patch: PathBuf,
    /// Write the patched XML here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    pub before: PathBuf,
    pub after: PathBuf,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
