//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use pbd_core::ElementKind;
use std::path::PathBuf;

/// pbidoc - document Power BI semantic models with generated descriptions
#[derive(Parser, Debug)]
#[command(name = "pbd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the semantic model directory
    #[arg(short, long, global = true, env = "PBD_MODEL_DIR", default_value = ".")]
    pub model_dir: PathBuf,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List declared names of one element kind per model file
    Extract(ExtractArgs),

    /// Write generated descriptions into a copy of the model
    Apply(ApplyArgs),

    /// Report which declarations carry a description
    Coverage(CoverageArgs),
}

/// Element kinds accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Tables,
    Columns,
    Measures,
}

impl From<KindArg> for ElementKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Tables => ElementKind::Table,
            KindArg::Columns => ElementKind::Column,
            KindArg::Measures => ElementKind::Measure,
        }
    }
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Element kind to extract
    #[arg(short, long, value_enum)]
    pub kind: KindArg,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub output: OutputFormat,
}

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// JSON file with generated documentation
    #[arg(short, long)]
    pub docs: PathBuf,

    /// Write the annotated copy here instead of `<model dir><suffix>`
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Minimum confidence (0-1) for table descriptions
    #[arg(long)]
    pub table_threshold: Option<f64>,

    /// Report what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format for the summary
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the coverage command
#[derive(Args, Debug)]
pub struct CoverageArgs {
    /// Only report this element kind
    #[arg(short, long, value_enum)]
    pub kind: Option<KindArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Exit with code 1 when overall coverage is below this percentage
    #[arg(long)]
    pub fail_under: Option<f64>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
