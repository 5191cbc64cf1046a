use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "storyline-lint")]
#[command(about = "Validate storyline definitions")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Validate storyline files or directories.
    Check(CheckArgs),
    /// Parse one condition or counter expression.
    Expr(ExprArgs),
}

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    #[arg(long = "config")]
    pub(crate) config: Option<PathBuf>,
    /// Comma separated language codes, e.g. `en,de`.
    #[arg(long = "languages", value_delimiter = ',')]
    pub(crate) languages: Option<Vec<String>>,
    #[arg(required = true)]
    pub(crate) paths: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub(crate) struct ExprArgs {
    #[arg(long = "max-depth")]
    pub(crate) max_depth: Option<usize>,
    #[arg(long = "max-terms")]
    pub(crate) max_terms: Option<usize>,
    pub(crate) expression: String,
}
