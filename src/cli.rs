//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// dirpack - Build filtered archives of directory trees
#[derive(Parser, Debug)]
#[command(name = "dirpack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Archive a directory tree, leaving out ignored entries
    Create(commands::create::CreateArgs),

    /// List the entries that would be archived, without writing anything
    Ls(commands::ls::LsArgs),

    /// Show whether paths are excluded and which rule decides
    CheckIgnore(commands::check_ignore::CheckIgnoreArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Create(args) => commands::create::execute(args, &self.color),
            Commands::Ls(args) => commands::ls::execute(args),
            Commands::CheckIgnore(args) => commands::check_ignore::execute(args, &self.color),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Log to stderr at `level`. `RUST_LOG`, when set, takes precedence.
fn init_logging(level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.format_timestamp(None);
    let _ = builder.try_init();
}
