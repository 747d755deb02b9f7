//! # dirpack CLI
//!
//! Binary entry point for the `dirpack` command-line tool. Arguments are
//! parsed with `clap` and dispatched to the command modules; the archiving
//! itself lives in the `dirpack` library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
