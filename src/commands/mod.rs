//! # CLI Command Implementations
//!
//! Each subcommand of `dirpack` lives in its own file with an `Args` struct
//! derived with `clap` and an `execute` function. The commands that walk a
//! tree share [`FilterArgs`], which layers command-line flags over the
//! optional `.dirpack.yaml` configuration.

pub mod check_ignore;
pub mod completions;
pub mod create;
pub mod ls;

use anyhow::{Context, Result};
use clap::Args;
use log::debug;
use std::path::{Path, PathBuf};

use dirpack::config::{self, PackConfig};
use dirpack::defaults::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILENAME};

/// Options selecting which entries are left out.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Configuration file. Defaults to `.dirpack.yaml` in the archive root,
    /// when it exists.
    #[arg(short, long, value_name = "FILE", env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Ignore file to apply, after those named in the configuration.
    /// May be repeated.
    #[arg(short = 'i', long = "ignore-file", value_name = "FILE")]
    pub ignore_files: Vec<PathBuf>,

    /// Inline ignore rule, evaluated after every ignore file. May be repeated.
    #[arg(short = 'p', long = "pattern", value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Leave out every entry whose name or parent directory starts with a dot.
    #[arg(long)]
    pub no_dotfiles: bool,

    /// Visit siblings in directory listing order instead of by name.
    #[arg(long)]
    pub unsorted: bool,
}

impl FilterArgs {
    /// Load the configuration for `root` and merge the command-line flags
    /// into it.
    pub fn load(&self, root: &Path) -> Result<PackConfig> {
        let mut pack = match &self.config {
            Some(path) => config::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => {
                let default = root.join(DEFAULT_CONFIG_FILENAME);
                if default.is_file() {
                    config::from_file(&default).with_context(|| {
                        format!("Failed to load config from {}", default.display())
                    })?
                } else {
                    debug!("no {} in {}", DEFAULT_CONFIG_FILENAME, root.display());
                    PackConfig::default()
                }
            }
        };

        // Ignore files given on the command line are relative to where the
        // command runs, not to the archive root.
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        pack.ignore_files
            .extend(self.ignore_files.iter().map(|p| cwd.join(p)));
        pack.patterns.extend(self.patterns.iter().cloned());
        if self.no_dotfiles {
            pack.dotfiles = true;
        }
        if self.unsorted {
            pack.sort = false;
        }
        Ok(pack)
    }
}
