//! # Configuration File
//!
//! A `.dirpack.yaml` file in the archive root (or a file named explicitly)
//! describes which entries are left out of an archive:
//!
//! ```yaml
//! ignore_files:
//!   - .gitignore
//!   - .npmignore
//! patterns:
//!   - "*.log"
//!   - "!keep.log"
//! dotfiles: true
//! sort: true
//! ```
//!
//! - **`ignore_files`**: ignore files read in order. Relative paths resolve
//!   against the archive root; files that do not exist are skipped.
//! - **`patterns`**: inline rules, evaluated after every ignore file so they
//!   win over them.
//! - **`dotfiles`**: also exclude every entry whose name or ancestor starts
//!   with a dot.
//! - **`sort`**: visit siblings in file name order (default `true`).
//!
//! Every key is optional. Unknown keys are rejected so that a misspelt key
//! does not silently archive files the user meant to leave out.

use crate::error::{Error, Result};
use crate::filter::{AnyFilter, Dotfiles};
use crate::pattern::{read_sources, RuleSet, Source};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const KNOWN_KEYS: &[&str] = &["ignore_files", "patterns", "dotfiles", "sort"];

/// Parsed `.dirpack.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    pub ignore_files: Vec<PathBuf>,
    pub patterns: Vec<String>,
    pub dotfiles: bool,
    pub sort: bool,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            ignore_files: Vec::new(),
            patterns: Vec::new(),
            dotfiles: false,
            sort: true,
        }
    }
}

impl PackConfig {
    /// Ignore file paths with relative entries resolved against `root`.
    pub fn ignore_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.ignore_files
            .iter()
            .map(|p| if p.is_absolute() { p.clone() } else { root.join(p) })
            .collect()
    }

    /// Build the rule set: ignore files first, then the inline patterns.
    pub fn rule_set(&self, root: &Path) -> Result<RuleSet> {
        let mut sources = read_sources(&self.ignore_paths(root))?;
        if !self.patterns.is_empty() {
            sources.push(Source::new("patterns", self.patterns.join("\n")));
        }
        RuleSet::parse(sources)
    }

    /// Build the combined filter for archiving `root`.
    pub fn build_filter(&self, root: &Path) -> Result<AnyFilter> {
        let rules = self.rule_set(root)?;
        let mut filter = AnyFilter::new();
        if !rules.is_empty() {
            filter.push(rules);
        }
        if self.dotfiles {
            filter.push(Dotfiles);
        }
        Ok(filter)
    }
}

/// Parse configuration from YAML text. An empty document yields the defaults.
pub fn parse(yaml_content: &str) -> Result<PackConfig> {
    let is_blank = yaml_content
        .lines()
        .all(|line| line.trim().is_empty() || line.trim_start().starts_with('#'));
    if is_blank {
        return Ok(PackConfig::default());
    }

    serde_yaml::from_str::<PackConfig>(yaml_content).map_err(|e| {
        let message = e.to_string();
        match unknown_key(&message) {
            Some(key) => Error::ConfigParse {
                message: format!("unknown key `{}`", key),
                hint: Some(suggest_key(&key)),
            },
            None => Error::Yaml(e),
        }
    })
}

/// Read and parse a configuration file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<PackConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Error::io(path, e)
        }
    })?;
    parse(&content)
}

fn unknown_key(message: &str) -> Option<String> {
    const MARKER: &str = "unknown field `";
    let start = message.find(MARKER)? + MARKER.len();
    let rest = &message[start..];
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

fn suggest_key(key: &str) -> String {
    let closest = KNOWN_KEYS
        .iter()
        .filter(|known| known.contains(key) || key.contains(*known))
        .copied()
        .next();
    match closest {
        Some(known) => format!("did you mean `{}`?", known),
        None => format!("supported keys are: {}", KNOWN_KEYS.join(", ")),
    }
}
