//! # Check-Ignore Command Implementation
//!
//! `dirpack check-ignore <ROOT> <PATH>...` reports, for each path, whether an
//! archive of `ROOT` would leave it out and which rule decides. Paths are
//! relative to the root. Whether a path is a directory is read from the
//! filesystem unless `--dir` is given or the path ends in `/`.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use dirpack::filter::is_dotted;
use dirpack::output::{decision_label, OutputConfig};
use dirpack::pattern::RuleSet;

use super::FilterArgs;

/// Show whether paths are excluded and why
#[derive(Args, Debug)]
pub struct CheckIgnoreArgs {
    /// Archive root the paths are relative to.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Paths to check.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<String>,

    /// Treat every path as a directory.
    #[arg(long)]
    pub dir: bool,

    #[command(flatten)]
    pub filter: FilterArgs,
}

/// Why a path is in or out.
#[derive(Debug, PartialEq, Eq)]
enum Verdict {
    /// No rule matched.
    Unmatched,
    /// `rule` decided the path itself.
    Rule { excluded: bool, rule: String },
    /// An ancestor directory is excluded, so the path is never reached.
    Parent { parent: String, rule: String },
    Dotfile,
}

impl Verdict {
    fn is_excluded(&self) -> bool {
        match self {
            Verdict::Unmatched => false,
            Verdict::Rule { excluded, .. } => *excluded,
            Verdict::Parent { .. } | Verdict::Dotfile => true,
        }
    }

    fn reason(&self) -> String {
        match self {
            Verdict::Unmatched => "no matching rule".to_string(),
            Verdict::Rule { rule, .. } => rule.clone(),
            Verdict::Parent { parent, rule } => format!("via parent {}/ ({})", parent, rule),
            Verdict::Dotfile => "dotfile".to_string(),
        }
    }
}

/// Execute the `check-ignore` command.
pub fn execute(args: CheckIgnoreArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let pack = args.filter.load(&args.root)?;
    let rules = pack
        .rule_set(&args.root)
        .context("Failed to build ignore rules")?;

    for raw in &args.paths {
        let path = raw.trim_start_matches("./").trim_end_matches('/');
        let is_dir = args.dir || raw.ends_with('/') || args.root.join(path).is_dir();
        let verdict = judge(&rules, pack.dotfiles, path, is_dir);
        println!(
            "{}  {}  {}",
            decision_label(&out, verdict.is_excluded()),
            raw,
            verdict.reason()
        );
    }
    Ok(())
}

fn judge(rules: &RuleSet, dotfiles: bool, path: &str, is_dir: bool) -> Verdict {
    if dotfiles && is_dotted(path) {
        return Verdict::Dotfile;
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    for depth in 1..segments.len() {
        let parent = segments[..depth].join("/");
        if rules.decide(&parent, true).is_excluded() {
            let rule = rules
                .explain(&parent, true)
                .map(ToString::to_string)
                .unwrap_or_default();
            return Verdict::Parent { parent, rule };
        }
    }

    match rules.explain(path, is_dir) {
        Some(rule) => Verdict::Rule {
            excluded: !rule.is_negated(),
            rule: rule.to_string(),
        },
        None => Verdict::Unmatched,
    }
}
