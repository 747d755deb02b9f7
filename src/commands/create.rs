//! # Create Command Implementation
//!
//! `dirpack create <ROOT>` writes a zip archive of `ROOT`, leaving out every
//! entry excluded by the configured ignore rules. When the output file lies
//! inside the root it is never archived into itself.
//!
//! A failed run removes the partially written output.

use anyhow::{Context, Result};
use clap::Args;
use indicatif::HumanBytes;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use dirpack::archive::Archive;
use dirpack::defaults::default_output;
use dirpack::entry::{normalize_path, Entry};
use dirpack::error::Error;
use dirpack::filter::AnyFilter;
use dirpack::output::{emoji, OutputConfig};
use dirpack::stats::StatsSnapshot;
use dirpack::writer::Format;

use super::FilterArgs;

/// Archive a directory tree
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Directory to archive.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Output file. Defaults to `<root name>.zip` in the current directory.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Serialize)]
struct Summary<'a> {
    archive: &'a Path,
    #[serde(flatten)]
    stats: StatsSnapshot,
}

/// Execute the `create` command.
pub fn execute(args: CreateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let root = &args.root;
    if !root.is_dir() {
        return Err(Error::NotFound { path: root.clone() }.into());
    }

    let pack = args.filter.load(root)?;
    let mut filter = pack
        .build_filter(root)
        .context("Failed to build ignore rules")?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(root, Format::Zip));
    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    if let Some(name) = name_inside(root, &output) {
        log::debug!("excluding output file {}", name);
        filter.push(move |entry: &Entry| entry.path() == name);
    }

    let stats = match write_archive(root, file, filter, pack.sort) {
        Ok(stats) => stats,
        Err(e) => {
            if let Err(err) = fs::remove_file(&output) {
                log::warn!("could not remove {}: {}", output.display(), err);
            }
            return Err(e).with_context(|| format!("Failed to archive {}", root.display()));
        }
    };

    if args.json {
        let summary = Summary {
            archive: &output,
            stats,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} Created {}",
        emoji(&out, "📦", "[OK]"),
        output.display()
    );
    println!(
        "   {} file(s), {} uncompressed",
        stats.files_added,
        HumanBytes(stats.size_uncompressed)
    );
    if stats.files_filtered > 0 || stats.dirs_filtered > 0 {
        println!(
            "   {} file(s) and {} director(ies) left out",
            stats.files_filtered, stats.dirs_filtered
        );
    }
    Ok(())
}

fn write_archive(
    root: &Path,
    file: File,
    filter: AnyFilter,
    sorted: bool,
) -> dirpack::error::Result<StatsSnapshot> {
    let writer = Format::Zip.writer(BufWriter::new(file));
    let mut archive = Archive::new(writer).with_filter(filter).sorted(sorted);
    archive.open()?;
    archive.add_dir(root)?;
    archive.close()
}

/// Archive name of `output` when it lies beneath `root`.
fn name_inside(root: &Path, output: &Path) -> Option<String> {
    let root = root.canonicalize().ok()?;
    let output = output.canonicalize().ok()?;
    let relative = output.strip_prefix(&root).ok()?;
    Some(normalize_path(relative))
}
