//! # Ls Command Implementation
//!
//! `dirpack ls <ROOT>` performs a dry run: the tree is walked and filtered
//! exactly as `create` would, but entries are recorded in a manifest instead
//! of a container. Entries are listed in archive order.

use anyhow::{Context, Result};
use clap::Args;
use indicatif::HumanBytes;
use std::path::PathBuf;

use dirpack::archive::Archive;
use dirpack::error::Error;
use dirpack::writer::{Manifest, ManifestEntry};

use super::FilterArgs;

/// List the entries that would be archived
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Directory to list.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Use long listing format showing permissions and size.
    #[arg(short, long)]
    pub long: bool,

    /// Show only the number of entries.
    #[arg(long)]
    pub count: bool,

    #[command(flatten)]
    pub filter: FilterArgs,
}

/// Execute the `ls` command.
pub fn execute(args: LsArgs) -> Result<()> {
    let root = &args.root;
    if !root.is_dir() {
        return Err(Error::NotFound { path: root.clone() }.into());
    }

    let pack = args.filter.load(root)?;
    let filter = pack
        .build_filter(root)
        .context("Failed to build ignore rules")?;

    let mut archive = Archive::new(Manifest::new())
        .with_filter(filter)
        .sorted(pack.sort);
    archive.open()?;
    archive
        .add_dir(root)
        .with_context(|| format!("Failed to list {}", root.display()))?;
    let stats = archive.close()?;
    let manifest = archive.into_writer();
    let entries = manifest.entries();

    if args.count {
        println!("{}", entries.len());
        return Ok(());
    }

    if entries.is_empty() {
        println!("No files would be archived.");
        return Ok(());
    }

    for item in entries {
        println!("{}", format_line(item, args.long));
    }

    println!();
    println!(
        "{} file(s), {} total",
        stats.files_added,
        HumanBytes(stats.size_uncompressed)
    );
    Ok(())
}

fn format_line(item: &ManifestEntry, long: bool) -> String {
    if !long {
        return item.entry.path().to_string();
    }
    let kind = if item.entry.is_symlink() { 'l' } else { '-' };
    format!(
        "{}{} {:>10} {}",
        kind,
        format_permissions(item.entry.permissions()),
        HumanBytes(item.written).to_string(),
        item.entry.path()
    )
}

/// Format file permissions in Unix-style (e.g., "rw-r--r--")
fn format_permissions(mode: u32) -> String {
    const BITS: [(u32, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];
    BITS.iter()
        .map(|&(bit, c)| if mode & bit != 0 { c } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirpack::entry::Entry;

    #[test]
    fn test_format_permissions() {
        assert_eq!(format_permissions(0o644), "rw-r--r--");
        assert_eq!(format_permissions(0o755), "rwxr-xr-x");
        assert_eq!(format_permissions(0o700), "rwx------");
        assert_eq!(format_permissions(0o000), "---------");
    }

    #[test]
    fn test_format_line() {
        let item = ManifestEntry {
            entry: Entry::file("src/main.rs", 12).with_permissions(0o755),
            written: 12,
            content: Vec::new(),
        };
        assert_eq!(format_line(&item, false), "src/main.rs");

        let long = format_line(&item, true);
        assert!(long.starts_with("-rwxr-xr-x"));
        assert!(long.contains("12 B"));
        assert!(long.ends_with(" src/main.rs"));
    }

    #[test]
    fn test_execute_missing_root() {
        let args = LsArgs {
            root: PathBuf::from("/nonexistent/dirpack"),
            long: false,
            count: false,
            filter: FilterArgs::default(),
        };
        assert!(execute(args).is_err());
    }
}
