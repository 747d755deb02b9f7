//! Depth-first traversal with filtering and subtree pruning.
//!
//! The walker visits every descendant of a root directory once, parents before
//! children, and consults the active [`Filter`] for each node. An excluded
//! directory is pruned: nothing beneath it is visited or evaluated. Sockets,
//! devices and FIFOs are skipped without being counted.

use crate::entry::{normalize_path, Entry};
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::stats::Stats;
use log::debug;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Traverses a directory tree, applying a filter at every node.
pub struct Walker<'a> {
    root: PathBuf,
    filter: Option<&'a dyn Filter>,
    sorted: bool,
}

impl<'a> Walker<'a> {
    /// Walk `root` with no filter, siblings in lexical file name order.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            filter: None,
            sorted: true,
        }
    }

    pub fn filter(mut self, filter: &'a dyn Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sort siblings lexically by file name (the default). When disabled the
    /// walker does no re-ordering of its own: siblings come in the order the
    /// platform lists them, which is stable for an unchanged directory but
    /// otherwise unspecified.
    pub fn sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree. `visit` receives every surviving entry (directories
    /// included) together with its filesystem path. Filtered entries are
    /// counted in `stats`. The first error from the filesystem or from `visit`
    /// stops the walk.
    pub fn walk<F>(&self, stats: &Stats, mut visit: F) -> Result<()>
    where
        F: FnMut(&Entry, &Path) -> Result<()>,
    {
        let root = &self.root;
        let metadata = std::fs::metadata(root).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::NotFound { path: root.clone() }
            } else {
                Error::io(root, e)
            }
        })?;
        if !metadata.is_dir() {
            return Err(Error::io(
                root,
                io::Error::new(io::ErrorKind::InvalidInput, "archive root is not a directory"),
            ));
        }

        let mut walkdir = WalkDir::new(root).min_depth(1).follow_links(false);
        if self.sorted {
            walkdir = walkdir.sort_by_file_name();
        }

        let mut it = walkdir.into_iter();
        while let Some(next) = it.next() {
            let dent = next.map_err(|e| walk_error(root, e))?;

            let file_type = dent.file_type();
            if !(file_type.is_file() || file_type.is_dir() || file_type.is_symlink()) {
                debug!("skipping special file {}", dent.path().display());
                continue;
            }

            let relative = dent.path().strip_prefix(root).map_err(|_| {
                Error::io(
                    dent.path(),
                    io::Error::new(io::ErrorKind::InvalidData, "path escapes archive root"),
                )
            })?;
            let metadata = dent.metadata().map_err(|e| walk_error(root, e))?;
            let entry = Entry::from_metadata(normalize_path(relative), &metadata);

            if self.filter.is_some_and(|f| f.exclude(&entry)) {
                debug!("filtered {} - {}", entry.path(), entry.size());
                if entry.is_dir() {
                    stats.record_dir_filtered();
                    it.skip_current_dir();
                } else {
                    stats.record_file_filtered();
                }
                continue;
            }

            visit(&entry, dent.path())?;
        }

        Ok(())
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    match err.into_io_error() {
        Some(source) => Error::io(path, source),
        None => Error::io(
            path,
            io::Error::new(io::ErrorKind::Other, "filesystem loop detected"),
        ),
    }
}
