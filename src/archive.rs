//! # Archive Sessions
//!
//! An [`Archive`] binds a tree walk to an [`ArchiveWriter`]. It owns exactly
//! one writer for its whole life and drives it strictly in order: `open`, any
//! number of adds, `close`.
//!
//! For every entry that survives the filter:
//!
//! - directories are only traversed; containers infer them from file names,
//! - symlinks are written as their link-target text, sized to that text,
//! - regular files are streamed through the optional [`Transformer`] and
//!   copied into the sink the writer returns.
//!
//! Counters are kept in a [`Stats`] block that can be shared with the caller
//! through [`Archive::with_stats`]. Any error aborts the operation; the
//! partially written output is left for the caller to discard.
//!
//! ```
//! use dirpack::archive::Archive;
//! use dirpack::entry::Entry;
//! use dirpack::writer::Manifest;
//! use std::io::Write;
//!
//! let mut archive = Archive::new(Manifest::new());
//! archive.open().unwrap();
//! archive
//!     .add(&Entry::file("hello.txt", 5))
//!     .unwrap()
//!     .write_all(b"hello")
//!     .unwrap();
//! archive.close().unwrap();
//! assert_eq!(archive.writer().names(), vec!["hello.txt"]);
//! ```

use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::stats::{Stats, StatsSnapshot};
use crate::transform::{Stream, Transformer};
use crate::walk::Walker;
use crate::writer::ArchiveWriter;
use indicatif::HumanBytes;
use log::{debug, warn};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Created,
    Open,
    Closed,
}

/// A single archive operation over one writer.
pub struct Archive<W: ArchiveWriter> {
    writer: W,
    filter: Option<Box<dyn Filter>>,
    transform: Option<Box<dyn Transformer>>,
    stats: Arc<Stats>,
    sorted: bool,
    state: State,
}

impl<W: ArchiveWriter> Archive<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            filter: None,
            transform: None,
            stats: Arc::new(Stats::new()),
            sorted: true,
            state: State::Created,
        }
    }

    /// Set the filter consulted for every walked entry.
    pub fn with_filter<F: Filter + 'static>(mut self, filter: F) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Set the transformer applied to regular files.
    pub fn with_transform<T: Transformer + 'static>(mut self, transform: T) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Record counters into a caller-owned block.
    pub fn with_stats(mut self, stats: Arc<Stats>) -> Self {
        self.stats = stats;
        self
    }

    /// Visit siblings in file name order (default) or platform order.
    pub fn sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Open the underlying writer. Must be called once, before anything is added.
    pub fn open(&mut self) -> Result<()> {
        if self.state != State::Created {
            return Err(Error::State {
                message: "archive already opened".to_string(),
            });
        }
        debug!("open");
        self.writer.open()?;
        self.state = State::Open;
        Ok(())
    }

    /// Add a single entry and return the sink for its content.
    ///
    /// The entry is not filtered or transformed, and is not counted.
    pub fn add(&mut self, entry: &Entry) -> Result<&mut dyn Write> {
        self.ensure_open("add")?;
        add_to(&mut self.writer, entry)
    }

    /// Recursively add the contents of `root`. Entry names are relative to
    /// `root`.
    pub fn add_dir(&mut self, root: impl AsRef<Path>) -> Result<()> {
        self.ensure_open("add directory")?;

        let Self {
            writer,
            filter,
            transform,
            stats,
            sorted,
            ..
        } = self;
        let stats: &Stats = stats;
        let transform = transform.as_deref();

        let mut walker = Walker::new(root.as_ref()).sorted(*sorted);
        if let Some(filter) = filter.as_deref() {
            walker = walker.filter(filter);
        }

        walker.walk(stats, |entry, path| {
            write_entry(writer, transform, stats, entry, path)
        })
    }

    /// Close the underlying writer and return the final counters.
    pub fn close(&mut self) -> Result<StatsSnapshot> {
        self.ensure_open("close")?;

        let snapshot = self.stats.snapshot();
        debug!(
            "stats: files_filtered={} dirs_filtered={} files_added={} size_uncompressed={}",
            snapshot.files_filtered,
            snapshot.dirs_filtered,
            snapshot.files_added,
            HumanBytes(snapshot.size_uncompressed)
        );

        debug!("close");
        self.writer.close()?;
        self.state = State::Closed;
        Ok(snapshot)
    }

    fn ensure_open(&self, operation: &str) -> Result<()> {
        match self.state {
            State::Open => Ok(()),
            State::Created => Err(Error::State {
                message: format!("cannot {} before the archive is opened", operation),
            }),
            State::Closed => Err(Error::State {
                message: format!("cannot {} after the archive is closed", operation),
            }),
        }
    }
}

fn add_to<'w, W: ArchiveWriter + ?Sized>(writer: &'w mut W, entry: &Entry) -> Result<&'w mut dyn Write> {
    debug!(
        "add {}: size={} mode={:o}",
        entry.path(),
        entry.size(),
        entry.mode()
    );
    writer.add(entry)
}

fn write_entry<W: ArchiveWriter + ?Sized>(
    writer: &mut W,
    transform: Option<&dyn Transformer>,
    stats: &Stats,
    entry: &Entry,
    path: &Path,
) -> Result<()> {
    if entry.is_dir() {
        return Ok(());
    }

    if entry.is_symlink() {
        let target = std::fs::read_link(path).map_err(|e| Error::io(path, e))?;
        let content = link_text(&target);
        let entry = entry.clone().with_size(content.len() as u64);

        add_to(writer, &entry)?
            .write_all(&content)
            .map_err(|e| Error::io(path, e))?;
        stats.record_file_added(content.len() as u64);
        return Ok(());
    }

    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let stream: Stream = Box::new(file);
    let (mut stream, entry) = match transform {
        Some(transform) => transform.transform(stream, entry.clone())?,
        None => (stream, entry.clone()),
    };

    let sink = add_to(writer, &entry)?;
    let copied = io::copy(&mut stream, sink).map_err(|e| Error::io(path, e))?;
    if copied != entry.size() {
        warn!(
            "{}: wrote {} bytes but the descriptor declares {}",
            entry.path(),
            copied,
            entry.size()
        );
    }

    stats.record_file_added(copied);
    Ok(())
}

#[cfg(unix)]
fn link_text(target: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    target.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
fn link_text(target: &Path) -> Vec<u8> {
    target.to_string_lossy().replace('\\', "/").into_bytes()
}
