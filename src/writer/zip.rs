//! Zip container adapter built on the `zip` crate.

use super::ArchiveWriter;
use crate::entry::Entry;
use crate::error::{Error, Result};
use chrono::{Datelike, Timelike};
use std::io::{Seek, Write};
use std::time::SystemTime;

use ::zip::write::FileOptions;
use ::zip::CompressionMethod;

enum State<W: Write + Seek> {
    Pending(W),
    Open(::zip::ZipWriter<W>),
    Closed(W),
    Failed,
}

/// A symlink whose target text is still being written to its sink.
struct PendingLink {
    entry: Entry,
    target: Vec<u8>,
}

/// Writes entries into a deflate-compressed zip container.
///
/// Symlinks keep their link type in the entry header. Their target text is
/// buffered and written when the next entry starts or the archive closes.
pub struct ZipWriter<W: Write + Seek> {
    state: State<W>,
    link: Option<PendingLink>,
}

impl<W: Write + Seek> ZipWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            state: State::Pending(out),
            link: None,
        }
    }

    /// Recover the underlying output once the archive is closed (or if it was
    /// never opened).
    pub fn into_inner(self) -> Option<W> {
        match self.state {
            State::Pending(out) | State::Closed(out) => Some(out),
            State::Open(_) | State::Failed => None,
        }
    }

    fn finish_link(&mut self) -> Result<()> {
        let Some(link) = self.link.take() else {
            return Ok(());
        };
        let zip = match &mut self.state {
            State::Open(zip) => zip,
            _ => return Err(Error::writer("add", "zip archive is not open")),
        };
        let target = String::from_utf8_lossy(&link.target).into_owned();
        zip.add_symlink(link.entry.path(), target, options_for(&link.entry))
            .map_err(|e| Error::writer("add", format!("{}: {}", link.entry.path(), e)))
    }
}

impl<W: Write + Seek> ArchiveWriter for ZipWriter<W> {
    fn open(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, State::Failed) {
            State::Pending(out) => {
                self.state = State::Open(::zip::ZipWriter::new(out));
                Ok(())
            }
            other => {
                self.state = other;
                Err(Error::writer("open", "zip archive already opened"))
            }
        }
    }

    fn add(&mut self, entry: &Entry) -> Result<&mut dyn Write> {
        self.finish_link()?;
        let zip = match &mut self.state {
            State::Open(zip) => zip,
            _ => return Err(Error::writer("add", "zip archive is not open")),
        };

        if entry.is_symlink() {
            let link = self.link.insert(PendingLink {
                entry: entry.clone(),
                target: Vec::new(),
            });
            return Ok(&mut link.target);
        }

        let options = options_for(entry);
        if entry.is_dir() {
            zip.add_directory(entry.path(), options)
                .map_err(|e| Error::writer("add", format!("{}: {}", entry.path(), e)))?;
        } else {
            zip.start_file(entry.path(), options)
                .map_err(|e| Error::writer("add", format!("{}: {}", entry.path(), e)))?;
        }
        Ok(zip)
    }

    fn close(&mut self) -> Result<()> {
        if matches!(self.state, State::Open(_)) {
            self.finish_link()?;
        }
        match std::mem::replace(&mut self.state, State::Failed) {
            State::Open(mut zip) => {
                let mut out = zip.finish().map_err(|e| Error::writer("close", e))?;
                out.flush().map_err(|e| Error::writer("close", e.to_string()))?;
                self.state = State::Closed(out);
                Ok(())
            }
            other => {
                self.state = other;
                Err(Error::writer("close", "zip archive is not open"))
            }
        }
    }
}

fn options_for(entry: &Entry) -> FileOptions {
    FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(entry.permissions())
        .last_modified_time(dos_time(entry.modified()))
        .large_file(entry.size() >= u64::from(u32::MAX))
}

/// Convert to the MS-DOS timestamp zip headers carry. Times outside the
/// representable range (before 1980) fall back to the zip epoch.
fn dos_time(modified: SystemTime) -> ::zip::DateTime {
    let utc: chrono::DateTime<chrono::Utc> = modified.into();
    let year = u16::try_from(utc.year()).unwrap_or(0);
    ::zip::DateTime::from_date_and_time(
        year,
        utc.month() as u8,
        utc.day() as u8,
        utc.hour() as u8,
        utc.minute() as u8,
        utc.second() as u8,
    )
    .unwrap_or_default()
}
