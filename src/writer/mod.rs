//! # Archive Writers
//!
//! The [`ArchiveWriter`] trait is the narrow contract between an archive
//! session and a container format. A writer is opened once, receives entries
//! one at a time through [`add`](ArchiveWriter::add), each returning a byte
//! sink for that entry's content, and is closed once to finalize the container.
//!
//! Concrete formats are adapters selected at construction time through
//! [`Format`]. [`Manifest`] is a format-less writer that only records what
//! would have been archived.

pub mod zip;

use crate::entry::Entry;
use crate::error::{Error, Result};
use std::fmt;
use std::io::{self, Seek, Write};
use std::str::FromStr;

/// Lifecycle contract every container format implements.
pub trait ArchiveWriter {
    /// Prepare the container. Called exactly once, before any `add`.
    fn open(&mut self) -> Result<()>;

    /// Start a new entry and return the sink its content is written to.
    ///
    /// The descriptor supplies the name, size, mode, modification time and
    /// directory flag for the entry header. The sink is only valid until the
    /// next call on the writer.
    fn add(&mut self, entry: &Entry) -> Result<&mut dyn Write>;

    /// Finalize the container (for example, write a central directory).
    fn close(&mut self) -> Result<()>;
}

impl<T: ArchiveWriter + ?Sized> ArchiveWriter for Box<T> {
    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn add(&mut self, entry: &Entry) -> Result<&mut dyn Write> {
        (**self).add(entry)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

impl<T: ArchiveWriter + ?Sized> ArchiveWriter for &mut T {
    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn add(&mut self, entry: &Entry) -> Result<&mut dyn Write> {
        (**self).add(entry)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Container formats available for archive output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Deflate-compressed zip.
    #[default]
    Zip,
}

impl Format {
    /// Construct the writer adapter for this format over `out`.
    pub fn writer<W>(self, out: W) -> Box<dyn ArchiveWriter>
    where
        W: Write + Seek + 'static,
    {
        match self {
            Format::Zip => Box::new(self::zip::ZipWriter::new(out)),
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Zip => "zip",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "zip" => Ok(Format::Zip),
            other => Err(Error::writer(
                "select format",
                format!("unsupported archive format '{}'", other),
            )),
        }
    }
}

/// One entry recorded by a [`Manifest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub entry: Entry,
    /// Bytes written to the entry's sink.
    pub written: u64,
    /// Captured content, when the manifest was created with
    /// [`Manifest::capturing`].
    pub content: Vec<u8>,
}

/// A writer that records entries instead of building a container.
#[derive(Debug, Default)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
    capture: bool,
    opened: bool,
    closed: bool,
}

impl Manifest {
    /// Record entries and byte counts, discarding content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record entries and keep their content.
    pub fn capturing() -> Self {
        Self {
            capture: true,
            ..Self::default()
        }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Archive names in the order they were added.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.entry.path()).collect()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl ArchiveWriter for Manifest {
    fn open(&mut self) -> Result<()> {
        if self.opened {
            return Err(Error::writer("open", "manifest already opened"));
        }
        self.opened = true;
        Ok(())
    }

    fn add(&mut self, entry: &Entry) -> Result<&mut dyn Write> {
        if !self.opened || self.closed {
            return Err(Error::writer("add", "manifest is not open"));
        }
        self.entries.push(ManifestEntry {
            entry: entry.clone(),
            written: 0,
            content: Vec::new(),
        });
        Ok(self)
    }

    fn close(&mut self) -> Result<()> {
        if !self.opened || self.closed {
            return Err(Error::writer("close", "manifest is not open"));
        }
        self.closed = true;
        Ok(())
    }
}

impl Write for Manifest {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let capture = self.capture;
        let current = self
            .entries
            .last_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "no entry started"))?;
        current.written += buf.len() as u64;
        if capture {
            current.content.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_records_entries_and_bytes() {
        let mut manifest = Manifest::new();
        manifest.open().unwrap();
        manifest
            .add(&Entry::file("a.txt", 5))
            .unwrap()
            .write_all(b"hello")
            .unwrap();
        manifest
            .add(&Entry::file("b/c.txt", 3))
            .unwrap()
            .write_all(b"abc")
            .unwrap();
        manifest.close().unwrap();

        assert_eq!(manifest.names(), vec!["a.txt", "b/c.txt"]);
        assert_eq!(manifest.entries()[0].written, 5);
        assert!(manifest.entries()[0].content.is_empty());
        assert!(manifest.is_closed());
    }

    #[test]
    fn test_manifest_capturing_keeps_content() {
        let mut manifest = Manifest::capturing();
        manifest.open().unwrap();
        manifest
            .add(&Entry::file("a.txt", 5))
            .unwrap()
            .write_all(b"hello")
            .unwrap();
        assert_eq!(manifest.entries()[0].content, b"hello");
    }

    #[test]
    fn test_manifest_lifecycle_errors() {
        let mut manifest = Manifest::new();
        assert!(manifest.add(&Entry::file("a", 0)).is_err());
        assert!(manifest.close().is_err());
        manifest.open().unwrap();
        assert!(manifest.open().is_err());
        manifest.close().unwrap();
        assert!(manifest.add(&Entry::file("a", 0)).is_err());
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("zip".parse::<Format>().unwrap(), Format::Zip);
        assert_eq!("ZIP".parse::<Format>().unwrap(), Format::Zip);
        assert!("tar".parse::<Format>().is_err());
        assert_eq!(Format::Zip.to_string(), "zip");
    }
}
