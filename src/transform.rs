//! Content and metadata rewriting applied to regular files before they are
//! written.
//!
//! A transformer receives the file's byte stream and descriptor and returns a
//! replacement pair. When the stream length changes the returned descriptor
//! must carry the new size, otherwise container headers built from it will be
//! wrong. Returning [`Error::Aborted`](crate::error::Error::Aborted) cancels the
//! archive operation.

use crate::entry::Entry;
use crate::error::Result;
use std::io::{Cursor, Read};

/// A boxed byte stream handed through a transformer.
pub type Stream = Box<dyn Read>;

/// Rewrites an entry's content and/or descriptor.
pub trait Transformer {
    fn transform(&self, stream: Stream, entry: Entry) -> Result<(Stream, Entry)>;
}

impl<F> Transformer for F
where
    F: Fn(Stream, Entry) -> Result<(Stream, Entry)>,
{
    fn transform(&self, stream: Stream, entry: Entry) -> Result<(Stream, Entry)> {
        self(stream, entry)
    }
}

/// Passes content and descriptor through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Transformer for Identity {
    fn transform(&self, stream: Stream, entry: Entry) -> Result<(Stream, Entry)> {
        Ok((stream, entry))
    }
}

/// Build a transformer that rewrites whole file contents in memory.
///
/// The descriptor size is updated to the length of the returned bytes.
pub fn map_content<F>(f: F) -> impl Transformer
where
    F: Fn(&Entry, Vec<u8>) -> Vec<u8>,
{
    move |mut stream: Stream, entry: Entry| -> Result<(Stream, Entry)> {
        let mut buf = Vec::with_capacity(entry.size() as usize);
        stream
            .read_to_end(&mut buf)
            .map_err(|e| crate::error::Error::io(entry.path(), e))?;
        let out = f(&entry, buf);
        let entry = entry.with_size(out.len() as u64);
        Ok((Box::new(Cursor::new(out)) as Stream, entry))
    }
}
