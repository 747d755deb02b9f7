//! Filters decide whether an entry is left out of the archive.
//!
//! A [`Filter`] is a read-only predicate: it must not keep traversal state, so
//! one instance can serve several archive sessions and concurrent callers.
//! Rule sets, the dotfile predicate and plain closures all implement it, and
//! [`AnyFilter`] combines several into the single predicate a session uses.

use crate::entry::Entry;
use crate::pattern::RuleSet;

/// Decides whether an entry is excluded.
pub trait Filter: Send + Sync {
    /// Returns `true` when `entry` should be omitted. For a directory this
    /// also prunes everything beneath it.
    fn exclude(&self, entry: &Entry) -> bool;
}

impl<F> Filter for F
where
    F: Fn(&Entry) -> bool + Send + Sync,
{
    fn exclude(&self, entry: &Entry) -> bool {
        self(entry)
    }
}

impl Filter for RuleSet {
    fn exclude(&self, entry: &Entry) -> bool {
        self.is_excluded(entry.path(), entry.is_dir())
    }
}

/// Excludes entries whose name, or any ancestor directory name, starts with `.`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dotfiles;

impl Filter for Dotfiles {
    fn exclude(&self, entry: &Entry) -> bool {
        is_dotted(entry.path())
    }
}

/// True if any segment of the slash-separated `path` starts with a dot.
pub fn is_dotted(path: &str) -> bool {
    path.split('/')
        .any(|segment| segment.starts_with('.') && segment != "." && segment != "..")
}

/// Excludes an entry when any member filter excludes it.
#[derive(Default)]
pub struct AnyFilter {
    filters: Vec<Box<dyn Filter>>,
}

impl AnyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member filter.
    pub fn with<F: Filter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn push<F: Filter + 'static>(&mut self, filter: F) {
        self.filters.push(Box::new(filter));
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Filter for AnyFilter {
    fn exclude(&self, entry: &Entry) -> bool {
        self.filters.iter().any(|f| f.exclude(entry))
    }
}
