//! Archive counters.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one archive operation.
///
/// Each counter is independently atomic, so they can be bumped from several
/// threads without further locking. A [`snapshot`](Stats::snapshot) reads the
/// four counters one after another and is not a consistent cut across them.
#[derive(Debug, Default)]
pub struct Stats {
    files_filtered: AtomicU64,
    dirs_filtered: AtomicU64,
    files_added: AtomicU64,
    size_uncompressed: AtomicU64,
}

/// Point-in-time copy of [`Stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub files_filtered: u64,
    pub dirs_filtered: u64,
    pub files_added: u64,
    pub size_uncompressed: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_file_filtered(&self) {
        self.files_filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dir_filtered(&self) {
        self.dirs_filtered.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one added file of `size` uncompressed bytes.
    pub fn record_file_added(&self, size: u64) {
        self.files_added.fetch_add(1, Ordering::Relaxed);
        self.size_uncompressed.fetch_add(size, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            files_filtered: self.files_filtered.load(Ordering::Relaxed),
            dirs_filtered: self.dirs_filtered.load(Ordering::Relaxed),
            files_added: self.files_added.load(Ordering::Relaxed),
            size_uncompressed: self.size_uncompressed.load(Ordering::Relaxed),
        }
    }
}
