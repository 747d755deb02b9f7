//! Entry descriptors: a normalized view of one filesystem node.
//!
//! An [`Entry`] is built once per traversal step and never mutated. Code that
//! needs a different descriptor (a transformer that rewrites content, for
//! example) derives a new one with the `with_*` methods.

use std::fs::Metadata;
use std::path::{Component, Path};
use std::time::SystemTime;

/// Bit mask selecting the file type bits of a mode.
pub const MODE_TYPE_MASK: u32 = 0o170000;
/// File type bits for a directory.
pub const MODE_DIR: u32 = 0o040000;
/// File type bits for a regular file.
pub const MODE_FILE: u32 = 0o100000;
/// File type bits for a symbolic link.
pub const MODE_SYMLINK: u32 = 0o120000;
/// Bit mask selecting the permission bits (including setuid/setgid/sticky).
pub const MODE_PERM_MASK: u32 = 0o7777;

/// Descriptor of a single archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    path: String,
    size: u64,
    mode: u32,
    modified: SystemTime,
    is_dir: bool,
    is_symlink: bool,
}

impl Entry {
    /// A regular file with default `0644` permissions.
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
            mode: MODE_FILE | 0o644,
            modified: SystemTime::UNIX_EPOCH,
            is_dir: false,
            is_symlink: false,
        }
    }

    /// A directory with default `0755` permissions.
    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            size: 0,
            mode: MODE_DIR | 0o755,
            modified: SystemTime::UNIX_EPOCH,
            is_dir: true,
            is_symlink: false,
        }
    }

    /// A symbolic link whose archived content is `target_len` bytes of link text.
    pub fn symlink(path: impl Into<String>, target_len: u64) -> Self {
        Self {
            path: path.into(),
            size: target_len,
            mode: MODE_SYMLINK | 0o777,
            modified: SystemTime::UNIX_EPOCH,
            is_dir: false,
            is_symlink: true,
        }
    }

    /// Build a descriptor from `lstat`-style metadata.
    ///
    /// `path` must already be relative to the archive root and slash separated
    /// (see [`normalize_path`]).
    pub fn from_metadata(path: impl Into<String>, metadata: &Metadata) -> Self {
        let file_type = metadata.file_type();
        let is_dir = file_type.is_dir();
        let is_symlink = file_type.is_symlink();

        Self {
            path: path.into(),
            size: if is_dir { 0 } else { metadata.len() },
            mode: mode_of(metadata),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            is_dir,
            is_symlink,
        }
    }

    /// Slash-separated path relative to the archive root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Final path segment.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Full mode: type bits and permission bits.
    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// Permission bits only.
    pub fn permissions(&self) -> u32 {
        self.mode & MODE_PERM_MASK
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    pub fn is_symlink(&self) -> bool {
        self.is_symlink
    }

    /// New descriptor with a different size.
    pub fn with_size(self, size: u64) -> Self {
        Self { size, ..self }
    }

    /// New descriptor with different permission bits. Type bits are kept.
    pub fn with_permissions(self, permissions: u32) -> Self {
        Self {
            mode: (self.mode & MODE_TYPE_MASK) | (permissions & MODE_PERM_MASK),
            ..self
        }
    }

    /// New descriptor with a different modification time.
    pub fn with_modified(self, modified: SystemTime) -> Self {
        Self { modified, ..self }
    }

    /// New descriptor with a different archive path.
    pub fn with_path(self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..self
        }
    }
}

/// Convert a relative filesystem path into the slash-separated form used for
/// archive names. `.` components are dropped.
pub fn normalize_path(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => {
                if !out.is_empty() {
                    out.push('/');
                }
                out.push_str(&part.to_string_lossy());
            }
            Component::ParentDir => {
                if !out.is_empty() {
                    out.push('/');
                }
                out.push_str("..");
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    out
}

#[cfg(unix)]
fn mode_of(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    metadata.mode()
}

#[cfg(not(unix))]
fn mode_of(metadata: &Metadata) -> u32 {
    let file_type = metadata.file_type();
    let readonly = metadata.permissions().readonly();
    if file_type.is_dir() {
        MODE_DIR | if readonly { 0o555 } else { 0o755 }
    } else if file_type.is_symlink() {
        MODE_SYMLINK | 0o777
    } else {
        MODE_FILE | if readonly { 0o444 } else { 0o644 }
    }
}
