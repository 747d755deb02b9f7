//! Default values shared by the library and the command-line tool.

use crate::writer::Format;
use std::path::{Path, PathBuf};

/// Configuration file looked up in the archive root when `--config` is not
/// given.
pub const DEFAULT_CONFIG_FILENAME: &str = ".dirpack.yaml";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "DIRPACK_CONFIG";

/// Returns the default output path for archiving `root`: the root's directory
/// name with the format's extension, in the current directory.
///
/// Falls back to `archive.<ext>` when the root has no usable name (for
/// example `/` or `.`).
pub fn default_output(root: &Path, format: Format) -> PathBuf {
    let name = root
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "archive".to_string());
    PathBuf::from(format!("{}.{}", name, format.extension()))
}
