//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_file("src/main.rs", "fn main() {}");
//!     fixture.command().arg("ls").arg(".").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{read_zip, TestFixture};
}

/// A temporary directory tree to archive.
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_file("index.html", "<html>")
///     .with_file("logs/app.log", "boot");
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// A small web project: sources, build output, logs and VCS metadata.
    pub fn project() -> Self {
        Self::new()
            .with_file(".git/HEAD", "ref: refs/heads/main")
            .with_file(".gitignore", "node_modules/\n*.log\n!important.log\n")
            .with_file("index.html", "<html></html>")
            .with_file("src/app.js", "console.log('hi')")
            .with_file("src/app.test.js", "test()")
            .with_file("node_modules/lib/index.js", "module.exports = {}")
            .with_file("debug.log", "noise")
            .with_file("important.log", "keep me")
    }

    /// Add a `.dirpack.yaml` configuration file with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.with_file(".dirpack.yaml", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add an empty directory.
    pub fn with_dir(self, path: &str) -> Self {
        self.temp_dir
            .child(path)
            .create_dir_all()
            .expect("Failed to create directory");
        self
    }

    /// Add a symlink at `path` pointing to `target`.
    #[cfg(unix)]
    pub fn with_symlink(self, path: &str, target: &str) -> Self {
        std::os::unix::fs::symlink(target, self.temp_dir.path().join(path))
            .expect("Failed to create symlink");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("dirpack");
        cmd.current_dir(self.path());
        cmd.env_remove("DIRPACK_CONFIG");
        cmd.env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Read every file of a zip archive into a name to content map.
#[allow(dead_code)]
pub fn read_zip(path: impl Into<PathBuf>) -> BTreeMap<String, String> {
    let file = std::fs::File::open(path.into()).expect("Failed to open archive");
    let mut archive = zip::ZipArchive::new(file).expect("Failed to read archive");
    let mut contents = BTreeMap::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).expect("Failed to read entry");
        let mut content = String::new();
        entry
            .read_to_string(&mut content)
            .expect("Failed to read entry content");
        contents.insert(entry.name().to_string(), content);
    }
    contents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_project_fixture() {
        let fixture = TestFixture::project();
        assert!(fixture.path().join("node_modules/lib/index.js").exists());
        assert!(fixture.path().join(".gitignore").exists());
    }
}
