//! # dirpack
//!
//! Streams a directory tree into an archive while leaving out entries
//! selected by gitignore-style rules.
//!
//! ## Quick Example
//!
//! ```
//! use dirpack::archive::Archive;
//! use dirpack::pattern::RuleSet;
//! use dirpack::writer::Manifest;
//!
//! let temp = tempfile::tempdir().unwrap();
//! std::fs::create_dir(temp.path().join("target")).unwrap();
//! std::fs::write(temp.path().join("target/app"), "binary").unwrap();
//! std::fs::write(temp.path().join("main.rs"), "fn main() {}").unwrap();
//!
//! let rules = RuleSet::from_patterns(".gitignore", "target/\n").unwrap();
//! let mut archive = Archive::new(Manifest::new()).with_filter(rules);
//! archive.open().unwrap();
//! archive.add_dir(temp.path()).unwrap();
//! let stats = archive.close().unwrap();
//!
//! assert_eq!(archive.writer().names(), vec!["main.rs"]);
//! assert_eq!(stats.dirs_filtered, 1);
//! ```
//!
//! ## Core Concepts
//!
//! - **Rules (`pattern`)**: an ordered [`RuleSet`](pattern::RuleSet) compiled
//!   from ignore files. The last matching rule decides; `!` re-includes.
//! - **Filters (`filter`)**: predicates consulted for every entry. An excluded
//!   directory is pruned with everything beneath it.
//! - **Transformers (`transform`)**: optional rewriting of file content and
//!   descriptor before it is written.
//! - **Walking (`walk`)**: depth-first traversal, parents before children.
//! - **Writers (`writer`)**: the container format behind an
//!   [`ArchiveWriter`](writer::ArchiveWriter); zip is built in.
//! - **Sessions (`archive`)**: one open/add/close lifecycle over one writer,
//!   counting what was added and what was left out in [`Stats`](stats::Stats).

pub mod archive;
pub mod config;
pub mod defaults;
pub mod entry;
pub mod error;
pub mod filter;
pub mod output;
pub mod pattern;
pub mod stats;
pub mod transform;
pub mod walk;
pub mod writer;

#[cfg(test)]
mod pattern_proptest;
