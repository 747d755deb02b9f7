//! End-to-end tests for the `dirpack create` command.
//!
//! These tests invoke the binary on temporary trees and read the resulting
//! zip archives back.

mod common;
use common::prelude::*;

#[test]
fn test_create_help() {
    TestFixture::new()
        .command()
        .arg("create")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive a directory tree"))
        .stdout(predicate::str::contains("--ignore-file"))
        .stdout(predicate::str::contains("--no-dotfiles"));
}

#[test]
fn test_create_with_ignore_file_and_dotfiles() {
    let fixture = TestFixture::project();

    fixture
        .command()
        .args(["--color", "never", "create", ".", "-o", "out.zip"])
        .args(["-i", ".gitignore", "--no-dotfiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created out.zip"))
        .stdout(predicate::str::contains("4 file(s)"));

    let contents = read_zip(fixture.path().join("out.zip"));
    let names: Vec<&str> = contents.keys().map(String::as_str).collect();
    // out.zip itself lives in the root and is never archived
    assert_eq!(
        names,
        vec!["important.log", "index.html", "src/app.js", "src/app.test.js"]
    );
}

#[test]
fn test_create_json_summary() {
    let fixture = TestFixture::project();

    fixture
        .command()
        .args(["create", ".", "-o", "out.zip", "--json", "-p", "node_modules"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"archive\": \"out.zip\""))
        .stdout(predicate::str::contains("\"dirs_filtered\": 1"))
        .stdout(predicate::str::contains("\"files_added\": 7"));
}

#[test]
fn test_create_reads_default_config() {
    let fixture = TestFixture::project().with_config(
        "ignore_files: [.gitignore]\npatterns: ['src/*.test.js']\ndotfiles: true\n",
    );

    fixture
        .command()
        .args(["create", ".", "-o", "out.zip"])
        .assert()
        .success();

    let contents = read_zip(fixture.path().join("out.zip"));
    assert!(contents.contains_key("src/app.js"));
    assert!(!contents.contains_key("src/app.test.js"));
    assert!(!contents.contains_key(".dirpack.yaml"));
    assert!(!contents.keys().any(|k| k.starts_with("node_modules")));
}

#[test]
fn test_create_explicit_config_from_env() {
    let fixture = TestFixture::new()
        .with_file("site/index.html", "<html>")
        .with_file("site/draft.md", "wip")
        .with_file("pack.yaml", "patterns: ['*.md']\n");

    fixture
        .command()
        .env("DIRPACK_CONFIG", fixture.path().join("pack.yaml"))
        .args(["create", "site", "-o", "site.zip"])
        .assert()
        .success();

    let contents = read_zip(fixture.path().join("site.zip"));
    assert_eq!(contents.keys().collect::<Vec<_>>(), vec!["index.html"]);
}

#[test]
fn test_create_default_output_name() {
    let fixture = TestFixture::new().with_file("site/index.html", "<html>");

    fixture
        .command()
        .args(["create", "site"])
        .assert()
        .success();

    fixture.child("site.zip").assert(predicate::path::exists());
}

#[test]
fn test_create_missing_root() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["create", "missing", "-o", "out.zip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found"));

    fixture.child("out.zip").assert(predicate::path::missing());
}

#[test]
fn test_create_invalid_pattern() {
    let fixture = TestFixture::new().with_file("a.txt", "a");

    fixture
        .command()
        .args(["create", ".", "-o", "out.zip", "-p", "[z-a]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Pattern syntax error"));
}

#[test]
fn test_create_unknown_config_key() {
    let fixture = TestFixture::new()
        .with_file("a.txt", "a")
        .with_config("ignore: [.gitignore]\n");

    fixture
        .command()
        .args(["create", ".", "-o", "out.zip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("did you mean `ignore_files`?"));
}

#[test]
fn test_create_debug_logging() {
    let fixture = TestFixture::new()
        .with_file("a.txt", "a")
        .with_file("b.log", "b");

    fixture
        .command()
        .args(["--log-level", "debug", "create", ".", "-o", "out.zip", "-p", "*.log"])
        .assert()
        .success()
        .stderr(predicate::str::contains("filtered b.log"))
        .stderr(predicate::str::contains("add a.txt"));
}
