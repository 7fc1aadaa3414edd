// ==============================================================================
// Shared Test Helpers
// ==============================================================================
//
// Each test binary compiles its own copy, so not every helper is used in each.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// A corpus directory with a nested subfolder and one file that must be
/// filtered out by extension.
pub fn corpus_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("create temp corpus dir");
    write(
        dir.path(),
        "shakespeare.txt",
        "To be or not to be, that is the question\n",
    );
    write(
        dir.path(),
        "programming.txt",
        "Hello world example\n\nPython programming language\n",
    );
    write(
        dir.path(),
        "subfolder/nested.txt",
        "Nested file content\nA different test of file paths in a sub dir.\n",
    );
    write(dir.path(), "ignore.csv", "CSV,data,here\n");
    dir
}

pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(&path, content).expect("write corpus file");
}
