/*!
 * Common test utilities for the yabtwai test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A small book with chapters 1-3, the preface long enough to become an
/// introduction chapter
pub fn sample_book() -> String {
    let preface = "This preface sets the scene at length, well past the fifty \
                   character minimum for an introduction chapter.";
    format!(
        "{}\nChapter 1 - Departure\nThe journey began at dawn.\n\
         Chapter 2 - Crossing\nThe river was wider than expected.\n\
         Chapter 3 - Arrival\nThe city gates stood open.",
        preface
    )
}
