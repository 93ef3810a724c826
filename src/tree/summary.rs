//! Traversal summary types

use std::path::PathBuf;

use serde::Serialize;

/// Counters collected during one traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalkSummary {
    /// Directories passed to the directory visitor
    pub directories: usize,
    /// Files passed to the file visitor
    pub files: usize,
    /// Link directories visited but not descended into
    pub links_not_followed: usize,
    /// Directories the visitor declined to descend into
    pub vetoed: usize,
    /// Directories that could not be listed (skip-and-continue only)
    pub skipped: Vec<SkippedDir>,
}

/// A directory stepped over because listing it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDir {
    pub path: PathBuf,
    pub error: String,
}
