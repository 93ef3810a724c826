//! Test utilities for building temporary directory trees.
//!
//! Only compiled with the `test-utils` feature (tests and benchmarks).

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory tree for testing.
///
/// Paths given to the builder methods are relative to the tree root and may
/// contain `/` separators. Parent directories are created as needed. The tree
/// is removed when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the root of the tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Resolve a tree-relative path.
    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Add a file with the given content.
    pub fn add_file(&self, rel: &str, content: &str) -> PathBuf {
        let full_path = self.join(rel);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Add a directory (and any missing parents).
    pub fn add_dir(&self, rel: &str) -> PathBuf {
        let full_path = self.join(rel);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Add a symlink at `rel` pointing at `target` (used verbatim, so it may
    /// be relative to the link's directory).
    #[cfg(unix)]
    pub fn add_symlink(&self, rel: &str, target: impl AsRef<Path>) -> PathBuf {
        let full_path = self.join(rel);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::os::unix::fs::symlink(target, &full_path).expect("Failed to create symlink");
        full_path
    }

    /// Build a balanced tree `depth` levels deep with `fanout` subdirectories
    /// and `files` files per directory. Returns the number of directories
    /// created below the root.
    pub fn populate(&self, depth: usize, fanout: usize, files: usize) -> usize {
        fn fill(dir: &Path, depth: usize, fanout: usize, files: usize) -> usize {
            for i in 0..files {
                fs::write(dir.join(format!("file_{i}.txt")), "x").expect("Failed to write file");
            }
            if depth == 0 {
                return 0;
            }
            let mut created = 0;
            for i in 0..fanout {
                let sub = dir.join(format!("dir_{i}"));
                fs::create_dir(&sub).expect("Failed to create dir");
                created += 1 + fill(&sub, depth - 1, fanout, files);
            }
            created
        }
        fill(self.dir.path(), depth, fanout, files)
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}
