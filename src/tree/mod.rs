//! Directory tree walking logic
//!
//! `TreeWalker` visits a directory tree depth-first, pre-order, with files and
//! subdirectories in ordinal case-insensitive order. Link directories
//! (symlinks, junctions) are visited but not entered unless asked.
//!
//! ```no_run
//! use std::path::Path;
//! use resetacl::{TreeWalker, WalkError};
//!
//! let mut walker = TreeWalker::new(|dir: &Path| {
//!     println!("{}", dir.display());
//!     Ok::<_, WalkError>(true)
//! })
//! .with_file_visitor(|file: &Path| {
//!     println!("  {}", file.display());
//!     Ok(true)
//! });
//!
//! let summary = walker.walk("some/dir")?;
//! println!("{} directories, {} files", summary.directories, summary.files);
//! # Ok::<(), WalkError>(())
//! ```

mod config;
mod summary;
mod utils;
mod walker;

pub use config::{EnumerationPolicy, WalkerConfig};
pub use summary::{SkippedDir, WalkSummary};
pub use utils::{
    Children, compare_ordinal_ignore_case, extended_length_form, is_reparse_point,
    read_sorted_children, sort_ordinal_ignore_case, to_extended_length,
};
pub use walker::TreeWalker;
