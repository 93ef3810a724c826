//! resetacl - walk a directory tree depth-first in sorted order and reset the
//! ownership and permissions of every node

pub mod error;
pub mod output;
pub mod security;
pub mod tree;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use error::{Error, SecurityError, WalkError};
pub use output::{OutputConfig, StreamingFormatter, TargetKind, format_summary};
pub use security::{Privilege, SecurityDescriptor, elevate, reset_security};
pub use tree::{EnumerationPolicy, SkippedDir, TreeWalker, WalkSummary, WalkerConfig};
