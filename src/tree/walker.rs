//! TreeWalker - depth-first, sorted traversal driven by visitor callbacks

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::error::WalkError;

use super::config::{EnumerationPolicy, WalkerConfig};
use super::summary::{SkippedDir, WalkSummary};
use super::utils::{is_reparse_point, read_sorted_children};

/// Initial capacity of the pending stack; it grows with the widest level walked.
const PENDING_CAPACITY: usize = 20;

type Visitor<'a, E> = Box<dyn FnMut(&Path) -> Result<bool, E> + 'a>;

/// Tree walker that visits directories depth-first in sorted order.
///
/// Only the pending directory paths are held in memory; each directory is
/// listed when it is popped, not before. The directory visitor returns whether
/// to descend; the file visitor's return value is currently ignored.
///
/// `E` is the visitor error type. Walker failures (bad base path, unreadable
/// directory) are converted into it, so callers see one error type.
pub struct TreeWalker<'a, E = WalkError> {
    config: WalkerConfig,
    on_directory: Visitor<'a, E>,
    on_file: Option<Visitor<'a, E>>,
}

impl<'a, E: From<WalkError>> TreeWalker<'a, E> {
    /// Create a walker that visits directories only.
    pub fn new(on_directory: impl FnMut(&Path) -> Result<bool, E> + 'a) -> Self {
        Self {
            config: WalkerConfig::default(),
            on_directory: Box::new(on_directory),
            on_file: None,
        }
    }

    /// Also visit the files of every descended directory.
    pub fn with_file_visitor(mut self, on_file: impl FnMut(&Path) -> Result<bool, E> + 'a) -> Self {
        self.on_file = Some(Box::new(on_file));
        self
    }

    pub fn with_config(mut self, config: WalkerConfig) -> Self {
        self.config = config;
        self
    }

    /// Walk `base_directory`, following links only if the config says so.
    pub fn walk(&mut self, base_directory: impl AsRef<Path>) -> Result<WalkSummary, E> {
        let traverse_links = self.config.traverse_links;
        self.traverse_depth_first_sorted(base_directory, traverse_links)
    }

    /// Walk `base_directory` depth-first, pre-order.
    ///
    /// At each directory the visitor runs first. If it asks to descend, and the
    /// directory is not a link (or `traverse_links` is set), its files are
    /// visited in sorted order and its subdirectories are queued so that they
    /// pop in sorted order. A link directory is still visited, never entered.
    ///
    /// The base path is used verbatim, so an extended-length `\\?\` path keeps
    /// working for every descendant.
    ///
    /// # Errors
    ///
    /// Fails before any visitor runs if the base path is missing or not a
    /// directory. Visitor errors propagate immediately. A directory that
    /// cannot be listed ends the walk unless the config asks to skip it.
    pub fn traverse_depth_first_sorted(
        &mut self,
        base_directory: impl AsRef<Path>,
        traverse_links: bool,
    ) -> Result<WalkSummary, E> {
        let base = base_directory.as_ref();
        check_base(base, traverse_links)?;

        let mut summary = WalkSummary::default();
        let mut pending: Vec<PathBuf> = Vec::with_capacity(PENDING_CAPACITY);
        pending.push(base.to_path_buf());

        while let Some(dir) = pending.pop() {
            trace!(path = %dir.display(), "visit directory");
            summary.directories += 1;
            let mut proceed = (self.on_directory)(&dir)?;
            if !proceed {
                debug!(path = %dir.display(), "visitor declined descent");
                summary.vetoed += 1;
            }

            // The visitor may have removed `dir`; a missing path is not a link.
            if !traverse_links && is_reparse_point(&dir) {
                debug!(path = %dir.display(), "not following link directory");
                summary.links_not_followed += 1;
                proceed = false;
            }

            if !proceed {
                continue;
            }

            let children = match read_sorted_children(&dir) {
                Ok(children) => children,
                Err(source) => {
                    let err = WalkError::read_dir(&dir, source);
                    let skip = self.config.on_error == EnumerationPolicy::SkipAndContinue
                        && err.is_recoverable();
                    if !skip {
                        return Err(err.into());
                    }
                    warn!(path = %err.path().display(), error = %err, "skipping unreadable directory");
                    summary.skipped.push(SkippedDir {
                        path: err.path().to_path_buf(),
                        error: err.to_string(),
                    });
                    continue;
                }
            };

            if let Some(on_file) = self.on_file.as_mut() {
                for file in &children.files {
                    trace!(path = %file.display(), "visit file");
                    summary.files += 1;
                    // Reserved for short-circuiting; ignored for now.
                    let _ = on_file(file)?;
                }
            }

            pending.extend(children.dirs.into_iter().rev());
        }

        Ok(summary)
    }
}

/// Reject a base path that is missing or cannot be walked as a directory.
///
/// When links are followed the base is resolved too, so a dangling link is
/// missing. Otherwise a link base is accepted and visited without descent.
fn check_base(base: &Path, traverse_links: bool) -> Result<(), WalkError> {
    let meta = if traverse_links {
        fs::metadata(base)
    } else {
        fs::symlink_metadata(base)
    };
    let meta = meta.map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            WalkError::NotFound {
                path: base.to_path_buf(),
            }
        } else {
            WalkError::read_dir(base, source)
        }
    })?;

    if meta.is_dir() || meta.file_type().is_symlink() {
        Ok(())
    } else {
        Err(WalkError::NotADirectory {
            path: base.to_path_buf(),
        })
    }
}
