//! Configuration types for the tree walker

/// What to do when a directory cannot be listed mid-walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnumerationPolicy {
    /// Abort the whole traversal with the listing error.
    #[default]
    FailFast,
    /// Log the failure, record the directory in the summary, and keep walking.
    SkipAndContinue,
}

/// Configuration for tree walking behavior.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Descend into symlink/junction directories. Link nodes are always
    /// visited; this only controls whether their contents are.
    pub traverse_links: bool,
    pub on_error: EnumerationPolicy,
}
