//! Output configuration types

/// Configuration for output formatting.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Emit one JSON object per line instead of plain paths
    pub json: bool,
    /// Suppress per-path lines; headers and summaries are still written
    pub quiet: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            json: false,
            quiet: false,
        }
    }
}
