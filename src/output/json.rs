//! JSON line records

use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::tree::WalkSummary;

/// One line of `--json` output.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record<'a> {
    Dir {
        path: &'a Path,
    },
    File {
        path: &'a Path,
    },
    Summary {
        #[serde(flatten)]
        summary: &'a WalkSummary,
        elapsed_ms: u64,
    },
}

impl<'a> Record<'a> {
    pub fn summary(summary: &'a WalkSummary, elapsed: Duration) -> Self {
        Record::Summary {
            summary,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Serialize to a single line (no trailing newline).
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
