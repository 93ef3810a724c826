//! Walk progress output
//!
//! - `config` - Output configuration types
//! - `streaming` - Per-path formatter (colored text or JSON lines)
//! - `json` - JSON line records

mod config;
mod json;
mod streaming;

pub use config::OutputConfig;
pub use json::Record;
pub use streaming::{StreamingFormatter, TargetKind, format_summary};
