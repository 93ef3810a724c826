//! Streaming output formatter
//!
//! `StreamingFormatter` writes each visited path as the walk reaches it, so
//! output keeps pace with a long-running reset instead of piling up in memory.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::error::Result;
use crate::tree::WalkSummary;

use super::config::OutputConfig;
use super::json::Record;

/// What the CLI was pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Directory,
}

/// Streaming output formatter - writes paths as they are visited.
pub struct StreamingFormatter<W: WriteColor = StandardStream> {
    config: OutputConfig,
    out: W,
}

impl StreamingFormatter {
    /// Formatter writing to stdout.
    pub fn new(config: OutputConfig) -> Self {
        let choice = if config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::with_writer(config, StandardStream::stdout(choice))
    }
}

impl<W: WriteColor> StreamingFormatter<W> {
    pub fn with_writer(config: OutputConfig, out: W) -> Self {
        Self { config, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Announce the target before anything is changed.
    pub fn header(&mut self, kind: TargetKind, path: &Path) -> io::Result<()> {
        if self.config.json {
            return Ok(());
        }
        let label = match kind {
            TargetKind::File => "Updating file",
            TargetKind::Directory => "Updating directory",
        };
        writeln!(self.out, "{}: {}", label, path.display())
    }

    pub fn directory(&mut self, path: &Path) -> Result<()> {
        if self.config.quiet {
            return Ok(());
        }
        if self.config.json {
            return self.record(&Record::Dir { path });
        }
        writeln!(self.out)?;
        self.out
            .set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
        write!(self.out, "{}", path.display())?;
        self.out.reset()?;
        writeln!(self.out)?;
        Ok(())
    }

    pub fn file(&mut self, path: &Path) -> Result<()> {
        if self.config.quiet {
            return Ok(());
        }
        if self.config.json {
            return self.record(&Record::File { path });
        }
        writeln!(self.out, "{}", path.display())?;
        Ok(())
    }

    /// Write the closing JSON summary; plain-text summaries go to stderr via
    /// [`format_summary`].
    pub fn finish(&mut self, summary: &WalkSummary, elapsed: Duration) -> Result<()> {
        if self.config.json {
            self.record(&Record::summary(summary, elapsed))?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn record(&mut self, record: &Record<'_>) -> Result<()> {
        let line = record.to_line()?;
        writeln!(self.out, "{}", line)?;
        Ok(())
    }
}

/// One-line human summary, e.g. `3 directories, 12 files in 41ms`.
pub fn format_summary(summary: &WalkSummary, elapsed: Duration) -> String {
    let elapsed = Duration::from_millis(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
    let mut line = format!(
        "{} directories, {} files in {}",
        summary.directories,
        summary.files,
        humantime::format_duration(elapsed)
    );
    if summary.links_not_followed > 0 {
        line.push_str(&format!(", {} links not followed", summary.links_not_followed));
    }
    if !summary.skipped.is_empty() {
        line.push_str(&format!(", {} unreadable directories skipped", summary.skipped.len()));
    }
    line
}
