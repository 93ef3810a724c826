//! CLI entry point for resetacl

use std::cell::RefCell;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use resetacl::error::Result;
use resetacl::tree::to_extended_length;
use resetacl::{
    EnumerationPolicy, Error, OutputConfig, Privilege, SecurityDescriptor, SecurityError,
    StreamingFormatter, TargetKind, TreeWalker, WalkError, WalkerConfig, elevate, format_summary,
    reset_security,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "resetacl")]
#[command(about = "Recursively take ownership and reset permissions of files and directories")]
#[command(version)]
struct Args {
    /// File or directory to reset
    path: PathBuf,

    /// Descend into symlinked directories (links are always reset themselves)
    #[arg(long = "traverse-links")]
    traverse_links: bool,

    /// Skip directories that cannot be listed instead of aborting
    #[arg(short = 'k', long = "keep-going")]
    keep_going: bool,

    /// List what would be reset without changing anything
    #[arg(short = 'n', long = "dry-run")]
    dry_run: bool,

    /// Owner uid to assign (default: 0)
    #[arg(long, value_name = "UID")]
    owner: Option<u32>,

    /// Group gid to assign (default: 0)
    #[arg(long, value_name = "GID")]
    group: Option<u32>,

    /// Permission bits to assign, in octal (default: 777)
    #[arg(long, value_name = "OCTAL", value_parser = parse_mode)]
    mode: Option<u32>,

    /// Use the extended-length path form so deep trees stay reachable (Windows)
    #[arg(long = "long-paths")]
    long_paths: bool,

    /// Output one JSON object per visited path
    #[arg(long = "json")]
    json: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Only print the header and summary
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Parse an octal permission string like "755" or "0o700".
fn parse_mode(s: &str) -> std::result::Result<u32, String> {
    let s = s.trim();
    let digits = s.strip_prefix("0o").unwrap_or(s);
    let mode = u32::from_str_radix(digits, 8).map_err(|_| format!("invalid octal mode: {}", s))?;
    if mode > 0o7777 {
        return Err(format!("mode out of range: {}", s));
    }
    Ok(mode)
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("resetacl=debug,warn")
        } else {
            EnvFilter::new("resetacl=info,warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("resetacl: {}", e);
        if is_elevation_failure(&e) {
            eprintln!("(This program must be run as root or with the required capabilities.)");
        }
        process::exit(1);
    }
}

/// Errors that mean the process lacks the rights to reset anything.
fn is_elevation_failure(err: &Error) -> bool {
    matches!(
        err,
        Error::Security(
            SecurityError::PrivilegeNotHeld { .. }
                | SecurityError::Query { .. }
                | SecurityError::Unsupported
        )
    )
}

/// The descriptor to apply, or `None` for the stock `reset_security` reset.
fn descriptor_override(args: &Args) -> Option<SecurityDescriptor> {
    if args.owner.is_none() && args.group.is_none() && args.mode.is_none() {
        return None;
    }
    let default = SecurityDescriptor::default();
    Some(SecurityDescriptor {
        owner: args.owner.or(default.owner),
        group: args.group.or(default.group),
        mode: args.mode.unwrap_or(default.mode),
    })
}

fn run(args: &Args) -> Result<()> {
    let target = if args.long_paths {
        to_extended_length(&std::path::absolute(&args.path)?)
    } else {
        args.path.clone()
    };

    let kind = if target.is_file() {
        TargetKind::File
    } else if target.is_dir() {
        TargetKind::Directory
    } else {
        return Err(WalkError::NotFound { path: target }.into());
    };

    if !args.dry_run {
        for privilege in Privilege::REQUIRED {
            elevate(privilege.windows_name())?;
        }
    }

    let descriptor = descriptor_override(args);

    let output_config = OutputConfig {
        use_color: !args.json && should_use_color(args.color),
        json: args.json,
        quiet: args.quiet,
    };
    let formatter = RefCell::new(StreamingFormatter::new(output_config));
    formatter.borrow_mut().header(kind, &target)?;

    let dry_run = args.dry_run;
    let visit = |path: &Path, is_dir: bool| -> Result<bool> {
        {
            let mut formatter = formatter.borrow_mut();
            if is_dir {
                formatter.directory(path)?;
            } else {
                formatter.file(path)?;
            }
        }
        if !dry_run {
            match &descriptor {
                Some(descriptor) => descriptor.apply(path)?,
                None => reset_security(path)?,
            }
        }
        Ok(true)
    };

    if kind == TargetKind::File {
        visit(&target, false)?;
        return Ok(());
    }

    let config = WalkerConfig {
        traverse_links: args.traverse_links,
        on_error: if args.keep_going {
            EnumerationPolicy::SkipAndContinue
        } else {
            EnumerationPolicy::FailFast
        },
    };
    info!(
        path = %target.display(),
        traverse_links = config.traverse_links,
        dry_run,
        "walk started"
    );

    let start = Instant::now();
    let mut walker = TreeWalker::new(|dir: &Path| visit(dir, true))
        .with_file_visitor(|file: &Path| visit(file, false))
        .with_config(config);
    let summary = walker.walk(&target)?;
    let elapsed = start.elapsed();

    info!(
        directories = summary.directories,
        files = summary.files,
        skipped = summary.skipped.len(),
        "walk finished"
    );

    formatter.borrow_mut().finish(&summary, elapsed)?;
    if !args.json {
        eprintln!("{}", format_summary(&summary, elapsed));
    }
    Ok(())
}
