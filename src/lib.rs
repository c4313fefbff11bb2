//! Core library for `phorg`.
//!
//! Organizes a tree of photos and videos into `<target>/<YYYY>/<label>/`.
//! Labels come from date-bearing directory names when there are any, else
//! from each file's capture timestamp or modification time. Junk files are
//! deleted and directories left empty are removed.
//!
//! `run` wires the pieces together; each piece is usable on its own:
//! - `classify`: media / other / trash / forbidden
//! - `date`: path-text patterns, capture timestamps, date precedence
//! - `target`: `<year>/<label>` naming
//! - `engine`: per-file decision and execution
//! - `walker`: post-order traversal and empty-directory cleanup
//! - `fs_ops`: dry-run aware filesystem actions
//! - `stats`: run counters and summary

pub mod classify;
pub mod cli;
pub mod config;
pub mod date;
pub mod engine;
pub mod entry;
pub mod errors;
pub mod events;
pub mod fs_ops;
pub mod logging;
pub mod output;
pub mod shutdown;
pub mod stats;
pub mod target;
pub mod walker;

use anyhow::Result;
use tracing::info;

pub use classify::{Classification, classify};
pub use config::{Config, LogLevel, default_config_path, validate_and_normalize};
pub use date::{CaptureTimestamp, DateResolver, ExifTimestamp, NoCapture, ResolvedDate};
pub use engine::{FileOutcome, FilePlan, MoveAction, MoveDecision, MoveEngine};
pub use entry::SourceEntry;
pub use errors::PhorgError;
pub use fs_ops::FsActions;
pub use stats::{RunStatistics, Tally};
pub use target::{DirectoryNameResolver, TargetDirectorySpec};
pub use walker::TreeWalker;

/// Organize `config.source` into `config.target`.
///
/// Expects a validated config (see `validate_and_normalize`). Per-entry
/// failures are logged and skipped; the returned error is either a failure to
/// create the target root or `PhorgError::Interrupted`.
pub fn run(config: &Config, capture: &dyn CaptureTimestamp) -> Result<RunStatistics> {
    let mut fs = FsActions::new(config.dry_run);
    let mut stats = RunStatistics::new();

    fs.ensure_dir(&config.target)?;

    let engine = MoveEngine::new(&config.target, config.filter_date, DateResolver::new(capture));
    let walker = TreeWalker::new(&config.source, config.ignore.clone(), &engine);
    walker.walk(&mut fs, &mut stats)?;

    info!(
        moved = stats.files_moved,
        renamed = stats.files_renamed,
        deleted = stats.files_deleted,
        dry_run = config.dry_run,
        "run finished"
    );
    Ok(stats)
}
