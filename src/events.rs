//! Run events and their log-line rendering.
//!
//! Every decision the organizer acts on (or would act on, under dry run) is
//! described by one `Event`. Events are emitted on the `phorg::event` tracing
//! target; the logging module routes that target to the event log, one line
//! per event, message text only.

use std::fmt;
use std::path::PathBuf;

/// Tracing target reserved for event-log lines.
pub const EVENT_TARGET: &str = "phorg::event";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SkipDir(PathBuf),
    SkipFile(PathBuf),
    CreateDir(PathBuf),
    Move { src: PathBuf, dst: PathBuf },
    Rename { src: PathBuf, dst: PathBuf },
    Overwrite { src: PathBuf, dst: PathBuf },
    DeleteFile(PathBuf),
    DeleteDir(PathBuf),
    Keep(PathBuf),
    Failed {
        op: &'static str,
        path: PathBuf,
        reason: String,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::SkipDir(p) => write!(f, "SKIP DIR: {}", p.display()),
            Event::SkipFile(p) => write!(f, "SKIP FILE (date filter): {}", p.display()),
            Event::CreateDir(p) => write!(f, "CREATE DIR: {}", p.display()),
            Event::Move { src, dst } => {
                write!(f, "MOVE FILE: {} -> {}", src.display(), dst.display())
            }
            Event::Rename { src, dst } => {
                write!(f, "RENAME FILE: {} -> {}", src.display(), dst.display())
            }
            Event::Overwrite { src, dst } => {
                write!(f, "OVERWRITE FILE: {} -> {}", src.display(), dst.display())
            }
            Event::DeleteFile(p) => write!(f, "DELETE FILE: {}", p.display()),
            Event::DeleteDir(p) => write!(f, "DELETE DIR: {}", p.display()),
            Event::Keep(p) => write!(f, "KEEP FILE: {}", p.display()),
            Event::Failed { op, path, reason } => {
                write!(f, "ERROR {}: {}: {}", op, path.display(), reason)
            }
        }
    }
}

/// Write one event line to the event log.
pub fn emit(event: &Event) {
    tracing::info!(target: EVENT_TARGET, "{event}");
}

/// Write a free-form line (summary output) to the event log.
pub fn emit_line(line: &str) {
    tracing::info!(target: EVENT_TARGET, "{line}");
}
