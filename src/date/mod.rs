//! Best-effort calendar date for a file.
//!
//! Precedence, first satisfied wins:
//! 1. a literal date in the nearest date-bearing directory component,
//! 2. the embedded capture timestamp,
//! 3. the file's modification time.
//!
//! A `YYYY-nodate` marker as nearest component skips step 1 entirely.

pub mod capture;
pub mod pattern;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::path::Path;
use tracing::debug;

pub use capture::{CaptureTimestamp, ExifTimestamp, NoCapture};
pub use pattern::{PathHint, match_component, scan_components, strip_dcim};

use crate::entry::SourceEntry;

/// Where a resolved date came from. Internal reasoning only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    PathLiteral,
    Metadata,
    FilesystemFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub date: NaiveDate,
    pub provenance: Provenance,
    /// Time of day, only when the capture timestamp supplied it.
    pub capture_time: Option<NaiveTime>,
}

impl ResolvedDate {
    pub fn year(&self) -> i32 {
        use chrono::Datelike;
        self.date.year()
    }
}

pub struct DateResolver<'a> {
    capture: &'a dyn CaptureTimestamp,
}

impl<'a> DateResolver<'a> {
    pub fn new(capture: &'a dyn CaptureTimestamp) -> Self {
        Self { capture }
    }

    /// Resolve from the raw directory components (outermost first).
    pub fn resolve<S: AsRef<str>>(&self, entry: &SourceEntry, components: &[S]) -> ResolvedDate {
        self.resolve_with_hint(entry, &scan_components(components), true)
    }

    /// Resolve with an already scanned path hint. `read_metadata` is false for
    /// files that take no date logic beyond the path and their mtime.
    pub fn resolve_with_hint(
        &self,
        entry: &SourceEntry,
        hint: &PathHint,
        read_metadata: bool,
    ) -> ResolvedDate {
        if let Some(date) = hint.date() {
            return ResolvedDate {
                date,
                provenance: Provenance::PathLiteral,
                capture_time: None,
            };
        }

        if read_metadata && let Some(ts) = self.capture_timestamp(&entry.path) {
            return ResolvedDate {
                date: ts.date(),
                provenance: Provenance::Metadata,
                capture_time: Some(ts.time()),
            };
        }

        ResolvedDate {
            date: entry.modified.date(),
            provenance: Provenance::FilesystemFallback,
            capture_time: None,
        }
    }

    /// Timestamp used when a file has to be renamed: the resolved day plus the
    /// capture time of day if the file has one, else midnight.
    pub fn rename_stamp(&self, entry: &SourceEntry, resolved: &ResolvedDate) -> NaiveDateTime {
        let time = match resolved.provenance {
            Provenance::Metadata => resolved.capture_time,
            // metadata was already tried and came back empty
            Provenance::FilesystemFallback => None,
            Provenance::PathLiteral => self.capture_timestamp(&entry.path).map(|ts| ts.time()),
        };
        resolved.date.and_time(time.unwrap_or_default())
    }

    fn capture_timestamp(&self, path: &Path) -> Option<NaiveDateTime> {
        let ts = self.capture.read_capture_timestamp(path);
        if ts.is_none() {
            debug!(path = %path.display(), "no capture timestamp; falling back");
        }
        ts
    }
}
