//! Capture-timestamp capability.
//!
//! The resolver only needs "when was this taken, if the file says so". Any
//! source that answers that question can stand in for the EXIF reader.

use chrono::{NaiveDate, NaiveDateTime};
use exif::{In, Reader, Tag};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::trace;

pub trait CaptureTimestamp {
    /// Embedded capture time of `path`, or `None` when absent or unreadable.
    fn read_capture_timestamp(&self, path: &Path) -> Option<NaiveDateTime>;
}

/// Reads EXIF `DateTimeOriginal`, `DateTimeDigitized` or `DateTime`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifTimestamp;

impl CaptureTimestamp for ExifTimestamp {
    fn read_capture_timestamp(&self, path: &Path) -> Option<NaiveDateTime> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                trace!(path = %path.display(), error = %e, "exif: cannot open");
                return None;
            }
        };
        let exif = match Reader::new().read_from_container(&mut BufReader::new(file)) {
            Ok(x) => x,
            Err(e) => {
                trace!(path = %path.display(), error = %e, "exif: no readable container");
                return None;
            }
        };

        [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime]
            .iter()
            .filter_map(|tag| exif.get_field(*tag, In::PRIMARY))
            .find_map(|field| parse_exif_datetime(&field.display_value().to_string()))
    }
}

/// No metadata at all; every file falls back to its modification time.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCapture;

impl CaptureTimestamp for NoCapture {
    fn read_capture_timestamp(&self, _path: &Path) -> Option<NaiveDateTime> {
        None
    }
}

/// Accept `YYYY:MM:DD HH:MM:SS` and the separator variants cameras emit.
pub fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let cleaned = s.trim().replace(['-', '/', '.'], ":");

    if let Ok(dt) = NaiveDateTime::parse_from_str(&cleaned, "%Y:%m:%d %H:%M:%S") {
        return Some(dt);
    }

    let day = cleaned.split(' ').next()?;
    NaiveDate::parse_from_str(day, "%Y:%m:%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
}
