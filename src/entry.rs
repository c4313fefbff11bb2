//! Snapshot of a source file taken when the walker visits it.

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDateTime};
use filetime::FileTime;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::fs_ops::io_error_with_help;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub path: PathBuf,
    pub parent: PathBuf,
    /// Name exactly as on disk; destinations are built from this.
    pub name: OsString,
    /// Lossy UTF-8 form of `name` for classification and messages.
    pub file_name: String,
    /// Extension as found on disk; compare case-insensitively.
    pub extension: Option<String>,
    pub size: u64,
    /// Modification time in local wall-clock time.
    pub modified: NaiveDateTime,
}

impl SourceEntry {
    /// Stat `path` (without following symlinks) and capture what later stages need.
    pub fn capture(path: &Path) -> Result<Self> {
        let meta = fs::symlink_metadata(path).map_err(io_error_with_help("stat", path))?;
        let mtime = FileTime::from_last_modification_time(&meta);
        Ok(Self::from_parts(path, meta.len(), local_time(mtime)))
    }

    /// Build a snapshot from already-known values.
    pub fn from_parts(path: &Path, size: u64, modified: NaiveDateTime) -> Self {
        let name = path.file_name().map(OsString::from).unwrap_or_default();
        let file_name = name.to_string_lossy().into_owned();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned());
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            parent,
            name,
            file_name,
            extension,
            size,
            modified,
        }
    }

    /// File name without its last extension.
    pub fn stem(&self) -> &str {
        match &self.extension {
            Some(ext) if self.file_name.len() > ext.len() + 1 => {
                &self.file_name[..self.file_name.len() - ext.len() - 1]
            }
            _ => &self.file_name,
        }
    }
}

fn local_time(ft: FileTime) -> NaiveDateTime {
    DateTime::from_timestamp(ft.unix_seconds(), ft.nanoseconds())
        .unwrap_or_default()
        .with_timezone(&Local)
        .naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use chrono::{NaiveDate, TimeZone};
    use filetime::set_file_mtime;

    #[test]
    fn capture_reads_size_and_local_mtime() {
        let dir = assert_fs::TempDir::new().unwrap();
        let f = dir.child("IMG_0001.JPG");
        f.write_binary(&[0u8; 500]).unwrap();
        let when = Local.with_ymd_and_hms(2023, 6, 15, 10, 30, 0).unwrap();
        set_file_mtime(f.path(), FileTime::from_unix_time(when.timestamp(), 0)).unwrap();

        let e = SourceEntry::capture(f.path()).unwrap();
        assert_eq!(e.size, 500);
        assert_eq!(e.file_name, "IMG_0001.JPG");
        assert_eq!(e.extension.as_deref(), Some("JPG"));
        assert_eq!(e.parent, dir.path());
        assert_eq!(
            e.modified,
            NaiveDate::from_ymd_opt(2023, 6, 15)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn stem_handles_missing_extension_and_dotfiles() {
        let t = NaiveDateTime::default();
        assert_eq!(SourceEntry::from_parts(Path::new("/a/x.tar.gz"), 0, t).stem(), "x.tar");
        assert_eq!(SourceEntry::from_parts(Path::new("/a/-9999"), 0, t).stem(), "-9999");
        assert_eq!(SourceEntry::from_parts(Path::new("/a/.hidden"), 0, t).stem(), ".hidden");
    }

    #[cfg(unix)]
    #[test]
    fn raw_name_keeps_non_utf8_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"caf\xE9.jpg");
        let e = SourceEntry::from_parts(&Path::new("/a").join(raw), 5, NaiveDateTime::default());
        assert_eq!(e.name, raw);
        assert_eq!(e.file_name, "caf\u{FFFD}.jpg");
        assert_eq!(e.extension.as_deref(), Some("jpg"));
    }
}
