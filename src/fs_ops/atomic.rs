//! Relocate one file.
//! - Rename first (same filesystem: atomic, keeps timestamps).
//! - On EXDEV: copy to a hidden temp sibling, fsync, rename into place,
//!   restore the source mtime, then remove the source.
//! - On Windows an existing destination is removed first when overwriting,
//!   since rename there does not replace.

use anyhow::{Context, Result};
use filetime::{FileTime, set_file_mtime};
use std::fs::{self, File};
use std::path::Path;
use tracing::debug;

use super::helpers::io_error_with_help;
use super::util::{fsync_dir, is_cross_device, unique_temp_path};

pub fn relocate_file(src: &Path, dst: &Path, overwrite: bool) -> Result<()> {
    #[cfg(windows)]
    if overwrite && dst.exists() {
        fs::remove_file(dst).map_err(io_error_with_help("remove existing destination", dst))?;
    }
    #[cfg(not(windows))]
    let _ = overwrite;

    match fs::rename(src, dst) {
        Ok(()) => {
            if let Some(parent) = dst.parent() {
                let _ = fsync_dir(parent);
            }
            Ok(())
        }
        Err(e) if is_cross_device(&e) => {
            debug!(src = %src.display(), dst = %dst.display(), "cross-device move; copying");
            copy_then_remove(src, dst)
        }
        Err(e) => Err(io_error_with_help("move file", src)(e)),
    }
}

fn copy_then_remove(src: &Path, dst: &Path) -> Result<()> {
    let dst_dir = dst
        .parent()
        .with_context(|| format!("destination has no parent: {}", dst.display()))?;
    let tmp = unique_temp_path(dst_dir);

    let copied = fs::copy(src, &tmp)
        .map_err(io_error_with_help("copy to temporary file", &tmp))
        .and_then(|_| {
            File::open(&tmp)
                .and_then(|f| f.sync_all())
                .map_err(io_error_with_help("fsync temporary file", &tmp))
        });
    if let Err(e) = copied {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    if let Ok(meta) = fs::metadata(src) {
        let _ = set_file_mtime(&tmp, FileTime::from_last_modification_time(&meta));
    }

    if let Err(e) = fs::rename(&tmp, dst) {
        let _ = fs::remove_file(&tmp);
        return Err(io_error_with_help("rename temporary file", dst)(e));
    }
    let _ = fsync_dir(dst_dir);

    fs::remove_file(src).map_err(io_error_with_help("remove original file", src))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn relocate_moves_and_overwrites() {
        let dir = assert_fs::TempDir::new().unwrap();
        let a = dir.child("a.jpg");
        a.write_str("new").unwrap();
        let b = dir.child("out/a.jpg");
        b.write_str("old").unwrap();

        relocate_file(a.path(), b.path(), true).unwrap();
        assert!(!a.path().exists());
        assert_eq!(fs::read_to_string(b.path()).unwrap(), "new");
    }

    #[test]
    fn copy_path_preserves_mtime_and_removes_source() {
        let dir = assert_fs::TempDir::new().unwrap();
        let a = dir.child("a.jpg");
        a.write_str("data").unwrap();
        let ts = FileTime::from_unix_time(1_600_000_000, 0);
        set_file_mtime(a.path(), ts).unwrap();
        dir.child("out").create_dir_all().unwrap();
        let dst = dir.path().join("out").join("a.jpg");

        copy_then_remove(a.path(), &dst).unwrap();
        assert!(!a.path().exists());
        let meta = fs::metadata(&dst).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&meta).unix_seconds(), ts.unix_seconds());
    }
}
