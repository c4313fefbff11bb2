//! Dry-run aware filesystem actions.
//!
//! Every mutation goes through `FsActions`. In a real run it touches the disk;
//! in a dry run it records the change in a shadow overlay instead. Both modes
//! emit the same event line on success, and every query (`probe`,
//! `dir_exists`, `is_empty_dir`) sees the overlay, so later decisions in a dry
//! run match what a real run would decide.
//!
//! Failures emit an `ERROR` event plus a warning and are returned to the
//! caller, which abandons that one entry and carries on.

use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::atomic::relocate_file;
use super::duplicate::{FsView, Probe};
use super::helpers::io_error_with_help;
use crate::events::{self, Event};

/// How a relocation is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceKind {
    Move,
    Rename,
    Overwrite,
}

#[derive(Debug, Default)]
struct Shadow {
    /// Files that would exist, with their size.
    placed: HashMap<PathBuf, u64>,
    /// Paths that would be gone.
    removed: HashSet<PathBuf>,
    /// Directories that would have been created.
    dirs: HashSet<PathBuf>,
}

impl Shadow {
    fn has_children(&self, dir: &Path) -> bool {
        self.placed.keys().any(|p| p.parent() == Some(dir))
            || self.dirs.iter().any(|p| p.parent() == Some(dir))
    }
}

#[derive(Debug, Default)]
pub struct FsActions {
    dry_run: bool,
    shadow: Shadow,
}

impl FsActions {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            shadow: Shadow::default(),
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn dir_exists(&self, dir: &Path) -> bool {
        if self.shadow.dirs.contains(dir) {
            return true;
        }
        !self.shadow.removed.contains(dir) && dir.is_dir()
    }

    /// True when `dir` holds no entries (after simulated changes).
    pub fn is_empty_dir(&self, dir: &Path) -> Result<bool> {
        if self.shadow.has_children(dir) {
            return Ok(false);
        }
        if self.shadow.dirs.contains(dir) && !dir.exists() {
            return Ok(true);
        }
        for item in fs::read_dir(dir).map_err(io_error_with_help("list directory", dir))? {
            let item = item.map_err(io_error_with_help("list directory", dir))?;
            if !self.shadow.removed.contains(&item.path()) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Create `dir` (and missing parents) unless it exists.
    pub fn ensure_dir(&mut self, dir: &Path) -> Result<()> {
        if self.dir_exists(dir) {
            return Ok(());
        }
        if self.dry_run {
            let mut cur = Some(dir);
            while let Some(d) = cur {
                if self.dir_exists(d) {
                    break;
                }
                self.shadow.removed.remove(d);
                self.shadow.dirs.insert(d.to_path_buf());
                cur = d.parent();
            }
        } else if let Err(e) =
            fs::create_dir_all(dir).map_err(io_error_with_help("create directory", dir))
        {
            return Err(self.fail("create directory", dir, e));
        }
        events::emit(&Event::CreateDir(dir.to_path_buf()));
        Ok(())
    }

    /// Move `src` (of `size` bytes) to `dst`.
    pub fn place(&mut self, src: &Path, dst: &Path, size: u64, kind: PlaceKind) -> Result<()> {
        if self.dry_run {
            self.shadow.removed.insert(src.to_path_buf());
            self.shadow.placed.remove(src);
            self.shadow.removed.remove(dst);
            self.shadow.placed.insert(dst.to_path_buf(), size);
        } else if let Err(e) = relocate_file(src, dst, kind == PlaceKind::Overwrite) {
            return Err(self.fail("move file", src, e));
        }

        let (src, dst) = (src.to_path_buf(), dst.to_path_buf());
        events::emit(&match kind {
            PlaceKind::Move => Event::Move { src, dst },
            PlaceKind::Rename => Event::Rename { src, dst },
            PlaceKind::Overwrite => Event::Overwrite { src, dst },
        });
        Ok(())
    }

    pub fn remove_file(&mut self, path: &Path) -> Result<()> {
        if self.dry_run {
            self.shadow.placed.remove(path);
            self.shadow.removed.insert(path.to_path_buf());
        } else if let Err(e) = fs::remove_file(path).map_err(io_error_with_help("delete file", path)) {
            return Err(self.fail("delete file", path, e));
        }
        events::emit(&Event::DeleteFile(path.to_path_buf()));
        Ok(())
    }

    /// Remove an empty directory.
    pub fn remove_dir(&mut self, dir: &Path) -> Result<()> {
        if self.dry_run {
            self.shadow.dirs.remove(dir);
            self.shadow.removed.insert(dir.to_path_buf());
        } else if let Err(e) = fs::remove_dir(dir).map_err(io_error_with_help("delete directory", dir)) {
            return Err(self.fail("delete directory", dir, e));
        }
        events::emit(&Event::DeleteDir(dir.to_path_buf()));
        Ok(())
    }

    /// Report a failure that happened outside an action (listing, stat).
    pub fn report_failure(&self, op: &'static str, path: &Path, err: &anyhow::Error) {
        warn!(op, path = %path.display(), error = %err, "filesystem operation failed; continuing");
        events::emit(&Event::Failed {
            op,
            path: path.to_path_buf(),
            reason: format!("{err:#}"),
        });
    }

    fn fail(&self, op: &'static str, path: &Path, err: anyhow::Error) -> anyhow::Error {
        self.report_failure(op, path, &err);
        err
    }
}

impl FsView for FsActions {
    fn probe(&self, path: &Path) -> Probe {
        if let Some(size) = self.shadow.placed.get(path) {
            return Probe::File(*size);
        }
        if self.shadow.dirs.contains(path) {
            return Probe::Other;
        }
        if self.shadow.removed.contains(path) {
            return Probe::Absent;
        }
        match fs::symlink_metadata(path) {
            Ok(m) if m.file_type().is_file() => Probe::File(m.len()),
            Ok(_) => Probe::Other,
            Err(_) => Probe::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn dry_run_leaves_disk_untouched_but_updates_view() {
        let dir = assert_fs::TempDir::new().unwrap();
        let src = dir.child("in/a.jpg");
        src.write_str("12345").unwrap();
        let out = dir.path().join("out/2020/20200101");
        let dst = out.join("a.jpg");

        let mut fs_actions = FsActions::new(true);
        fs_actions.ensure_dir(&out).unwrap();
        fs_actions.place(src.path(), &dst, 5, PlaceKind::Move).unwrap();

        assert!(src.path().exists());
        assert!(!out.exists());
        assert!(fs_actions.dir_exists(&out));
        assert!(fs_actions.dir_exists(&dir.path().join("out/2020")));
        assert_eq!(fs_actions.probe(&dst), Probe::File(5));
        assert_eq!(fs_actions.probe(src.path()), Probe::Absent);
        assert!(fs_actions.is_empty_dir(&dir.path().join("in")).unwrap());
        assert!(!fs_actions.is_empty_dir(&out).unwrap());
    }

    #[test]
    fn real_run_moves_and_removes() {
        let dir = assert_fs::TempDir::new().unwrap();
        let src = dir.child("in/a.jpg");
        src.write_str("x").unwrap();
        let junk = dir.child("in/Thumbs.db");
        junk.write_str("j").unwrap();
        let out = dir.path().join("out/2020/x");

        let mut fs_actions = FsActions::new(false);
        fs_actions.ensure_dir(&out).unwrap();
        fs_actions
            .place(src.path(), &out.join("a.jpg"), 1, PlaceKind::Move)
            .unwrap();
        fs_actions.remove_file(junk.path()).unwrap();
        let in_dir = dir.path().join("in");
        assert!(fs_actions.is_empty_dir(&in_dir).unwrap());
        fs_actions.remove_dir(&in_dir).unwrap();

        assert!(out.join("a.jpg").exists());
        assert!(!in_dir.exists());
    }

    #[test]
    fn failures_are_returned() {
        let dir = assert_fs::TempDir::new().unwrap();
        let mut fs_actions = FsActions::new(false);
        let missing = dir.path().join("nope.jpg");
        assert!(fs_actions.remove_file(&missing).is_err());
        assert!(
            fs_actions
                .place(&missing, &dir.path().join("x.jpg"), 0, PlaceKind::Move)
                .is_err()
        );
    }
}
