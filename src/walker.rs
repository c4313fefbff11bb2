//! Depth-first traversal of the source tree.
//!
//! Each directory is listed once (sorted by name) before anything inside it
//! changes. Subdirectories are visited first, then the directory's own files,
//! then the directory is removed if nothing is left in it. The source root
//! gets the same emptiness check at the end.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::classify::{classify, is_media_extension};
use crate::date::{PathHint, scan_components};
use crate::engine::MoveEngine;
use crate::entry::SourceEntry;
use crate::errors::PhorgError;
use crate::events::{self, Event};
use crate::fs_ops::FsActions;
use crate::shutdown;
use crate::stats::{RunStatistics, Tally};
use crate::target::relative_components;

/// Snapshot of one directory's direct children.
#[derive(Debug, Default)]
struct Listing {
    dirs: Vec<PathBuf>,
    files: Vec<PathBuf>,
}

impl Listing {
    /// At least one subdirectory or one media file.
    fn is_eligible(&self) -> bool {
        !self.dirs.is_empty()
            || self.files.iter().any(|f| {
                f.extension()
                    .is_some_and(|e| is_media_extension(&e.to_string_lossy()))
            })
    }
}

pub struct TreeWalker<'a> {
    source_root: PathBuf,
    ignore: Vec<String>,
    /// Never descended into (the target root when it sits inside the source).
    fenced: Option<PathBuf>,
    engine: &'a MoveEngine<'a>,
}

impl<'a> TreeWalker<'a> {
    pub fn new(source_root: impl Into<PathBuf>, ignore: Vec<String>, engine: &'a MoveEngine<'a>) -> Self {
        let source_root = source_root.into();
        let target = engine.target_root();
        let fenced = (target != source_root && target.starts_with(&source_root))
            .then(|| target.to_path_buf());
        Self {
            source_root,
            ignore,
            fenced,
            engine,
        }
    }

    /// Walk the whole source tree. Only an interrupt stops the walk early.
    pub fn walk(&self, fs: &mut FsActions, stats: &mut RunStatistics) -> Result<()> {
        info!(
            source = %self.source_root.display(),
            target = %self.engine.target_root().display(),
            dry_run = fs.is_dry_run(),
            "walking source tree"
        );
        self.visit_dir(&self.source_root, fs, stats)
    }

    fn visit_dir(&self, dir: &Path, fs: &mut FsActions, stats: &mut RunStatistics) -> Result<()> {
        let listing = match list_dir(dir) {
            Ok(l) => l,
            Err(e) => {
                fs.report_failure("list directory", dir, &e);
                return Ok(());
            }
        };

        let eligible = listing.is_eligible();
        if eligible {
            stats.record(Tally::DirProcessed);
        } else {
            debug!(dir = %dir.display(), "no media and no subdirectories; files left alone");
        }

        for sub in &listing.dirs {
            check_interrupt()?;
            if self.fenced.as_deref() == Some(sub.as_path()) {
                debug!(dir = %sub.display(), "target root inside source; not descending");
                continue;
            }
            if self.is_ignored(sub) {
                events::emit(&Event::SkipDir(sub.clone()));
                stats.record(Tally::DirSkipped);
                continue;
            }
            self.visit_dir(sub, fs, stats)?;
        }

        if eligible && !listing.files.is_empty() {
            let hint = scan_components(&relative_components(&self.source_root, dir));
            for file in &listing.files {
                check_interrupt()?;
                self.visit_file(file, &hint, fs, stats);
            }
        }

        match fs.is_empty_dir(dir) {
            Ok(true) => {
                if fs.remove_dir(dir).is_ok() {
                    stats.record(Tally::DirDeleted);
                }
            }
            Ok(false) => {}
            Err(e) => fs.report_failure("check directory", dir, &e),
        }
        Ok(())
    }

    fn visit_file(&self, path: &Path, hint: &PathHint, fs: &mut FsActions, stats: &mut RunStatistics) {
        let entry = match SourceEntry::capture(path) {
            Ok(e) => e,
            Err(e) => {
                fs.report_failure("read file", path, &e);
                return;
            }
        };
        let class = classify(&entry);
        let outcome = self.engine.plan_and_execute(&entry, class, hint, fs, stats);
        debug!(path = %path.display(), ?class, ?outcome, "file handled");
    }

    fn is_ignored(&self, dir: &Path) -> bool {
        dir.file_name()
            .is_some_and(|n| self.ignore.iter().any(|i| n == i.as_str()))
    }
}

fn check_interrupt() -> Result<()> {
    if shutdown::is_requested() {
        return Err(PhorgError::Interrupted.into());
    }
    Ok(())
}

/// Direct children of `dir`, sorted by name. Symlinks and special files are left out.
fn list_dir(dir: &Path) -> Result<Listing> {
    let mut listing = Listing::default();
    for item in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let item = item.with_context(|| format!("listing {}", dir.display()))?;
        let ft = item.file_type();
        if ft.is_dir() {
            listing.dirs.push(item.into_path());
        } else if ft.is_file() {
            listing.files.push(item.into_path());
        } else {
            debug!(path = %item.path().display(), "not a regular file or directory; left alone");
        }
    }
    Ok(listing)
}
