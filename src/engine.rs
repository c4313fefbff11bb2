//! Per-file decisions and their execution.
//!
//! `MoveEngine::plan` is a pure decision over an entry, its classification,
//! its directory's path hint and a read-only view of the destination tree.
//! `MoveEngine::execute` carries a plan out through `FsActions` (which
//! simulates under dry run) and tallies the outcome.

use chrono::NaiveDate;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::classify::Classification;
use crate::date::{DateResolver, PathHint, ResolvedDate};
use crate::entry::SourceEntry;
use crate::events::{self, Event};
use crate::fs_ops::{Collision, FsActions, FsView, PlaceKind, resolve_destination};
use crate::stats::{RunStatistics, Tally};
use crate::target::{TargetDirectorySpec, resolve_with};

/// Names longer than this made only of digits get replaced.
const MAX_DIGIT_NAME: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAction {
    /// Destination name was free.
    Move,
    /// Same name and size already there; replace it.
    Overwrite,
    /// Name taken by a different file; placed under a numbered name.
    Suffixed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveDecision {
    pub source: PathBuf,
    pub target_dir: PathBuf,
    pub file_name: OsString,
    /// The final name differs from the source name.
    pub renamed: bool,
    pub action: MoveAction,
    /// The final path holds a same-size file that gets replaced.
    pub replaces: bool,
}

impl MoveDecision {
    pub fn destination(&self) -> PathBuf {
        self.target_dir.join(&self.file_name)
    }

    fn place_kind(&self) -> PlaceKind {
        if self.replaces {
            PlaceKind::Overwrite
        } else if self.renamed {
            PlaceKind::Rename
        } else {
            PlaceKind::Move
        }
    }

    fn tally(&self) -> Tally {
        if self.renamed {
            Tally::FileRenamed
        } else {
            Tally::FileMoved
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilePlan {
    /// Trash or forbidden file.
    Delete,
    /// Media older than the date filter.
    SkipByDate,
    /// Already sitting at its destination.
    InPlace,
    Place {
        target: TargetDirectorySpec,
        decision: MoveDecision,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Deleted,
    Skipped,
    Kept,
    Moved(MoveDecision),
    Failed,
}

pub struct MoveEngine<'a> {
    target_root: PathBuf,
    filter_date: Option<NaiveDate>,
    dates: DateResolver<'a>,
}

impl<'a> MoveEngine<'a> {
    pub fn new(
        target_root: impl Into<PathBuf>,
        filter_date: Option<NaiveDate>,
        dates: DateResolver<'a>,
    ) -> Self {
        Self {
            target_root: target_root.into(),
            filter_date,
            dates,
        }
    }

    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    /// Decide what happens to one file. Reads the destination only through `view`.
    pub fn plan(
        &self,
        entry: &SourceEntry,
        class: Classification,
        hint: &PathHint,
        view: &dyn FsView,
    ) -> FilePlan {
        if class.is_disposable() {
            return FilePlan::Delete;
        }

        let media = class == Classification::Media;
        let resolved = self.dates.resolve_with_hint(entry, hint, media);
        if media && self.filter_date.is_some_and(|cutoff| resolved.date < cutoff) {
            return FilePlan::SkipByDate;
        }

        let target = resolve_with(hint, &resolved);
        let target_dir = target.dir_under(&self.target_root);

        let name = if media && needs_new_name(entry) {
            self.normalized_name(entry, &resolved)
        } else {
            entry.name.clone()
        };

        if target_dir.join(&name) == entry.path {
            return FilePlan::InPlace;
        }

        let placement = resolve_destination(view, &target_dir, &name, entry.size);
        if placement.path == entry.path {
            return FilePlan::InPlace;
        }

        let file_name = placement
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or(name);
        let action = match placement.collision {
            Collision::Free => MoveAction::Move,
            Collision::Overwrite => MoveAction::Overwrite,
            Collision::Suffixed { .. } => MoveAction::Suffixed,
        };

        FilePlan::Place {
            target,
            decision: MoveDecision {
                source: entry.path.clone(),
                target_dir,
                renamed: file_name != entry.name,
                file_name,
                action,
                replaces: placement.overwrites(),
            },
        }
    }

    /// Carry out a plan and record its outcome.
    pub fn execute(
        &self,
        entry: &SourceEntry,
        plan: FilePlan,
        fs: &mut FsActions,
        stats: &mut RunStatistics,
    ) -> FileOutcome {
        match plan {
            FilePlan::Delete => {
                if fs.remove_file(&entry.path).is_err() {
                    return FileOutcome::Failed;
                }
                stats.record(Tally::FileDeleted);
                FileOutcome::Deleted
            }
            FilePlan::SkipByDate => {
                events::emit(&Event::SkipFile(entry.path.clone()));
                stats.record(Tally::FileSkipped);
                FileOutcome::Skipped
            }
            FilePlan::InPlace => {
                debug!(path = %entry.path.display(), "already organized");
                events::emit(&Event::Keep(entry.path.clone()));
                FileOutcome::Kept
            }
            FilePlan::Place { decision, .. } => {
                if fs.ensure_dir(&decision.target_dir).is_err() {
                    return FileOutcome::Failed;
                }
                let dst = decision.destination();
                if fs
                    .place(&entry.path, &dst, entry.size, decision.place_kind())
                    .is_err()
                {
                    return FileOutcome::Failed;
                }
                stats.record(decision.tally());
                FileOutcome::Moved(decision)
            }
        }
    }

    pub fn plan_and_execute(
        &self,
        entry: &SourceEntry,
        class: Classification,
        hint: &PathHint,
        fs: &mut FsActions,
        stats: &mut RunStatistics,
    ) -> FileOutcome {
        let plan = self.plan(entry, class, hint, fs);
        self.execute(entry, plan, fs, stats)
    }

    fn normalized_name(&self, entry: &SourceEntry, resolved: &ResolvedDate) -> OsString {
        let stamp = self.dates.rename_stamp(entry, resolved);
        let mut name = OsString::from(format!("img-{}", stamp.format("%Y%m%d-%H%M%S")));
        if let Some(ext) = Path::new(&entry.name).extension() {
            name.push(".");
            name.push(ext.to_ascii_lowercase());
        }
        name
    }
}

/// Names starting with `-`, or made of more than 15 digits, say nothing useful.
pub fn needs_new_name(entry: &SourceEntry) -> bool {
    let stem = entry.stem();
    entry.file_name.starts_with('-')
        || (stem.len() > MAX_DIGIT_NAME && stem.bytes().all(|b| b.is_ascii_digit()))
}
