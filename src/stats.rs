//! Run statistics.
//! One `RunStatistics` value is created per run, passed by `&mut` to every
//! component that acts, and rendered once after the walk has finished.

use std::fmt;

/// Something worth counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tally {
    DirProcessed,
    DirSkipped,
    DirDeleted,
    FileMoved,
    FileRenamed,
    FileSkipped,
    FileDeleted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub dirs_processed: u64,
    pub dirs_skipped: u64,
    pub dirs_deleted: u64,
    pub files_moved: u64,
    pub files_renamed: u64,
    pub files_skipped: u64,
    pub files_deleted: u64,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tally: Tally) {
        let counter = match tally {
            Tally::DirProcessed => &mut self.dirs_processed,
            Tally::DirSkipped => &mut self.dirs_skipped,
            Tally::DirDeleted => &mut self.dirs_deleted,
            Tally::FileMoved => &mut self.files_moved,
            Tally::FileRenamed => &mut self.files_renamed,
            Tally::FileSkipped => &mut self.files_skipped,
            Tally::FileDeleted => &mut self.files_deleted,
        };
        *counter += 1;
    }

    /// Labelled counters in their fixed display order.
    pub fn rows(&self) -> [(&'static str, u64); 7] {
        [
            ("Directories processed", self.dirs_processed),
            ("Directories skipped", self.dirs_skipped),
            ("Directories deleted", self.dirs_deleted),
            ("Files moved", self.files_moved),
            ("Files renamed", self.files_renamed),
            ("Files skipped", self.files_skipped),
            ("Files deleted", self.files_deleted),
        ]
    }

    /// Summary lines, header first.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(8);
        lines.push("STATISTICS:".to_string());
        lines.extend(
            self.rows()
                .iter()
                .map(|(label, n)| format!("  {label}: {n}")),
        );
        lines
    }

    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary_lines().join("\n"))
    }
}
