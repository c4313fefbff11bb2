//! Core configuration types.
//! - Config holds one run's settings.
//! - LogLevel represents diagnostic verbosity with simple parsing helpers.

use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Warnings and errors (default)
    #[default]
    Normal,
    /// Progress information
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" | "warn" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    /// Directive for the diagnostics filter.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Quiet => "error",
            LogLevel::Normal => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Settings for one organizing run.
///
/// `source` and `target` start empty; `validate_and_normalize` rejects a run
/// where either is still unset and canonicalizes both otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Tree to organize
    pub source: PathBuf,
    /// Root of the `<year>/<label>` tree
    pub target: PathBuf,
    /// Media dated strictly before this day are left in place
    pub filter_date: Option<NaiveDate>,
    /// Decide and log everything, change nothing
    pub dry_run: bool,
    /// Event log destination; stdout when unset
    pub log_file: Option<PathBuf>,
    /// Diagnostic verbosity
    pub log_level: LogLevel,
    /// Directory names (exact, case-sensitive) never descended into
    pub ignore: Vec<String>,
}

impl Config {
    /// Construct a Config with explicit roots; other fields use defaults.
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            ..Default::default()
        }
    }

    /// Layer `other` on top of `self`: set values in `other` win, ignore lists merge.
    pub fn merge(&mut self, other: Config) {
        if !other.source.as_os_str().is_empty() {
            self.source = other.source;
        }
        if !other.target.as_os_str().is_empty() {
            self.target = other.target;
        }
        if other.filter_date.is_some() {
            self.filter_date = other.filter_date;
        }
        self.dry_run |= other.dry_run;
        if other.log_file.is_some() {
            self.log_file = other.log_file;
        }
        if other.log_level != LogLevel::default() {
            self.log_level = other.log_level;
        }
        for name in other.ignore {
            if !self.ignore.contains(&name) {
                self.ignore.push(name);
            }
        }
    }
}
