//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - CLI values override config file values; `--ignore` adds to the file's list.
//! - --debug is a shorthand for --log-level debug.

use clap::{ArgAction, Parser, ValueHint};
use std::path::{Path, PathBuf};

use crate::config::{Config, LogLevel, parse_filter_date};
use crate::errors::PhorgError;

/// Organize a photo/video tree into <target>/<year>/<label>/.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone, Default)]
#[command(
    author,
    version,
    about = "Organize photos and videos into a dated <year>/<label> tree"
)]
pub struct Args {
    /// Directory tree to organize.
    #[arg(short = 's', long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub source: Option<PathBuf>,

    /// Root of the organized tree (created if missing).
    #[arg(short = 't', long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub target: Option<PathBuf>,

    /// Leave media dated before this day in place (YYYY-MM-DD).
    #[arg(short = 'f', long, value_name = "YYYY-MM-DD")]
    pub filter_date: Option<String>,

    /// Log every action, but do not modify files/directories.
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Write the event log to this file instead of stdout (replaced each run).
    #[arg(short = 'l', long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Directory name to skip entirely (exact match; repeatable).
    #[arg(short = 'i', long = "ignore", value_name = "NAME", action = ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Set diagnostic log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Enable debug diagnostics (equivalent to `--log-level debug`).
    #[arg(long, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Print where phorg will look for the config file (or PHORG_CONFIG if set), then exit.
    #[arg(long, help = "Print the config file location used by phorg and exit")]
    pub print_config: bool,

    /// Write a template config file to the default location, then exit.
    #[arg(long, help = "Write a template config file and exit")]
    pub init_config: bool,
}

impl Args {
    #[inline]
    fn sanitize_path(p: &Path) -> PathBuf {
        Self::sanitize_str(&p.to_string_lossy())
    }

    #[inline]
    fn sanitize_str(s: &str) -> PathBuf {
        // Shells on Windows sometimes hand quotes through; drop them.
        let trimmed = s.trim();
        let mut inner = if (trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() > 1)
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'') && trimmed.len() > 1)
        {
            trimmed[1..trimmed.len() - 1].to_string()
        } else {
            trimmed.trim_matches(|c| c == '\'' || c == '"').to_string()
        };

        // One trailing separator, but never the root itself.
        if (inner.ends_with('\\') || inner.ends_with('/')) && inner.len() > 1 {
            inner.pop();
        }

        PathBuf::from(inner)
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) -> Result<(), PhorgError> {
        if let Some(s) = &self.source {
            cfg.source = Self::sanitize_path(s);
        }
        if let Some(t) = &self.target {
            cfg.target = Self::sanitize_path(t);
        }
        if let Some(d) = &self.filter_date {
            cfg.filter_date = Some(parse_filter_date(d)?);
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if let Some(l) = &self.log_file {
            cfg.log_file = Some(Self::sanitize_path(l));
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        for name in &self.ignore {
            if !cfg.ignore.contains(name) {
                cfg.ignore.push(name.clone());
            }
        }
        Ok(())
    }
}

pub fn parse() -> Args {
    Args::parse()
}
