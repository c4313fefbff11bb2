//! Config validation logic.
//! Checks required settings and the source/target roots before anything is touched.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::types::Config;
use crate::errors::PhorgError;

/// Parse a `YYYY-MM-DD` filter date.
pub fn parse_filter_date(s: &str) -> Result<NaiveDate, PhorgError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| PhorgError::InvalidFilterDate(s.to_string()))
}

/// Check required settings, verify the roots and canonicalize both in place.
///
/// The target root may not exist yet; it is created when the run starts.
pub fn validate_and_normalize(cfg: &mut Config) -> Result<()> {
    if cfg.source.as_os_str().is_empty() {
        return Err(PhorgError::MissingSetting("source").into());
    }
    if cfg.target.as_os_str().is_empty() {
        return Err(PhorgError::MissingSetting("target").into());
    }

    let src = &cfg.source;
    if !src.exists() {
        return Err(PhorgError::SourceNotFound(src.clone()).into());
    }
    if !src.is_dir() {
        return Err(PhorgError::SourceNotDir(src.clone()).into());
    }
    cfg.source = dunce::canonicalize(src)
        .with_context(|| format!("resolve source directory '{}'", src.display()))?;

    if cfg.target.exists() && !cfg.target.is_dir() {
        return Err(PhorgError::TargetNotDir(cfg.target.clone()).into());
    }
    cfg.target = canonicalize_lenient(&cfg.target)?;

    if cfg.target.starts_with(&cfg.source) && cfg.target != cfg.source {
        debug!(
            target = %cfg.target.display(),
            "target lies inside source; it will not be walked"
        );
    }

    info!(
        "Config validated: source='{}' target='{}' dry_run={} log_file='{}'",
        cfg.source.display(),
        cfg.target.display(),
        cfg.dry_run,
        cfg.log_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<stdout>".into())
    );
    Ok(())
}

/// Canonicalize the longest existing ancestor and re-append the missing tail.
fn canonicalize_lenient(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("read current directory")?
            .join(path)
    };

    let mut existing = absolute.as_path();
    let mut tail = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }

    let mut out = dunce::canonicalize(existing)
        .with_context(|| format!("resolve target directory '{}'", path.display()))?;
    for name in tail.into_iter().rev() {
        out.push(name);
    }
    Ok(out)
}
