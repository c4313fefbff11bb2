//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - Writes a commented template on request.
//!
//! Notes:
//! - This module only reads/writes the config file; path validation happens elsewhere.
//! - Unknown XML fields are rejected so typos surface instead of being ignored.

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{default_config_path, env_config_path};
use super::types::{Config, LogLevel};
use super::validate::parse_filter_date;
use crate::errors::PhorgError;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    source: Option<String>,
    target: Option<String>,
    filter_date: Option<String>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    dry_run: Option<bool>,
    log_file: Option<String>,
    log_level: Option<String>,
    ignore: Option<IgnoreList>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct IgnoreList {
    #[serde(rename = "dir", default)]
    dirs: Vec<String>,
}

// Accepts surrounding whitespace and yes/no spellings.
fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(|s| s.trim().to_ascii_lowercase()) {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => match s.as_str() {
            "true" | "yes" | "1" => Ok(Some(true)),
            "false" | "no" | "0" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "invalid boolean '{other}'"
            ))),
        },
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// Map XmlConfig -> Config
fn xml_to_config(path: &Path, parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = non_empty(parsed.source) {
        cfg.source = PathBuf::from(s);
    }
    if let Some(s) = non_empty(parsed.target) {
        cfg.target = PathBuf::from(s);
    }
    if let Some(s) = non_empty(parsed.filter_date) {
        cfg.filter_date = Some(parse_filter_date(&s)?);
    }
    cfg.dry_run = parsed.dry_run.unwrap_or(false);
    cfg.log_file = non_empty(parsed.log_file).map(PathBuf::from);
    if let Some(s) = non_empty(parsed.log_level) {
        cfg.log_level = s.parse::<LogLevel>().map_err(|reason| PhorgError::Config {
            path: path.to_path_buf(),
            reason,
        })?;
    }
    cfg.ignore = parsed
        .ignore
        .map(|l| l.dirs.into_iter().filter_map(|d| non_empty(Some(d))).collect())
        .unwrap_or_default();

    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents).map_err(|e| PhorgError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!(path = %path.display(), "parsed config file");
    xml_to_config(path, parsed)
}

/// Which config file applies: `PHORG_CONFIG` (must exist) or the default
/// location (only if present). Ok(None) when there is nothing to load.
pub fn resolve_config_file() -> Result<Option<PathBuf>> {
    if let Some(p) = env_config_path() {
        if !p.is_file() {
            return Err(PhorgError::Config {
                path: p,
                reason: "file named by PHORG_CONFIG does not exist".into(),
            }
            .into());
        }
        return Ok(Some(p));
    }
    Ok(default_config_path().filter(|p| p.is_file()))
}

/// Load the applicable config file, if any.
pub fn load_config() -> Result<Option<(PathBuf, Config)>> {
    match resolve_config_file()? {
        Some(path) => {
            let cfg = load_config_from_xml_path(&path)?;
            Ok(Some((path, cfg)))
        }
        None => Ok(None),
    }
}

/// Write a commented template config. Refuses to replace an existing file.
pub fn create_template_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory '{}'", parent.display()))?;
    }

    let content = "<!--\n  phorg configuration (XML)\n\n  Fields:\n    source       -> directory tree to organize (required)\n    target       -> root of the <year>/<label> tree (required)\n    filter_date  -> YYYY-MM-DD; media dated before this day stay where they are\n    dry_run      -> true/false; log every action without touching files\n    log_file     -> event log path (optional; stdout when empty)\n    log_level    -> quiet | normal | info | debug (diagnostics on stderr)\n    ignore       -> <dir> entries naming directories to skip (exact match)\n\n  CLI flags override these values; ignore lists are merged.\n-->\n<config>\n  <source></source>\n  <target></target>\n  <filter_date></filter_date>\n  <dry_run>false</dry_run>\n  <log_file></log_file>\n  <log_level>normal</log_level>\n  <ignore>\n    <dir>@eaDir</dir>\n  </ignore>\n</config>\n";

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("create config file '{}'", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("write config file '{}'", path.display()))?;

    info!("Created template config at {}", path.display());
    Ok(())
}
