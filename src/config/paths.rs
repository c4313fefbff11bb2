//! Default config file location.

use dirs::config_dir;
use std::env;
use std::path::PathBuf;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PHORG_CONFIG";

/// OS-appropriate default config path.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(mut base) = config_dir() {
        base.push("phorg");
        base.push("config.xml");
        Some(base)
    } else {
        env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join(".config").join("phorg").join("config.xml"))
    }
}

/// Explicit config path from `PHORG_CONFIG`, if set and non-empty.
pub fn env_config_path() -> Option<PathBuf> {
    env::var_os(CONFIG_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
