//! Configuration loading and parsing.
//!
//! Parses `overtype.toml` (or an override path provided by the binary). The only
//! section today is `[status]`:
//!
//! ```toml
//! [status]
//! show_indicator = true
//! priority = 100
//! ```
//!
//! Unknown fields are ignored so the file can grow without warnings. A missing
//! file yields defaults; a malformed file also yields defaults but is logged.
//! Overtype state itself is never read from or written to configuration.

use anyhow::Result;
use core_events::SettingChange;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "overtype.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StatusConfig {
    #[serde(default = "StatusConfig::default_show_indicator")]
    pub show_indicator: bool,
    /// Placement priority handed to the status bar service.
    #[serde(default = "StatusConfig::default_priority")]
    pub priority: i32,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            show_indicator: Self::default_show_indicator(),
            priority: Self::default_priority(),
        }
    }
}

impl StatusConfig {
    const fn default_show_indicator() -> bool {
        true
    }
    const fn default_priority() -> i32 {
        100
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub status: StatusConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Best-effort config path: working directory first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("overtype").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    match fs::read_to_string(&path) {
        Ok(content) => {
            let cfg = parse_str(&content);
            info!(
                target: "config",
                path = %path.display(),
                show_indicator = cfg.file.status.show_indicator,
                "config_loaded"
            );
            Ok(cfg)
        }
        Err(_) => Ok(Config::default()),
    }
}

/// Parse configuration text, falling back to defaults on error.
pub fn parse_str(content: &str) -> Config {
    match toml::from_str::<ConfigFile>(content) {
        Ok(file) => Config {
            raw: Some(content.to_string()),
            file,
        },
        Err(e) => {
            warn!(target: "config", error = %e, "config_parse_failed_using_defaults");
            Config::default()
        }
    }
}

impl Config {
    pub fn show_indicator(&self) -> bool {
        self.file.status.show_indicator
    }

    pub fn indicator_priority(&self) -> i32 {
        self.file.status.priority
    }

    /// Replace the live configuration, returning the change the runtime must react to.
    pub fn apply(&mut self, new: Config) -> Option<SettingChange> {
        let before = self.show_indicator();
        *self = new;
        let after = self.show_indicator();
        if before != after {
            info!(target: "config", show_indicator = after, "show_indicator_changed");
            Some(SettingChange::ShowIndicator(after))
        } else {
            None
        }
    }

    /// Set a single key by dotted name (`status.show_indicator`). Returns the change, if any.
    pub fn set(&mut self, key: &str, value: &str) -> Result<Option<SettingChange>> {
        let mut next = self.clone();
        match key {
            "status.show_indicator" => next.file.status.show_indicator = value.parse()?,
            "status.priority" => next.file.status.priority = value.parse()?,
            other => anyhow::bail!("unknown setting `{other}`"),
        }
        next.raw = None;
        Ok(self.apply(next))
    }
}
