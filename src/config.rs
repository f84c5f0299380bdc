//! Client settings.
//!
//! Loaded in layers: compiled defaults, then `taskflow_config.json` (or the
//! file given with `--config`), then `TASKFLOW_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::category::DEFAULT_COLOR;
use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "taskflow_config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulated latency of sign-in and sign-up.
    pub login_delay_ms: u64,
    /// How long the event loop waits for input before redrawing.
    pub tick_rate_ms: u64,
    pub log_file: PathBuf,
    pub log_level: String,
    pub default_category_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            login_delay_ms: 1000,
            tick_rate_ms: 250,
            log_file: PathBuf::from("taskflow.log"),
            log_level: "info".to_string(),
            default_category_color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl Settings {
    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// Reads `path` if it exists; a missing file means defaults.
    pub fn from_file(path: &Path) -> Result<Settings, ConfigError> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies overrides from `lookup`, which maps variable names to values.
    pub fn apply_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Settings, ConfigError> {
        if let Some(value) = lookup("TASKFLOW_LOGIN_DELAY_MS") {
            self.login_delay_ms = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "TASKFLOW_LOGIN_DELAY_MS",
                value,
            })?;
        }
        if let Some(value) = lookup("TASKFLOW_LOG_LEVEL") {
            self.log_level = value;
        }
        if let Some(value) = lookup("TASKFLOW_LOG_FILE") {
            self.log_file = PathBuf::from(value);
        }
        Ok(self)
    }

    pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let settings = Settings::from_file(path)?.apply_env(|var| std::env::var(var).ok())?;
        if settings.tick_rate_ms == 0 {
            warn!("tick_rate_ms of 0 would spin the event loop, using default");
            return Ok(Settings {
                tick_rate_ms: Settings::default().tick_rate_ms,
                ..settings
            });
        }
        Ok(settings)
    }
}
