use super::{default_log_path, default_settings_path, ConfigError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub aws_config_path: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub watch_config: bool,
    #[serde(default = "default_true")]
    pub show_info: bool,
    #[serde(default = "default_true")]
    pub logging: bool,
    #[serde(default)]
    pub log_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            aws_config_path: None,
            watch_config: true,
            show_info: true,
            logging: true,
            log_path: None,
        }
    }
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Settings {
            path: path.display().to_string(),
            source,
        })
    }

    /// `None` when logging is switched off.
    pub fn resolve_log_path(&self) -> Result<Option<PathBuf>, ConfigError> {
        if !self.logging {
            return Ok(None);
        }
        match &self.log_path {
            Some(path) => Ok(Some(path.clone())),
            None => default_log_path().map(Some),
        }
    }
}

/// Loads `~/.aws-profile-switcher/config.yaml`; a missing file means defaults.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let path = default_settings_path()?;
    if !path.exists() {
        return Ok(Settings::default());
    }
    Settings::from_path(&path)
}
