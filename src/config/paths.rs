use crate::config::ConfigError;
use std::path::{Path, PathBuf};

pub const AWS_CONFIG_DIR: &str = ".aws";
pub const AWS_CONFIG_FILE_NAME: &str = "config";
pub const AWS_CONFIG_FILE_ENV: &str = "AWS_CONFIG_FILE";
pub const STATE_DIR: &str = ".aws-profile-switcher";
pub const SETTINGS_FILE_NAME: &str = "config.yaml";
pub const LOG_FILE_NAME: &str = "logs/switcher.log";

fn home_dir() -> Result<PathBuf, ConfigError> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .ok_or(ConfigError::HomeDirectoryUnavailable)
}

pub fn default_aws_config_path() -> Result<PathBuf, ConfigError> {
    Ok(home_dir()?.join(AWS_CONFIG_DIR).join(AWS_CONFIG_FILE_NAME))
}

pub fn default_settings_path() -> Result<PathBuf, ConfigError> {
    Ok(home_dir()?.join(STATE_DIR).join(SETTINGS_FILE_NAME))
}

pub fn default_log_path() -> Result<PathBuf, ConfigError> {
    Ok(home_dir()?.join(STATE_DIR).join(LOG_FILE_NAME))
}

/// Picks the AWS config file: explicit CLI path, then `AWS_CONFIG_FILE`, then
/// the settings override, then `~/.aws/config`.
pub fn resolve_aws_config_path(
    cli_override: Option<&Path>,
    settings_override: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = cli_override {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(AWS_CONFIG_FILE_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = settings_override {
        return Ok(path.to_path_buf());
    }
    default_aws_config_path()
}
