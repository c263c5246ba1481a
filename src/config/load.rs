use super::{ConfigDocument, ConfigError};
use std::fs;
use std::path::Path;

pub fn load_config_document(path: &Path) -> Result<ConfigDocument, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    ConfigDocument::parse(&text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}
