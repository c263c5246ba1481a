use super::document::DocumentParseError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: DocumentParseError,
    },
    #[error("invalid yaml in {path}: {source}")]
    Settings {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to resolve home directory for config path")]
    HomeDirectoryUnavailable,
}
