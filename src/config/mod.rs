pub mod document;
pub mod error;
pub mod load;
pub mod paths;
pub mod save;
pub mod settings;

pub use document::{ConfigDocument, DocumentParseError, KeyValue, ParseErrorKind, Section};
pub use error::ConfigError;
pub use load::load_config_document;
pub use paths::{
    default_aws_config_path, default_log_path, default_settings_path, resolve_aws_config_path,
    AWS_CONFIG_FILE_ENV, STATE_DIR,
};
pub use save::save_config_document;
pub use settings::{load_settings, Settings};
