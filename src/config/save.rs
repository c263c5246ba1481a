use super::{ConfigDocument, ConfigError};
use crate::shared::fs_atomic::atomic_write_file;
use std::path::Path;

/// Replaces the file at `path` with the rendered document in one rename, so a
/// failed write leaves the previous file intact.
pub fn save_config_document(doc: &ConfigDocument, path: &Path) -> Result<(), ConfigError> {
    atomic_write_file(path, doc.render().as_bytes()).map_err(|source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_document;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn save_after_load_keeps_the_file_identical() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("config");
        let body = "[profile a]\n# note\nregion = us-east-1\n\n[sso-session s]\nsso_region=us-east-1\n";
        fs::write(&path, body).expect("write config");

        let doc = load_config_document(&path).expect("load");
        save_config_document(&doc, &path).expect("save");

        assert_eq!(fs::read_to_string(&path).expect("read back"), body);
    }

    #[test]
    fn save_into_missing_directory_reports_write_error() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("absent/config");
        let err = save_config_document(&ConfigDocument::default(), &path).expect_err("no dir");
        assert!(matches!(err, ConfigError::Write { .. }));
        assert!(!path.exists());
    }
}
