//! Promotion: overwrite the `default` section with a chosen profile's keys.

use crate::catalog::{profile_section_name, DEFAULT_SECTION};
use crate::config::{save_config_document, ConfigDocument, ConfigError, KeyValue};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum PromoteError {
    #[error("profile `{profile}` not found in config")]
    ProfileNotFound { profile: String },
    #[error(transparent)]
    Save(#[from] ConfigError),
}

/// Rewrites `default` in memory as an exact copy of `profile <name>` and
/// returns the number of keys copied. The document is untouched when the
/// profile does not exist.
pub fn apply_promotion(doc: &mut ConfigDocument, profile: &str) -> Result<usize, PromoteError> {
    let pairs: Vec<KeyValue> = doc
        .section(&profile_section_name(profile))
        .ok_or_else(|| PromoteError::ProfileNotFound {
            profile: profile.to_string(),
        })?
        .entries()
        .cloned()
        .collect();
    let copied = pairs.len();
    doc.ensure_section(DEFAULT_SECTION).replace_entries(pairs);
    Ok(copied)
}

/// Applies the promotion and persists the whole document to `path` once.
pub fn promote_profile(
    doc: &mut ConfigDocument,
    profile: &str,
    path: &Path,
) -> Result<usize, PromoteError> {
    let copied = apply_promotion(doc, profile)?;
    save_config_document(doc, path)?;
    Ok(copied)
}
