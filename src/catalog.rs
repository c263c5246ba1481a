//! Selectable profiles derived from the sections of an AWS config document.

use crate::config::ConfigDocument;
use std::fmt;

pub const DEFAULT_SECTION: &str = "default";
pub const PROFILE_PREFIX: &str = "profile ";
pub const SSO_SESSION_PREFIX: &str = "sso-session ";
pub const CONFIG_FILE_DOCS_URL: &str =
    "https://docs.aws.amazon.com/cli/latest/userguide/cli-configure-files.html";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Profile {
    name: String,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the config section that backs this profile.
    pub fn section_name(&self) -> String {
        profile_section_name(&self.name)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

pub fn profile_section_name(profile: &str) -> String {
    format!("{PROFILE_PREFIX}{profile}")
}

/// A section that is neither `default`, `profile <name>` nor `sso-session <name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogWarning {
    pub section: String,
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "section [{}] is missing the 'profile' or 'sso-session' prefix and is ignored; see {}",
            self.section, CONFIG_FILE_DOCS_URL
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub profiles: Vec<Profile>,
    pub warnings: Vec<CatalogWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind<'a> {
    Default,
    Profile(&'a str),
    SsoSession,
    Unrecognized,
}

fn classify_section(name: &str) -> SectionKind<'_> {
    if name.eq_ignore_ascii_case(DEFAULT_SECTION) {
        return SectionKind::Default;
    }
    if let Some(profile) = name.strip_prefix(PROFILE_PREFIX) {
        if !profile.is_empty() {
            return SectionKind::Profile(profile);
        }
    }
    if let Some(session) = name.strip_prefix(SSO_SESSION_PREFIX) {
        if !session.is_empty() {
            return SectionKind::SsoSession;
        }
    }
    SectionKind::Unrecognized
}

pub fn derive_catalog(doc: &ConfigDocument) -> Catalog {
    let mut catalog = Catalog::default();
    for section in doc.sections() {
        match classify_section(section.name()) {
            SectionKind::Default | SectionKind::SsoSession => {}
            SectionKind::Profile(name) => catalog.profiles.push(Profile::new(name)),
            SectionKind::Unrecognized => catalog.warnings.push(CatalogWarning {
                section: section.name().to_string(),
            }),
        }
    }
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_of(text: &str) -> Catalog {
        derive_catalog(&ConfigDocument::parse(text).expect("parse config"))
    }

    #[test]
    fn default_in_any_case_is_skipped_silently() {
        let catalog = catalog_of("[default]\na = 1\n[DEFAULT]\nb = 2\n[Default]\nc = 3\n");
        assert!(catalog.profiles.is_empty());
        assert!(catalog.warnings.is_empty());
    }

    #[test]
    fn profile_prefix_is_stripped_and_order_kept() {
        let catalog = catalog_of("[profile zeta]\n[profile alpha]\n[sso-session corp]\n");
        let names = catalog.profiles.iter().map(Profile::name).collect::<Vec<_>>();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert!(catalog.warnings.is_empty());
    }

    #[test]
    fn unrecognized_sections_warn_once_each() {
        let catalog = catalog_of("[badsection]\n[profile]\n[sso-session]\n[Profile x]\n");
        let sections = catalog
            .warnings
            .iter()
            .map(|w| w.section.as_str())
            .collect::<Vec<_>>();
        assert_eq!(sections, vec!["badsection", "profile", "sso-session", "Profile x"]);
        assert!(catalog.profiles.is_empty());
    }

    #[test]
    fn warning_text_names_section_and_docs() {
        let warning = CatalogWarning {
            section: "legacy".to_string(),
        };
        let text = warning.to_string();
        assert!(text.contains("[legacy]"));
        assert!(text.contains(CONFIG_FILE_DOCS_URL));
    }

    #[test]
    fn profile_maps_back_to_its_section() {
        assert_eq!(Profile::new("work").section_name(), "profile work");
    }
}
