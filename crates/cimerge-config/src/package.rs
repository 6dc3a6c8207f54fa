//! Conventional package lookups used by CI scripts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ConfigDocument, ConfigError, ConfigResult, DEFAULT_SECTION, with_configuration};

pub const PACKAGE_SECTION: &str = "package";
pub const APP_KEY: &str = "app";

/// Package metadata CI scripts publish and tag with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub name: String,
    pub version: String,
    pub description: String,
    pub homepage: String,
}

impl PackageSummary {
    /// Read the summary from the `package` section, failing on the first missing key.
    pub fn from_document(doc: &ConfigDocument) -> ConfigResult<Self> {
        Ok(Self {
            name: doc.lookup(PACKAGE_SECTION, "name")?,
            version: doc.lookup(PACKAGE_SECTION, "version")?,
            description: doc.lookup(PACKAGE_SECTION, "description")?,
            homepage: doc.lookup(PACKAGE_SECTION, "homepage")?,
        })
    }

    /// `major.minor` part of the version, e.g. `1.4` for `1.4.2`.
    pub fn short_version(&self) -> ConfigResult<String> {
        short_version(&self.version)
    }
}

/// Read name, version, description and homepage from the file at `path`.
pub fn get_package_summary(path: impl AsRef<Path>) -> ConfigResult<PackageSummary> {
    with_configuration(path, PackageSummary::from_document)
}

/// Read the application name (`app` in `DEFAULT`) from the file at `path`.
pub fn get_app_name(path: impl AsRef<Path>) -> ConfigResult<String> {
    with_configuration(path, app_name)
}

pub fn app_name(doc: &ConfigDocument) -> ConfigResult<String> {
    doc.lookup(DEFAULT_SECTION, APP_KEY)
}

pub fn short_version(version: &str) -> ConfigResult<String> {
    let mut parts = version.split('.');
    match (parts.next(), parts.next()) {
        (Some(major), Some(minor)) if !major.is_empty() && !minor.is_empty() => {
            Ok(format!("{}.{}", major, minor))
        }
        _ => Err(ConfigError::InvalidValue {
            field: "version".to_string(),
            message: format!("expected at least 'major.minor', found '{}'", version),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_package_summary() {
        let file = config_file(
            "[package]\nname=\"foo\"\nversion=\"1.0\"\ndescription=\"d\"\nhomepage=\"h\"\n",
        );
        let summary = get_package_summary(file.path()).unwrap();
        assert_eq!(
            summary,
            PackageSummary {
                name: "foo".to_string(),
                version: "1.0".to_string(),
                description: "d".to_string(),
                homepage: "h".to_string(),
            }
        );
    }

    #[test]
    fn test_package_summary_fails_on_first_missing_key() {
        let file = config_file("[package]\nname = \"foo\"\nhomepage = \"h\"\n");
        assert!(matches!(
            get_package_summary(file.path()),
            Err(ConfigError::MissingKey { ref key, .. }) if key == "version"
        ));
    }

    #[test]
    fn test_package_summary_without_package_section() {
        let file = config_file("[workspace]\nresolver = \"2\"\n");
        assert!(matches!(
            get_package_summary(file.path()),
            Err(ConfigError::MissingSection(ref name)) if name == PACKAGE_SECTION
        ));
    }

    #[test]
    fn test_app_name() {
        let file = config_file("[DEFAULT]\napp = \"widgets\"\n\n[package]\nname = \"foo\"\n");
        assert_eq!(get_app_name(file.path()).unwrap(), "widgets");
    }

    #[test]
    fn test_app_name_missing() {
        let file = config_file("[package]\nname = \"foo\"\n");
        assert!(matches!(
            get_app_name(file.path()),
            Err(ConfigError::MissingKey { ref section, .. }) if section == DEFAULT_SECTION
        ));
    }

    #[test]
    fn test_short_version() {
        assert_eq!(short_version("1.4.2").unwrap(), "1.4");
        assert_eq!(short_version("0.10").unwrap(), "0.10");
        assert_eq!(short_version("2.0.0-beta.1").unwrap(), "2.0");
    }

    #[test]
    fn test_short_version_rejects_single_part() {
        assert!(matches!(short_version("3"), Err(ConfigError::InvalidValue { .. })));
        assert!(matches!(short_version("3."), Err(ConfigError::InvalidValue { .. })));
        assert!(matches!(short_version(""), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_summary_serializes_as_flat_record() {
        let summary = PackageSummary {
            name: "foo".to_string(),
            version: "1.0".to_string(),
            description: "d".to_string(),
            homepage: "h".to_string(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "foo", "version": "1.0", "description": "d", "homepage": "h"})
        );
    }
}
