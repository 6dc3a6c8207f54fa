//! Reading a realistic package manifest end to end.

use std::fs;

use cimerge_config::package::short_version;
use cimerge_config::{
    ConfigError, DEFAULT_SECTION, PackageSummary, get_app_name, get_package_summary,
    read_configuration,
};

const MANIFEST: &str = r#"# Release metadata read by the CI merge job.
[DEFAULT]
app = "widgets"
org = acme

[package]
name = "widgets"
version = "2.3.1"
edition = "2021"
description = "Widgets for ${DEFAULT:org}"
homepage = "https://github.com/${org}/widgets"
license = "MIT"

[dependencies]
rand = "0.8"
tempfile = { version = "3", optional = true }

[dev-dependencies]
data-encoding = "2.1"
"#;

fn write_manifest(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("Cargo.toml");
    fs::write(&path, MANIFEST).unwrap();
    path
}

#[test]
fn test_summary_from_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_manifest(&dir);

    let summary = get_package_summary(&path).unwrap();
    assert_eq!(
        summary,
        PackageSummary {
            name: "widgets".to_string(),
            version: "2.3.1".to_string(),
            description: "Widgets for acme".to_string(),
            homepage: "https://github.com/acme/widgets".to_string(),
        }
    );
    assert_eq!(summary.short_version().unwrap(), "2.3");
}

#[test]
fn test_app_name_from_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_manifest(&dir);
    assert_eq!(get_app_name(&path).unwrap(), "widgets");
}

#[test]
fn test_other_sections_are_readable() {
    let dir = tempfile::tempdir().unwrap();
    let doc = read_configuration(write_manifest(&dir)).unwrap();

    assert_eq!(doc.lookup("dependencies", "rand").unwrap(), "0.8");
    assert_eq!(
        doc.raw("dependencies", "tempfile").unwrap(),
        r#"{ version = "3", optional = true }"#
    );
    assert_eq!(doc.lookup("dev-dependencies", "data-encoding").unwrap(), "2.1");
    assert_eq!(doc.lookup(DEFAULT_SECTION, "org").unwrap(), "acme");
    assert_eq!(
        doc.sections().collect::<Vec<_>>(),
        vec!["dependencies", "dev-dependencies", "package"]
    );
}

#[test]
fn test_lookup_failures_are_distinct() {
    let dir = tempfile::tempdir().unwrap();
    let doc = read_configuration(write_manifest(&dir)).unwrap();

    assert!(matches!(
        doc.lookup("package", "readme"),
        Err(ConfigError::MissingKey { .. })
    ));
    assert!(matches!(
        doc.lookup("badges", "maintenance"),
        Err(ConfigError::MissingSection(_))
    ));
    assert!(matches!(
        read_configuration(dir.path().join("missing.toml")),
        Err(ConfigError::NotFound(_))
    ));
}

#[test]
fn test_short_version_of_manifest_version() {
    assert_eq!(short_version("2.3.1").unwrap(), "2.3");
}
