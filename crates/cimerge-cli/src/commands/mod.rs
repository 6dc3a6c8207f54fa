//! CLI command implementations.

pub mod merge;
pub mod run;

use std::path::Path;

use anyhow::{Context, Result};
use cimerge_config::{PackageSummary, get_app_name, get_package_summary, read_configuration};
use cimerge_core::{Environment, MergeSettings};

pub fn summary(config: &Path, json: bool) -> Result<()> {
    let summary = read_summary(config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("name: {}", summary.name);
        println!("version: {}", summary.version);
        println!("description: {}", summary.description);
        println!("homepage: {}", summary.homepage);
    }
    Ok(())
}

pub fn app_name(config: &Path) -> Result<()> {
    let name = get_app_name(config)
        .with_context(|| format!("Failed to read app name from {}", config.display()))?;
    println!("{}", name);
    Ok(())
}

pub fn get(config: &Path, section: &str, key: &str, raw: bool) -> Result<()> {
    let doc = read_configuration(config)
        .with_context(|| format!("Failed to read config file: {}", config.display()))?;
    let value = if raw {
        doc.raw(section, key)?.to_string()
    } else {
        doc.lookup(section, key)?
    };
    println!("{}", value);
    Ok(())
}

pub fn short_version(config: &Path) -> Result<()> {
    println!("{}", read_summary(config)?.short_version()?);
    Ok(())
}

pub fn env(name: &str) -> Result<()> {
    let value = Environment::from_process().get_var(name)?;
    println!("{}", value);
    Ok(())
}

pub fn settings(settings: &MergeSettings) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}

fn read_summary(config: &Path) -> Result<PackageSummary> {
    get_package_summary(config)
        .with_context(|| format!("Failed to read package summary from {}", config.display()))
}
