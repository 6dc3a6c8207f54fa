//! Merge workflow command.

use anyhow::{Context, Result};
use cimerge_config::get_package_summary;
use cimerge_core::{Environment, MergeSettings};
use cimerge_executor::{MergeOptions, MergePlan, SystemRunner};
use tracing::info;

/// Merge `branch_to_merge` into `branch_to_merge_into` and push the result.
pub fn merge(settings: &MergeSettings, tag: bool, dry_run: bool) -> Result<()> {
    let config = &settings.configuration_file;
    let summary = get_package_summary(config)
        .with_context(|| format!("Failed to read package summary from {}", config.display()))?;

    let env = Environment::from_process();
    let plan = MergePlan::from_environment(settings, &summary.version, &env, MergeOptions { tag })
        .context("Failed to prepare merge")?;

    if dry_run {
        for step in plan.steps() {
            println!("{}", step);
        }
        return Ok(());
    }

    info!(
        package = %summary.name,
        version = %summary.version,
        from = %settings.branch_to_merge,
        into = %settings.branch_to_merge_into,
        "Starting merge"
    );

    plan.execute(&SystemRunner, &env)?;

    match plan.tag() {
        Some(tag) => println!(
            "Merged {} into {} and tagged {}",
            settings.branch_to_merge, settings.branch_to_merge_into, tag
        ),
        None => println!(
            "Merged {} into {}",
            settings.branch_to_merge, settings.branch_to_merge_into
        ),
    }
    Ok(())
}
