//! Site build command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use showcase_build::{BuildReport, ShellRunner, SiteBuilder};

use crate::config::ConfigFile;

/// Run the build command.
///
/// Individual project failures are logged and reported but do not fail the
/// command.
pub async fn run(
    root: PathBuf,
    config_path: &Path,
    output: Option<PathBuf>,
    report: Option<PathBuf>,
    minify: bool,
) -> Result<()> {
    tracing::info!("Building projects in {}", root.display());

    let file_config = ConfigFile::load(config_path)?;

    let mut config = file_config.build_config(&root);
    if let Some(output) = output {
        config.publish_dir = output;
    }
    if minify {
        config.minify = true;
    }

    let runner = ShellRunner::new().with_timeout(file_config.timeout());
    let builder = SiteBuilder::with_runner(config, runner);

    // Project builds block on external commands
    let result = tokio::task::spawn_blocking(move || builder.build())
        .await
        .context("Build task panicked")??;

    let failed: Vec<&str> = result
        .projects
        .iter()
        .filter(|p| !p.is_built())
        .map(|p| p.name.as_str())
        .collect();
    if !failed.is_empty() {
        tracing::warn!("Failed projects: {}", failed.join(", "));
    }

    if let Some(path) = report {
        write_report(&result, &path)?;
        tracing::info!("Wrote build report to {}", path.display());
    }

    Ok(())
}

/// Write the build report as pretty JSON.
fn write_report(report: &BuildReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
