//! Create a new project from the template directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use showcase_build::{copy_tree, format_label};

use crate::config::ConfigFile;

/// Run the new command.
pub async fn run(root: &Path, config_path: &Path, name: &str, yes: bool) -> Result<()> {
    let config = ConfigFile::load(config_path)?;

    validate_name(name, &config.discovery.ignore)?;

    let target = root.join(name);

    if target.exists() {
        if !yes {
            tracing::warn!("{} already exists. Use --yes to overwrite.", target.display());
            return Ok(());
        }

        tracing::info!("Replacing {}", target.display());
        fs::remove_dir_all(&target)
            .with_context(|| format!("Failed to remove {}", target.display()))?;
    }

    let template = root.join(&config.build.template_dir);

    if template.is_dir() {
        let stats = copy_tree(&template, &target, &config.build.skip_dirs)?;
        tracing::info!(
            "Created {} from {} ({} files)",
            name,
            config.build.template_dir,
            stats.files
        );
    } else {
        fs::create_dir_all(&target)
            .with_context(|| format!("Failed to create {}", target.display()))?;

        let index = DEFAULT_INDEX.replace("{{title}}", &format_label(name));
        fs::write(target.join("index.html"), index).context("Failed to write index.html")?;

        tracing::info!("Created {}/index.html", name);
    }

    tracing::info!("Run 'showcase build' to publish it at /{}/", name);

    Ok(())
}

/// A project name must be a single visible directory that discovery would
/// pick up.
fn validate_name(name: &str, ignore: &[String]) -> Result<()> {
    if name.is_empty() {
        anyhow::bail!("Project name cannot be empty");
    }
    if name.starts_with('.') {
        anyhow::bail!("Project name cannot start with '.': {}", name);
    }
    if name.contains(['/', '\\']) {
        anyhow::bail!("Project name cannot contain path separators: {}", name);
    }
    if ignore.iter().any(|i| i == name) {
        anyhow::bail!("'{}' is a reserved directory name", name);
    }
    Ok(())
}

const DEFAULT_INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{title}}</title>
</head>
<body>
  <h1>{{title}}</h1>
  <p>Edit this page, or add a package.json with a build script.</p>
</body>
</html>
"#;
