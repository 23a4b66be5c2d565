//! Configuration file (showcase.toml).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use showcase_build::BuildConfig;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub build: BuildSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub title: String,
    /// Relative to the project root
    pub publish_dir: PathBuf,
    pub minify: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let defaults = BuildConfig::default();
        Self {
            title: defaults.title,
            publish_dir: defaults.publish_dir,
            minify: defaults.minify,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    pub ignore: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            ignore: BuildConfig::default().ignore,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSettings {
    pub manifest: String,
    pub lock_files: Vec<String>,
    pub install_command: String,
    pub build_command: String,
    pub output_dirs: Vec<String>,
    pub skip_dirs: Vec<String>,
    /// Per-command limit; unset means commands may run forever
    pub timeout_secs: Option<u64>,
    /// Directory copied by `showcase new`
    pub template_dir: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        let defaults = BuildConfig::default();
        Self {
            manifest: defaults.manifest,
            lock_files: defaults.lock_files,
            install_command: defaults.install_command,
            build_command: defaults.build_command,
            output_dirs: defaults.output_dirs,
            skip_dirs: defaults.skip_dirs,
            timeout_secs: None,
            template_dir: "_template".to_string(),
        }
    }
}

impl ConfigFile {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Build pipeline settings for the projects under `root`.
    pub fn build_config(&self, root: &Path) -> BuildConfig {
        BuildConfig {
            root: root.to_path_buf(),
            publish_dir: root.join(&self.site.publish_dir),
            ignore: self.discovery.ignore.clone(),
            manifest: self.build.manifest.clone(),
            lock_files: self.build.lock_files.clone(),
            install_command: self.build.install_command.clone(),
            build_command: self.build.build_command.clone(),
            output_dirs: self.build.output_dirs.clone(),
            skip_dirs: self.build.skip_dirs.clone(),
            title: self.site.title.clone(),
            minify: self.site.minify,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.build.timeout_secs.map(Duration::from_secs)
    }
}
