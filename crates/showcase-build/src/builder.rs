//! Site builder: discovers, builds and publishes every project.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use crate::discovery::discover_projects;
use crate::error::BuildError;
use crate::project::{ProjectBuilder, ProjectOutcome};
use crate::runner::{CommandRunner, ShellRunner};
use crate::templates::IndexPage;

/// Configuration for building the site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory containing the projects
    pub root: PathBuf,

    /// Output directory, wiped at the start of every build
    pub publish_dir: PathBuf,

    /// Directory names never treated as projects
    pub ignore: Vec<String>,

    /// File whose presence means a project must be built
    pub manifest: String,

    /// Lock files that trigger the install command
    pub lock_files: Vec<String>,

    /// Command that installs dependencies
    pub install_command: String,

    /// Command that builds a project
    pub build_command: String,

    /// Build output folders, in priority order
    pub output_dirs: Vec<String>,

    /// Directory names left out of every copy
    pub skip_dirs: Vec<String>,

    /// Landing page title
    pub title: String,

    /// Minify the landing page stylesheet
    pub minify: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            publish_dir: PathBuf::from("public"),
            ignore: strings(&[
                "node_modules",
                ".git",
                ".github",
                "scripts",
                "public",
                "_template",
            ]),
            manifest: "package.json".to_string(),
            lock_files: strings(&["package-lock.json", "yarn.lock", "pnpm-lock.yaml"]),
            install_command: "npm install".to_string(),
            build_command: "npm run build".to_string(),
            output_dirs: strings(&["dist", "build", "out"]),
            skip_dirs: strings(&["node_modules"]),
            title: "Intern Projects".to_string(),
            minify: false,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Result of a build operation.
#[derive(Debug, Serialize)]
pub struct BuildReport {
    /// Every discovered project, in build order
    pub projects: Vec<ProjectOutcome>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

impl BuildReport {
    /// Names of the published projects, in build order.
    pub fn built(&self) -> Vec<String> {
        self.projects
            .iter()
            .filter(|p| p.is_built())
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn succeeded(&self) -> usize {
        self.projects.iter().filter(|p| p.is_built()).count()
    }

    pub fn total(&self) -> usize {
        self.projects.len()
    }

    /// `succeeded/total`, e.g. `3/4`.
    pub fn summary(&self) -> String {
        format!("{}/{}", self.succeeded(), self.total())
    }
}

/// Site builder.
pub struct SiteBuilder {
    config: BuildConfig,
    runner: Box<dyn CommandRunner>,
    index: IndexPage,
}

impl SiteBuilder {
    /// Create a builder that runs project commands through the shell.
    pub fn new(config: BuildConfig) -> Self {
        Self::with_runner(config, ShellRunner::new())
    }

    /// Create a builder with a custom command runner.
    pub fn with_runner(config: BuildConfig, runner: impl CommandRunner + 'static) -> Self {
        let index = IndexPage::new(config.title.clone(), config.minify);

        Self {
            config,
            runner: Box::new(runner),
            index,
        }
    }

    /// Build the site.
    ///
    /// Project failures are recorded in the report. Only problems with the
    /// root, the publish directory or the index page are returned as errors.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();

        self.check_publish_dir()?;
        self.reset_publish_dir()?;

        let ignore = self.ignore_list();
        let names = discover_projects(&self.config.root, &ignore)?;

        tracing::info!(
            "Found {} project folder(s): {}",
            names.len(),
            if names.is_empty() {
                "none".to_string()
            } else {
                names.join(", ")
            }
        );

        let projects = ProjectBuilder::new(&self.config, self.runner.as_ref());
        let outcomes: Vec<ProjectOutcome> = names.iter().map(|name| projects.build(name)).collect();

        let mut report = BuildReport {
            projects: outcomes,
            duration_ms: 0,
            output_dir: self.config.publish_dir.clone(),
        };

        self.write_index(&report.built())?;

        report.duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Build complete: {} projects in {}ms",
            report.summary(),
            report.duration_ms
        );
        tracing::info!("Output: {}", self.config.publish_dir.display());

        Ok(report)
    }

    /// Refuse publish directories that the reset would wipe project files
    /// from: the root itself, one of its ancestors, or a folder inside a
    /// project.
    fn check_publish_dir(&self) -> Result<(), BuildError> {
        let root = fs::canonicalize(&self.config.root).map_err(|e| BuildError::Discovery {
            path: self.config.root.clone(),
            message: e.to_string(),
        })?;
        let publish =
            resolve_path(&self.config.publish_dir).map_err(|e| BuildError::PublishDir {
                path: self.config.publish_dir.clone(),
                message: e.to_string(),
            })?;

        let refuse = |message: String| BuildError::PublishDir {
            path: self.config.publish_dir.clone(),
            message,
        };

        if root.starts_with(&publish) {
            return Err(refuse(format!("contains the project root {}", root.display())));
        }

        if let Ok(inside) = publish.strip_prefix(&root) {
            let mut parts = inside.components();
            if let (Some(top), Some(_)) = (parts.next(), parts.next()) {
                let top = top.as_os_str().to_string_lossy();
                let ignored = top.starts_with('.')
                    || self.config.ignore.iter().any(|i| i.as_str() == top.as_ref());
                if !ignored {
                    return Err(refuse(format!("is inside project {}", top)));
                }
            }
        }

        Ok(())
    }

    /// Delete and recreate the publish directory.
    fn reset_publish_dir(&self) -> Result<(), BuildError> {
        let dir = &self.config.publish_dir;
        let to_err = |e: std::io::Error| BuildError::PublishDir {
            path: dir.clone(),
            message: e.to_string(),
        };

        if dir.exists() {
            fs::remove_dir_all(dir).map_err(to_err)?;
        }
        fs::create_dir_all(dir).map_err(to_err)?;

        Ok(())
    }

    /// Configured ignore list, plus the publish directory when it sits
    /// directly inside the root.
    fn ignore_list(&self) -> Vec<String> {
        let mut ignore = self.config.ignore.clone();

        if let Some(name) = publish_dir_name(&self.config.root, &self.config.publish_dir) {
            if !ignore.contains(&name) {
                tracing::debug!("Ignoring publish directory {}", name);
                ignore.push(name);
            }
        }

        ignore
    }

    fn write_index(&self, built: &[String]) -> Result<(), BuildError> {
        let html = self
            .index
            .render(built)
            .map_err(|e| BuildError::Template(e.to_string()))?;

        let path = self.config.publish_dir.join("index.html");
        fs::write(&path, html).map_err(|e| BuildError::write(&path, e))?;

        Ok(())
    }
}

/// Canonical form of `path`, resolving the longest prefix that exists and
/// appending the rest unchanged.
fn resolve_path(path: &Path) -> std::io::Result<PathBuf> {
    let mut existing = path;
    let mut rest = Vec::new();

    loop {
        match fs::canonicalize(existing) {
            Ok(base) => return Ok(rest.iter().rev().fold(base, |acc, part| acc.join(part))),
            Err(e) => match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    rest.push(name.to_os_string());
                    existing = if parent.as_os_str().is_empty() {
                        Path::new(".")
                    } else {
                        parent
                    };
                }
                _ => return Err(e),
            },
        }
    }
}

/// Name of `publish_dir` if its parent is `root`.
fn publish_dir_name(root: &Path, publish_dir: &Path) -> Option<String> {
    let root = fs::canonicalize(root).ok()?;
    let publish_dir = fs::canonicalize(publish_dir).ok()?;

    if publish_dir.parent()? != root {
        return None;
    }

    publish_dir
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}
