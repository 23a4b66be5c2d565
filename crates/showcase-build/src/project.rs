//! Building and publishing a single project.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::builder::BuildConfig;
use crate::copier::copy_tree;
use crate::error::BuildError;
use crate::runner::CommandRunner;

/// Where a published project's files came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactSource {
    /// Project had no build manifest and was copied as-is
    Raw,

    /// Project was built and this output directory was published
    Output(String),
}

/// Result of building one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProjectStatus {
    Built { source: ArtifactSource },
    Failed { reason: String },
}

/// A project and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectOutcome {
    /// Directory name, also the URL path segment
    pub name: String,

    #[serde(flatten)]
    pub status: ProjectStatus,
}

impl ProjectOutcome {
    /// Whether the project was published.
    pub fn is_built(&self) -> bool {
        matches!(self.status, ProjectStatus::Built { .. })
    }
}

/// Builds projects from the root into the publish directory.
///
/// Every failure, including copy errors, is caught here and reported as a
/// failed outcome for that project. A failed project never leaves anything
/// behind in the publish directory.
pub struct ProjectBuilder<'a> {
    config: &'a BuildConfig,
    runner: &'a dyn CommandRunner,
}

impl<'a> ProjectBuilder<'a> {
    /// Create a builder that runs commands through `runner`.
    pub fn new(config: &'a BuildConfig, runner: &'a dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    /// Build and publish the project directory `<root>/<name>`.
    pub fn build(&self, name: &str) -> ProjectOutcome {
        tracing::info!("Building: {}", name);

        let project_dir = self.config.root.join(name);

        let status = match self.try_build(name, &project_dir) {
            Ok(source) => {
                tracing::info!("Success: /{}/", name);
                ProjectStatus::Built { source }
            }
            Err(e) => {
                tracing::warn!("Build failed for {}: {}", name, e);
                ProjectStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        ProjectOutcome {
            name: name.to_string(),
            status,
        }
    }

    fn try_build(&self, name: &str, project_dir: &Path) -> Result<ArtifactSource, BuildError> {
        if !project_dir.join(&self.config.manifest).exists() {
            tracing::info!("No {} found, copying files directly", self.config.manifest);
            self.publish(name, project_dir)?;
            return Ok(ArtifactSource::Raw);
        }

        let has_lock_file = self
            .config
            .lock_files
            .iter()
            .any(|lock| project_dir.join(lock).exists());

        if has_lock_file {
            tracing::info!("Installing dependencies...");
            self.runner.run(&self.config.install_command, project_dir)?;
        }

        tracing::info!("Running build...");
        self.runner.run(&self.config.build_command, project_dir)?;

        let (output_name, output_dir) = self.find_output(project_dir).ok_or_else(|| {
            BuildError::NoOutput {
                candidates: self.config.output_dirs.join("/"),
            }
        })?;

        tracing::debug!("Publishing {} from {}", name, output_dir.display());
        self.publish(name, &output_dir)?;

        Ok(ArtifactSource::Output(output_name))
    }

    /// First existing output directory, in configured priority order.
    fn find_output(&self, project_dir: &Path) -> Option<(String, PathBuf)> {
        self.config
            .output_dirs
            .iter()
            .map(|dir| (dir.clone(), project_dir.join(dir)))
            .find(|(_, path)| path.is_dir())
    }

    /// Copy `source` to `<publish>/<name>` through a staging directory.
    ///
    /// The destination only appears once the copy has fully succeeded.
    fn publish(&self, name: &str, source: &Path) -> Result<(), BuildError> {
        let publish_dir = &self.config.publish_dir;

        // Dropping the TempDir removes whatever a failed copy left behind
        let staging = tempfile::Builder::new()
            .prefix(&format!(".{name}-"))
            .tempdir_in(publish_dir)
            .map_err(|e| BuildError::copy(publish_dir, e))?;

        copy_tree(source, staging.path(), &self.config.skip_dirs)?;

        // Temp dirs are owner-only; published dirs take the source's mode
        let permissions = fs::metadata(source)
            .map_err(|e| BuildError::copy(source, e))?
            .permissions();
        fs::set_permissions(staging.path(), permissions)
            .map_err(|e| BuildError::copy(staging.path(), e))?;

        let dest = publish_dir.join(name);
        if dest.exists() {
            fs::remove_dir_all(&dest).map_err(|e| BuildError::copy(&dest, e))?;
        }

        // From here the staged tree is ours to move or clean up
        let staged = staging.keep();
        if let Err(e) = fs::rename(&staged, &dest) {
            let _ = fs::remove_dir_all(&staged);
            return Err(BuildError::copy(&dest, e));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::{Script, ScriptedRunner};
    use pretty_assertions::assert_eq;
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        _temp: TempDir,
        config: BuildConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = tempdir().unwrap();
            let root = temp.path().join("repo");
            let publish_dir = temp.path().join("public");
            fs::create_dir_all(&root).unwrap();
            fs::create_dir_all(&publish_dir).unwrap();

            Self {
                config: BuildConfig {
                    root,
                    publish_dir,
                    ..Default::default()
                },
                _temp: temp,
            }
        }

        fn project(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
            let dir = self.config.root.join(name);
            fs::create_dir_all(&dir).unwrap();
            for (path, content) in files {
                let path = dir.join(path);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(path, content).unwrap();
            }
            dir
        }

        fn published(&self) -> Vec<String> {
            let mut names: Vec<String> = fs::read_dir(&self.config.publish_dir)
                .unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
                .collect();
            names.sort();
            names
        }
    }

    #[test]
    fn copies_project_without_manifest() {
        let fx = Fixture::new();
        fx.project(
            "plain-site",
            &[("index.html", "<h1>Plain</h1>"), ("css/site.css", "body{}")],
        );
        let runner = ScriptedRunner::new();

        let outcome = ProjectBuilder::new(&fx.config, &runner).build("plain-site");

        assert_eq!(
            outcome.status,
            ProjectStatus::Built {
                source: ArtifactSource::Raw
            }
        );
        assert!(runner.commands().is_empty());
        let dest = fx.config.publish_dir.join("plain-site");
        assert_eq!(
            fs::read_to_string(dest.join("index.html")).unwrap(),
            "<h1>Plain</h1>"
        );
        assert_eq!(fs::read_to_string(dest.join("css/site.css")).unwrap(), "body{}");
        assert_eq!(fx.published(), vec!["plain-site"]);
    }

    #[test]
    fn raw_copy_skips_dependency_cache() {
        let fx = Fixture::new();
        fx.project(
            "plain-site",
            &[("index.html", "hi"), ("node_modules/dep/index.js", "x")],
        );
        let runner = ScriptedRunner::new();

        let outcome = ProjectBuilder::new(&fx.config, &runner).build("plain-site");

        assert!(outcome.is_built());
        assert!(!fx
            .config
            .publish_dir
            .join("plain-site/node_modules")
            .exists());
    }

    #[test]
    fn installs_when_lock_file_present() {
        let fx = Fixture::new();
        let dir = fx.project(
            "app",
            &[("package.json", "{}"), ("package-lock.json", "{}")],
        );
        let runner = ScriptedRunner::new().on("npm run build", Script::Emit("dist"));

        let outcome = ProjectBuilder::new(&fx.config, &runner).build("app");

        assert_eq!(
            outcome.status,
            ProjectStatus::Built {
                source: ArtifactSource::Output("dist".to_string())
            }
        );
        assert_eq!(runner.commands(), vec!["npm install", "npm run build"]);
        assert_eq!(runner.dirs(), vec![dir.clone(), dir]);
        assert_eq!(
            fs::read_to_string(fx.config.publish_dir.join("app/index.html")).unwrap(),
            "built into dist"
        );
    }

    #[test]
    fn skips_install_without_lock_file() {
        let fx = Fixture::new();
        fx.project("app", &[("package.json", "{}")]);
        let runner = ScriptedRunner::new().on("npm run build", Script::Emit("build"));

        let outcome = ProjectBuilder::new(&fx.config, &runner).build("app");

        assert!(outcome.is_built());
        assert_eq!(runner.commands(), vec!["npm run build"]);
    }

    #[test]
    fn any_known_lock_file_triggers_install() {
        for lock in ["yarn.lock", "pnpm-lock.yaml"] {
            let fx = Fixture::new();
            fx.project("app", &[("package.json", "{}"), (lock, "")]);
            let runner = ScriptedRunner::new().on("npm run build", Script::Emit("dist"));

            ProjectBuilder::new(&fx.config, &runner).build("app");

            assert_eq!(runner.commands()[0], "npm install", "lock file {lock}");
        }
    }

    #[test]
    fn failed_build_leaves_no_destination() {
        let fx = Fixture::new();
        fx.project("broken", &[("package.json", "{}"), ("dist/stale.html", "old")]);
        let runner = ScriptedRunner::new().on("npm run build", Script::Fail(1));

        let outcome = ProjectBuilder::new(&fx.config, &runner).build("broken");

        match &outcome.status {
            ProjectStatus::Failed { reason } => assert!(reason.contains("npm run build")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(fx.published().is_empty());
    }

    #[test]
    fn failed_install_skips_build() {
        let fx = Fixture::new();
        fx.project("app", &[("package.json", "{}"), ("yarn.lock", "")]);
        let runner = ScriptedRunner::new().on("npm install", Script::Fail(127));

        let outcome = ProjectBuilder::new(&fx.config, &runner).build("app");

        assert!(!outcome.is_built());
        assert_eq!(runner.commands(), vec!["npm install"]);
        assert!(fx.published().is_empty());
    }

    #[test]
    fn missing_output_folder_is_a_failure() {
        let fx = Fixture::new();
        fx.project("app", &[("package.json", "{}")]);
        let runner = ScriptedRunner::new();

        let outcome = ProjectBuilder::new(&fx.config, &runner).build("app");

        assert_eq!(
            outcome.status,
            ProjectStatus::Failed {
                reason: "No dist/build/out folder found after build".to_string()
            }
        );
        assert!(fx.published().is_empty());
    }

    #[test]
    fn output_folders_are_checked_in_priority_order() {
        let fx = Fixture::new();
        fx.project(
            "app",
            &[
                ("package.json", "{}"),
                ("build/index.html", "from build"),
                ("out/index.html", "from out"),
            ],
        );
        let runner = ScriptedRunner::new();

        let outcome = ProjectBuilder::new(&fx.config, &runner).build("app");

        assert_eq!(
            outcome.status,
            ProjectStatus::Built {
                source: ArtifactSource::Output("build".to_string())
            }
        );
        assert_eq!(
            fs::read_to_string(fx.config.publish_dir.join("app/index.html")).unwrap(),
            "from build"
        );
    }

    #[test]
    fn output_file_is_not_an_output_folder() {
        let fx = Fixture::new();
        fx.project("app", &[("package.json", "{}"), ("dist", "not a dir")]);
        let runner = ScriptedRunner::new();

        let outcome = ProjectBuilder::new(&fx.config, &runner).build("app");

        assert!(!outcome.is_built());
    }

    #[cfg(unix)]
    #[test]
    fn published_dir_keeps_source_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let fx = Fixture::new();
        let dir = fx.project("plain", &[("index.html", "hi")]);
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();
        let runner = ScriptedRunner::new();

        ProjectBuilder::new(&fx.config, &runner).build("plain");

        let mode = fs::metadata(fx.config.publish_dir.join("plain"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn republish_replaces_previous_copy() {
        let fx = Fixture::new();
        let dir = fx.project("plain", &[("index.html", "v1"), ("old.html", "stale")]);
        let runner = ScriptedRunner::new();
        let builder = ProjectBuilder::new(&fx.config, &runner);

        assert!(builder.build("plain").is_built());
        fs::remove_file(dir.join("old.html")).unwrap();
        fs::write(dir.join("index.html"), "v2").unwrap();
        assert!(builder.build("plain").is_built());

        let dest = fx.config.publish_dir.join("plain");
        assert_eq!(fs::read_to_string(dest.join("index.html")).unwrap(), "v2");
        assert!(!dest.join("old.html").exists());
        assert_eq!(fx.published(), vec!["plain"]);
    }

    #[cfg(unix)]
    #[test]
    fn copy_error_on_raw_path_is_contained() {
        let fx = Fixture::new();
        let dir = fx.project("plain", &[("index.html", "hi")]);
        std::os::unix::fs::symlink(dir.join("missing-target"), dir.join("dangling")).unwrap();
        let runner = ScriptedRunner::new();

        let outcome = ProjectBuilder::new(&fx.config, &runner).build("plain");

        assert!(!outcome.is_built());
        assert!(fx.published().is_empty());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let outcome = ProjectOutcome {
            name: "app".to_string(),
            status: ProjectStatus::Failed {
                reason: "boom".to_string(),
            },
        };

        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "name": "app", "status": "failed", "reason": "boom" })
        );
    }
}
