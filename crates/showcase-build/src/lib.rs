//! Build pipeline for aggregating sub-projects into one static site.
//!
//! Discovers project folders under a root directory, builds each with its own
//! toolchain when it has one, and publishes the artifacts next to a generated
//! landing page.

pub mod assets;
pub mod builder;
pub mod copier;
pub mod discovery;
pub mod error;
pub mod project;
pub mod runner;
pub mod templates;

pub use builder::{BuildConfig, BuildReport, SiteBuilder};
pub use copier::{copy_tree, CopyStats};
pub use discovery::discover_projects;
pub use error::BuildError;
pub use project::{ArtifactSource, ProjectBuilder, ProjectOutcome, ProjectStatus};
pub use runner::{CommandRunner, RunError, ShellRunner};
pub use templates::{format_label, IndexPage};
