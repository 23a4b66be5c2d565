//! Showcase CLI - builds every project in a directory into one static site.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "showcase")]
#[command(about = "Build every project in a directory into one static site")]
#[command(version)]
pub struct Cli {
    /// Defaults to `build`
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory containing the projects
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Path to config file, relative to the root
    #[arg(short, long, default_value = "showcase.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build all projects and write the publish directory
    Build {
        /// Publish directory (defaults to config or "public")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a JSON build report to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Minify the index page stylesheet
        #[arg(long)]
        minify: bool,
    },

    /// Preview the publish directory
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to the publish directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Create a new project from the template directory
    New {
        /// Project directory name, e.g. "weather-app"
        name: String,

        /// Replace an existing project, deleting its current files
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let config_path = cli.root.join(&cli.config);

    // Execute command
    match cli.command.unwrap_or(Commands::Build {
        output: None,
        report: None,
        minify: false,
    }) {
        Commands::Build {
            output,
            report,
            minify,
        } => {
            commands::build::run(cli.root, &config_path, output, report, minify).await?;
        }
        Commands::Serve { port, dir, no_open } => {
            commands::serve::run(&cli.root, &config_path, port, dir, !no_open).await?;
        }
        Commands::New { name, yes } => {
            commands::new::run(&cli.root, &config_path, &name, yes).await?;
        }
    }

    Ok(())
}
