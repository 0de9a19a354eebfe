//! pybake CLI
//!
//! Package build driver: revision stamping, web client staging and source
//! packaging.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// pybake - package builds with a bundled web client
#[derive(Parser)]
#[command(name = "pybake")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "pybake.yaml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the web client and stage it into the package tree
    BuildClient,

    /// Stage an existing web client build into the package tree
    CopyClient,

    /// Stamp the revision and copy package sources into the build directory
    BuildPy {
        /// Log what would happen without writing anything
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Build directory (relative paths are taken from the project root)
        #[arg(short, long)]
        build_lib: Option<String>,
    },

    /// Run the full build
    Build {
        /// Build and stage the web client first
        #[arg(long)]
        with_client: bool,

        /// Log what would happen without writing anything
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Build directory (relative paths are taken from the project root)
        #[arg(short, long)]
        build_lib: Option<String>,
    },

    /// Print the declared package version
    Version,

    /// Print the source-control revision that would be stamped
    Revision,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::BuildClient => {
            commands::client::build(&cli.config).await?;
        }
        Commands::CopyClient => {
            commands::client::copy(&cli.config).await?;
        }
        Commands::BuildPy { dry_run, build_lib } => {
            commands::build::run(&cli.config, false, dry_run, build_lib.as_deref()).await?;
        }
        Commands::Build {
            with_client,
            dry_run,
            build_lib,
        } => {
            commands::build::run(&cli.config, with_client, dry_run, build_lib.as_deref()).await?;
        }
        Commands::Version => {
            commands::info::version(&cli.config).await?;
        }
        Commands::Revision => {
            commands::info::revision(&cli.config).await?;
        }
    }

    Ok(())
}
