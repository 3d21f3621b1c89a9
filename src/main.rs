// ABOUTME: Entry point for the slipway CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::Flow;
use slipway::config::{self, Config};
use slipway::output::{Output, OutputMode};
use slipway::pipeline::RunError;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        tracing::error!(kind = ?e.kind(), error = ?e, "run aborted");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), RunError> {
    let output_mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let output = Output::new(output_mode);
    let cwd = env::current_dir().map_err(slipway::error::Error::from)?;

    match cli.command {
        Commands::Init { force } => {
            config::init_config(&cwd, force)?;
            output.success("Created slipway.yml");
            Ok(())
        }
        Commands::Deploy => {
            let (config, root) = load_config(cli.config, cwd)?;
            commands::release(config, &root, Flow::Changed, output).await
        }
        Commands::Build => {
            let (config, root) = load_config(cli.config, cwd)?;
            commands::release(config, &root, Flow::Full, output).await
        }
        Commands::Status => {
            let (config, root) = load_config(cli.config, cwd)?;
            commands::status(config, &root).await
        }
    }
}

/// Load the config and pick the project root it describes.
///
/// An explicit `--config` path makes its directory the project root.
fn load_config(path: Option<PathBuf>, cwd: PathBuf) -> Result<(Config, PathBuf), RunError> {
    match path {
        Some(path) => {
            let config = Config::load(&path)?;
            let root = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => cwd.join(parent),
                _ => cwd,
            };
            Ok((config, root))
        }
        None => Ok((Config::discover(&cwd)?, cwd)),
    }
}
