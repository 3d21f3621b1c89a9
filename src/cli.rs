// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "slipway")]
#[command(about = "Build, push and deploy container modules, then mail a release report")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: slipway.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output (for CI)
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Output as JSON lines
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new slipway.yml configuration file
    Init {
        /// Overwrite existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Release changed modules under the next tag
    Deploy,

    /// Rebuild and redeploy every module under the current tag
    Build,

    /// Show the current release tag and changed modules
    Status,
}
