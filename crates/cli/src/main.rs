//! ofs - filesystem-style CLI for S3-compatible object storage
//!
//! Presents a bucket/key namespace as `/bucket/dir/file` paths with the
//! familiar verbs: ls, mkdir, cat, put, cp, mv, rm.

mod commands;
mod exit_code;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::Commands;
use crate::output::OutputConfig;

#[derive(Parser, Debug)]
#[command(
    name = "ofs",
    version,
    about = "Filesystem-style client for S3-compatible object storage",
    long_about = "Presents an object store's bucket/key namespace as a filesystem hierarchy: \
                  absolute /bucket/dir/file paths, directory listings, and the familiar verbs."
)]
pub struct Cli {
    /// Output strict JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress confirmations
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_config = OutputConfig {
        json: cli.json,
        quiet: cli.quiet,
        no_color: cli.no_color,
    };

    commands::execute(cli.command, output_config).await.into()
}
