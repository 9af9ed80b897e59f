//! rm command - Remove a file or directory
//!
//! Non-empty directories need --recursive, like `rm -r`.

use clap::Args;
use serde::Serialize;

use crate::commands::{ConnectArgs, open};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Remove a file or directory
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Path to remove
    pub path: String,

    /// Remove directory contents recursively
    #[arg(short, long)]
    pub recursive: bool,

    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Debug, Serialize)]
struct RmOutput {
    removed: String,
    recursive: bool,
}

/// Execute the rm command
pub async fn execute(args: RmArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let fs = match open(&args.connect, &formatter).await {
        Ok(fs) => fs,
        Err(code) => return code,
    };

    match fs.rm(&args.path, args.recursive).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&RmOutput {
                    removed: args.path,
                    recursive: args.recursive,
                });
            } else {
                formatter.success(&format!("removed {}", args.path));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}
