//! mv command - Move a file or directory
//!
//! Copy-then-remove; the source survives any failed copy.

use clap::Args;
use serde::Serialize;

use crate::commands::{ConnectArgs, open};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Move a file or, recursively, a directory
#[derive(Args, Debug)]
pub struct MvArgs {
    /// Source path
    pub from: String,

    /// Destination path (a directory keeps the source name)
    pub to: String,

    /// Move directory contents recursively
    #[arg(short, long)]
    pub recursive: bool,

    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Debug, Serialize)]
struct MvOutput {
    from: String,
    to: String,
    recursive: bool,
}

/// Execute the mv command
pub async fn execute(args: MvArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let fs = match open(&args.connect, &formatter).await {
        Ok(fs) => fs,
        Err(code) => return code,
    };

    match fs.mv(&args.from, &args.to, args.recursive).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&MvOutput {
                    from: args.from,
                    to: args.to,
                    recursive: args.recursive,
                });
            } else {
                formatter.success(&format!("moved {} -> {}", args.from, args.to));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}
