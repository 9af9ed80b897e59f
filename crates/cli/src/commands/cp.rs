//! cp command - Copy a file or directory
//!
//! Server-side copies; directories require --recursive, like `cp -r`.

use clap::Args;
use serde::Serialize;

use crate::commands::{ConnectArgs, open};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Copy a file or, recursively, a directory
#[derive(Args, Debug)]
pub struct CpArgs {
    /// Source path
    pub from: String,

    /// Destination path (a directory keeps the source name)
    pub to: String,

    /// Copy directory contents recursively
    #[arg(short, long)]
    pub recursive: bool,

    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Debug, Serialize)]
struct CpOutput {
    from: String,
    to: String,
    recursive: bool,
}

/// Execute the cp command
pub async fn execute(args: CpArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let fs = match open(&args.connect, &formatter).await {
        Ok(fs) => fs,
        Err(code) => return code,
    };

    match fs.cp(&args.from, &args.to, args.recursive).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&CpOutput {
                    from: args.from,
                    to: args.to,
                    recursive: args.recursive,
                });
            } else {
                formatter.success(&format!("copied {} -> {}", args.from, args.to));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}
