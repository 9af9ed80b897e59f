//! mkdir command - Create a directory path
//!
//! Works like `mkdir -p`: the bucket and the whole chain come into being.

use clap::Args;
use serde::Serialize;

use crate::commands::{ConnectArgs, open};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Create a directory path, like mkdir -p
#[derive(Args, Debug)]
pub struct MkdirArgs {
    /// Directory path to create, e.g. /bucket/dir/
    pub path: String,

    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Debug, Serialize)]
struct MkdirOutput {
    created: String,
}

/// Execute the mkdir command
pub async fn execute(args: MkdirArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let fs = match open(&args.connect, &formatter).await {
        Ok(fs) => fs,
        Err(code) => return code,
    };

    match fs.mkdirs(&args.path).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&MkdirOutput { created: args.path });
            } else {
                formatter.success(&format!("created {}", args.path));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}
