//! put command - Upload a local file
//!
//! A directory destination keeps the local file name; metadata pairs ride
//! along as user metadata.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::commands::{ConnectArgs, open};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Upload a local file
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Local file to upload
    pub file: PathBuf,

    /// Destination path (a directory keeps the local file name)
    pub path: String,

    /// Metadata pair to attach, key=value (repeatable)
    #[arg(short, long = "metadata", value_name = "KEY=VALUE")]
    pub metadata: Vec<String>,

    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Debug, Serialize)]
struct PutOutput {
    file: String,
    path: String,
}

/// Execute the put command
pub async fn execute(args: PutArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let metadata = match parse_metadata(&args.metadata) {
        Ok(metadata) => metadata,
        Err(e) => {
            formatter.error(&e);
            return ExitCode::UsageError;
        }
    };

    let fs = match open(&args.connect, &formatter).await {
        Ok(fs) => fs,
        Err(code) => return code,
    };

    match fs.put_file(&args.file, &args.path, Some(metadata)).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&PutOutput {
                    file: args.file.display().to_string(),
                    path: args.path,
                });
            } else {
                formatter.success(&format!(
                    "uploaded {} -> {}",
                    args.file.display(),
                    args.path
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}

fn parse_metadata(pairs: &[String]) -> Result<HashMap<String, String>, String> {
    let mut metadata = HashMap::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(format!("invalid metadata '{pair}': expected key=value"));
        };
        if key.is_empty() {
            return Err(format!("invalid metadata '{pair}': empty key"));
        }
        metadata.insert(key.to_string(), value.to_string());
    }
    Ok(metadata)
}
