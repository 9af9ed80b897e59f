//! presign command - Generate presigned URLs
//!
//! Time-limited URLs for downloading or uploading a file without
//! credentials.

use std::time::Duration;

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::commands::{ConnectArgs, open};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

// MinIO's default presigned-URL lifetime
const DEFAULT_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;

/// Presign subcommands
#[derive(Subcommand, Debug)]
pub enum PresignCommands {
    /// URL for downloading a file
    Get(PresignArgs),

    /// URL for uploading a file
    Put(PresignArgs),
}

#[derive(Args, Debug)]
pub struct PresignArgs {
    /// File path the URL refers to
    pub path: String,

    /// URL lifetime in seconds
    #[arg(long, default_value_t = DEFAULT_EXPIRY_SECS)]
    pub expiry: u64,

    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Debug, Serialize)]
struct PresignOutput {
    path: String,
    url: String,
    expiry_secs: u64,
}

/// Execute a presign subcommand
pub async fn execute(cmd: PresignCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let (args, upload) = match cmd {
        PresignCommands::Get(args) => (args, false),
        PresignCommands::Put(args) => (args, true),
    };

    let fs = match open(&args.connect, &formatter).await {
        Ok(fs) => fs,
        Err(code) => return code,
    };

    let expires_in = Duration::from_secs(args.expiry);
    let result = if upload {
        fs.presigned_put_url(&args.path, expires_in).await
    } else {
        fs.presigned_get_url(&args.path, expires_in).await
    };

    match result {
        Ok(url) => {
            if formatter.is_json() {
                formatter.json(&PresignOutput {
                    path: args.path,
                    url,
                    expiry_secs: args.expiry,
                });
            } else {
                formatter.println(&url);
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}
