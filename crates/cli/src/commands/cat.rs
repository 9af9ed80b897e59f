//! cat command - Print a file's payload to stdout

use std::io::Write;

use clap::Args;

use crate::commands::{ConnectArgs, open};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Print a file's payload to stdout
#[derive(Args, Debug)]
pub struct CatArgs {
    /// File path to print
    pub path: String,

    #[command(flatten)]
    pub connect: ConnectArgs,
}

/// Execute the cat command
pub async fn execute(args: CatArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let fs = match open(&args.connect, &formatter).await {
        Ok(fs) => fs,
        Err(code) => return code,
    };

    let entry = match fs.get(&args.path).await {
        Ok(entry) => entry,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let Some(file) = entry.into_file() else {
        formatter.error(&format!("{}: is a directory", args.path));
        return ExitCode::UsageError;
    };

    if std::io::stdout().write_all(&file.data).is_err() {
        // broken pipe; nothing sensible left to report
        return ExitCode::GeneralError;
    }
    ExitCode::Success
}
