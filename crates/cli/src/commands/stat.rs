//! stat command - Show metadata for a file or directory

use std::collections::HashMap;

use clap::Args;
use jiff::Timestamp;
use ofs_core::FsEntry;
use serde::Serialize;

use crate::commands::{ConnectArgs, open};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Show metadata for a file or directory
#[derive(Args, Debug)]
pub struct StatArgs {
    /// Path to inspect
    pub path: String,

    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Debug, Serialize)]
struct StatOutput {
    path: String,
    name: String,
    kind: &'static str,
    size_bytes: i64,
    last_modified: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    etag: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    metadata: HashMap<String, String>,
}

impl StatOutput {
    fn from_entry(entry: &FsEntry) -> Self {
        let meta = entry.meta();
        Self {
            path: entry.path().to_string(),
            name: entry.name().to_string(),
            kind: if entry.is_dir() { "directory" } else { "file" },
            size_bytes: meta.size_bytes,
            last_modified: meta.last_modified,
            content_type: meta.content_type.clone(),
            etag: meta.etag.clone(),
            metadata: meta.user.clone(),
        }
    }
}

/// Execute the stat command
pub async fn execute(args: StatArgs, output_config: OutputConfig) -> ExitCode {
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

    let output = StatOutput::from_entry(&entry);
    if formatter.is_json() {
        formatter.json(&output);
        return ExitCode::Success;
    }

    let line = |key: &str, value: &str| format!("{:<14} {value}", formatter.style_key(key));
    formatter.println(&line("Path:", &output.path));
    formatter.println(&line("Name:", &output.name));
    formatter.println(&line("Kind:", output.kind));
    formatter.println(&line(
        "Size:",
        &humansize::format_size(output.size_bytes.max(0) as u64, humansize::BINARY),
    ));
    formatter.println(&line(
        "Modified:",
        &output.last_modified.strftime("%Y-%m-%d %H:%M:%S").to_string(),
    ));
    if let Some(ct) = &output.content_type {
        formatter.println(&line("Content-Type:", ct));
    }
    if let Some(etag) = &output.etag {
        formatter.println(&line("ETag:", etag));
    }
    for (key, value) in &output.metadata {
        formatter.println(&line(&format!("Meta {key}:"), value));
    }

    ExitCode::Success
}
