//! ls command - List a directory
//!
//! Short form prints names; --long adds size and modification time.

use clap::Args;
use comfy_table::{Table, presets};
use ofs_core::DirEntry;
use serde::Serialize;

use crate::commands::{ConnectArgs, open};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// List a directory
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Directory to list; the root lists buckets
    #[arg(default_value = "/")]
    pub path: String,

    /// Long listing with size and modification time
    #[arg(short, long)]
    pub long: bool,

    /// List only files
    #[arg(long, conflicts_with = "dirs_only")]
    pub files_only: bool,

    /// List only directories
    #[arg(long)]
    pub dirs_only: bool,

    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Debug, Serialize)]
struct LsOutput {
    path: String,
    entries: Vec<DirEntry>,
}

/// Execute the ls command
pub async fn execute(args: LsArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let fs = match open(&args.connect, &formatter).await {
        Ok(fs) => fs,
        Err(code) => return code,
    };

    let mut entries = match fs.read_dir(&args.path).await {
        Ok(entries) => entries,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };
    if args.files_only {
        entries.retain(|entry| !entry.is_dir);
    } else if args.dirs_only {
        entries.retain(|entry| entry.is_dir);
    }

    if formatter.is_json() {
        formatter.json(&LsOutput {
            path: args.path,
            entries,
        });
    } else if args.long {
        formatter.println(&render_long(&entries, &formatter));
    } else {
        for entry in &entries {
            let name = if entry.is_dir {
                formatter.style_dir(&entry.name)
            } else {
                formatter.style_file(&entry.name)
            };
            formatter.println(&name);
        }
    }

    ExitCode::Success
}

fn render_long(entries: &[DirEntry], formatter: &Formatter) -> String {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(vec!["NAME", "SIZE", "MODIFIED"]);

    for entry in entries {
        let name = if entry.is_dir {
            formatter.style_dir(&entry.name)
        } else {
            formatter.style_file(&entry.name)
        };
        let size = entry
            .size_bytes
            .map(|s| formatter.style_size(&humansize::format_size(s.max(0) as u64, humansize::BINARY)))
            .unwrap_or_default();
        let modified = entry
            .last_modified
            .map(|ts| formatter.style_date(&ts.strftime("%Y-%m-%d %H:%M").to_string()))
            .unwrap_or_default();
        table.add_row(vec![name, size, modified]);
    }

    table.to_string()
}
