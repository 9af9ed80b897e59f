//! profile command - Manage connection profiles
//!
//! Profiles live in a TOML file under the user config directory
//! (`OFS_CONFIG_DIR` overrides the location). Secret keys are stored but
//! never printed.

use clap::{Args, Subcommand};
use serde::Serialize;

use ofs_core::{Profile, ProfileStore};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Add or update a profile
    Set(SetArgs),

    /// List profiles
    List,

    /// Remove a profile
    Remove(NameArg),
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Profile name
    pub name: String,

    /// Endpoint URL, e.g. http://localhost:9000
    pub endpoint: String,

    /// Access key
    pub access_key: String,

    /// Secret key
    pub secret_key: String,

    /// Region sent to the endpoint
    #[arg(long, default_value = ofs_core::config::DEFAULT_REGION)]
    pub region: String,

    /// Use virtual-host-style bucket addressing instead of path-style
    #[arg(long)]
    pub virtual_host_style: bool,
}

#[derive(Args, Debug)]
pub struct NameArg {
    /// Profile name
    pub name: String,
}

#[derive(Debug, Serialize)]
struct ProfileView {
    name: String,
    endpoint: String,
    region: String,
    access_key: String,
    path_style: bool,
}

#[derive(Debug, Serialize)]
struct ProfileListOutput {
    profiles: Vec<ProfileView>,
}

/// Execute a profile subcommand
pub fn execute(cmd: ProfileCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let store = match ProfileStore::new() {
        Ok(store) => store,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::ConfigError;
        }
    };

    match cmd {
        ProfileCommands::Set(args) => execute_set(args, &store, &formatter),
        ProfileCommands::List => execute_list(&store, &formatter),
        ProfileCommands::Remove(args) => execute_remove(args, &store, &formatter),
    }
}

fn execute_set(args: SetArgs, store: &ProfileStore, formatter: &Formatter) -> ExitCode {
    let profile = Profile {
        endpoint: args.endpoint,
        region: args.region,
        access_key: args.access_key,
        secret_key: args.secret_key,
        path_style: !args.virtual_host_style,
    };
    match store.set(&args.name, profile) {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&serde_json::json!({ "saved": args.name }));
            } else {
                formatter.success(&format!("saved profile {}", args.name));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}

fn execute_list(store: &ProfileStore, formatter: &Formatter) -> ExitCode {
    let profiles = match store.list() {
        Ok(profiles) => profiles,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let views: Vec<ProfileView> = profiles
        .into_iter()
        .map(|(name, profile)| ProfileView {
            name,
            endpoint: profile.endpoint,
            region: profile.region,
            access_key: profile.access_key,
            path_style: profile.path_style,
        })
        .collect();

    if formatter.is_json() {
        formatter.json(&ProfileListOutput { profiles: views });
    } else if views.is_empty() {
        formatter.println("no profiles defined");
    } else {
        for view in &views {
            formatter.println(&format!(
                "{:<16} {} ({})",
                formatter.style_name(&view.name),
                view.endpoint,
                view.region
            ));
        }
    }
    ExitCode::Success
}

fn execute_remove(args: NameArg, store: &ProfileStore, formatter: &Formatter) -> ExitCode {
    match store.remove(&args.name) {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&serde_json::json!({ "removed": args.name }));
            } else {
                formatter.success(&format!("removed profile {}", args.name));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}
