//! Command implementations for the `ofs` binary.
//!
//! Every command resolves a connection (profile, flags, or environment),
//! opens the facade, performs one filesystem verb, and renders the result
//! through the shared formatter.

mod cat;
mod completions;
mod cp;
mod ls;
mod mkdir;
mod mv;
mod presign;
mod profile;
mod put;
mod rm;
mod stat;

use clap::{Args, Subcommand};

use ofs_core::{Connection, Error, ObjectFs, ProfileStore, Result};
use ofs_s3::S3Client;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Where and how to connect.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectArgs {
    /// Connection profile name (see `ofs profile`)
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Endpoint URL, e.g. http://localhost:9000
    #[arg(long, env = "OFS_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Access key for the endpoint
    #[arg(long, env = "OFS_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    /// Secret key for the endpoint
    #[arg(long, env = "OFS_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Region sent to the endpoint
    #[arg(long, env = "OFS_REGION")]
    pub region: Option<String>,
}

impl ConnectArgs {
    /// Resolve to a connection: a named profile wins, then explicit
    /// endpoint/key flags (or their `OFS_*` environment fallbacks).
    pub fn connection(&self) -> Result<Connection> {
        if let Some(name) = &self.profile {
            return ProfileStore::new()?.get(name)?.into_connection();
        }
        match (&self.endpoint, &self.access_key, &self.secret_key) {
            (Some(endpoint), Some(access_key), Some(secret_key)) => {
                let mut conn = Connection::new(endpoint, access_key, secret_key)?;
                if let Some(region) = &self.region {
                    conn.region = region.clone();
                }
                Ok(conn)
            }
            _ => Err(Error::Config(
                "no connection: pass --profile, or --endpoint/--access-key/--secret-key \
                 (or set the OFS_* environment variables)"
                    .to_string(),
            )),
        }
    }
}

/// Subcommands of the `ofs` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage connection profiles
    #[command(subcommand)]
    Profile(profile::ProfileCommands),

    /// Create a directory path, like mkdir -p
    Mkdir(mkdir::MkdirArgs),

    /// List a directory
    Ls(ls::LsArgs),

    /// Show metadata for a file or directory
    Stat(stat::StatArgs),

    /// Print a file's payload to stdout
    Cat(cat::CatArgs),

    /// Upload a local file
    Put(put::PutArgs),

    /// Copy a file or, recursively, a directory
    Cp(cp::CpArgs),

    /// Move a file or, recursively, a directory
    Mv(mv::MvArgs),

    /// Remove a file or directory
    Rm(rm::RmArgs),

    /// Generate presigned URLs for direct access
    #[command(subcommand)]
    Presign(presign::PresignCommands),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Dispatch a parsed command.
pub async fn execute(command: Commands, output_config: OutputConfig) -> ExitCode {
    match command {
        Commands::Profile(cmd) => profile::execute(cmd, output_config),
        Commands::Mkdir(args) => mkdir::execute(args, output_config).await,
        Commands::Ls(args) => ls::execute(args, output_config).await,
        Commands::Stat(args) => stat::execute(args, output_config).await,
        Commands::Cat(args) => cat::execute(args, output_config).await,
        Commands::Put(args) => put::execute(args, output_config).await,
        Commands::Cp(args) => cp::execute(args, output_config).await,
        Commands::Mv(args) => mv::execute(args, output_config).await,
        Commands::Rm(args) => rm::execute(args, output_config).await,
        Commands::Presign(cmd) => presign::execute(cmd, output_config).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Resolve the connection and open the facade, reporting failures through
/// the formatter.
pub(crate) async fn open(
    connect: &ConnectArgs,
    formatter: &Formatter,
) -> std::result::Result<ObjectFs<S3Client>, ExitCode> {
    let conn = match connect.connection() {
        Ok(conn) => conn,
        Err(e) => {
            formatter.error(&e.to_string());
            return Err(ExitCode::from_error(&e));
        }
    };
    tracing::debug!(endpoint = %conn.endpoint, "connecting");
    match ofs_s3::connect(conn).await {
        Ok(fs) => Ok(fs),
        Err(e) => {
            formatter.error(&format!("failed to connect: {e}"));
            Err(ExitCode::from_error(&e))
        }
    }
}
