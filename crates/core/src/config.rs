//! Connection settings and named profiles.
//!
//! A [`Connection`] is everything needed to reach one S3-compatible endpoint.
//! Profiles persist connections as TOML under the user config directory so
//! the CLI can refer to servers by name.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_REGION: &str = "us-east-1";

/// Backoff settings for transient store failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10_000,
        }
    }
}

/// How to reach one object-storage endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    /// Path-style bucket addressing; MinIO deployments generally need it.
    pub path_style: bool,
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Connection {
    pub fn new(
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        validate_endpoint(&endpoint)?;
        Ok(Self {
            endpoint,
            region: DEFAULT_REGION.to_string(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            path_style: true,
            retry: RetryConfig::default(),
        })
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Build a connection from `OFS_ENDPOINT`, `OFS_ACCESS_KEY`,
    /// `OFS_SECRET_KEY`, and optionally `OFS_REGION`.
    pub fn from_env() -> Result<Self> {
        let endpoint = require_env("OFS_ENDPOINT")?;
        let access_key = require_env("OFS_ACCESS_KEY")?;
        let secret_key = require_env("OFS_SECRET_KEY")?;
        let mut conn = Self::new(endpoint, access_key, secret_key)?;
        if let Ok(region) = env::var("OFS_REGION") {
            conn.region = region;
        }
        Ok(conn)
    }
}

fn require_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("{name} is not set")))
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = url::Url::parse(endpoint)
        .map_err(|e| Error::Config(format!("invalid endpoint '{endpoint}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::Config(format!(
            "invalid endpoint '{endpoint}': unsupported scheme '{other}'"
        ))),
    }
}

/// A stored connection profile. Retry tuning is per-process and is not
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub endpoint: String,
    #[serde(default = "default_region")]
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    #[serde(default = "default_path_style")]
    pub path_style: bool,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_path_style() -> bool {
    true
}

impl Profile {
    pub fn into_connection(self) -> Result<Connection> {
        validate_endpoint(&self.endpoint)?;
        Ok(Connection {
            endpoint: self.endpoint,
            region: self.region,
            access_key: self.access_key,
            secret_key: self.secret_key,
            path_style: self.path_style,
            retry: RetryConfig::default(),
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    profiles: BTreeMap<String, Profile>,
}

/// Named profiles persisted as TOML.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Store under `$OFS_CONFIG_DIR`, falling back to the platform config
    /// directory.
    pub fn new() -> Result<Self> {
        let dir = match env::var("OFS_CONFIG_DIR") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::config_dir()
                .ok_or_else(|| {
                    Error::Config("cannot determine the user config directory".to_string())
                })?
                .join("ofs"),
        };
        Ok(Self {
            path: dir.join("profiles.toml"),
        })
    }

    /// Store backed by an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn list(&self) -> Result<Vec<(String, Profile)>> {
        Ok(self.load()?.profiles.into_iter().collect())
    }

    pub fn get(&self, name: &str) -> Result<Profile> {
        self.load()?
            .profiles
            .remove(name)
            .ok_or_else(|| Error::Config(format!("profile '{name}' is not defined")))
    }

    pub fn set(&self, name: &str, profile: Profile) -> Result<()> {
        validate_endpoint(&profile.endpoint)?;
        let mut file = self.load()?;
        file.profiles.insert(name.to_string(), profile);
        self.save(&file)
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        let mut file = self.load()?;
        if file.profiles.remove(name).is_none() {
            return Err(Error::Config(format!("profile '{name}' is not defined")));
        }
        self.save(&file)
    }

    fn load(&self) -> Result<ProfileFile> {
        if !self.path.exists() {
            return Ok(ProfileFile::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        toml::from_str(&raw).map_err(|e| {
            Error::Config(format!("malformed profile file {}: {e}", self.path.display()))
        })
    }

    fn save(&self, file: &ProfileFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(file)
            .map_err(|e| Error::Config(format!("cannot serialize profiles: {e}")))?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}
