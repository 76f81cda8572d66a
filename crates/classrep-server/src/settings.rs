//! Server settings.
//!
//! Read from a TOML file and overridden by `CLASSREP_*` environment
//! variables, e.g. `CLASSREP_PORT=9000`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use classrep_api::UserCredentials;
use serde::Deserialize;

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  pub store_path: PathBuf,
  /// Accounts allowed to sign in. Each gets a profile row at startup.
  #[serde(default)]
  pub users:      Vec<UserCredentials>,
}

impl ServerConfig {
  /// Layer the optional file at `path` under the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("CLASSREP"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
