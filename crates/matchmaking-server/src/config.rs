//! Configuration for the matchmaking TCP server.
//!
//! Defaults, optionally overridden by a TOML file named in
//! `MATCHMAKING_CONFIG`, then by individual environment variables:
//!
//! - `MATCHMAKING_BIND_ADDR`         (default: "0.0.0.0")
//! - `MATCHMAKING_PORT`              (default: "9100")
//! - `MATCHMAKING_MAX_CLIENTS`       (default: "1024")
//! - `MATCHMAKING_QUEUE_TTL_SECONDS` (default: "60", must be > 0)
//! - `MATCHMAKING_ACK_POLICY`        (default: "all"; or "first")
//! - `LOG_LEVEL`                     (default: "info")

use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use matchmaking_core::{AckPolicy, QueueConfig};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },

    #[error("queue TTL must be positive")]
    ZeroTtl,

    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously connected clients.
    pub max_clients: usize,

    /// How long a player may wait unpaired before eviction.
    pub queue_ttl: Duration,

    pub ack_policy: AckPolicy,

    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

/// Shape of the optional TOML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    bind_addr: Option<String>,
    port: Option<u16>,
    max_clients: Option<usize>,
    queue_ttl_seconds: Option<u64>,
    ack_policy: Option<String>,
    log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "0.0.0.0".to_string(),
            port: 9100,
            max_clients: 1024,
            queue_ttl: Duration::from_secs(60),
            ack_policy: AckPolicy::AllPlayers,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Construct a `Config` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Construct a `Config` from any key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup("MATCHMAKING_CONFIG") {
            config.apply_file(PathBuf::from(path))?;
        }

        if let Some(addr) = lookup("MATCHMAKING_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(port) = parse_var(&lookup, "MATCHMAKING_PORT")? {
            config.port = port;
        }
        if let Some(max) = parse_var(&lookup, "MATCHMAKING_MAX_CLIENTS")? {
            config.max_clients = max;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "MATCHMAKING_QUEUE_TTL_SECONDS")? {
            config.queue_ttl = ttl_from_secs(secs)?;
        }
        if let Some(policy) = lookup("MATCHMAKING_ACK_POLICY") {
            config.ack_policy = parse_ack_policy("MATCHMAKING_ACK_POLICY", &policy)?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        Ok(config)
    }

    fn apply_file(&mut self, path: PathBuf) -> Result<(), ConfigError> {
        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile {
            path: path.clone(),
            source,
        })?;
        let file: FileConfig =
            toml::from_str(&raw).map_err(|source| ConfigError::ParseFile { path, source })?;

        if let Some(addr) = file.bind_addr {
            self.bind_addr = addr;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(max) = file.max_clients {
            self.max_clients = max;
        }
        if let Some(secs) = file.queue_ttl_seconds {
            self.queue_ttl = ttl_from_secs(secs)?;
        }
        if let Some(policy) = file.ack_policy {
            self.ack_policy = parse_ack_policy("ack_policy", &policy)?;
        }
        if let Some(level) = file.log_level {
            self.log_level = level;
        }

        Ok(())
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Engine configuration derived from this server config.
    pub fn queue_config(&self) -> QueueConfig {
        QueueConfig {
            entry_ttl: self.queue_ttl,
            ack_policy: self.ack_policy,
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            }),
        None => Ok(None),
    }
}

fn parse_ack_policy(key: &str, value: &str) -> Result<AckPolicy, ConfigError> {
    AckPolicy::parse(value).ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn ttl_from_secs(secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::ZeroTtl);
    }
    Ok(Duration::from_secs(secs))
}
