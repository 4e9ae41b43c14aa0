//! Runtime configuration.
//!
//! Every field has a default so an empty (or absent) config file is valid. The
//! binary loads the file first and then applies command-line overrides.

use crate::queue::types::UnknownActionPolicy;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Failed replays allowed before an action is dropped.
pub const MAX_RETRIES: u32 = 3;

/// At or above this zoom level points render individually.
pub const CLUSTER_ZOOM_THRESHOLD: f64 = 14.0;

/// At or above this zoom level individual markers use the detailed icon.
pub const PIN_DETAIL_ZOOM: f64 = 15.0;

/// Grid cell edge in degrees.
pub const DEFAULT_GRID_SIZE: f64 = 0.005;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QueueConfig {
    pub max_retries: u32,
    pub unknown_action_policy: UnknownActionPolicy,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            unknown_action_policy: UnknownActionPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClusterConfig {
    pub zoom_threshold: f64,
    pub pin_detail_zoom: f64,
    pub grid_size: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            zoom_threshold: CLUSTER_ZOOM_THRESHOLD,
            pin_detail_zoom: PIN_DETAIL_ZOOM,
            grid_size: DEFAULT_GRID_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the hosted backend, without the `/rest/v1` suffix.
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:54321".to_string(),
            api_key: String::new(),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub store_path: PathBuf,
    /// Whether the device is considered online at startup.
    pub start_online: bool,
    pub queue: QueueConfig,
    pub clustering: ClusterConfig,
    pub remote: RemoteConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 7070)),
            store_path: PathBuf::from("data/pending_actions.json"),
            start_online: true,
            queue: QueueConfig::default(),
            clustering: ClusterConfig::default(),
            remote: RemoteConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config file at `path`, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue.max_retries == 0 {
            return Err(anyhow::anyhow!("queue.max_retries must be at least 1"));
        }
        let grid = self.clustering.grid_size;
        if !grid.is_finite() || grid <= 0.0 {
            return Err(anyhow::anyhow!(
                "clustering.grid_size must be a positive number, got {}",
                grid
            ));
        }
        Ok(())
    }
}

/// Command-line overrides applied on top of the loaded config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub help: bool,
    pub config_path: Option<PathBuf>,
    pub bind: Option<SocketAddr>,
    pub store_path: Option<PathBuf>,
    pub remote_url: Option<String>,
    pub api_key: Option<String>,
    pub offline: bool,
    pub verbose: bool,
}

pub const USAGE: &str = "[--config <file>] [--bind <addr:port>] [--store <file>] \
[--remote <url>] [--api-key <key>] [--offline] [--verbose] [--help]";

impl CliOverrides {
    /// Parses `args` without the program name. A value flag with no value, an
    /// unparsable address or an unknown flag is an error.
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut overrides = Self::default();
        let mut args = args.iter();

        while let Some(arg) = args.next() {
            let mut value = || {
                args.next()
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("Missing value for {}", arg))
            };
            match arg.as_str() {
                "--help" | "-h" => overrides.help = true,
                "--config" => overrides.config_path = Some(PathBuf::from(value()?)),
                "--bind" => {
                    let raw = value()?;
                    overrides.bind = Some(
                        raw.parse()
                            .with_context(|| format!("Invalid --bind address {}", raw))?,
                    );
                }
                "--store" => overrides.store_path = Some(PathBuf::from(value()?)),
                "--remote" => overrides.remote_url = Some(value()?),
                "--api-key" => overrides.api_key = Some(value()?),
                "--offline" => overrides.offline = true,
                "--verbose" => overrides.verbose = true,
                other => return Err(anyhow::anyhow!("Unknown argument {}", other)),
            }
        }

        Ok(overrides)
    }

    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(store_path) = &self.store_path {
            config.store_path = store_path.clone();
        }
        if let Some(remote_url) = &self.remote_url {
            config.remote.base_url = remote_url.clone();
        }
        if let Some(api_key) = &self.api_key {
            config.remote.api_key = api_key.clone();
        }
        if self.offline {
            config.start_online = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_json("{}").unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.queue.max_retries, 3);
        assert_eq!(config.clustering.zoom_threshold, 14.0);
        assert_eq!(config.clustering.grid_size, 0.005);
    }

    #[test]
    fn test_partial_sections_merge_with_defaults() {
        let config = AppConfig::from_json(
            r#"{
                "queue": { "unknown_action_policy": "retain" },
                "clustering": { "grid_size": 0.01 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.queue.max_retries, MAX_RETRIES);
        assert_eq!(config.queue.unknown_action_policy, UnknownActionPolicy::Retain);
        assert_eq!(config.clustering.grid_size, 0.01);
        assert_eq!(config.clustering.pin_detail_zoom, PIN_DETAIL_ZOOM);
    }

    #[test]
    fn test_rejects_zero_retries() {
        let result = AppConfig::from_json(r#"{ "queue": { "max_retries": 0 } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_positive_grid() {
        let result = AppConfig::from_json(r#"{ "clustering": { "grid_size": -1.0 } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("missing-{}.json", uuid::Uuid::new_v4()));
        assert!(AppConfig::load(Some(&path)).is_err());
        assert!(AppConfig::load(None).is_ok());
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cli_overrides_apply_on_top_of_file() {
        let overrides = CliOverrides::parse(&args(&[
            "--bind",
            "0.0.0.0:8080",
            "--store",
            "/tmp/q.json",
            "--remote",
            "https://backend.example",
            "--offline",
        ]))
        .unwrap();
        let mut config = AppConfig::default();

        overrides.apply(&mut config);

        assert_eq!(config.bind, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.store_path, PathBuf::from("/tmp/q.json"));
        assert_eq!(config.remote.base_url, "https://backend.example");
        assert!(!config.start_online);
        assert_eq!(config.remote.api_key, RemoteConfig::default().api_key);
    }

    #[test]
    fn test_cli_value_flag_without_value_is_an_error() {
        for flag in ["--bind", "--store", "--remote", "--api-key", "--config"] {
            let result = CliOverrides::parse(&args(&["--verbose", flag]));
            assert!(result.is_err(), "{} accepted without a value", flag);
            assert!(result.unwrap_err().to_string().contains(flag));
        }
    }

    #[test]
    fn test_cli_rejects_bad_address_and_unknown_flags() {
        assert!(CliOverrides::parse(&args(&["--bind", "not-an-addr"])).is_err());
        assert!(CliOverrides::parse(&args(&["--bnid", "127.0.0.1:1"])).is_err());
    }

    #[test]
    fn test_cli_help_flag() {
        assert!(CliOverrides::parse(&args(&["-h"])).unwrap().help);
        assert!(CliOverrides::parse(&args(&["--help"])).unwrap().help);
        assert!(!CliOverrides::parse(&[]).unwrap().help);
    }
}
