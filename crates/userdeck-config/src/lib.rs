//! Shared configuration for the userdeck CLI.
//!
//! TOML profiles merged with environment overrides, and translation to
//! `userdeck_core::DirectoryConfig`. The CLI adds flag-aware wrappers
//! on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use userdeck_core::{DEFAULT_ENDPOINT, DirectoryConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{name}' (available: {available})")]
    UnknownProfile { name: String, available: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named directory profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        // Ship a usable "default" profile so the CLI works with no
        // config file at all.
        let mut profiles = HashMap::new();
        profiles.insert("default".to_owned(), Profile::default());

        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Zero disables passive reconnection.
    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            probe_timeout_ms: default_probe_timeout_ms(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            reconnect_interval_ms: default_reconnect_interval_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_probe_timeout_ms() -> u64 {
    5_000
}
fn default_fetch_timeout_ms() -> u64 {
    10_000
}
fn default_reconnect_interval_ms() -> u64 {
    30_000
}

/// A named directory profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Endpoint serving a JSON array of user records.
    pub endpoint: String,

    /// Override the probe deadline for this profile.
    pub probe_timeout_ms: Option<u64>,

    /// Override the fetch deadline for this profile.
    pub fetch_timeout_ms: Option<u64>,

    /// Override the passive reconnection cadence for this profile.
    pub reconnect_interval_ms: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            probe_timeout_ms: None,
            fetch_timeout_ms: None,
            reconnect_interval_ms: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "userdeck", "userdeck").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("userdeck");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from an explicit file + environment.
///
/// Environment keys use a double underscore as the section separator,
/// e.g. `USERDECK_DEFAULTS__FETCH_TIMEOUT_MS=2000`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("USERDECK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write to an explicit path.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

/// Pick a profile by explicit name, falling back to `default_profile`.
pub fn resolve_profile<'a>(
    config: &'a Config,
    name: Option<&str>,
) -> Result<(&'a str, &'a Profile), ConfigError> {
    let name = name
        .or(config.default_profile.as_deref())
        .unwrap_or("default");

    match config.profiles.get_key_value(name) {
        Some((key, profile)) => Ok((key.as_str(), profile)),
        None => {
            let mut available: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            Err(ConfigError::UnknownProfile {
                name: name.into(),
                available: available.join(", "),
            })
        }
    }
}

/// Build a `DirectoryConfig` from a profile, filling gaps from defaults.
pub fn profile_to_directory_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<DirectoryConfig, ConfigError> {
    let endpoint: url::Url = profile
        .endpoint
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("invalid URL: {}", profile.endpoint),
        })?;

    let probe_timeout_ms = profile.probe_timeout_ms.unwrap_or(defaults.probe_timeout_ms);
    let fetch_timeout_ms = profile.fetch_timeout_ms.unwrap_or(defaults.fetch_timeout_ms);
    if probe_timeout_ms == 0 {
        return Err(ConfigError::Validation {
            field: "probe_timeout_ms".into(),
            reason: "must be greater than zero".into(),
        });
    }
    if fetch_timeout_ms == 0 {
        return Err(ConfigError::Validation {
            field: "fetch_timeout_ms".into(),
            reason: "must be greater than zero".into(),
        });
    }

    let reconnect_interval_ms = profile
        .reconnect_interval_ms
        .unwrap_or(defaults.reconnect_interval_ms);

    Ok(DirectoryConfig {
        endpoint,
        probe_timeout: Duration::from_millis(probe_timeout_ms),
        fetch_timeout: Duration::from_millis(fetch_timeout_ms),
        reconnect_interval: Duration::from_millis(reconnect_interval_ms),
        ..DirectoryConfig::default()
    })
}
