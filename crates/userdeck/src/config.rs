//! Thin wrapper over `userdeck-config` that folds CLI flags into the
//! resolved profile.

pub use userdeck_config::{
    Config, Profile, config_path, load_config_or_default, save_config,
};
use userdeck_core::DirectoryConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Name of the profile the CLI is operating on, before any lookup.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".to_string())
}

/// Resolve the effective directory configuration: file and environment
/// first, then command-line overrides on top.
pub fn resolve_directory_config(global: &GlobalOpts) -> Result<DirectoryConfig, CliError> {
    let config = load_config_or_default();
    let (_, profile) = userdeck_config::resolve_profile(&config, global.profile.as_deref())?;
    let mut profile = profile.clone();

    if let Some(endpoint) = &global.endpoint {
        profile.endpoint = endpoint.clone();
    }
    if let Some(ms) = global.probe_timeout_ms {
        profile.probe_timeout_ms = Some(ms);
    }
    if let Some(ms) = global.fetch_timeout_ms {
        profile.fetch_timeout_ms = Some(ms);
    }
    if let Some(ms) = global.reconnect_interval_ms {
        profile.reconnect_interval_ms = Some(ms);
    }

    Ok(userdeck_config::profile_to_directory_config(
        &profile,
        &config.defaults,
    )?)
}
