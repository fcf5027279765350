//! CLI configuration: thin wrapper around `gridcensus_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--profile, --url, --timeout).

use std::time::Duration;

use gridcensus_core::ConnectionSettings;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use gridcensus_config::{
    Config, Profile, config_path, load_config, load_config_or_default, parse_url, save_config,
    store_password,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Comma-separated profile names, for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Build `ConnectionSettings` from config file, profile, and CLI flags.
///
/// Flags take priority over the profile; the built-in default profile
/// applies when nothing is configured.
pub fn resolve_settings(global: &GlobalOpts) -> Result<ConnectionSettings, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    // An explicit --url works even without a matching profile.
    let profile = match cfg.profile(&profile_name) {
        Ok(profile) => profile,
        Err(_) if global.url.is_some() => Profile::default(),
        Err(_) => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
    };

    let mut settings =
        gridcensus_config::profile_to_connection_settings(&profile, &profile_name, &cfg.defaults)?;

    // 1. URL (flag > env > profile)
    if let Some(ref raw) = global.url {
        settings.url = parse_url(raw)?;
    }

    // 2. Timeout (flag > env > profile > defaults)
    if let Some(secs) = global.timeout {
        settings.timeout = Duration::from_secs(secs);
    }

    tracing::debug!(
        profile = %profile_name,
        url = %settings.url,
        timeout = ?settings.timeout,
        bind = settings.bind.is_some(),
        "resolved connection settings"
    );
    Ok(settings)
}
