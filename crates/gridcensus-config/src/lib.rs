//! Shared configuration for gridcensus.
//!
//! TOML profiles, bind-password resolution (env + keyring + plaintext),
//! and translation to `gridcensus_api::ConnectionSettings`. The CLI adds
//! flag-aware overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gridcensus_api::{ConnectionSettings, SimpleBind};

/// Top-level BDII queried when no profile is configured.
pub const DEFAULT_URL: &str = "ldap://egee-bdii.cnaf.infn.it:2170";

/// Keyring service name; entries are `<profile>/password`.
const KEYRING_SERVICE: &str = "gridcensus";

/// Overrides the config file location (used by tests and packaging).
pub const CONFIG_PATH_ENV: &str = "GRIDCENSUS_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' has a bind DN but no password")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

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
    /// Default profile name.
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
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when none is given on the command line.
    pub fn active_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    /// Look up `name`, falling back to the built-in profile for the
    /// implicit "default" when the file does not define it.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        if let Some(profile) = self.profiles.get(name) {
            return Ok(profile.clone());
        }
        if name == "default" {
            return Ok(Profile::default());
        }
        Err(ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named directory profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Directory URL (e.g., "ldap://bdii.example.org:2170").
    pub url: String,

    /// GLUE 2.0 search base.
    #[serde(default = "default_glue2_base")]
    pub glue2_base: String,

    /// GLUE 1.3 search base.
    #[serde(default = "default_glue1_base")]
    pub glue1_base: String,

    /// Bind DN. Anonymous when unset.
    pub bind_dn: Option<String>,

    /// Bind password (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the bind password.
    pub password_env: Option<String>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.into(),
            glue2_base: default_glue2_base(),
            glue1_base: default_glue1_base(),
            bind_dn: None,
            password: None,
            password_env: None,
            timeout: None,
        }
    }
}

fn default_glue2_base() -> String {
    gridcensus_api::ldap::DEFAULT_GLUE2_BASE.into()
}
fn default_glue1_base() -> String {
    gridcensus_api::ldap::DEFAULT_GLUE1_BASE.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `$GRIDCENSUS_CONFIG`, else the
/// platform config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("org", "gridcensus", "gridcensus").map_or_else(
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
    p.push("gridcensus");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file: defaults ← TOML ← `GRIDCENSUS_*` env.
///
/// Env keys nest on double underscores, e.g.
/// `GRIDCENSUS_DEFAULTS__TIMEOUT=60`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(
            Env::prefixed("GRIDCENSUS_")
                .ignore(&["CONFIG"])
                .split("__"),
        );

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/password"),
    )?)
}

/// Store a bind password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

/// Resolve the bind password: `password_env` → keyring → plaintext.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Bind credentials for a profile; `None` means anonymous.
pub fn resolve_bind(profile: &Profile, profile_name: &str) -> Result<Option<SimpleBind>, ConfigError> {
    let Some(ref dn) = profile.bind_dn else {
        return Ok(None);
    };
    let password = resolve_password(profile, profile_name)?;
    Ok(Some(SimpleBind {
        dn: dn.clone(),
        password,
    }))
}

/// Parse and check a directory URL.
pub fn parse_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    match url.scheme() {
        "ldap" | "ldaps" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "url".into(),
            reason: format!("expected ldap:// or ldaps://, got {other}://"),
        }),
    }
}

/// Build `ConnectionSettings` from a profile, no CLI overrides.
pub fn profile_to_connection_settings(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ConnectionSettings, ConfigError> {
    let url = parse_url(&profile.url)?;
    let bind = resolve_bind(profile, profile_name)?;
    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(ConnectionSettings {
        url,
        glue2_base: profile.glue2_base.clone(),
        glue1_base: profile.glue1_base.clone(),
        bind,
        timeout,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn write(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.active_profile_name(), "default");
        assert_eq!(cfg.defaults.timeout, 30);
        assert_eq!(cfg.profile("default").unwrap().url, DEFAULT_URL);
    }

    #[test]
    fn profiles_parse_with_base_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            r#"
default_profile = "cern"

[profiles.cern]
url = "ldap://lcg-bdii.cern.ch:2170"
timeout = 10
"#,
        );
        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.active_profile_name(), "cern");

        let profile = cfg.profile("cern").unwrap();
        assert_eq!(profile.glue2_base, "GLUE2GroupID=grid,o=glue");
        assert_eq!(profile.glue1_base, "Mds-Vo-name=local,o=grid");

        let settings = profile_to_connection_settings(&profile, "cern", &cfg.defaults).unwrap();
        assert_eq!(settings.url.as_str(), "ldap://lcg-bdii.cern.ch:2170");
        assert_eq!(settings.timeout, Duration::from_secs(10));
        assert!(settings.bind.is_none());
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.profile("nope"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn non_ldap_url_rejected() {
        assert!(parse_url("https://bdii.example.org").is_err());
        assert!(parse_url("not a url").is_err());
        assert!(parse_url("ldaps://bdii.example.org:2170").is_ok());
    }

    #[test]
    fn plaintext_password_is_last_resort() {
        let profile = Profile {
            bind_dn: Some("cn=reader,o=grid".into()),
            password: Some("hunter2".into()),
            ..Profile::default()
        };
        let bind = resolve_bind(&profile, "gridcensus-test-no-such-profile")
            .unwrap()
            .unwrap();
        assert_eq!(bind.dn, "cn=reader,o=grid");
        assert_eq!(bind.password.expose_secret(), "hunter2");
    }

    #[test]
    fn bind_dn_without_password_fails() {
        let profile = Profile {
            bind_dn: Some("cn=reader,o=grid".into()),
            ..Profile::default()
        };
        assert!(matches!(
            resolve_bind(&profile, "gridcensus-test-no-such-profile"),
            Err(ConfigError::NoCredentials { .. })
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "local".into(),
            Profile {
                url: "ldap://localhost:2170".into(),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profile("local").unwrap(), cfg.profiles["local"]);
    }
}
