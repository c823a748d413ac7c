//! Shared configuration for homeweave tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `homeweave_core::ConnectionConfig` /
//! `homeweave_core::CacheConfig`. The engine itself never reads files; the
//! CLI layers its flag overrides on top of what this crate produces.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use homeweave_core::{CacheConfig, ConnectionConfig, DeviceFilter, PollConfig, TlsVerification};

const KEYRING_SERVICE: &str = "homeweave";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

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
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
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
    /// Pick `name`, or the default profile when `name` is `None`.
    pub fn profile<'a>(&'a self, name: Option<&'a str>) -> Result<(&'a str, &'a Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get(name)
            .map(|profile| (name, profile))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

/// Settings shared by every profile unless the profile overrides them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout, seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Upper bound on one long-poll wait, seconds.
    #[serde(default = "default_long_poll_timeout")]
    pub long_poll_timeout: u64,

    /// Delay after a failed long-poll, milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    #[serde(default = "default_directory_ttl_ms")]
    pub directory_ttl_ms: u64,

    #[serde(default = "default_state_ttl_ms")]
    pub state_ttl_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            long_poll_timeout: default_long_poll_timeout(),
            retry_delay_ms: default_retry_delay_ms(),
            directory_ttl_ms: default_directory_ttl_ms(),
            state_ttl_ms: default_state_ttl_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_long_poll_timeout() -> u64 {
    60
}
fn default_retry_delay_ms() -> u64 {
    5_000
}
fn default_directory_ttl_ms() -> u64 {
    30_000
}
fn default_state_ttl_ms() -> u64 {
    1_200
}

/// A named controller profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Provider type tag (e.g. "jeedom").
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Controller base URL (e.g., "http://192.168.1.20").
    pub controller: String,

    /// Cache partition key; defaults to the controller URL.
    pub controller_id: Option<String>,

    /// API key (plaintext; prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,

    pub timeout: Option<u64>,
    pub long_poll_timeout: Option<u64>,
    pub retry_delay_ms: Option<u64>,
    pub directory_ttl_ms: Option<u64>,
    pub state_ttl_ms: Option<u64>,

    /// Equipment plugins exposed as devices.
    pub equipment_types: Option<Vec<String>>,
}

fn default_provider() -> String {
    "jeedom".into()
}

impl Profile {
    /// A profile with only a controller URL set.
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            provider: default_provider(),
            controller: controller.into(),
            controller_id: None,
            api_key: None,
            api_key_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            long_poll_timeout: None,
            retry_delay_ms: None,
            directory_ttl_ms: None,
            state_ttl_ms: None,
            equipment_types: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "homeweave", "homeweave").map_or_else(
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
    p.push("homeweave");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path`, merged with `HOMEWEAVE_*` variables.
///
/// Nested keys use a double underscore: `HOMEWEAVE_DEFAULTS__TIMEOUT=20`.
/// A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HOMEWEAVE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
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

/// Resolve an API key: `api_key_env` → system keyring → plaintext.
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_api_key_with(profile, profile_name, |name| std::env::var(name).ok(), keyring_lookup)
}

fn resolve_api_key_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(ref env_name) = profile.api_key_env {
        if let Some(val) = env(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Some(secret) = keyring(profile_name) {
        return Ok(SecretString::from(secret));
    }

    // 3. Plaintext in config
    if let Some(ref key) = profile.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-key"))
}

fn keyring_lookup(profile_name: &str) -> Option<String> {
    keyring_entry(profile_name)
        .and_then(|entry| entry.get_password())
        .ok()
}

/// Store a profile's API key in the system keyring.
pub fn store_api_key(profile_name: &str, key: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(key.expose_secret())?;
    Ok(())
}

// ── Translation to engine config ────────────────────────────────────

/// Build a `ConnectionConfig` from a profile, without CLI flag overrides.
pub fn profile_to_connection_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ConnectionConfig, ConfigError> {
    let api_key = resolve_api_key(profile, profile_name)?;
    connection_config(profile, defaults, api_key)
}

/// Build a `ConnectionConfig` with an already-resolved API key.
pub fn connection_config(
    profile: &Profile,
    defaults: &Defaults,
    api_key: SecretString,
) -> Result<ConnectionConfig, ConfigError> {
    let url: url::Url = profile
        .controller
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "controller".into(),
            reason: format!("invalid URL: {}", profile.controller),
        })?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut device_filter = DeviceFilter::default();
    if let Some(ref types) = profile.equipment_types {
        device_filter.equipment_types.clone_from(types);
    }

    Ok(ConnectionConfig {
        controller_id: profile.controller_id.clone(),
        url,
        api_key,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        poll: PollConfig {
            timeout: Duration::from_secs(
                profile
                    .long_poll_timeout
                    .unwrap_or(defaults.long_poll_timeout),
            ),
            retry_delay: Duration::from_millis(
                profile.retry_delay_ms.unwrap_or(defaults.retry_delay_ms),
            ),
        },
        device_filter,
    })
}

/// Cache windows for a registry serving `profile`.
pub fn cache_config(profile: Option<&Profile>, defaults: &Defaults) -> CacheConfig {
    let directory_ttl = profile
        .and_then(|p| p.directory_ttl_ms)
        .unwrap_or(defaults.directory_ttl_ms);
    let state_ttl = profile
        .and_then(|p| p.state_ttl_ms)
        .unwrap_or(defaults.state_ttl_ms);
    CacheConfig {
        directory_ttl: Duration::from_millis(directory_ttl),
        state_ttl: Duration::from_millis(state_ttl),
    }
}
