// ── Runtime connection configuration ──
//
// These types describe *how* to reach one controller and how the engine
// should pace itself against it. They carry credentials but never touch
// disk: the CLI (or any host application) builds a `ConnectionConfig` and
// hands it to the provider registry.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed controllers on the LAN).
    DangerAcceptInvalid,
}

/// Long-poll pacing for the event subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Upper bound on one `event::changes` wait.
    pub timeout: Duration,
    /// Fixed delay after a failed poll.
    pub retry_delay: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// Freshness windows for the shared caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Command directory entries.
    pub directory_ttl: Duration,
    /// Canonical state entries.
    pub state_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory_ttl: Duration::from_secs(30),
            state_ttl: Duration::from_millis(1_200),
        }
    }
}

/// Which controller equipment is exposed as devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFilter {
    /// Accepted `eqType_name` values.
    pub equipment_types: Vec<String>,
    /// Drop disabled equipment.
    pub require_enabled: bool,
    /// Drop hidden equipment.
    pub require_visible: bool,
}

impl Default for DeviceFilter {
    fn default() -> Self {
        Self {
            equipment_types: vec!["virtual".into()],
            require_enabled: true,
            require_visible: true,
        }
    }
}

/// Configuration for talking to a single controller instance.
///
/// Passed by value into each adapter; the engine never persists it.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Stable key for cache partitioning. Defaults to the URL.
    pub controller_id: Option<String>,
    /// Controller base URL (e.g. `http://192.168.1.20`).
    pub url: Url,
    /// Shared API key.
    pub api_key: SecretString,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout for regular calls.
    pub timeout: Duration,
    pub poll: PollConfig,
    pub device_filter: DeviceFilter,
}

impl ConnectionConfig {
    pub fn new(url: Url, api_key: SecretString) -> Self {
        Self {
            controller_id: None,
            url,
            api_key,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(10),
            poll: PollConfig::default(),
            device_filter: DeviceFilter::default(),
        }
    }

    /// The key that partitions this controller's cache entries.
    pub fn controller_key(&self) -> String {
        self.controller_id
            .clone()
            .unwrap_or_else(|| self.url.as_str().trim_end_matches('/').to_owned())
    }

    /// Translate into the api crate's transport settings.
    pub(crate) fn transport(&self) -> homeweave_api::TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => homeweave_api::TlsMode::System,
            TlsVerification::CustomCa(path) => homeweave_api::TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => homeweave_api::TlsMode::DangerAcceptInvalid,
        };
        homeweave_api::TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn controller_key_defaults_to_url() {
        let config = ConnectionConfig::new(
            Url::parse("http://10.0.0.2/").unwrap(),
            SecretString::from("k".to_string()),
        );
        assert_eq!(config.controller_key(), "http://10.0.0.2");

        let named = ConnectionConfig {
            controller_id: Some("maison".into()),
            ..config
        };
        assert_eq!(named.controller_key(), "maison");
    }

    #[test]
    fn default_windows() {
        let cache = CacheConfig::default();
        assert_eq!(cache.directory_ttl, Duration::from_secs(30));
        assert_eq!(cache.state_ttl, Duration::from_millis(1_200));
        assert_eq!(PollConfig::default().retry_delay, Duration::from_secs(5));
    }
}
