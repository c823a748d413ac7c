// ── Provider registry ──
//
// Static type tag → adapter constructor table. Adding a controller backend
// means adding a `ProviderKind` variant and a constructor arm here.

use std::sync::Arc;

use strum::IntoEnumIterator;
use tracing::debug;

use super::Provider;
use super::jeedom::JeedomProvider;
use crate::config::{CacheConfig, ConnectionConfig};
use crate::error::CoreError;
use crate::model::{ProviderDescriptor, ProviderKind};
use crate::store::EngineCaches;

/// Creates adapters that all share one set of caches.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    caches: EngineCaches,
}

impl ProviderRegistry {
    pub fn new(cache: CacheConfig) -> Self {
        Self {
            caches: EngineCaches::new(cache),
        }
    }

    pub fn with_caches(caches: EngineCaches) -> Self {
        Self { caches }
    }

    pub fn caches(&self) -> &EngineCaches {
        &self.caches
    }

    /// Instantiate the adapter registered for `provider_type`.
    pub fn create(
        &self,
        provider_type: &str,
        config: ConnectionConfig,
    ) -> Result<Arc<dyn Provider>, CoreError> {
        let kind: ProviderKind =
            provider_type
                .parse()
                .map_err(|_| CoreError::UnsupportedProviderType {
                    provider_type: provider_type.to_owned(),
                })?;
        debug!(%kind, url = %config.url, "creating provider");

        match kind {
            ProviderKind::Jeedom => Ok(Arc::new(JeedomProvider::connect_http(
                config,
                self.caches.clone(),
            )?)),
        }
    }

    /// Catalogue of every constructible provider type.
    pub fn available_types() -> Vec<ProviderDescriptor> {
        ProviderKind::iter().map(ProviderDescriptor::from).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use url::Url;

    fn config() -> ConnectionConfig {
        ConnectionConfig::new(
            Url::parse("http://127.0.0.1:9").unwrap(),
            SecretString::from("k".to_string()),
        )
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = ProviderRegistry::default()
            .create("mqtt", config())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            CoreError::UnsupportedProviderType { ref provider_type } if provider_type == "mqtt"
        ));
        assert_eq!(err.to_string(), "Provider type 'mqtt' not supported");
    }

    #[tokio::test]
    async fn creates_jeedom_adapter() {
        let provider = ProviderRegistry::default().create("jeedom", config()).unwrap();
        assert_eq!(provider.kind(), ProviderKind::Jeedom);
        assert_eq!(provider.controller_id(), "http://127.0.0.1:9");
    }

    #[test]
    fn catalogue_lists_jeedom() {
        let types = ProviderRegistry::available_types();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].kind, ProviderKind::Jeedom);
        assert_eq!(types[0].name, "Jeedom");
        assert_eq!(types[0].description, "Jeedom home automation platform");
    }
}
