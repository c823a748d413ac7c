// ── Core error types ──
//
// Engine-level errors. Callers never see JSON-RPC envelopes or HTTP status
// codes directly: the `From<homeweave_api::Error>` impl folds every
// transport-layer failure into `Transport`, `Timeout` or `Config`.

use thiserror::Error;

use crate::model::Capability;

/// Unified error type for the engine.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Transport errors ─────────────────────────────────────────────
    #[error("Controller request failed: {message}")]
    Transport { message: String },

    #[error("Controller request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Resolution errors ────────────────────────────────────────────
    #[error("Capability '{capability}' not available for device {device_id}")]
    CapabilityUnavailable {
        device_id: String,
        capability: Capability,
    },

    #[error("Provider type '{provider_type}' not supported")]
    UnsupportedProviderType { provider_type: String },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    // ── Lookup / store errors ────────────────────────────────────────
    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Association store error: {message}")]
    Store { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// `true` for failures that came from talking to the controller.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }

    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(entity_type: &str, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_owned(),
            identifier: identifier.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<homeweave_api::Error> for CoreError {
    fn from(err: homeweave_api::Error) -> Self {
        use homeweave_api::Error as Api;

        match err {
            Api::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            Api::Transport(ref e) if e.is_timeout() => CoreError::Timeout { timeout_secs: 0 },
            Api::Transport(e) => CoreError::Transport {
                message: e.to_string(),
            },
            Api::InvalidApiKey => CoreError::Transport {
                message: "controller rejected the API key".into(),
            },
            Api::Http { status } => CoreError::Transport {
                message: format!("controller returned HTTP {status}"),
            },
            Api::Rpc { code, message } => CoreError::Transport {
                message: format!("controller error {code}: {message}"),
            },
            Api::MissingResult { method } => CoreError::Transport {
                message: format!("malformed response to '{method}': no result"),
            },
            Api::Deserialization { message, body: _ } => CoreError::Transport {
                message: format!("malformed response: {message}"),
            },
            Api::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            Api::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_errors_become_transport_errors() {
        let err = CoreError::from(homeweave_api::Error::Rpc {
            code: -32001,
            message: "denied".into(),
        });
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Controller request failed: controller error -32001: denied");
    }

    #[test]
    fn capability_unavailable_message() {
        let err = CoreError::CapabilityUnavailable {
            device_id: "13".into(),
            capability: Capability::Dim,
        };
        assert_eq!(err.to_string(), "Capability 'dim' not available for device 13");
        assert!(!err.is_transport());
    }
}
