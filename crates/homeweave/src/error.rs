//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use homeweave_config::ConfigError;
use homeweave_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const PARTIAL: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Controller at {url} is not reachable")]
    #[diagnostic(
        code(homeweave::unreachable),
        help(
            "Check that the controller is running, the URL is right and the API key\n\
             is accepted. Run with -vv for the underlying error."
        )
    )]
    Unreachable { url: String },

    #[error("Controller request failed: {message}")]
    #[diagnostic(
        code(homeweave::controller),
        help("Run with -vv to see the request that failed.")
    )]
    Controller { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(homeweave::no_credentials),
        help(
            "Store a key with: homeweave config set-key {profile}\n\
             Or set the HOMEWEAVE_API_KEY environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(homeweave::not_found),
        help("Run: homeweave {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Capability '{capability}' not available for device {device}")]
    #[diagnostic(
        code(homeweave::capability_unavailable),
        help("Run: homeweave devices get {device} to see its command mapping")
    )]
    CapabilityUnavailable { device: String, capability: String },

    #[error("Provider type '{provider_type}' not supported")]
    #[diagnostic(
        code(homeweave::unsupported_provider),
        help("Run: homeweave providers to list supported types")
    )]
    UnsupportedProvider { provider_type: String },

    #[error("{failed} of {total} devices failed")]
    #[diagnostic(code(homeweave::partial_failure))]
    PartialFailure { failed: usize, total: usize },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(homeweave::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(homeweave::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: homeweave config add {name} --url <URL>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No controller configured")]
    #[diagnostic(
        code(homeweave::no_config),
        help(
            "Create a profile with: homeweave config add default --url <URL>\n\
             Or pass --controller and --api-key. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(homeweave::config))]
    Config(Box<ConfigError>),

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(homeweave::timeout),
        help("Increase timeout with --timeout or check controller responsiveness.")
    )]
    Timeout { seconds: u64 },

    #[error("Internal error: {0}")]
    #[diagnostic(code(homeweave::internal))]
    Internal(String),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(homeweave::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unreachable { .. } | Self::Controller { .. } => exit_code::CONNECTION,
            Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::CapabilityUnavailable { .. } | Self::UnsupportedProvider { .. } => {
                exit_code::UNSUPPORTED
            }
            Self::PartialFailure { .. } => exit_code::PARTIAL,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Transport { message } => CliError::Controller { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::CapabilityUnavailable {
                device_id,
                capability,
            } => CliError::CapabilityUnavailable {
                device: device_id,
                capability: capability.to_string(),
            },

            CoreError::UnsupportedProviderType { provider_type } => {
                CliError::UnsupportedProvider { provider_type }
            }

            CoreError::InvalidParameter { name, reason } => CliError::Validation {
                field: name,
                reason,
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{entity_type}s list"),
                resource_type: entity_type,
                identifier,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Store { message } | CoreError::Internal(message) => {
                CliError::Internal(message)
            }
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homeweave_core::Capability;

    #[test]
    fn core_errors_keep_their_exit_codes() {
        let unavailable: CliError = CoreError::CapabilityUnavailable {
            device_id: "13".into(),
            capability: Capability::Dim,
        }
        .into();
        assert_eq!(unavailable.exit_code(), exit_code::UNSUPPORTED);
        assert_eq!(
            unavailable.to_string(),
            "Capability 'dim' not available for device 13"
        );

        let timeout: CliError = CoreError::Timeout { timeout_secs: 10 }.into();
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);

        let invalid: CliError = CoreError::InvalidParameter {
            name: "value".into(),
            reason: "not a number".into(),
        }
        .into();
        assert_eq!(invalid.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn missing_credentials_are_auth_errors() {
        let err: CliError = ConfigError::NoCredentials {
            profile: "maison".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
