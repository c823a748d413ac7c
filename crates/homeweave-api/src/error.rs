use thiserror::Error;

/// Top-level error type for the `homeweave-api` crate.
///
/// Covers every failure mode of the JSON-RPC surface: transport, HTTP
/// status, the JSON-RPC `error` member, and payload decoding.
/// `homeweave-core` maps these into engine-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// API key rejected by the controller.
    #[error("Invalid API key")]
    InvalidApiKey,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-success HTTP status from the JSON-RPC endpoint.
    #[error("Controller returned HTTP {status}")]
    Http { status: u16 },

    // ── JSON-RPC ────────────────────────────────────────────────────
    /// The response carried a JSON-RPC `error` member.
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The response carried neither `result` nor `error`.
    #[error("JSON-RPC response for '{method}' has no result")]
    MissingResult { method: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Http { status } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the request ran out of time.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// The JSON-RPC error code, if the controller answered with one.
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            Self::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }
}
