// Jeedom JSON-RPC HTTP client
//
// Wraps `reqwest::Client` with endpoint construction, API-key injection and
// envelope unwrapping. Endpoint methods (equipment, commands, events) are
// implemented as inherent methods in separate files so this module stays
// focused on transport mechanics.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::jeedom::models::{RpcRequest, RpcResponse};
use crate::transport::TransportConfig;

const RPC_PATH: &str = "core/api/jeeApi.php";

/// Raw HTTP client for a Jeedom controller's JSON-RPC API.
///
/// Every request is a `POST` to `{base}/core/api/jeeApi.php` with the API key
/// folded into `params.apikey`. Methods return the unwrapped `result`
/// payload; a JSON-RPC `error` member becomes [`Error::Rpc`].
pub struct JeedomClient {
    http: reqwest::Client,
    base_url: Url,
    endpoint: Url,
    api_key: SecretString,
    timeout: Duration,
}

impl JeedomClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the controller root (e.g. `http://192.168.1.20` or
    /// `https://jeedom.local/jeedom`).
    pub fn new(
        base_url: Url,
        api_key: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::build(http, base_url, api_key, transport.timeout)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        api_key: SecretString,
    ) -> Result<Self, Error> {
        Self::build(http, base_url, api_key, TransportConfig::default().timeout)
    }

    fn build(
        http: reqwest::Client,
        base_url: Url,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let endpoint = endpoint_url(&base_url)?;
        Ok(Self {
            http,
            base_url,
            endpoint,
            api_key,
            timeout,
        })
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The resolved JSON-RPC endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Call `method` and require a `result` in the response.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Map<String, Value>,
    ) -> Result<T, Error> {
        self.call_optional(method, params, None)
            .await?
            .ok_or_else(|| Error::MissingResult {
                method: method.to_owned(),
            })
    }

    /// Call `method`, tolerating an absent `result`.
    ///
    /// `timeout` overrides the client-wide request timeout for this call only
    /// (used by the long-poll endpoint).
    pub(crate) async fn call_optional<T: DeserializeOwned>(
        &self,
        method: &str,
        mut params: Map<String, Value>,
        timeout: Option<Duration>,
    ) -> Result<Option<T>, Error> {
        params.insert(
            "apikey".into(),
            Value::String(self.api_key.expose_secret().to_owned()),
        );
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: "1",
            method,
            params: Value::Object(params),
        };

        debug!(method, "POST {}", self.endpoint);

        let effective_timeout = timeout.unwrap_or(self.timeout);
        let mut request = self.http.post(self.endpoint.clone()).json(&body);
        if let Some(t) = timeout {
            request = request.timeout(t);
        }

        let resp = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: effective_timeout.as_secs(),
                }
            } else {
                Error::Transport(e)
            }
        })?;

        Self::parse_envelope(method, resp, effective_timeout).await
    }

    /// Parse the `{ result | error }` envelope.
    async fn parse_envelope<T: DeserializeOwned>(
        method: &str,
        resp: reqwest::Response,
        timeout: Duration,
    ) -> Result<Option<T>, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: timeout.as_secs(),
                }
            } else {
                Error::Transport(e)
            }
        })?;
        trace!(method, body_len = body.len(), "rpc response");

        let envelope: RpcResponse<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        if let Some(err) = envelope.error {
            return Err(Error::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        Ok(envelope.result)
    }
}

/// Jeedom identifiers are integers on the wire; keep anything else verbatim.
pub(crate) fn id_param(id: &str) -> Value {
    id.trim()
        .parse::<i64>()
        .map_or_else(|_| Value::String(id.to_owned()), Value::from)
}

fn endpoint_url(base_url: &Url) -> Result<Url, Error> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(RPC_PATH)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_sub_path() {
        let url = endpoint_url(&Url::parse("https://host.local/jeedom").unwrap()).unwrap();
        assert_eq!(url.as_str(), "https://host.local/jeedom/core/api/jeeApi.php");

        let url = endpoint_url(&Url::parse("http://10.0.0.2").unwrap()).unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.2/core/api/jeeApi.php");
    }

    #[test]
    fn numeric_ids_are_sent_as_numbers() {
        assert_eq!(id_param("13"), Value::from(13));
        assert_eq!(id_param("abc"), Value::String("abc".into()));
    }
}
