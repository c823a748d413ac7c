// Jeedom event feed
//
// `event::changes` blocks server-side until something changes or the
// controller's own wait elapses, then returns the next cursor.

use std::time::Duration;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Error;
use crate::jeedom::client::JeedomClient;
use crate::jeedom::models::EventChanges;

impl JeedomClient {
    /// Fetch changes newer than `since`.
    ///
    /// `event::changes` with `{"datetime": since}`. `timeout` bounds this
    /// request only; the regular client timeout is far shorter than a
    /// long-poll wait.
    pub async fn event_changes(&self, since: f64, timeout: Duration) -> Result<EventChanges, Error> {
        debug!(since, timeout_secs = timeout.as_secs(), "polling event changes");
        let mut params = Map::new();
        params.insert("datetime".into(), cursor_param(since));
        self.call_optional("event::changes", params, Some(timeout))
            .await?
            .ok_or_else(|| Error::MissingResult {
                method: "event::changes".into(),
            })
    }
}

/// Whole cursors go out as integers so a fresh subscription sends `0`.
fn cursor_param(since: f64) -> Value {
    if since.fract().abs() < f64::EPSILON && since.abs() < 9.0e15 {
        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let whole = since as i64;
        Value::from(whole)
    } else {
        Value::from(since)
    }
}
