//! External payment gateway client.
//!
//! The gateway is the authority on what really happened to a recharge. The
//! engine only ever asks it two questions (is this reference known, and in
//! what state); it never pushes state upstream. A gateway timeout or a
//! malformed body is [`EngineError::GatewayUnavailable`] and must never be
//! read as any particular status; the reconciler treats it as "no answer"
//! and mutates nothing. "Record not found" is a valid answer, not an error,
//! since not every local transaction exists upstream.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::{EngineError, ResultEngine, TransactionStatus};

/// Timeout applied to every gateway call; on expiry the call fails with
/// [`EngineError::GatewayUnavailable`] and all engine locks unwind.
pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Status vocabulary the gateway speaks, already normalised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GatewayStatus {
    Pending,
    Success,
    Failed,
}

impl GatewayStatus {
    /// Maps the gateway vocabulary to the local status enum.
    #[must_use]
    pub fn as_local(self) -> TransactionStatus {
        match self {
            Self::Pending => TransactionStatus::Pending,
            Self::Success => TransactionStatus::Success,
            Self::Failed => TransactionStatus::Failed,
        }
    }
}

/// Outcome of a gateway status query.
#[derive(Clone, Debug, PartialEq)]
pub enum GatewayLookup {
    Found {
        status: GatewayStatus,
        /// The raw payload, passed through to clients for display.
        raw: Value,
    },
    NotFound,
}

/// Read-only seam to the payment gateway.
#[async_trait]
pub trait StatusGateway: Send + Sync {
    async fn fetch_status(&self, gateway_ref: &str) -> ResultEngine<GatewayLookup>;
}

/// HTTP implementation over the gateway's status endpoint.
#[derive(Clone, Debug)]
pub struct HttpStatusGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStatusGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ResultEngine<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                EngineError::GatewayUnavailable(format!("failed to build gateway client: {err}"))
            })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self, gateway_ref: &str) -> String {
        format!(
            "{}/status/{}",
            self.base_url.trim_end_matches('/'),
            gateway_ref
        )
    }
}

#[async_trait]
impl StatusGateway for HttpStatusGateway {
    async fn fetch_status(&self, gateway_ref: &str) -> ResultEngine<GatewayLookup> {
        let resp = self
            .client
            .get(self.url(gateway_ref))
            .send()
            .await
            .map_err(|err| EngineError::GatewayUnavailable(format!("gateway request failed: {err}")))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(GatewayLookup::NotFound);
        }
        if !resp.status().is_success() {
            return Err(EngineError::GatewayUnavailable(format!(
                "gateway returned {}",
                resp.status()
            )));
        }

        let raw: Value = resp.json().await.map_err(|err| {
            EngineError::GatewayUnavailable(format!("malformed gateway response: {err}"))
        })?;
        parse_lookup(raw)
    }
}

/// Interprets a gateway payload.
///
/// Some gateways signal an unknown reference in the body instead of a 404;
/// both spellings map to [`GatewayLookup::NotFound`].
fn parse_lookup(raw: Value) -> ResultEngine<GatewayLookup> {
    let Some(status) = raw.get("status").and_then(Value::as_str) else {
        return Err(EngineError::GatewayUnavailable(
            "gateway response missing status field".to_string(),
        ));
    };

    let status = match status.trim().to_ascii_uppercase().as_str() {
        "SUCCESS" => GatewayStatus::Success,
        "FAILURE" | "FAILED" => GatewayStatus::Failed,
        "PENDING" | "PROCESSING" => GatewayStatus::Pending,
        "RECORD NOT FOUND" | "NO RECORD FOUND" | "NOT FOUND" => {
            return Ok(GatewayLookup::NotFound);
        }
        other => {
            return Err(EngineError::GatewayUnavailable(format!(
                "unrecognised gateway status: {other}"
            )));
        }
    };

    Ok(GatewayLookup::Found { status, raw })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_known_statuses() {
        for (input, expected) in [
            ("SUCCESS", GatewayStatus::Success),
            ("failure", GatewayStatus::Failed),
            ("FAILED", GatewayStatus::Failed),
            ("Pending", GatewayStatus::Pending),
            ("PROCESSING", GatewayStatus::Pending),
        ] {
            let lookup = parse_lookup(json!({ "status": input, "opid": "X1" })).unwrap();
            match lookup {
                GatewayLookup::Found { status, raw } => {
                    assert_eq!(status, expected);
                    assert_eq!(raw["opid"], "X1");
                }
                GatewayLookup::NotFound => panic!("expected Found for {input}"),
            }
        }
    }

    #[test]
    fn no_record_is_not_found_not_an_error() {
        let lookup = parse_lookup(json!({ "status": "Record Not Found" })).unwrap();
        assert_eq!(lookup, GatewayLookup::NotFound);
    }

    #[test]
    fn missing_or_unknown_status_is_unavailable() {
        assert!(matches!(
            parse_lookup(json!({ "txid": "abc" })),
            Err(EngineError::GatewayUnavailable(_))
        ));
        assert!(matches!(
            parse_lookup(json!({ "status": "SHRUG" })),
            Err(EngineError::GatewayUnavailable(_))
        ));
    }

    #[test]
    fn url_joins_without_double_slash() {
        let gateway =
            HttpStatusGateway::new("http://gw.example.com/", DEFAULT_GATEWAY_TIMEOUT).unwrap();
        assert_eq!(
            gateway.url("OP123"),
            "http://gw.example.com/status/OP123"
        );
    }

    #[test]
    fn maps_to_local_statuses() {
        assert_eq!(GatewayStatus::Success.as_local(), TransactionStatus::Success);
        assert_eq!(GatewayStatus::Failed.as_local(), TransactionStatus::Failed);
        assert_eq!(GatewayStatus::Pending.as_local(), TransactionStatus::Pending);
    }
}
