//! Ledger client
//!
//! Owns the HTTP transport and submits audit events to the remote compliance
//! ledger. One long-lived pooled client, a fixed request timeout, bearer-token
//! authorization when configured, and exactly one submission attempt per
//! event - retries and deduplication are out of scope.

use crate::error::LedgerError;
use reqwest::Client;
use sealtrace_foundation::{AuditEvent, LedgerConfig};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, warn};

/// Submission endpoint, relative to the configured base URL
pub const LOG_ACTION_PATH: &str = "/api/v1/log_action";

// ============================================================================
// LedgerReceipt
// ============================================================================

/// Proof that an event was durably recorded by the remote authority.
///
/// Transient: used to signal success to the caller path that requested
/// logging, never persisted by this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerReceipt {
    /// Seal identifier assigned by the ledger
    pub seal_id: String,

    /// Transaction identifier assigned by the ledger
    pub tx_id: String,

    /// Ledger-reported status label
    pub status: String,
}

// ============================================================================
// LedgerClient
// ============================================================================

/// Client for the remote compliance ledger.
///
/// `open` acquires the transport; `close` (or dropping the client) releases
/// it and is safe even if no requests were ever sent. The underlying
/// connection pool is internally synchronized, so one client can be shared by
/// any number of concurrent invocations.
pub struct LedgerClient {
    config: LedgerConfig,
    client: Client,
    endpoint: String,
}

impl LedgerClient {
    /// Acquire the transport for the configured ledger
    pub fn open(config: LedgerConfig) -> Result<Self, LedgerError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LedgerError::Transport(format!("failed to build HTTP client: {}", e)))?;

        let endpoint = format!("{}{}", config.base_url.trim_end_matches('/'), LOG_ACTION_PATH);
        debug!(endpoint = %endpoint, agent_id = %config.agent_id, "ledger client opened");

        Ok(Self {
            config,
            client,
            endpoint,
        })
    }

    /// Connection settings this client was opened with
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Submit one audit event. A single attempt: transport failures and
    /// rejections are returned, never retried.
    pub async fn submit(&self, event: &AuditEvent) -> Result<LedgerReceipt, LedgerError> {
        let mut request = self.client.post(&self.endpoint).json(event);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| {
            warn!(action = %event.action, error = %e, "ledger submission failed to send");
            LedgerError::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LedgerError::from_http_status(status.as_u16(), &body));
        }

        let receipt: LedgerReceipt = response
            .json()
            .await
            .map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;

        debug!(
            action = %event.action,
            seal_id = %receipt.seal_id,
            tx_id = %receipt.tx_id,
            "audit event sealed"
        );
        Ok(receipt)
    }

    /// Release the transport. Safe to call with zero requests sent; dropping
    /// the client has the same effect on every exit path.
    pub fn close(self) {
        debug!(endpoint = %self.endpoint, "ledger client closed");
    }

    /// Run `f` against a freshly opened client, releasing the transport when
    /// the returned future completes - on success, error, or panic unwind.
    pub async fn scoped<T, F, Fut>(config: LedgerConfig, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(LedgerClient) -> Fut,
        Fut: Future<Output = T>,
    {
        let client = Self::open(config)?;
        Ok(f(client).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = LedgerClient::open(LedgerConfig::new("http://ledger.local:8080/")).unwrap();
        assert_eq!(client.endpoint, "http://ledger.local:8080/api/v1/log_action");

        let client = LedgerClient::open(LedgerConfig::new("http://ledger.local:8080")).unwrap();
        assert_eq!(client.endpoint, "http://ledger.local:8080/api/v1/log_action");
    }

    #[test]
    fn test_close_without_requests() {
        let client = LedgerClient::open(LedgerConfig::default()).unwrap();
        client.close();
    }

    #[test]
    fn test_receipt_parses_ledger_body() {
        let receipt: LedgerReceipt = serde_json::from_str(
            r#"{"seal_id":"seal-42","tx_id":"tx-99","status":"sealed"}"#,
        )
        .unwrap();
        assert_eq!(receipt.seal_id, "seal-42");
        assert_eq!(receipt.tx_id, "tx-99");
        assert_eq!(receipt.status, "sealed");
    }
}
