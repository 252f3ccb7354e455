//! ## LayerZero scan client
//! Looks up the cross-chain message a bridge transaction sent.

use super::{ensure_success, DEFAULT_HTTP_TIMEOUT};
use crate::prelude::*;
use alloy_primitives::B256;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const LAYERZERO_SCAN_URL: &str = "https://scan.layerzero-api.com/v1";

#[derive(Clone, Debug)]
pub struct LayerZeroScanClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for LayerZeroScanClient {
    #[inline]
    fn default() -> Self {
        Self::new(LAYERZERO_SCAN_URL)
    }
}

impl LayerZeroScanClient {
    #[inline]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    #[inline]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    data: Vec<ScanMessage>,
}

#[derive(Debug, Deserialize)]
struct ScanMessage {
    source: Option<SourceStatus>,
    status: Option<MessageStatus>,
}

#[derive(Debug, Deserialize)]
struct SourceStatus {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageStatus {
    name: Option<String>,
}

impl From<ScanMessage> for BridgeMessage {
    #[inline]
    fn from(message: ScanMessage) -> Self {
        Self {
            source_status: message.source.and_then(|source| source.status),
            status: message.status.and_then(|status| status.name),
        }
    }
}

impl BridgeStatusService for LayerZeroScanClient {
    async fn message(&self, hash: B256) -> Result<Option<BridgeMessage>, Error> {
        debug!(%hash, "requesting bridge message");
        let response = self
            .client
            .get(format!(
                "{}/messages/tx/{hash}",
                self.base_url.trim_end_matches('/')
            ))
            .timeout(self.timeout)
            .send()
            .await?;
        // The scan service answers 404 until it has indexed the transaction.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let messages: MessagesResponse = ensure_success(response)?.json().await?;
        Ok(messages.data.into_iter().next().map(BridgeMessage::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_from_response() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{
                "data": [{
                    "pathway": {"srcEid": 30109, "dstEid": 30320},
                    "source": {"status": "SUCCEEDED", "tx": {"txHash": "0x01"}},
                    "destination": {"status": "WAITING"},
                    "status": {"name": "INFLIGHT", "message": "Executor transaction confirmed"}
                }]
            }"#,
        )
        .unwrap();
        let message = response
            .data
            .into_iter()
            .next()
            .map(BridgeMessage::from)
            .unwrap();
        assert_eq!(message.source_status.as_deref(), Some("SUCCEEDED"));
        assert_eq!(message.status.as_deref(), Some("INFLIGHT"));
        assert_eq!(
            BridgeStatus::default().next(Some(&message)),
            BridgeStatus::Inflight
        );
    }

    #[test]
    fn empty_response_has_no_message() {
        let response: MessagesResponse = serde_json::from_str("{}").unwrap();
        assert!(response.data.is_empty());
    }
}
