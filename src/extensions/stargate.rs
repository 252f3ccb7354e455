//! ## Stargate client
//! Lists the Stargate V2 pools used to bridge the transport asset.

use super::{ensure_success, DEFAULT_HTTP_TIMEOUT};
use crate::prelude::*;
use reqwest::Client;
use serde::Deserialize;
use std::{sync::Arc, time::Duration};
use tokio::sync::RwLock;
use tracing::debug;

pub const STARGATE_METADATA_URL: &str = "https://mainnet.stargate-api.com/v1/metadata?version=v2";

/// A Stargate metadata client. The pool list is fetched once and shared by clones.
#[derive(Clone, Debug)]
pub struct StargateClient {
    client: Client,
    url: String,
    timeout: Duration,
    pools: Arc<RwLock<Option<Vec<BridgePool>>>>,
}

impl Default for StargateClient {
    #[inline]
    fn default() -> Self {
        Self::new(STARGATE_METADATA_URL)
    }
}

impl StargateClient {
    #[inline]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout: DEFAULT_HTTP_TIMEOUT,
            pools: Arc::new(RwLock::new(None)),
        }
    }

    #[inline]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch_pools(&self) -> Result<Vec<BridgePool>, Error> {
        debug!(url = %self.url, "requesting bridge pools");
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await?;
        let metadata: MetadataResponse = ensure_success(response)?.json().await?;
        debug!(pools = metadata.data.v2.len(), "bridge pools fetched");
        Ok(metadata.data.v2)
    }
}

#[derive(Debug, Deserialize)]
struct MetadataResponse {
    data: Metadata,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    v2: Vec<BridgePool>,
}

impl BridgeMetadataService for StargateClient {
    async fn bridge_pools(&self) -> Result<Vec<BridgePool>, Error> {
        if let Some(pools) = self.pools.read().await.as_ref() {
            return Ok(pools.clone());
        }
        let mut cached = self.pools.write().await;
        // Another caller may have fetched while the lock was released.
        if let Some(pools) = cached.as_ref() {
            return Ok(pools.clone());
        }
        let pools = self.fetch_pools().await?;
        *cached = Some(pools.clone());
        Ok(pools)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    #[test]
    fn pools_from_metadata() {
        let metadata: MetadataResponse = serde_json::from_str(
            r#"{
                "data": {
                    "v2": [
                        {
                            "address": "0x9aa02d4fae7f58b8e8f34c66e756cc734dac7fe4",
                            "chainKey": "polygon",
                            "chainName": "Polygon",
                            "token": {
                                "address": "0x3c499c542cef5e3811e1192ce70d8cc03d5c3359",
                                "decimals": 6,
                                "symbol": "USDC"
                            }
                        },
                        {
                            "address": "0xe9aba835f813ca05e50a6c0ce65d0d74390f7de7",
                            "chainKey": "unichain",
                            "token": {
                                "address": "0x0000000000000000000000000000000000000000",
                                "symbol": "ETH"
                            }
                        }
                    ]
                }
            }"#,
        )
        .unwrap();
        let pools = metadata.data.v2;
        assert_eq!(
            resolve_bridge_pool(&pools, POLYGON, TransportAsset::Usdc),
            Some((POLYGON_USDC_POOL, POLYGON_USDC))
        );
        assert_eq!(
            resolve_bridge_pool(&pools, UNICHAIN, TransportAsset::Eth),
            Some((UNICHAIN_ETH_POOL, NATIVE_TOKEN))
        );
    }

    #[tokio::test]
    async fn cached_pools_are_shared() {
        let client = StargateClient::new("http://127.0.0.1:1");
        *client.pools.write().await = Some(Vec::new());
        let shared = client.clone();
        assert_eq!(shared.bridge_pools().await.unwrap(), Vec::new());
    }
}
