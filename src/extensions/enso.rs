//! ## Enso client
//! Prices bundles and resolves token metadata through the Enso shortcuts API.

use super::{ensure_success, DEFAULT_HTTP_TIMEOUT};
use crate::prelude::*;
use alloy_primitives::{Address, ChainId};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const ENSO_API_URL: &str = "https://shortcuts-backend-dynamic-int.herokuapp.com/api/v1";

/// An Enso API client bound to one API key. A new key needs a new client.
#[derive(Clone, Debug)]
pub struct EnsoClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl EnsoClient {
    #[inline]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: ENSO_API_URL.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    #[inline]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[inline]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

impl ExecutionService for EnsoClient {
    async fn bundle(
        &self,
        params: BundleParams,
        actions: &[BundleAction],
    ) -> Result<BundleQuote, Error> {
        debug!(
            chain_id = params.chain_id,
            actions = actions.len(),
            "requesting bundle"
        );
        let response = self
            .client
            .post(self.url("shortcuts/bundle"))
            .query(&params)
            .bearer_auth(&self.api_key)
            .json(actions)
            .timeout(self.timeout)
            .send()
            .await?;
        let quote: BundleQuote = ensure_success(response)?.json().await?;
        debug!(chain_id = params.chain_id, gas = %quote.gas, "bundle priced");
        Ok(quote)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenQuery {
    chain_id: ChainId,
    address: Address,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct TokensResponse {
    data: Vec<EnsoToken>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnsoToken {
    address: Address,
    chain_id: ChainId,
    decimals: u8,
    symbol: Option<String>,
    name: Option<String>,
    #[serde(default)]
    logos_uri: Vec<String>,
}

impl From<EnsoToken> for TokenMetadata {
    #[inline]
    fn from(token: EnsoToken) -> Self {
        Self {
            address: token.address,
            chain_id: token.chain_id,
            symbol: token.symbol.unwrap_or_default(),
            decimals: token.decimals,
            name: token.name,
            logo_uri: token.logos_uri.into_iter().next(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    price: Option<f64>,
}

impl TokenService for EnsoClient {
    async fn token(
        &self,
        chain_id: ChainId,
        address: Address,
    ) -> Result<Option<TokenMetadata>, Error> {
        debug!(chain_id, %address, "requesting token");
        let response = self
            .client
            .get(self.url("tokens"))
            .query(&TokenQuery {
                chain_id,
                address,
                include_metadata: true,
            })
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .send()
            .await?;
        let tokens: TokensResponse = ensure_success(response)?.json().await?;
        Ok(tokens.data.into_iter().next().map(TokenMetadata::from))
    }

    async fn price_usd(&self, chain_id: ChainId, address: Address) -> Result<Option<f64>, Error> {
        debug!(chain_id, %address, "requesting price");
        let response = self
            .client
            .get(self.url(&format!("prices/{chain_id}/{address}")))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let price: PriceResponse = ensure_success(response)?.json().await?;
        Ok(price.price)
    }
}
