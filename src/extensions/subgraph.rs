//! ## Subgraph indexer
//! Discovers V3 positions and V4 pools through The Graph's gateway.

use super::{ensure_success, DEFAULT_HTTP_TIMEOUT};
use crate::prelude::*;
use alloy_primitives::{Address, ChainId};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{collections::HashMap, time::Duration};
use tracing::debug;

pub const GRAPH_GATEWAY_URL: &str = "https://gateway.thegraph.com/api/subgraphs/id";

const V4_SUBGRAPHS: [(ChainId, &str); 2] = [
    (130, "EoCvJ5tyMLMJcTnLQwWpjAtPdn74PcrZgzfcT5bYxNBH"),
    (8453, "HNCFA9TyBqpo5qpe6QreQABAA1kV8g46mhkCcicu6v2R"),
];

const V3_SUBGRAPHS: [(ChainId, &str); 3] = [
    (1, "9fWsevEC9Yz4WdW9QyUvu2JXsxyXAxc1X4HaEkmyyc75"),
    (8453, "HMuAwufqZ1YCRmzL2SfHTVkzZovC9VL2UAKhjvRqKiR1"),
    (42161, "3V7ZY6muhxaQL5qvntX1CFXJ32W7BxXZTGTwmpH5J4t3"),
];

/// An [`Indexer`] backed by Uniswap subgraphs, one per chain and protocol version.
#[derive(Clone, Debug)]
pub struct SubgraphIndexer {
    client: Client,
    api_key: String,
    timeout: Duration,
    v3_subgraphs: HashMap<ChainId, String>,
    v4_subgraphs: HashMap<ChainId, String>,
}

impl SubgraphIndexer {
    /// Creates an indexer for the known Uniswap subgraphs.
    ///
    /// ## Arguments
    ///
    /// * `api_key`: The gateway API key
    #[inline]
    pub fn new(api_key: impl Into<String>) -> Self {
        let urls = |subgraphs: &[(ChainId, &str)]| {
            subgraphs
                .iter()
                .map(|(chain_id, id)| (*chain_id, format!("{GRAPH_GATEWAY_URL}/{id}")))
                .collect()
        };
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            timeout: DEFAULT_HTTP_TIMEOUT,
            v3_subgraphs: urls(&V3_SUBGRAPHS),
            v4_subgraphs: urls(&V4_SUBGRAPHS),
        }
    }

    /// Sets the subgraph that indexes V3 positions on a chain.
    #[inline]
    pub fn with_v3_subgraph(mut self, chain_id: ChainId, url: impl Into<String>) -> Self {
        self.v3_subgraphs.insert(chain_id, url.into());
        self
    }

    /// Sets the subgraph that indexes V4 pools on a chain.
    #[inline]
    pub fn with_v4_subgraph(mut self, chain_id: ChainId, url: impl Into<String>) -> Self {
        self.v4_subgraphs.insert(chain_id, url.into());
        self
    }

    #[inline]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn query<V: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        query: &str,
        variables: V,
    ) -> Result<T, Error> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&GraphRequest { query, variables })
            .timeout(self.timeout)
            .send()
            .await?;
        let response: GraphResponse<T> = ensure_success(response)?.json().await?;
        response.into_data()
    }
}

#[derive(Debug, Serialize)]
struct GraphRequest<'a, V> {
    query: &'a str,
    variables: V,
}

#[derive(Debug, Deserialize)]
struct GraphResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphError>,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
}

impl<T> GraphResponse<T> {
    fn into_data(self) -> Result<T, Error> {
        if !self.errors.is_empty() {
            let messages: Vec<_> = self.errors.into_iter().map(|err| err.message).collect();
            return Err(Error::Graph(messages.join("; ")));
        }
        self.data
            .ok_or_else(|| Error::Graph("response has no data".to_string()))
    }
}

/// Subgraph ids are lowercase hex, and native ETH is the zero address.
#[inline]
fn subgraph_id(address: Address) -> String {
    let address = if address == NATIVE_TOKEN {
        NULL_ADDRESS
    } else {
        address
    };
    format!("{address:#x}")
}

#[derive(Debug, Deserialize)]
struct GraphToken {
    id: Address,
    symbol: String,
}

impl From<GraphToken> for PoolToken {
    #[inline]
    fn from(token: GraphToken) -> Self {
        Self {
            address: token.id,
            symbol: token.symbol,
        }
    }
}

impl Indexer for SubgraphIndexer {
    async fn positions(
        &self,
        chain_id: ChainId,
        owner: Address,
    ) -> Result<Vec<SourcePosition>, Error> {
        use self::positions_query::*;

        let url = self
            .v3_subgraphs
            .get(&chain_id)
            .ok_or(Error::UnsupportedChain(chain_id))?;
        debug!(chain_id, %owner, "requesting positions");
        let data: Data = self
            .query(
                url,
                QUERY,
                Variables {
                    owner: subgraph_id(owner),
                },
            )
            .await?;
        let positions: Vec<_> = data
            .positions
            .into_iter()
            .map(|position| position.into_source(chain_id))
            .filter(SourcePosition::has_liquidity)
            .collect();
        debug!(chain_id, positions = positions.len(), "positions fetched");
        Ok(positions)
    }

    async fn pools(&self, chain_id: ChainId, pair: TokenPair) -> Result<Vec<IndexedPool>, Error> {
        use self::pools_query::*;

        // A chain without a V4 subgraph has no pools to offer.
        let Some(url) = self.v4_subgraphs.get(&chain_id) else {
            debug!(chain_id, "no V4 subgraph for chain");
            return Ok(Vec::new());
        };
        debug!(chain_id, token0 = %pair.token0, token1 = %pair.token1, "requesting pools");
        let data: Data = self
            .query(
                url,
                QUERY,
                Variables {
                    token0: subgraph_id(pair.token0),
                    token1: subgraph_id(pair.token1),
                },
            )
            .await?;
        let pools: Vec<_> = data.pools.into_iter().map(IndexedPool::from).collect();
        debug!(chain_id, pools = pools.len(), "pools fetched");
        Ok(pools)
    }
}

mod pools_query {
    use super::GraphToken;
    use crate::prelude::*;
    use alloy_primitives::U256;
    use serde::{Deserialize, Serialize};
    use serde_with::{serde_as, DisplayFromStr};

    pub const QUERY: &str = r#"
        query Pools($token0: String!, $token1: String!) {
            pools(
                where: {
                    liquidity_gt: 0
                    totalValueLockedUSD_gt: 1
                    hooks: "0x0000000000000000000000000000000000000000"
                    token0: $token0
                    token1: $token1
                }
            ) {
                id
                liquidity
                feeTier
                tickSpacing
                sqrtPrice
                tick
                totalValueLockedUSD
                token0 {
                    id
                    symbol
                }
                token1 {
                    id
                    symbol
                }
            }
        }
    "#;

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub token0: String,
        pub token1: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Data {
        pub pools: Vec<GraphPool>,
    }

    #[serde_as]
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GraphPool {
        pub id: String,
        #[serde_as(as = "DisplayFromStr")]
        pub liquidity: u128,
        #[serde_as(as = "DisplayFromStr")]
        pub fee_tier: u32,
        #[serde_as(as = "DisplayFromStr")]
        pub tick_spacing: i32,
        #[serde_as(as = "DisplayFromStr")]
        pub sqrt_price: U256,
        #[serde_as(as = "Option<DisplayFromStr>")]
        pub tick: Option<i32>,
        #[serde(rename = "totalValueLockedUSD")]
        #[serde_as(as = "DisplayFromStr")]
        pub total_value_locked_usd: f64,
        pub token0: GraphToken,
        pub token1: GraphToken,
    }

    impl From<GraphPool> for IndexedPool {
        #[inline]
        fn from(pool: GraphPool) -> Self {
            Self {
                id: pool.id,
                liquidity: pool.liquidity,
                fee_tier: pool.fee_tier,
                indexed_tick_spacing: pool.tick_spacing,
                sqrt_price: pool.sqrt_price,
                tick: pool.tick,
                total_value_locked_usd: pool.total_value_locked_usd,
                token0: pool.token0.into(),
                token1: pool.token1.into(),
            }
        }
    }
}

mod positions_query {
    use super::GraphToken;
    use crate::prelude::*;
    use alloy_primitives::{ChainId, U256};
    use serde::{Deserialize, Serialize};
    use serde_with::{serde_as, DisplayFromStr};

    pub const QUERY: &str = r#"
        query Positions($owner: String!) {
            positions(where: { owner: $owner, liquidity_gt: "0" }) {
                id
                token0 {
                    id
                    symbol
                }
                token1 {
                    id
                    symbol
                }
                pool {
                    id
                    feeTier
                    tick
                }
                tickLower
                tickUpper
                liquidity
            }
        }
    "#;

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub owner: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Data {
        pub positions: Vec<GraphPosition>,
    }

    #[serde_as]
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GraphPosition {
        #[serde_as(as = "DisplayFromStr")]
        pub id: U256,
        pub token0: GraphToken,
        pub token1: GraphToken,
        pub pool: GraphPositionPool,
        #[serde_as(as = "DisplayFromStr")]
        pub tick_lower: i32,
        #[serde_as(as = "DisplayFromStr")]
        pub tick_upper: i32,
        #[serde_as(as = "DisplayFromStr")]
        pub liquidity: u128,
    }

    #[serde_as]
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GraphPositionPool {
        #[serde_as(as = "DisplayFromStr")]
        pub fee_tier: u32,
        #[serde_as(as = "Option<DisplayFromStr>")]
        pub tick: Option<i32>,
    }

    impl GraphPosition {
        pub fn into_source(self, chain_id: ChainId) -> SourcePosition {
            SourcePosition {
                token_id: self.id,
                chain_id,
                fee: self.pool.fee_tier,
                token0: self.token0.into(),
                token1: self.token1.into(),
                liquidity: self.liquidity,
                tick_lower: self.tick_lower,
                tick_upper: self.tick_upper,
                pool_tick: self.pool.tick,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;
    use alloy_primitives::U256;

    #[test]
    fn decode_pools_data() {
        let response: GraphResponse<pools_query::Data> = serde_json::from_str(
            r#"{
                "data": {
                    "pools": [{
                        "id": "0x3258f413c7a88cda2fa8709a589d221a80f6574f63df5a5b6774485d8acc39d9",
                        "liquidity": "1350254929410837",
                        "feeTier": "500",
                        "tickSpacing": "10",
                        "sqrtPrice": "1789276440611818479497506713862468",
                        "tick": "200311",
                        "totalValueLockedUSD": "2534881.23",
                        "token0": {"id": "0x078d782b760474a361dda0af3839290b0ef57ad6", "symbol": "USDC"},
                        "token1": {"id": "0x4200000000000000000000000000000000000006", "symbol": "WETH"}
                    }, {
                        "id": "0x01",
                        "liquidity": "0",
                        "feeTier": "3000",
                        "tickSpacing": "60",
                        "sqrtPrice": "0",
                        "tick": null,
                        "totalValueLockedUSD": "0",
                        "token0": {"id": "0x078d782b760474a361dda0af3839290b0ef57ad6", "symbol": "USDC"},
                        "token1": {"id": "0x4200000000000000000000000000000000000006", "symbol": "WETH"}
                    }]
                }
            }"#,
        )
        .unwrap();
        let pools: Vec<_> = response
            .into_data()
            .unwrap()
            .pools
            .into_iter()
            .map(IndexedPool::from)
            .collect();
        assert_eq!(pools.len(), 2);
        assert_eq!(pools[0].fee_tier, 500);
        assert_eq!(pools[0].tick, Some(200_311));
        assert_eq!(pools[0].tick_spacing(), 10);
        assert_eq!(pools[0].token0.address, UNICHAIN_USDC);
        assert_eq!(pools[0].token1.symbol, "WETH");
        assert_eq!(pools[1].tick, None);
    }

    #[test]
    fn decode_positions_data() {
        let response: GraphResponse<positions_query::Data> = serde_json::from_str(
            r#"{
                "data": {
                    "positions": [{
                        "id": "912734",
                        "token0": {"id": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", "symbol": "USDC"},
                        "token1": {"id": "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2", "symbol": "WETH"},
                        "pool": {"id": "0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640", "feeTier": "500", "tick": "-201335"},
                        "tickLower": "-203000",
                        "tickUpper": "-200000",
                        "liquidity": "5000000000000"
                    }]
                }
            }"#,
        )
        .unwrap();
        let positions: Vec<_> = response
            .into_data()
            .unwrap()
            .positions
            .into_iter()
            .map(|position| position.into_source(1))
            .collect();
        let position = &positions[0];
        assert_eq!(position.token_id, U256::from(912_734));
        assert_eq!(position.chain_id, 1);
        assert_eq!(position.fee, 500);
        assert_eq!(position.token0.address, USDC);
        assert_eq!(position.token1.address, WETH);
        assert_eq!((position.tick_lower, position.tick_upper), (-203_000, -200_000));
        assert_eq!(position.in_range(), Some(true));
    }

    #[test]
    fn graph_errors() {
        let response: GraphResponse<pools_query::Data> = serde_json::from_str(
            r#"{"errors": [{"message": "auth error: payment required"}, {"message": "indexer unavailable"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            response.into_data(),
            Err(Error::Graph(message)) if message == "auth error: payment required; indexer unavailable"
        ));
    }

    #[test]
    fn lowercase_subgraph_ids() {
        assert_eq!(
            subgraph_id(USDC),
            "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
        );
        assert_eq!(
            subgraph_id(NATIVE_TOKEN),
            "0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn configured_subgraphs() {
        let indexer = SubgraphIndexer::new("key");
        assert_eq!(
            indexer.v4_subgraphs[&UNICHAIN],
            format!("{GRAPH_GATEWAY_URL}/EoCvJ5tyMLMJcTnLQwWpjAtPdn74PcrZgzfcT5bYxNBH")
        );
        assert!(indexer.v4_subgraphs.contains_key(&8453));
        let indexer = indexer.with_v4_subgraph(8453, "http://localhost:8000");
        assert_eq!(indexer.v4_subgraphs[&8453], "http://localhost:8000");
        assert!(indexer.v3_subgraphs.contains_key(&42161));
        assert!(!indexer.v3_subgraphs.contains_key(&UNICHAIN));
    }

    #[tokio::test]
    async fn chain_without_subgraph_has_no_pools() {
        let indexer = SubgraphIndexer::new("key");
        let mut session =
            MigrationSessionController::new(WidgetConfig::default(), MockExecution).unwrap();
        session.apply(SessionEvent::DestinationChainSelected(1));
        session.apply(SessionEvent::DestinationTokensSelected(USDC, WETH));

        let event = session.pools_query().unwrap().run(&indexer).await;
        assert!(matches!(&event, SessionEvent::PoolsLoaded { pools, .. } if pools.is_empty()));
        session.apply(event);
        assert!(session.no_pools_found());
        assert!(session.take_notifications().is_empty());
        assert!(!session.migrate_enabled());
    }
}
