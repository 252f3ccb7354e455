use crate::prelude::*;
use alloy_primitives::{address, Address, ChainId, B256, U256};
use once_cell::sync::Lazy;
use std::{collections::HashMap, sync::Mutex};

pub const UNICHAIN: ChainId = 130;
pub const POLYGON: ChainId = 137;

pub const USDC: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
pub const WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
pub const DAI: Address = address!("6b175474e89094c44da98b954eedeac495271d0f");
pub const RECEIVER: Address = address!("8ba1f109551bd432803012645ac136ddd64dba72");

pub const UNICHAIN_USDC: Address = address!("078d782b760474a361dda0af3839290b0ef57ad6");
pub const UNICHAIN_WETH: Address = address!("4200000000000000000000000000000000000006");
pub const UNICHAIN_USDC_POOL: Address = address!("5f1b7b1d7b9b8dc0a2d0a08c2c6ad67c86c5dc23");
pub const UNICHAIN_ETH_POOL: Address = address!("e9aba835f813ca05e50a6c0ce65d0d74390f7de7");
pub const POLYGON_USDC: Address = address!("3c499c542cef5e3811e1192ce70d8cc03d5c3359");
pub const POLYGON_WETH: Address = address!("7ceb23fd6bc0add59e62ac25578270cff1b9f619");
pub const POLYGON_USDC_POOL: Address = address!("9aa02d4fae7f58b8e8f34c66e756cc734dac7fe4");
pub const ARBITRUM_ETH_POOL: Address = address!("a45b5130f36cdca45667738e2a258ab09f4a5f7f");

fn pool_token(address: Address, symbol: &str) -> PoolToken {
    PoolToken {
        address,
        symbol: symbol.to_string(),
    }
}

fn metadata(chain_id: ChainId, address: Address, symbol: &str, decimals: u8) -> TokenMetadata {
    TokenMetadata {
        address,
        chain_id,
        symbol: symbol.to_string(),
        decimals,
        name: None,
        logo_uri: None,
    }
}

pub static USDC_METADATA: Lazy<TokenMetadata> = Lazy::new(|| metadata(1, USDC, "USDC", 6));
pub static WETH_METADATA: Lazy<TokenMetadata> = Lazy::new(|| metadata(1, WETH, "WETH", 18));
pub static UNICHAIN_USDC_METADATA: Lazy<TokenMetadata> =
    Lazy::new(|| metadata(UNICHAIN, UNICHAIN_USDC, "USDC", 6));
pub static UNICHAIN_WETH_METADATA: Lazy<TokenMetadata> =
    Lazy::new(|| metadata(UNICHAIN, UNICHAIN_WETH, "WETH", 18));
pub static POLYGON_USDC_METADATA: Lazy<TokenMetadata> =
    Lazy::new(|| metadata(POLYGON, POLYGON_USDC, "USDC", 6));

/// A mainnet USDC/WETH 0.05% position around tick -201335.
pub static POSITION: Lazy<SourcePosition> = Lazy::new(|| SourcePosition {
    token_id: U256::from(4),
    chain_id: 1,
    fee: 500,
    token0: pool_token(USDC, "USDC"),
    token1: pool_token(WETH, "WETH"),
    liquidity: 34_399_999_543_676,
    tick_lower: -203_000,
    tick_upper: -200_000,
    pool_tick: Some(-201_335),
});

/// A mainnet USDC/WETH pool with the given fee tier, tick and TVL.
pub fn pool_with(fee_tier: u32, tick: Option<i32>, tvl: f64) -> IndexedPool {
    IndexedPool {
        id: format!("0x{fee_tier:064x}"),
        liquidity: 1_000_000_000_000_000,
        fee_tier,
        indexed_tick_spacing: tick_spacing_for_fee(fee_tier),
        sqrt_price: U256::from(1) << 96,
        tick,
        total_value_locked_usd: tvl,
        token0: pool_token(USDC, "USDC"),
        token1: pool_token(WETH, "WETH"),
    }
}

/// A Unichain USDC/WETH V4 pool.
pub fn unichain_pool(fee_tier: u32, tick: Option<i32>) -> IndexedPool {
    IndexedPool {
        token0: pool_token(UNICHAIN_USDC, "USDC"),
        token1: pool_token(UNICHAIN_WETH, "WETH"),
        ..pool_with(fee_tier, tick, 100_000.0)
    }
}

fn unichain_target(chain_id_in: ChainId) -> MigrationTarget {
    MigrationTarget {
        chain_id_in,
        chain_id_out: Some(UNICHAIN),
        token0: Some(UNICHAIN_USDC),
        token1: Some(UNICHAIN_WETH),
        pool_fee: Some(3000),
        range: Some(PriceRange::new(-60, 60).unwrap()),
        receiver: Some(RECEIVER),
    }
}

fn polygon_bridge() -> BridgeRoute {
    BridgeRoute {
        asset: TransportAsset::Usdc,
        source_pool: POLYGON_USDC_POOL,
        source_token: POLYGON_USDC,
        destination_token: UNICHAIN_USDC,
    }
}

/// A request to migrate `amount` base units of `token` from `chain_id_in` into a Unichain
/// USDC/WETH 0.3% position.
pub fn token_request(token: Address, amount: &str, chain_id_in: ChainId) -> MigrationRequest {
    MigrationRequest {
        source: Some(MigrationSource::Token {
            address: token,
            amount: U256::from_str_radix(amount, 10).unwrap(),
        }),
        target: unichain_target(chain_id_in),
        options: BundleOptions::default(),
        bridge: Some(polygon_bridge()),
    }
}

/// A request to migrate a USDC/WETH position held on `chain_id_in` into a Unichain USDC/WETH 0.3%
/// position.
pub fn position_request(chain_id_in: ChainId) -> MigrationRequest {
    let (token0, token1) = match chain_id_in {
        POLYGON => (POLYGON_USDC, POLYGON_WETH),
        UNICHAIN => (UNICHAIN_USDC, UNICHAIN_WETH),
        _ => (USDC, WETH),
    };
    MigrationRequest {
        source: Some(MigrationSource::Position {
            token_id: U256::from(4),
            liquidity: 34_399_999_543_676,
            token0,
            token1,
            position_manager: SupportedChain::try_from(chain_id_in)
                .unwrap()
                .v3_position_manager(),
        }),
        target: unichain_target(chain_id_in),
        options: BundleOptions::default(),
        bridge: Some(polygon_bridge()),
    }
}

fn bridge_pool(address: Address, chain_key: &str, token: Address, symbol: &str) -> BridgePool {
    BridgePool {
        address,
        chain_key: chain_key.to_string(),
        token: BridgePoolToken {
            address: token,
            symbol: symbol.to_string(),
        },
    }
}

pub fn bridge_pools() -> Vec<BridgePool> {
    vec![
        bridge_pool(POLYGON_USDC_POOL, "polygon", POLYGON_USDC, "USDC"),
        bridge_pool(UNICHAIN_USDC_POOL, "unichain", UNICHAIN_USDC, "USDC.e"),
        bridge_pool(ARBITRUM_ETH_POOL, "arbitrum", Address::ZERO, "ETH"),
        bridge_pool(UNICHAIN_ETH_POOL, "unichain", Address::ZERO, "ETH"),
    ]
}

#[derive(Debug)]
struct ChainState {
    allowances: HashMap<Address, U256>,
    balances: HashMap<Address, U256>,
    nft_approved: Address,
    receipt_success: bool,
    written: Vec<ContractCall>,
}

/// An in-memory chain whose reads are set by the test.
#[derive(Debug)]
pub struct MockChain(Mutex<ChainState>);

impl Default for MockChain {
    fn default() -> Self {
        Self(Mutex::new(ChainState {
            allowances: HashMap::new(),
            balances: HashMap::new(),
            nft_approved: Address::ZERO,
            receipt_success: true,
            written: Vec::new(),
        }))
    }
}

impl MockChain {
    pub fn set_allowance(&self, token: Address, allowance: U256) {
        self.0.lock().unwrap().allowances.insert(token, allowance);
    }

    pub fn set_balance(&self, token: Address, balance: U256) {
        self.0.lock().unwrap().balances.insert(token, balance);
    }

    pub fn set_nft_approved(&self, operator: Address) {
        self.0.lock().unwrap().nft_approved = operator;
    }

    pub fn set_receipt_success(&self, success: bool) {
        self.0.lock().unwrap().receipt_success = success;
    }

    pub fn written(&self) -> Vec<ContractCall> {
        self.0.lock().unwrap().written.clone()
    }
}

impl ChainClient for MockChain {
    async fn read_balance(&self, token: Address, _owner: Address) -> Result<U256, Error> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .balances
            .get(&token)
            .copied()
            .unwrap_or_default())
    }

    async fn read_allowance(
        &self,
        token: Address,
        _owner: Address,
        _spender: Address,
    ) -> Result<U256, Error> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .allowances
            .get(&token)
            .copied()
            .unwrap_or_default())
    }

    async fn read_nft_approved(&self, _collection: Address, _token_id: U256) -> Result<Address, Error> {
        Ok(self.0.lock().unwrap().nft_approved)
    }

    async fn write_contract(&self, call: ContractCall) -> Result<B256, Error> {
        let mut state = self.0.lock().unwrap();
        state.written.push(call);
        Ok(B256::with_last_byte(state.written.len() as u8))
    }

    async fn wait_for_receipt(&self, _hash: B256) -> Result<bool, Error> {
        Ok(self.0.lock().unwrap().receipt_success)
    }
}

/// A token service that knows only the inserted tokens.
#[derive(Debug, Default)]
pub struct MockTokens(Mutex<Vec<TokenMetadata>>);

impl MockTokens {
    pub fn insert(&self, token: TokenMetadata) {
        self.0.lock().unwrap().push(token);
    }
}

impl TokenService for MockTokens {
    async fn token(
        &self,
        chain_id: ChainId,
        address: Address,
    ) -> Result<Option<TokenMetadata>, Error> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .iter()
            .find(|token| token.chain_id == chain_id && token.address == address)
            .cloned())
    }

    async fn price_usd(&self, _chain_id: ChainId, _address: Address) -> Result<Option<f64>, Error> {
        Ok(None)
    }
}

/// An indexer serving fixed pools and positions, or failing with a message.
#[derive(Debug, Default)]
pub struct MockIndexer {
    pools: Mutex<Vec<IndexedPool>>,
    positions: Mutex<Vec<SourcePosition>>,
    failure: Mutex<Option<String>>,
}

impl MockIndexer {
    pub fn set_pools(&self, pools: Vec<IndexedPool>) {
        *self.pools.lock().unwrap() = pools;
    }

    pub fn set_positions(&self, positions: Vec<SourcePosition>) {
        *self.positions.lock().unwrap() = positions;
    }

    pub fn fail(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    fn check(&self) -> Result<(), Error> {
        match self.failure.lock().unwrap().clone() {
            Some(message) => Err(Error::Service(message)),
            None => Ok(()),
        }
    }
}

impl Indexer for MockIndexer {
    async fn positions(
        &self,
        chain_id: ChainId,
        _owner: Address,
    ) -> Result<Vec<SourcePosition>, Error> {
        self.check()?;
        Ok(self
            .positions
            .lock()
            .unwrap()
            .iter()
            .filter(|position| position.chain_id == chain_id)
            .cloned()
            .collect())
    }

    async fn pools(&self, _chain_id: ChainId, pair: TokenPair) -> Result<Vec<IndexedPool>, Error> {
        self.check()?;
        Ok(self
            .pools
            .lock()
            .unwrap()
            .iter()
            .filter(|pool| pool.matches_pair(&pair))
            .cloned()
            .collect())
    }
}

/// An execution service quoting every bundle with a fixed router call.
#[derive(Debug, Default)]
pub struct MockExecution;

impl ExecutionService for MockExecution {
    async fn bundle(
        &self,
        _params: BundleParams,
        actions: &[BundleAction],
    ) -> Result<BundleQuote, Error> {
        Ok(BundleQuote {
            tx: BundleTransaction {
                to: ROUTER_ADDRESS,
                data: serde_json::to_vec(actions)?.into(),
                value: U256::ZERO,
            },
            amounts_out: HashMap::new(),
            gas: U256::from(350_000),
        })
    }
}
