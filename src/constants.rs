use crate::error::Error;
use alloy_primitives::{address, Address, ChainId};

/// Placeholder address for the chain's native asset as understood by the execution service.
pub const NATIVE_TOKEN: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

/// Placeholder address for the native asset inside a V4 pool key.
pub const NULL_ADDRESS: Address = Address::ZERO;

/// The router that pulls tokens and positions on behalf of the user.
pub const ROUTER_ADDRESS: Address = address!("f75584ef6673ad213a685a1b58cc0330b8ea22cf");

/// Protocol fee taken from every migration, in basis points.
pub const DEFAULT_FEE_BPS: u16 = 25;

/// Default slippage tolerance applied to every guarded step, in basis points.
pub const DEFAULT_SLIPPAGE_BPS: u16 = 50;

/// Number of tick spacings away from the protocol bounds that still counts as a full range.
pub const FULL_RANGE_TOLERANCE: i32 = 10;

/// Tick spacing used when a pool's fee tier is unknown.
pub const DEFAULT_TICK_SPACING: i32 = 60;

/// The default factory enabled fee amounts, denominated in hundredths of bips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeeAmount {
    LOWEST = 100,
    LOW = 500,
    MEDIUM = 3000,
    HIGH = 10000,
}

impl FeeAmount {
    pub const ALL: [Self; 4] = [Self::LOWEST, Self::LOW, Self::MEDIUM, Self::HIGH];

    /// The default factory tick spacings by fee amount.
    #[inline]
    pub const fn tick_spacing(&self) -> i32 {
        match self {
            Self::LOWEST => 1,
            Self::LOW => 10,
            Self::MEDIUM => 60,
            Self::HIGH => 200,
        }
    }

    #[inline]
    pub const fn fee(&self) -> u32 {
        *self as u32
    }
}

impl TryFrom<u32> for FeeAmount {
    type Error = Error;

    #[inline]
    fn try_from(fee: u32) -> Result<Self, Self::Error> {
        match fee {
            100 => Ok(Self::LOWEST),
            500 => Ok(Self::LOW),
            3000 => Ok(Self::MEDIUM),
            10000 => Ok(Self::HIGH),
            _ => Err(Error::InvalidFeeTier(fee)),
        }
    }
}

/// Returns the tick spacing of a fee tier, falling back to [`DEFAULT_TICK_SPACING`].
#[inline]
pub fn tick_spacing_for_fee(fee: u32) -> i32 {
    FeeAmount::try_from(fee).map_or(DEFAULT_TICK_SPACING, |fee| fee.tick_spacing())
}

/// Chains the migrator can read from or deposit into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedChain {
    Ethereum = 1,
    Optimism = 10,
    Bsc = 56,
    Unichain = 130,
    Polygon = 137,
    Base = 8453,
    Arbitrum = 42161,
    Avalanche = 43114,
    Linea = 59144,
}

const V3_POSITION_MANAGER: Address = address!("c36442b4a4522e871399cd717abdd847ab11fe88");
const V3_POSITION_MANAGER_BASE: Address = address!("03a520b32c04bf3beef7beb72e919cf822ed34f1");
const V4_POSITION_MANAGER_BASE: Address = address!("7c5f5a4bbd8fd63184577525326123b519429bdc");
const V4_POSITION_MANAGER_UNICHAIN: Address =
    address!("4529a01c7a0410167c5740c487a8de60232617bf");

impl SupportedChain {
    pub const ALL: [Self; 9] = [
        Self::Ethereum,
        Self::Optimism,
        Self::Bsc,
        Self::Unichain,
        Self::Polygon,
        Self::Base,
        Self::Arbitrum,
        Self::Avalanche,
        Self::Linea,
    ];

    #[inline]
    pub const fn id(&self) -> ChainId {
        *self as ChainId
    }

    /// The chain key used by the bridge network's metadata API.
    pub const fn bridge_chain_key(&self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Optimism => "optimism",
            Self::Bsc => "bsc",
            Self::Unichain => "unichain",
            Self::Polygon => "polygon",
            Self::Base => "base",
            Self::Arbitrum => "arbitrum",
            Self::Avalanche => "avalanche",
            Self::Linea => "linea",
        }
    }

    /// Whether ETH is the chain's gas asset, which lets ETH be bridged natively.
    pub const fn is_native_eth(&self) -> bool {
        matches!(
            self,
            Self::Ethereum
                | Self::Optimism
                | Self::Unichain
                | Self::Base
                | Self::Arbitrum
                | Self::Linea
        )
    }

    /// The V3 nonfungible position manager that source positions live in.
    pub const fn v3_position_manager(&self) -> Address {
        match self {
            Self::Base => V3_POSITION_MANAGER_BASE,
            _ => V3_POSITION_MANAGER,
        }
    }

    /// The V4 position manager that receives deposits, if the chain is a deposit destination.
    pub const fn v4_position_manager(&self) -> Option<Address> {
        match self {
            Self::Base => Some(V4_POSITION_MANAGER_BASE),
            Self::Unichain => Some(V4_POSITION_MANAGER_UNICHAIN),
            _ => None,
        }
    }
}

impl TryFrom<ChainId> for SupportedChain {
    type Error = Error;

    fn try_from(chain_id: ChainId) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|chain| chain.id() == chain_id)
            .ok_or(Error::UnsupportedChain(chain_id))
    }
}

/// Returns the V4 position manager of the given chain.
#[inline]
pub fn v4_position_manager(chain_id: ChainId) -> Result<Address, Error> {
    SupportedChain::try_from(chain_id)?
        .v4_position_manager()
        .ok_or(Error::UnsupportedChain(chain_id))
}

/// Whether the chain id belongs to a chain whose gas asset is ETH.
#[inline]
pub fn is_native_eth_chain(chain_id: ChainId) -> bool {
    SupportedChain::try_from(chain_id).is_ok_and(|chain| chain.is_native_eth())
}
