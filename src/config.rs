//! ## Widget configuration
//! Parameters fixed at embedding time. Every fixed value removes the corresponding user control and
//! locks the session to it.

use crate::prelude::*;
use alloy_primitives::{Address, ChainId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Defaults of a migration session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionDefaults {
    pub slippage_bps: u16,
    pub fee_bps: u16,
    /// The router that pulls the migrated token or position.
    pub router: Address,
    pub destination_chain_id: ChainId,
    #[serde(with = "humantime_serde")]
    pub balance_poll_interval: Duration,
    #[serde(with = "humantime_serde")]
    pub pool_refresh_interval: Duration,
    #[serde(with = "humantime_serde")]
    pub bridge_status_poll_interval: Duration,
    /// Tick spacings from the protocol bounds that still count as a full range.
    pub full_range_tolerance: i32,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
            fee_bps: DEFAULT_FEE_BPS,
            router: ROUTER_ADDRESS,
            destination_chain_id: SupportedChain::Unichain.id(),
            balance_poll_interval: Duration::from_secs(6),
            pool_refresh_interval: Duration::from_secs(60),
            bridge_status_poll_interval: Duration::from_secs(2),
            full_range_tolerance: FULL_RANGE_TOLERANCE,
        }
    }
}

/// Configuration passed by the page embedding the widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    /// Credentials of the execution service.
    pub api_key: Option<String>,
    /// Locks the destination chain.
    pub out_chain_id: Option<ChainId>,
    /// Locks the destination token pair, in either order.
    pub out_tokens: Option<[Address; 2]>,
    /// Locks the destination pool's fee tier.
    pub pool_fee_grade: Option<u32>,
    /// Locks the destination range.
    pub ticks: Option<PriceRange>,
    pub defaults: SessionDefaults,
}

impl WidgetConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// The destination chain of every session.
    #[inline]
    pub fn destination_chain_id(&self) -> ChainId {
        self.out_chain_id
            .unwrap_or(self.defaults.destination_chain_id)
    }

    /// Rejects configurations that would lock a session into a state it cannot migrate to.
    pub fn validate(&self) -> Result<(), Error> {
        let chain_id = self.destination_chain_id();
        v4_position_manager(chain_id)?;
        if let Some([token_a, token_b]) = self.out_tokens {
            if token_a == token_b {
                return Err(Error::InvalidConfig(format!(
                    "destination tokens must differ, got {token_a} twice"
                )));
            }
        }
        let tick_spacing = match self.pool_fee_grade {
            Some(fee) => Some(FeeAmount::try_from(fee)?.tick_spacing()),
            None => None,
        };
        if let (Some(range), Some(tick_spacing)) = (self.ticks, tick_spacing) {
            if !range.is_aligned(tick_spacing) {
                return Err(Error::InvalidConfig(format!(
                    "ticks {:?} are not multiples of the tick spacing {tick_spacing}",
                    range.ticks()
                )));
            }
        }
        let defaults = &self.defaults;
        if defaults.slippage_bps > 10_000 || defaults.fee_bps > 10_000 {
            return Err(Error::InvalidConfig(
                "basis points must not exceed 10000".to_string(),
            ));
        }
        if defaults.full_range_tolerance < 0 {
            return Err(Error::InvalidConfig(format!(
                "full range tolerance must not be negative, got {}",
                defaults.full_range_tolerance
            )));
        }
        for (name, interval) in [
            ("balance poll interval", defaults.balance_poll_interval),
            ("pool refresh interval", defaults.pool_refresh_interval),
            ("bridge status poll interval", defaults.bridge_status_poll_interval),
        ] {
            if interval.is_zero() {
                return Err(Error::InvalidConfig(format!("{name} must not be zero")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn empty_config_uses_defaults() {
        let config = WidgetConfig::from_json("{}").unwrap();
        assert_eq!(config, WidgetConfig::default());
        assert_eq!(config.destination_chain_id(), 130);
        assert_eq!(config.defaults.slippage_bps, 50);
        assert_eq!(config.defaults.fee_bps, 25);
        assert_eq!(config.defaults.balance_poll_interval, Duration::from_secs(6));
        assert_eq!(config.defaults.pool_refresh_interval, Duration::from_secs(60));
    }

    #[test]
    fn parses_locks_and_durations() {
        let config = WidgetConfig::from_json(
            r#"{
                "apiKey": "key",
                "outChainId": 8453,
                "outTokens": [
                    "0x4200000000000000000000000000000000000006",
                    "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913"
                ],
                "poolFeeGrade": 500,
                "ticks": [-200, 200],
                "defaults": { "slippageBps": 100, "poolRefreshInterval": "2m 30s" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.destination_chain_id(), 8453);
        assert_eq!(
            config.out_tokens.unwrap()[0],
            address!("4200000000000000000000000000000000000006")
        );
        assert_eq!(config.pool_fee_grade, Some(500));
        assert_eq!(config.ticks.unwrap().ticks(), [-200, 200]);
        assert_eq!(config.defaults.slippage_bps, 100);
        assert_eq!(config.defaults.fee_bps, 25);
        assert_eq!(
            config.defaults.pool_refresh_interval,
            Duration::from_secs(150)
        );
    }

    #[test]
    fn rejects_destination_without_position_manager() {
        assert!(matches!(
            WidgetConfig::from_json(r#"{ "outChainId": 137 }"#),
            Err(Error::UnsupportedChain(137))
        ));
    }

    #[test]
    fn rejects_unknown_fee_grade() {
        assert!(matches!(
            WidgetConfig::from_json(r#"{ "poolFeeGrade": 2500 }"#),
            Err(Error::InvalidFeeTier(2500))
        ));
    }

    #[test]
    fn rejects_empty_or_misaligned_ticks() {
        assert!(matches!(
            WidgetConfig::from_json(r#"{ "ticks": [60, -60] }"#),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            WidgetConfig::from_json(r#"{ "poolFeeGrade": 3000, "ticks": [-100, 100] }"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(WidgetConfig::from_json(r#"{ "poolFeeGrade": 3000, "ticks": [-120, 60] }"#).is_ok());
    }

    #[test]
    fn rejects_identical_tokens() {
        let config = WidgetConfig {
            out_tokens: Some([ROUTER_ADDRESS, ROUTER_ADDRESS]),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_intervals() {
        assert!(matches!(
            WidgetConfig::from_json(r#"{ "defaults": { "bridgeStatusPollInterval": "0s" } }"#),
            Err(Error::InvalidConfig(_))
        ));
    }
}
