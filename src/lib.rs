//! # uniswap-v4-migrator
//!
//! Tick math, range policy and bundle construction for moving liquidity into Uniswap V4 positions,
//! from a plain token amount or from an existing Uniswap V3 position, on the same chain or across
//! chains through a bridge.
//!
//! ## Features
//!
//! - Usage of [alloy-rs](https://github.com/alloy-rs) types
//! - Tick and price conversions shared with the Uniswap V3 math
//! - A [`MigrationBundle`](crate::migration_bundle::MigrationBundle) builder that emits the ordered
//!   action list priced by the execution service
//! - A message-driven [`MigrationSessionController`](crate::session::MigrationSessionController)
//!   holding the state of a migration form
//! - An [`extensions`](./src/extensions) feature with concrete clients of the collaborators:
//!
//!     - [`enso`](./src/extensions/enso.rs) module for bundle quotes and token metadata
//!     - [`stargate`](./src/extensions/stargate.rs) module for bridge pools
//!     - [`layerzero`](./src/extensions/layerzero.rs) module for bridge message status
//!     - [`subgraph`](./src/extensions/subgraph.rs) module for V3 positions and V4 pools
//!     - [`chain`](./src/extensions/chain.rs) module for reads and writes through an alloy
//!       provider

pub mod abi;
pub mod actions;
pub mod approval;
pub mod config;
pub mod constants;
pub mod entities;
pub mod error;
pub mod migration_bundle;
pub mod services;
pub mod session;
pub mod utils;

#[cfg(feature = "extensions")]
pub mod extensions;

#[cfg(test)]
mod tests;

pub mod prelude {
    pub use crate::{
        abi::*, actions::*, approval::*, config::*, constants::*, entities::*, error::*,
        migration_bundle::*, services::*, session::*, utils::*,
    };

    #[cfg(feature = "extensions")]
    pub use crate::extensions::*;
}
