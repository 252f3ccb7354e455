#[cfg(doc)]
use crate::prelude::*;

#[cfg(feature = "extensions")]
use alloy::{contract::Error as ContractError, transports::TransportError};

use alloy_primitives::ChainId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Thrown when a tick is not between [`MIN_TICK`] and [`MAX_TICK`].
    #[error("Invalid tick: {0}")]
    InvalidTick(i32),

    /// Thrown when a tick spacing is not strictly positive.
    #[error("Invalid tick spacing: {0}")]
    InvalidTickSpacing(i32),

    /// Thrown when a [`PriceRange`] would not satisfy `tick_lower < tick_upper`.
    #[error("Invalid tick range: [{0}, {1}]")]
    InvalidRange(i32, i32),

    /// Thrown when a fee tier is not one of [`FeeAmount`].
    #[error("Invalid fee tier: {0}")]
    InvalidFeeTier(u32),

    /// Thrown when a chain is not a [`SupportedChain`] or lacks a required contract.
    #[error("Unsupported chain: {0}")]
    UnsupportedChain(ChainId),

    /// Thrown when an action consumes the output of an action that does not precede it.
    #[error("Action {action} references the output of action {target}, which does not precede it")]
    DanglingReference { action: usize, target: usize },

    /// Thrown when an action selects an output the referenced action does not produce.
    #[error("Action {action} selects output {index} of action {target}, which has {outputs} output(s)")]
    InvalidOutputIndex {
        action: usize,
        target: usize,
        index: usize,
        outputs: usize,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Thrown by collaborator implementations that have no richer error type.
    #[error("Service error: {0}")]
    Service(String),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "extensions")]
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Thrown when an HTTP service answers with a non-success status.
    #[cfg(feature = "extensions")]
    #[error("HTTP request returned status: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// Thrown when a GraphQL service answers with errors.
    #[cfg(feature = "extensions")]
    #[error("GraphQL errors: {0}")]
    Graph(String),

    #[cfg(feature = "extensions")]
    #[error("{0}")]
    Contract(#[from] ContractError),

    #[cfg(feature = "extensions")]
    #[error("{0}")]
    Transport(#[from] TransportError),
}
