use alloy_primitives::{Bytes, U256};

/// Generated method parameters for executing a call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodParameters {
    /// The encoded calldata to perform the given operation
    pub calldata: Bytes,
    /// The amount of ether (wei) to send.
    pub value: U256,
}
