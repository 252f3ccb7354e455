use crate::constants::{NATIVE_TOKEN, NULL_ADDRESS};
use alloy_primitives::Address;

/// A token pair and its amounts in the order a V4 pool key expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderedTokens<A> {
    pub tokens: [Address; 2],
    pub amounts: [A; 2],
    /// Whether the canonical order differs from the order the tokens were given in.
    pub inverted: bool,
}

/// Orders two tokens and their amounts the way a V4 pool key expects them.
///
/// The native asset placeholder [`NATIVE_TOKEN`] is replaced with [`NULL_ADDRESS`] and always sorts
/// first. Other addresses are sorted ascending, which compares their bytes and is therefore
/// independent of checksum casing.
///
/// ## Arguments
///
/// * `token_a`: the first token as chosen by the user
/// * `token_b`: the second token as chosen by the user
/// * `amount_a`: the amount of `token_a`
/// * `amount_b`: the amount of `token_b`
pub fn order_tokens_and_amounts<A>(
    token_a: Address,
    token_b: Address,
    amount_a: A,
    amount_b: A,
) -> OrderedTokens<A> {
    if token_a == NATIVE_TOKEN {
        return OrderedTokens {
            tokens: [NULL_ADDRESS, token_b],
            amounts: [amount_a, amount_b],
            inverted: false,
        };
    }
    if token_b == NATIVE_TOKEN {
        return OrderedTokens {
            tokens: [NULL_ADDRESS, token_a],
            amounts: [amount_b, amount_a],
            inverted: true,
        };
    }
    if token_a < token_b {
        OrderedTokens {
            tokens: [token_a, token_b],
            amounts: [amount_a, amount_b],
            inverted: false,
        }
    } else {
        OrderedTokens {
            tokens: [token_b, token_a],
            amounts: [amount_b, amount_a],
            inverted: true,
        }
    }
}

/// A canonically ordered token pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenPair {
    pub token0: Address,
    pub token1: Address,
    /// Whether `token0` is the second token the user picked.
    pub inverted: bool,
}

impl TokenPair {
    #[inline]
    pub fn new(token_a: Address, token_b: Address) -> Self {
        let OrderedTokens {
            tokens: [token0, token1],
            inverted,
            ..
        } = order_tokens_and_amounts(token_a, token_b, (), ());
        Self {
            token0,
            token1,
            inverted,
        }
    }

    #[inline]
    pub const fn tokens(&self) -> [Address; 2] {
        [self.token0, self.token1]
    }

    /// Reorders a pair of per-token values given in user order into canonical order.
    #[inline]
    pub fn order<T>(&self, value_a: T, value_b: T) -> [T; 2] {
        if self.inverted {
            [value_b, value_a]
        } else {
            [value_a, value_b]
        }
    }
}
