use crate::error::{DexError, Result};
use crate::token::TokenAmount;
use primitive_types::{U256, U512};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Initial pool price of one token in terms of its paired asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialPrice {
    /// Paired base units per whole token (`paired * 10^decimals / token`).
    pub scaled: TokenAmount,
    /// Human-readable ratio rounded to a fixed number of places.
    pub display: String,
}

impl InitialPrice {
    pub fn new(scaled: TokenAmount, display: impl Into<String>) -> Self {
        Self {
            scaled,
            display: display.into(),
        }
    }
}

/// Largest mantissa a `Decimal` can hold (2^96 - 1).
const DECIMAL_MANTISSA_MAX: u128 = (1u128 << 96) - 1;
/// Most fractional digits a `Decimal` can carry.
const DECIMAL_MAX_SCALE: u32 = 28;

/// Price impact `100 * amount_in / reserve_in`, held as an exact ratio.
///
/// Comparisons cross-multiply in 512 bits, so any two distinct inputs against
/// the same reserve order correctly no matter how small the trade is.
#[derive(Debug, Clone, Copy)]
pub struct PriceImpact {
    amount_in: U256,
    reserve_in: U256,
}

impl PriceImpact {
    /// # Errors
    /// Returns an arithmetic error when the reserve is zero.
    pub fn new(amount_in: TokenAmount, reserve_in: TokenAmount) -> Result<Self> {
        if reserve_in.is_zero() {
            return Err(DexError::arithmetic("reserve must be positive"));
        }
        Ok(Self {
            amount_in: amount_in.0,
            reserve_in: reserve_in.0,
        })
    }

    /// The percentage as a `Decimal`, keeping as many fractional digits as fit.
    ///
    /// Ratios whose integer part exceeds the `Decimal` range saturate at `Decimal::MAX`.
    pub fn to_decimal(&self) -> Decimal {
        let numerator = self.amount_in.full_mul(U256::from(100u64));
        let denominator = U512::from(self.reserve_in);
        let limit = U512::from(DECIMAL_MANTISSA_MAX);
        for scale in (0..=DECIMAL_MAX_SCALE).rev() {
            let scaled = numerator * U512::exp10(scale as usize) / denominator;
            if scaled > limit {
                continue;
            }
            let mantissa = i128::try_from(scaled.low_u128()).unwrap_or(i128::MAX);
            if let Ok(value) = Decimal::try_from_i128_with_scale(mantissa, scale) {
                return value.normalize();
            }
        }
        Decimal::MAX
    }
}

impl PartialEq for PriceImpact {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PriceImpact {}

impl PartialOrd for PriceImpact {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriceImpact {
    fn cmp(&self, other: &Self) -> Ordering {
        self.amount_in
            .full_mul(other.reserve_in)
            .cmp(&other.amount_in.full_mul(self.reserve_in))
    }
}

impl fmt::Display for PriceImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}
