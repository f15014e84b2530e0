use crate::error::{DexError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A percentage expressed in percent points (`1` means 1%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(pub Decimal);

impl Percentage {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Checks that this percentage is a usable slippage tolerance, i.e. in `[0, 100)`.
    pub fn ensure_slippage(&self) -> Result<()> {
        if self.0.is_sign_negative() || self.0 >= Decimal::ONE_HUNDRED {
            return Err(DexError::validation(format!(
                "slippage tolerance {}% must be within [0, 100)",
                self.0
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}
