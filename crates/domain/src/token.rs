use crate::error::{DexError, Result};
use primitive_types::U256;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Decimals of the native currency on EVM chains.
pub const NATIVE_DECIMALS: u8 = 18;

/// An exact token quantity in base units (wei scale).
///
/// Serialized as a decimal string so JSON consumers never see float rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TokenAmount(pub U256);

impl TokenAmount {
    /// Largest representable amount, used for unlimited approvals.
    pub const MAX: Self = Self(U256::MAX);

    pub fn zero() -> Self {
        Self(U256::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Converts a human-readable amount into base units.
    ///
    /// e.g. "1.5" with 18 decimals becomes 1500000000000000000.
    pub fn parse_units(amount: &str, decimals: u8) -> Result<Self> {
        let amount = amount.trim();
        let (integer_part, fraction_part) = match amount.split_once('.') {
            Some((int, frac)) => (int, frac),
            None => (amount, ""),
        };
        if integer_part.is_empty() && fraction_part.is_empty() {
            return Err(DexError::validation("amount is empty"));
        }
        if fraction_part.len() > usize::from(decimals) {
            return Err(DexError::validation(format!(
                "amount '{amount}' has more than {decimals} decimal places"
            )));
        }
        let digits = format!(
            "{}{:0<width$}",
            integer_part,
            fraction_part,
            width = usize::from(decimals)
        );
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DexError::validation(format!(
                "amount '{amount}' is not a plain decimal number"
            )));
        }
        digits.parse()
    }

    /// Formats base units as a human-readable decimal string.
    pub fn format_units(&self, decimals: u8) -> String {
        let raw = self.0.to_string();
        let decimals = usize::from(decimals);
        if decimals == 0 {
            return raw;
        }
        let padded = format!("{:0>width$}", raw, width = decimals + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.is_empty() {
            int_part.to_string()
        } else {
            format!("{int_part}.{frac_part}")
        }
    }
}

impl From<u64> for TokenAmount {
    fn from(v: u64) -> Self {
        Self(U256::from(v))
    }
}

impl From<u128> for TokenAmount {
    fn from(v: u128) -> Self {
        Self(U256::from(v))
    }
}

impl From<U256> for TokenAmount {
    fn from(v: U256) -> Self {
        Self(v)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TokenAmount {
    type Err = DexError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(DexError::validation(format!(
                "amount '{s}' must be a non-negative integer in base units"
            )));
        }
        U256::from_dec_str(s)
            .map(Self)
            .map_err(|_| DexError::validation(format!("amount '{s}' does not fit in 256 bits")))
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct AmountVisitor;

        impl Visitor<'_> for AmountVisitor {
            type Value = TokenAmount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal integer string or unsigned integer")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<TokenAmount, E> {
                Ok(TokenAmount::from(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<TokenAmount, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}
