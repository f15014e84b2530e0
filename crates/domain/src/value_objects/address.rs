use crate::error::{DexError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 20-byte EVM account or contract address.
///
/// The zero address is the native-currency sentinel in pair requests; `ETH` and
/// `NATIVE` parse to it as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// Native currency sentinel.
    pub const NATIVE: Self = Self([0u8; 20]);

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_native(&self) -> bool {
        *self == Self::NATIVE
    }

    /// Parses an address column where an empty string means "not provisioned".
    pub fn parse_optional(s: &str) -> Result<Option<Self>> {
        let s = s.trim();
        if s.is_empty() {
            Ok(None)
        } else {
            s.parse().map(Some)
        }
    }
}

impl FromStr for Address {
    type Err = DexError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("eth") || s.eq_ignore_ascii_case("native") {
            return Ok(Self::NATIVE);
        }
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| DexError::validation(format!("address '{s}' must be 0x-prefixed")))?;
        if digits.len() != 40 {
            return Err(DexError::validation(format!(
                "address '{s}' must have 40 hex digits, got {}",
                digits.len()
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| DexError::validation(format!("address '{s}' is not valid hex: {e}")))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Option<Address>` written as `""` when absent.
///
/// The signing front end reads a blank receiver as "contract creation".
pub mod blank_as_none {
    use super::Address;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Address>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(address) => serializer.collect_str(address),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Address>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Address::parse_optional(&raw).map_err(serde::de::Error::custom)
    }
}
