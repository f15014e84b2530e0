//! Ordered, typed key/value metadata attached to sessions.

use crate::token::TokenAmount;
use crate::value_objects::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single typed metadata value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MetadataValue {
    Text(String),
    Address(Address),
    Amount(TokenAmount),
    Decimal(Decimal),
    Integer(i64),
    Flag(bool),
    Id(Uuid),
}

impl std::fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(v) => f.write_str(v),
            Self::Address(v) => write!(f, "{v}"),
            Self::Amount(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Flag(v) => write!(f, "{v}"),
            Self::Id(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Address> for MetadataValue {
    fn from(v: Address) -> Self {
        Self::Address(v)
    }
}

impl From<TokenAmount> for MetadataValue {
    fn from(v: TokenAmount) -> Self {
        Self::Amount(v)
    }
}

impl From<Decimal> for MetadataValue {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<i64> for MetadataValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for MetadataValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<Uuid> for MetadataValue {
    fn from(v: Uuid) -> Self {
        Self::Id(v)
    }
}

/// One metadata entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub key: String,
    pub value: MetadataValue,
}

/// Insertion-ordered metadata list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Vec<MetadataEntry>);

impl Metadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Appends an entry; later entries with the same key shadow earlier ones in [`Metadata::get`].
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.0.push(MetadataEntry {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Inserts an entry at the front.
    pub fn prepend(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.0.insert(
            0,
            MetadataEntry {
                key: key.into(),
                value: value.into(),
            },
        );
    }

    /// Last value recorded under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.0.iter().rev().find(|e| e.key == key).map(|e| &e.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetadataEntry> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
