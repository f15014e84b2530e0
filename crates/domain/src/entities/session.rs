use crate::entities::TransactionStep;
use crate::enums::{ChainType, ConfirmationStatus};
use crate::error::DexError;
use crate::metadata::Metadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque session identifier handed to the signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = DexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| DexError::validation(format!("invalid session id '{s}': {e}")))
    }
}

/// An ordered set of prepared transactions awaiting a human signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSession {
    pub id: SessionId,
    pub chain_type: ChainType,
    pub chain_id: Uuid,
    /// Must be executed in array order.
    pub steps: Vec<TransactionStep>,
    pub metadata: Metadata,
    pub status: ConfirmationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionSession {
    /// A freshly created, pending session.
    pub fn pending(
        id: SessionId,
        steps: Vec<TransactionStep>,
        chain_type: ChainType,
        chain_id: Uuid,
        metadata: Metadata,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            chain_type,
            chain_id,
            steps,
            metadata,
            status: ConfirmationStatus::Pending,
            created_at,
            updated_at: created_at,
        }
    }
}
