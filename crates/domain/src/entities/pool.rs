use crate::enums::ConfirmationStatus;
use crate::error::{DexError, Result};
use crate::token::TokenAmount;
use crate::value_objects::{Address, HopReserves};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A constant-product pool known to the engine.
///
/// The pair address stays empty until the creation transaction is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub id: Uuid,
    pub chain_id: Uuid,
    pub token0: Address,
    pub token1: Address,
    pub pair_address: Option<Address>,
    /// Seed amount of token0 supplied at creation.
    pub initial_amount0: TokenAmount,
    /// Seed amount of token1 supplied at creation.
    pub initial_amount1: TokenAmount,
    /// AMM version tag, e.g. "v2".
    pub version: String,
    pub status: ConfirmationStatus,
    pub created_at: DateTime<Utc>,
}

impl Pool {
    /// Creates a pending pool awaiting its on-chain creation.
    pub fn new_pending(
        chain_id: Uuid,
        token0: Address,
        token1: Address,
        initial_amount0: TokenAmount,
        initial_amount1: TokenAmount,
        version: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let pool = Self {
            id: Uuid::new_v4(),
            chain_id,
            token0,
            token1,
            pair_address: None,
            initial_amount0,
            initial_amount1,
            version: version.into(),
            status: ConfirmationStatus::Pending,
            created_at,
        };
        pool.validate()?;
        Ok(pool)
    }

    /// Checks the pool invariants.
    pub fn validate(&self) -> Result<()> {
        if self.token0 == self.token1 {
            return Err(DexError::validation(format!(
                "pool tokens must differ, both are {}",
                self.token0
            )));
        }
        if self.status == ConfirmationStatus::Confirmed && self.pair_address.is_none() {
            return Err(DexError::state(format!(
                "pool {} is confirmed but has no pair address",
                self.id
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.status == ConfirmationStatus::Confirmed
    }

    /// Fails with a state error unless the pool is live on-chain.
    pub fn ensure_confirmed(&self) -> Result<()> {
        if self.is_confirmed() {
            Ok(())
        } else {
            Err(DexError::state(format!(
                "pool {}/{} is {} and cannot be traded against",
                self.token0, self.token1, self.status
            )))
        }
    }

    /// Pair address of a confirmed pool.
    pub fn require_pair_address(&self) -> Result<Address> {
        self.ensure_confirmed()?;
        self.pair_address.ok_or_else(|| {
            DexError::state(format!("pool {} has no pair address", self.id))
        })
    }

    /// Whether the pool holds exactly the tokens `a` and `b`, in any order.
    #[must_use]
    pub fn matches(&self, a: Address, b: Address) -> bool {
        (self.token0 == a && self.token1 == b) || (self.token0 == b && self.token1 == a)
    }

    /// Seed amounts oriented so that `token_in` is the input side.
    #[must_use]
    pub fn seed_reserves_for(&self, token_in: Address) -> Option<HopReserves> {
        if token_in == self.token0 {
            Some(HopReserves::new(self.initial_amount0, self.initial_amount1))
        } else if token_in == self.token1 {
            Some(HopReserves::new(self.initial_amount1, self.initial_amount0))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn test_rejects_identical_tokens() {
        let err = Pool::new_pending(
            Uuid::new_v4(),
            token(1),
            token(1),
            TokenAmount::from(1u64),
            TokenAmount::from(1u64),
            "v2",
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DexError::Validation(_)));
    }

    #[test]
    fn test_confirmed_requires_pair_address() {
        let mut pool = Pool::new_pending(
            Uuid::new_v4(),
            token(1),
            token(2),
            TokenAmount::from(10u64),
            TokenAmount::from(20u64),
            "v2",
            Utc::now(),
        )
        .unwrap();
        assert!(pool.ensure_confirmed().is_err());

        pool.status = ConfirmationStatus::Confirmed;
        assert!(matches!(pool.validate(), Err(DexError::State(_))));

        pool.pair_address = Some(token(9));
        assert!(pool.validate().is_ok());
        assert_eq!(pool.require_pair_address().unwrap(), token(9));
    }

    #[test]
    fn test_seed_reserves_orientation() {
        let pool = Pool::new_pending(
            Uuid::new_v4(),
            token(1),
            token(2),
            TokenAmount::from(10u64),
            TokenAmount::from(20u64),
            "v2",
            Utc::now(),
        )
        .unwrap();
        let reversed = pool.seed_reserves_for(token(2)).unwrap();
        assert_eq!(reversed.reserve_in, TokenAmount::from(20u64));
        assert_eq!(reversed.reserve_out, TokenAmount::from(10u64));
        assert!(pool.seed_reserves_for(token(3)).is_none());
        assert!(pool.matches(token(2), token(1)));
    }
}
