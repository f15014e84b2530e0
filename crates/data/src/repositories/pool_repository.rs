//! Pool repository for pair persistence.

use crate::error::{parse_column, parse_optional_address, storage};
use async_trait::async_trait;
use dexflow_domain::error::Result;
use dexflow_domain::prelude::*;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use uuid::Uuid;

/// Database record for a pool.
#[derive(Debug, Clone)]
pub struct PoolRecord {
    pub id: Uuid,
    pub chain_id: Uuid,
    pub token0: String,
    pub token1: String,
    /// On-chain pair contract, set once creation is confirmed.
    pub pair_address: Option<String>,
    /// Seed amount of token0 in base units.
    pub initial_amount0: String,
    /// Seed amount of token1 in base units.
    pub initial_amount1: String,
    pub version: String,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl PoolRecord {
    fn from_row(row: &PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            chain_id: row.try_get("chain_id")?,
            token0: row.try_get("token0")?,
            token1: row.try_get("token1")?,
            pair_address: row.try_get("pair_address")?,
            initial_amount0: row.try_get("initial_amount0")?,
            initial_amount1: row.try_get("initial_amount1")?,
            version: row.try_get("version")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
        })
    }

    /// Converts the record into a domain pool.
    ///
    /// # Errors
    /// Returns `External` when a column is malformed.
    pub fn into_pool(self) -> Result<Pool> {
        let pool = Pool {
            id: self.id,
            chain_id: self.chain_id,
            token0: parse_column("pools", "token0", &self.token0)?,
            token1: parse_column("pools", "token1", &self.token1)?,
            pair_address: parse_optional_address(
                "pools",
                "pair_address",
                self.pair_address.as_deref(),
            )?,
            initial_amount0: parse_column("pools", "initial_amount0", &self.initial_amount0)?,
            initial_amount1: parse_column("pools", "initial_amount1", &self.initial_amount1)?,
            version: self.version,
            status: parse_column("pools", "status", &self.status)?,
            created_at: self.created_at,
        };
        pool.validate()?;
        Ok(pool)
    }
}

/// Repository for pool persistence.
#[derive(Clone)]
pub struct PoolRepository {
    pool: Arc<PgPool>,
}

impl PoolRepository {
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PoolStore for PoolRepository {
    async fn by_token_pair(&self, chain_id: Uuid, a: Address, b: Address) -> Result<Option<Pool>> {
        let row = sqlx::query(
            r#"
            SELECT * FROM pools
            WHERE chain_id = $1
              AND ((token0 = $2 AND token1 = $3) OR (token0 = $3 AND token1 = $2))
            ORDER BY (status = 'confirmed') DESC, created_at DESC
            LIMIT 1
            "#,
        )
        .bind(chain_id)
        .bind(a.to_string())
        .bind(b.to_string())
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(storage)?;
        row.as_ref()
            .map(PoolRecord::from_row)
            .transpose()
            .map_err(storage)?
            .map(PoolRecord::into_pool)
            .transpose()
    }

    async fn create(&self, pool: Pool) -> Result<Uuid> {
        pool.validate()?;
        sqlx::query(
            r#"
            INSERT INTO pools (id, chain_id, token0, token1, pair_address,
                               initial_amount0, initial_amount1, version, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(pool.id)
        .bind(pool.chain_id)
        .bind(pool.token0.to_string())
        .bind(pool.token1.to_string())
        .bind(pool.pair_address.map(|a| a.to_string()))
        .bind(pool.initial_amount0.to_string())
        .bind(pool.initial_amount1.to_string())
        .bind(&pool.version)
        .bind(pool.status.as_str())
        .bind(pool.created_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(storage)?;
        Ok(pool.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(status: &str, pair_address: Option<&str>) -> PoolRecord {
        PoolRecord {
            id: Uuid::new_v4(),
            chain_id: Uuid::new_v4(),
            token0: "0x0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a".into(),
            token1: "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee".into(),
            pair_address: pair_address.map(String::from),
            initial_amount0: "115792089237316195423570985008687907853269984665640564039457584007913129639935".into(),
            initial_amount1: "1000000000000000000".into(),
            version: "v2".into(),
            status: status.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_into_pool_keeps_full_width_amounts() {
        let pool = record("pending", None).into_pool().unwrap();
        assert_eq!(pool.initial_amount0, TokenAmount::MAX);
        assert_eq!(pool.token1, Address::from_bytes([0xee; 20]));
        assert_eq!(pool.status, ConfirmationStatus::Pending);
    }

    #[test]
    fn test_confirmed_without_pair_is_rejected() {
        let err = record("confirmed", None).into_pool().unwrap_err();
        assert!(matches!(err, DexError::State(_)));

        let pool = record(
            "confirmed",
            Some("0x8a8a8a8a8a8a8a8a8a8a8a8a8a8a8a8a8a8a8a8a"),
        )
        .into_pool()
        .unwrap();
        assert!(pool.is_confirmed());
    }
}
