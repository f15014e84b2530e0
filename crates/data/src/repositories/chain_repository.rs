//! Chain registry backed by the `chains` table.

use crate::error::{corrupt, parse_column, storage};
use async_trait::async_trait;
use dexflow_domain::error::Result;
use dexflow_domain::prelude::*;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use uuid::Uuid;

/// Database record for a configured chain.
#[derive(Debug, Clone)]
pub struct ChainRecord {
    pub id: Uuid,
    pub name: String,
    /// `ethereum` or `solana`.
    pub chain_type: String,
    pub rpc_url: String,
    pub network_id: i64,
    /// At most one chain is active.
    pub is_active: bool,
}

impl ChainRecord {
    fn from_row(row: &PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            chain_type: row.try_get("chain_type")?,
            rpc_url: row.try_get("rpc_url")?,
            network_id: row.try_get("network_id")?,
            is_active: row.try_get("is_active")?,
        })
    }

    /// Converts the record into the domain chain.
    ///
    /// # Errors
    /// Returns `External` when a column no longer parses.
    pub fn into_chain(self) -> Result<Chain> {
        let chain_type = parse_column("chains", "chain_type", &self.chain_type)?;
        let network_id =
            u64::try_from(self.network_id).map_err(|e| corrupt("chains", "network_id", e))?;
        Ok(Chain {
            id: self.id,
            name: self.name,
            chain_type,
            rpc_url: self.rpc_url,
            network_id,
        })
    }
}

/// Repository for chains.
#[derive(Clone)]
pub struct ChainRepository {
    pool: Arc<PgPool>,
}

impl ChainRepository {
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Creates or updates a chain without changing which chain is active.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn upsert(&self, chain: &Chain) -> Result<()> {
        let network_id =
            i64::try_from(chain.network_id).map_err(|e| DexError::validation(e.to_string()))?;
        sqlx::query(
            r#"
            INSERT INTO chains (id, name, chain_type, rpc_url, network_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                chain_type = EXCLUDED.chain_type,
                rpc_url = EXCLUDED.rpc_url,
                network_id = EXCLUDED.network_id
            "#,
        )
        .bind(chain.id)
        .bind(&chain.name)
        .bind(chain.chain_type.as_str())
        .bind(&chain.rpc_url)
        .bind(network_id)
        .execute(self.pool.as_ref())
        .await
        .map_err(storage)?;
        Ok(())
    }

    /// Makes `id` the only active chain.
    ///
    /// # Errors
    /// Returns `NotFound` when the chain does not exist.
    pub async fn set_active(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(storage)?;
        sqlx::query("UPDATE chains SET is_active = FALSE WHERE is_active")
            .execute(&mut *tx)
            .await
            .map_err(storage)?;
        let updated = sqlx::query("UPDATE chains SET is_active = TRUE WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;
        if updated.rows_affected() == 0 {
            return Err(DexError::not_found("chain", id));
        }
        tx.commit().await.map_err(storage)
    }

    async fn fetch_one(&self, query: &'static str, id: Option<Uuid>) -> Result<Option<Chain>> {
        let mut query = sqlx::query(query);
        if let Some(id) = id {
            query = query.bind(id);
        }
        let row = query
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(storage)?;
        row.as_ref()
            .map(ChainRecord::from_row)
            .transpose()
            .map_err(storage)?
            .map(ChainRecord::into_chain)
            .transpose()
    }
}

#[async_trait]
impl ChainRegistry for ChainRepository {
    async fn active_chain(&self) -> Result<Chain> {
        self.fetch_one("SELECT * FROM chains WHERE is_active LIMIT 1", None)
            .await?
            .ok_or_else(|| DexError::not_found("chain", "active"))
    }

    async fn by_id(&self, id: Uuid) -> Result<Chain> {
        self.fetch_one("SELECT * FROM chains WHERE id = $1", Some(id))
            .await?
            .ok_or_else(|| DexError::not_found("chain", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(chain_type: &str, network_id: i64) -> ChainRecord {
        ChainRecord {
            id: Uuid::new_v4(),
            name: "anvil".into(),
            chain_type: chain_type.into(),
            rpc_url: "http://localhost:8545".into(),
            network_id,
            is_active: true,
        }
    }

    #[test]
    fn test_into_chain() {
        let chain = record("ethereum", 31337).into_chain().unwrap();
        assert_eq!(chain.chain_type, ChainType::Ethereum);
        assert_eq!(chain.network_id, 31337);
    }

    #[test]
    fn test_corrupt_columns_are_external() {
        assert!(matches!(
            record("cosmos", 1).into_chain(),
            Err(DexError::External(_))
        ));
        assert!(matches!(
            record("ethereum", -1).into_chain(),
            Err(DexError::External(_))
        ));
    }
}
