//! DEX contract addresses per chain.

use crate::error::{parse_optional_address, storage};
use async_trait::async_trait;
use dexflow_domain::error::Result;
use dexflow_domain::prelude::*;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use uuid::Uuid;

/// Database record for a chain's deployment.
///
/// Blank address columns mean the contract has not been deployed yet.
#[derive(Debug, Clone)]
pub struct DeploymentRecord {
    pub chain_id: Uuid,
    pub factory_address: Option<String>,
    pub router_address: Option<String>,
    pub wrapped_native_address: Option<String>,
    pub version: String,
}

impl DeploymentRecord {
    fn from_row(row: &PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Self {
            chain_id: row.try_get("chain_id")?,
            factory_address: row.try_get("factory_address")?,
            router_address: row.try_get("router_address")?,
            wrapped_native_address: row.try_get("wrapped_native_address")?,
            version: row.try_get("version")?,
        })
    }

    /// Converts the record into a registry entry.
    ///
    /// # Errors
    /// Returns `External` when an address column is malformed.
    pub fn into_entry(self) -> Result<DeploymentRegistryEntry> {
        Ok(DeploymentRegistryEntry {
            chain_id: self.chain_id,
            factory_address: parse_optional_address(
                "deployments",
                "factory_address",
                self.factory_address.as_deref(),
            )?,
            router_address: parse_optional_address(
                "deployments",
                "router_address",
                self.router_address.as_deref(),
            )?,
            wrapped_native_address: parse_optional_address(
                "deployments",
                "wrapped_native_address",
                self.wrapped_native_address.as_deref(),
            )?,
            version: self.version,
        })
    }
}

/// Repository for deployment registry entries.
#[derive(Clone)]
pub struct DeploymentRepository {
    pool: Arc<PgPool>,
}

impl DeploymentRepository {
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Creates or replaces the entry of a chain.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn upsert(&self, entry: &DeploymentRegistryEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO deployments
                (chain_id, factory_address, router_address, wrapped_native_address, version)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (chain_id) DO UPDATE SET
                factory_address = EXCLUDED.factory_address,
                router_address = EXCLUDED.router_address,
                wrapped_native_address = EXCLUDED.wrapped_native_address,
                version = EXCLUDED.version,
                updated_at = NOW()
            "#,
        )
        .bind(entry.chain_id)
        .bind(entry.factory_address.map(|a| a.to_string()))
        .bind(entry.router_address.map(|a| a.to_string()))
        .bind(entry.wrapped_native_address.map(|a| a.to_string()))
        .bind(&entry.version)
        .execute(self.pool.as_ref())
        .await
        .map_err(storage)?;
        Ok(())
    }
}

#[async_trait]
impl DeploymentRegistry for DeploymentRepository {
    async fn by_chain(&self, chain_id: Uuid) -> Result<DeploymentRegistryEntry> {
        let row = sqlx::query("SELECT * FROM deployments WHERE chain_id = $1")
            .bind(chain_id)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(storage)?;
        let record = row
            .as_ref()
            .map(DeploymentRecord::from_row)
            .transpose()
            .map_err(storage)?
            .ok_or_else(|| DexError::not_found("deployment", chain_id))?;
        record.into_entry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_columns_are_not_provisioned() {
        let record = DeploymentRecord {
            chain_id: Uuid::new_v4(),
            factory_address: Some("0xfafafafafafafafafafafafafafafafafafafafa".into()),
            router_address: Some(String::new()),
            wrapped_native_address: None,
            version: "v2".into(),
        };
        let entry = record.into_entry().unwrap();
        assert_eq!(
            entry.factory_address,
            Some(Address::from_bytes([0xfa; 20]))
        );
        assert!(entry.router_address.is_none());
        assert!(matches!(entry.require_router(), Err(DexError::State(_))));
        assert!(entry.wrapped_native_address.is_none());
    }
}
