//! Requested liquidity changes.

use crate::error::storage;
use async_trait::async_trait;
use dexflow_domain::error::Result;
use dexflow_domain::prelude::*;
use sqlx::PgPool;
use std::sync::Arc;

/// Repository for liquidity changes.
#[derive(Clone)]
pub struct LiquidityRepository {
    pool: Arc<PgPool>,
}

impl LiquidityRepository {
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LiquidityStore for LiquidityRepository {
    async fn create(&self, position: LiquidityPosition) -> Result<PositionId> {
        sqlx::query(
            r#"
            INSERT INTO liquidity_positions (id, pool_id, session_id, holder, amount0, amount1,
                                             liquidity, action, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(position.id.0)
        .bind(position.pool_id)
        .bind(position.session_id.map(|id| id.0))
        .bind(position.holder.map(|a| a.to_string()))
        .bind(position.amount0.to_string())
        .bind(position.amount1.to_string())
        .bind(position.liquidity.to_string())
        .bind(position.action.as_str())
        .bind(position.status.as_str())
        .bind(position.created_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(storage)?;
        Ok(position.id)
    }
}
