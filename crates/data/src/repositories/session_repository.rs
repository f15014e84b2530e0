//! Signable sessions stored with their steps and metadata as JSONB.

use crate::error::{parse_column, storage};
use async_trait::async_trait;
use dexflow_domain::error::Result;
use dexflow_domain::prelude::*;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use uuid::Uuid;

/// Database record for a transaction session.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: Uuid,
    pub chain_type: String,
    pub chain_id: Uuid,
    pub steps: Vec<TransactionStep>,
    pub metadata: Metadata,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl SessionRecord {
    fn from_row(row: &PgRow) -> std::result::Result<Self, sqlx::Error> {
        let Json(steps): Json<Vec<TransactionStep>> = row.try_get("steps")?;
        let Json(metadata): Json<Metadata> = row.try_get("metadata")?;
        Ok(Self {
            id: row.try_get("id")?,
            chain_type: row.try_get("chain_type")?,
            chain_id: row.try_get("chain_id")?,
            steps,
            metadata,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    /// Converts the record into a domain session.
    ///
    /// # Errors
    /// Returns `External` when a column is malformed.
    pub fn into_session(self) -> Result<TransactionSession> {
        Ok(TransactionSession {
            id: SessionId(self.id),
            chain_type: parse_column("transaction_sessions", "chain_type", &self.chain_type)?,
            chain_id: self.chain_id,
            steps: self.steps,
            metadata: self.metadata,
            status: parse_column("transaction_sessions", "status", &self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for transaction sessions.
#[derive(Clone)]
pub struct SessionRepository {
    pool: Arc<PgPool>,
}

impl SessionRepository {
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn insert(&self, session: &TransactionSession) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transaction_sessions
                (id, chain_type, chain_id, steps, metadata, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(session.id.0)
        .bind(session.chain_type.as_str())
        .bind(session.chain_id)
        .bind(Json(&session.steps))
        .bind(Json(&session.metadata))
        .bind(session.status.as_str())
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DexError::state(format!("session {} already exists", session.id))
            }
            _ => storage(e),
        })?;
        Ok(())
    }

    async fn get(&self, id: SessionId) -> Result<Option<TransactionSession>> {
        let row = sqlx::query("SELECT * FROM transaction_sessions WHERE id = $1")
            .bind(id.0)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(storage)?;
        row.as_ref()
            .map(SessionRecord::from_row)
            .transpose()
            .map_err(storage)?
            .map(SessionRecord::into_session)
            .transpose()
    }
}
