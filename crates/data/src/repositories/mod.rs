//! Repository implementations for database persistence.
//!
//! Each repository implements one of the domain store ports on top of a shared
//! PostgreSQL connection pool.

mod chain_repository;
mod deployment_repository;
mod liquidity_repository;
mod pool_repository;
mod session_repository;

pub use chain_repository::{ChainRecord, ChainRepository};
pub use deployment_repository::{DeploymentRecord, DeploymentRepository};
pub use liquidity_repository::LiquidityRepository;
pub use pool_repository::{PoolRecord, PoolRepository};
pub use session_repository::{SessionRecord, SessionRepository};

use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

/// Database connection wrapper for repositories.
#[derive(Clone)]
pub struct Database {
    pool: Arc<PgPool>,
}

impl Database {
    /// Creates a new Database wrapper from a connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Creates a new database connection from a connection string.
    ///
    /// # Arguments
    /// * `database_url` - PostgreSQL connection string
    ///
    /// # Errors
    /// Returns an error if the connection fails.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPool::connect(database_url).await?;
        info!("Connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    #[must_use]
    pub fn chains(&self) -> ChainRepository {
        ChainRepository::new(self.pool.clone())
    }

    #[must_use]
    pub fn deployments(&self) -> DeploymentRepository {
        DeploymentRepository::new(self.pool.clone())
    }

    #[must_use]
    pub fn pools(&self) -> PoolRepository {
        PoolRepository::new(self.pool.clone())
    }

    #[must_use]
    pub fn positions(&self) -> LiquidityRepository {
        LiquidityRepository::new(self.pool.clone())
    }

    #[must_use]
    pub fn sessions(&self) -> SessionRepository {
        SessionRepository::new(self.pool.clone())
    }

    /// Runs database migrations.
    ///
    /// # Errors
    /// Returns an error if migrations fail.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(include_str!("../../migrations/001_initial_schema.sql"))
            .execute(self.pool.as_ref())
            .await?;
        info!("Database schema is up to date");
        Ok(())
    }
}
