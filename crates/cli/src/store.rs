//! Wires the store ports for the configured backend.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use dexflow_data::{Database, FileArtifactSource};
use dexflow_execution::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Postgres repositories when `DATABASE_URL` is set, otherwise an in-memory
/// store seeded from `fixture`.
pub async fn connect(config: &AppConfig, fixture: Option<&Path>) -> Result<Ports> {
    let mut ports = match &config.database_url {
        Some(url) => {
            let db = Database::connect(url)
                .await
                .context("failed to connect to PostgreSQL")?;
            db.migrate().await.context("failed to apply schema")?;
            if fixture.is_some() {
                warn!("--fixture is ignored when DATABASE_URL is set");
            }
            Ports {
                chains: Arc::new(db.chains()),
                deployments: Arc::new(db.deployments()),
                pools: Arc::new(db.pools()),
                positions: Arc::new(db.positions()),
                sessions: Arc::new(db.sessions()),
                artifacts: Arc::new(FileArtifactSource::new(
                    config
                        .artifacts_dir
                        .clone()
                        .unwrap_or_else(|| "artifacts".into()),
                )),
            }
        }
        None => {
            let store = match fixture {
                Some(path) => InMemoryStore::from_fixture(load_fixture(path).await?)
                    .await
                    .context("fixture is inconsistent")?,
                None => InMemoryStore::new(),
            };
            info!("Using in-memory store");
            Ports::from_store(Arc::new(store))
        }
    };

    if config.database_url.is_none()
        && let Some(dir) = &config.artifacts_dir
    {
        ports.artifacts = Arc::new(FileArtifactSource::new(dir.clone()));
    }
    Ok(ports)
}

/// Reads a JSON fixture file.
pub async fn load_fixture(path: &Path) -> Result<Fixture> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a valid fixture", path.display()))
}
