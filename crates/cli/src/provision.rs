//! Loads a fixture's chains, deployments and pools into PostgreSQL.

use anyhow::{Context, Result};
use dexflow_data::Database;
use dexflow_domain::prelude::*;
use dexflow_execution::prelude::Fixture;
use tracing::{info, warn};
use uuid::Uuid;

/// What a provisioning run writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSummary {
    pub chains: usize,
    pub deployments: usize,
    pub pools: usize,
    pub active_chain: Option<Uuid>,
}

impl ProvisionSummary {
    /// Validates the fixture and counts the rows it will write.
    ///
    /// # Errors
    /// Returns an error when the fixture references unknown chains or holds an invalid pool.
    pub fn of(fixture: &Fixture) -> Result<Self> {
        fixture.validate().context("fixture is inconsistent")?;
        Ok(Self {
            chains: fixture.chains.len(),
            deployments: fixture.deployments.len(),
            pools: fixture.pools.len(),
            active_chain: fixture.active_chain_id(),
        })
    }

    pub fn rows(&self) -> Vec<(String, String)> {
        vec![
            ("chains".to_string(), self.chains.to_string()),
            ("deployments".to_string(), self.deployments.to_string()),
            ("pools".to_string(), self.pools.to_string()),
            (
                "active_chain".to_string(),
                self.active_chain
                    .map_or_else(|| "-".to_string(), |id| id.to_string()),
            ),
        ]
    }
}

/// Upserts chains and deployments, selects the active chain and inserts pools.
///
/// Existing pools with the same id are left untouched, so the run can be repeated.
pub async fn provision(db: &Database, fixture: &Fixture) -> Result<ProvisionSummary> {
    let summary = ProvisionSummary::of(fixture)?;
    if !fixture.artifacts.is_empty() {
        warn!(
            count = fixture.artifacts.len(),
            "Fixture artifacts are not stored; point ARTIFACTS_DIR at the compiled files"
        );
    }

    let chains = db.chains();
    for chain in &fixture.chains {
        chains
            .upsert(chain)
            .await
            .with_context(|| format!("failed to store chain {}", chain.name))?;
    }
    if let Some(id) = summary.active_chain {
        chains.set_active(id).await.context("failed to select active chain")?;
    }

    let deployments = db.deployments();
    for entry in &fixture.deployments {
        deployments
            .upsert(entry)
            .await
            .with_context(|| format!("failed to store deployment of chain {}", entry.chain_id))?;
    }

    let pools = db.pools();
    for pool in &fixture.pools {
        pools
            .create(pool.clone())
            .await
            .with_context(|| format!("failed to store pool {}", pool.id))?;
    }

    info!(
        chains = summary.chains,
        deployments = summary.deployments,
        pools = summary.pools,
        "Provisioned database"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_fixture() -> Fixture {
        serde_json::from_str(include_str!("../../../demos/fixture.json")).unwrap()
    }

    #[test]
    fn test_summary_of_demo_fixture() {
        let fixture = demo_fixture();
        let summary = ProvisionSummary::of(&fixture).unwrap();
        assert_eq!(summary.chains, 1);
        assert_eq!(summary.deployments, 1);
        assert_eq!(summary.pools, 1);
        assert_eq!(summary.active_chain, Some(fixture.chains[0].id));

        let rows = summary.rows();
        assert_eq!(rows[3].1, fixture.chains[0].id.to_string());
    }

    #[test]
    fn test_summary_rejects_dangling_deployment() {
        let mut fixture = demo_fixture();
        fixture.deployments[0].chain_id = Uuid::new_v4();
        assert!(ProvisionSummary::of(&fixture).is_err());
    }

    #[test]
    fn test_summary_without_chains() {
        let summary = ProvisionSummary::of(&Fixture::default()).unwrap();
        assert_eq!(summary.active_chain, None);
        assert_eq!(summary.rows()[3].1, "-");
    }
}
