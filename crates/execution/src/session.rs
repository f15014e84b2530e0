//! Signable session management.

use chrono::{DateTime, Utc};
use dexflow_domain::error::Result;
use dexflow_domain::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Persists prepared plans as pending sessions and reads them back.
///
/// Session status is never advanced here; an external watcher confirms or
/// fails sessions once the signer has acted.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    signing_base_url: String,
}

impl SessionManager {
    /// Creates a manager over a session store.
    pub fn new(store: Arc<dyn SessionStore>, signing_base_url: impl Into<String>) -> Self {
        Self {
            store,
            signing_base_url: signing_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Stores `steps` verbatim as a pending session.
    pub async fn create_session(
        &self,
        steps: Vec<TransactionStep>,
        chain_type: ChainType,
        chain_id: Uuid,
        metadata: Metadata,
    ) -> Result<SessionId> {
        self.create_session_at(steps, chain_type, chain_id, metadata, Utc::now())
            .await
    }

    /// Same as [`create_session`](Self::create_session) with an explicit creation time.
    pub async fn create_session_at(
        &self,
        steps: Vec<TransactionStep>,
        chain_type: ChainType,
        chain_id: Uuid,
        metadata: Metadata,
        now: DateTime<Utc>,
    ) -> Result<SessionId> {
        let session = Self::draft(SessionId::generate(), steps, chain_type, chain_id, metadata, now)?;
        self.store(&session).await?;
        Ok(session.id)
    }

    /// Builds a pending session without storing it, so the id is known before any write.
    pub fn draft(
        id: SessionId,
        steps: Vec<TransactionStep>,
        chain_type: ChainType,
        chain_id: Uuid,
        metadata: Metadata,
        now: DateTime<Utc>,
    ) -> Result<TransactionSession> {
        if steps.is_empty() {
            return Err(DexError::validation(
                "a session needs at least one transaction step",
            ));
        }
        Ok(TransactionSession::pending(
            id, steps, chain_type, chain_id, metadata, now,
        ))
    }

    /// Persists a drafted session in a single write.
    pub async fn store(&self, session: &TransactionSession) -> Result<()> {
        self.store.insert(session).await?;
        info!(
            session_id = %session.id,
            chain_id = %session.chain_id,
            steps = session.steps.len(),
            "Session created"
        );
        Ok(())
    }

    /// Reads a session; `NotFound` when absent.
    pub async fn get_session(&self, id: SessionId) -> Result<TransactionSession> {
        let session = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| DexError::not_found("session", id))?;
        debug!(session_id = %id, status = %session.status, "Session loaded");
        Ok(session)
    }

    /// Where the signer opens a session.
    pub fn signing_url(&self, id: SessionId) -> String {
        format!("{}/sessions/{id}", self.signing_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn step(title: &str) -> TransactionStep {
        TransactionStep::call(
            title,
            "test step",
            Address::from_bytes([7; 20]),
            TokenAmount::from(1u64),
            "0x095ea7b3",
            TransactionType::Regular,
            vec![],
        )
        .unwrap()
    }

    fn manager() -> SessionManager {
        SessionManager::new(Arc::new(InMemoryStore::new()), "https://sign.example/")
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let manager = manager();
        let steps = vec![step("first"), step("second")];
        let metadata = Metadata::new().with("operation", "swap");
        let chain_id = Uuid::new_v4();

        let id = manager
            .create_session(steps.clone(), ChainType::Ethereum, chain_id, metadata.clone())
            .await
            .unwrap();
        let session = manager.get_session(id).await.unwrap();

        assert_eq!(session.steps, steps);
        assert_eq!(session.metadata, metadata);
        assert_eq!(session.chain_id, chain_id);
        assert_eq!(session.status, ConfirmationStatus::Pending);
        assert_eq!(session.created_at, session.updated_at);
    }

    #[tokio::test]
    async fn test_empty_plan_rejected() {
        let err = manager()
            .create_session(vec![], ChainType::Ethereum, Uuid::new_v4(), Metadata::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DexError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_session_not_found() {
        let err = manager()
            .get_session(SessionId::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, DexError::NotFound { entity: "session", .. }));
    }

    #[test]
    fn test_signing_url() {
        let id = SessionId::generate();
        assert_eq!(
            manager().signing_url(id),
            format!("https://sign.example/sessions/{id}")
        );
    }
}
