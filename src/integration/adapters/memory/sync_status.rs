//! In-memory sync-status repository for tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::board::domain::CardId;
use crate::integration::{
    domain::{IntegrationKind, SyncStatusRecord},
    ports::{SyncStatusRepository, SyncStatusRepositoryError, SyncStatusRepositoryResult},
};

/// Thread-safe in-memory sync-status repository.
#[derive(Debug, Clone, Default)]
pub struct InMemorySyncStatusRepository {
    records: Arc<RwLock<HashMap<(CardId, IntegrationKind), SyncStatusRecord>>>,
    storage_ready: Arc<AtomicBool>,
}

impl InMemorySyncStatusRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once `ensure_storage` has run.
    #[must_use]
    pub fn storage_ready(&self) -> bool {
        self.storage_ready.load(Ordering::SeqCst)
    }
}

fn lock_error(err: impl std::fmt::Display) -> SyncStatusRepositoryError {
    SyncStatusRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl SyncStatusRepository for InMemorySyncStatusRepository {
    async fn ensure_storage(&self) -> SyncStatusRepositoryResult<()> {
        self.storage_ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn upsert(&self, record: &SyncStatusRecord) -> SyncStatusRepositoryResult<()> {
        let mut records = self.records.write().map_err(lock_error)?;
        records.insert((record.card_id(), record.integration()), record.clone());
        Ok(())
    }

    async fn find(
        &self,
        card_id: CardId,
        integration: IntegrationKind,
    ) -> SyncStatusRepositoryResult<Option<SyncStatusRecord>> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records.get(&(card_id, integration)).cloned())
    }

    async fn find_by_card(
        &self,
        card_id: CardId,
    ) -> SyncStatusRepositoryResult<Vec<SyncStatusRecord>> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records
            .values()
            .filter(|record| record.card_id() == card_id)
            .cloned()
            .collect())
    }

    async fn delete_for_card(&self, card_id: CardId) -> SyncStatusRepositoryResult<()> {
        let mut records = self.records.write().map_err(lock_error)?;
        records.retain(|(record_card, _), _| *record_card != card_id);
        Ok(())
    }

    async fn find_all(&self) -> SyncStatusRepositoryResult<Vec<SyncStatusRecord>> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records.values().cloned().collect())
    }
}
