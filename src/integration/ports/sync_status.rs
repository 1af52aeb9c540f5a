//! Sync-status repository port.

use crate::board::domain::CardId;
use crate::integration::domain::{IntegrationKind, SyncStatusRecord};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for sync-status repository operations.
pub type SyncStatusRepositoryResult<T> = Result<T, SyncStatusRepositoryError>;

/// Persistence contract for sync-status records, keyed by
/// `(card_id, integration)`.
#[async_trait]
pub trait SyncStatusRepository: Send + Sync {
    /// Ensures the backing storage exists; called once during startup
    /// reconciliation.
    async fn ensure_storage(&self) -> SyncStatusRepositoryResult<()>;

    /// Inserts or replaces a record.
    async fn upsert(&self, record: &SyncStatusRecord) -> SyncStatusRepositoryResult<()>;

    /// Finds the record for one card and integration.
    ///
    /// Returns `None` when no record exists.
    async fn find(
        &self,
        card_id: CardId,
        integration: IntegrationKind,
    ) -> SyncStatusRepositoryResult<Option<SyncStatusRecord>>;

    /// Returns every record of the given card.
    async fn find_by_card(&self, card_id: CardId)
    -> SyncStatusRepositoryResult<Vec<SyncStatusRecord>>;

    /// Removes every record of the given card.
    async fn delete_for_card(&self, card_id: CardId) -> SyncStatusRepositoryResult<()>;

    /// Returns every stored record.
    async fn find_all(&self) -> SyncStatusRepositoryResult<Vec<SyncStatusRecord>>;
}

/// Errors returned by sync-status repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SyncStatusRepositoryError {
    /// Persistence-layer failure.
    #[error("sync status persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SyncStatusRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
