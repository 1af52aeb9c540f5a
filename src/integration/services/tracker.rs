//! Per-card, per-integration sync-status tracking.

use crate::board::domain::CardId;
use crate::integration::{
    domain::{IntegrationKind, SyncOutcome, SyncStatusRecord},
    ports::{SyncStatusRepository, SyncStatusRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for sync-status tracking.
#[derive(Debug, Clone, Error)]
pub enum SyncTrackerError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] SyncStatusRepositoryError),
}

/// Result type for tracker operations.
pub type SyncTrackerResult<T> = Result<T, SyncTrackerError>;

/// Tracks the sync state of each card against each external system.
pub struct SyncTracker<S, C>
where
    S: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> Clone for SyncTracker<S, C>
where
    S: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, C> SyncTracker<S, C>
where
    S: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new tracker.
    #[must_use]
    pub const fn new(repository: Arc<S>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Ensures the backing storage exists.
    ///
    /// # Errors
    ///
    /// Returns [`SyncTrackerError::Repository`] when the repository fails.
    pub async fn ensure_storage(&self) -> SyncTrackerResult<()> {
        Ok(self.repository.ensure_storage().await?)
    }

    /// Creates a pending record for the card and integration when none
    /// exists yet; otherwise leaves the existing record untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SyncTrackerError::Repository`] when the repository fails.
    pub async fn ensure_status(
        &self,
        card_id: CardId,
        integration: IntegrationKind,
    ) -> SyncTrackerResult<SyncStatusRecord> {
        if let Some(existing) = self.repository.find(card_id, integration).await? {
            return Ok(existing);
        }
        let record = SyncStatusRecord::new_pending(card_id, integration);
        self.repository.upsert(&record).await?;
        Ok(record)
    }

    /// Records the outcome of a sync attempt, stamping the attempt time
    /// from the clock. Creates the record first when none exists.
    ///
    /// # Errors
    ///
    /// Returns [`SyncTrackerError::Repository`] when the repository fails.
    pub async fn record_outcome(
        &self,
        card_id: CardId,
        integration: IntegrationKind,
        outcome: SyncOutcome,
    ) -> SyncTrackerResult<SyncStatusRecord> {
        let mut record = self.ensure_status(card_id, integration).await?;
        record.record(outcome, self.clock.utc());
        self.repository.upsert(&record).await?;
        Ok(record)
    }

    /// Returns the records of one card.
    ///
    /// # Errors
    ///
    /// Returns [`SyncTrackerError::Repository`] when the repository fails.
    pub async fn statuses_for_card(
        &self,
        card_id: CardId,
    ) -> SyncTrackerResult<Vec<SyncStatusRecord>> {
        Ok(self.repository.find_by_card(card_id).await?)
    }

    /// Returns the external identifier recorded for one card and
    /// integration, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SyncTrackerError::Repository`] when the repository fails.
    pub async fn external_id(
        &self,
        card_id: CardId,
        integration: IntegrationKind,
    ) -> SyncTrackerResult<Option<String>> {
        let record = self.repository.find(card_id, integration).await?;
        Ok(record.and_then(|found| found.external_id().map(str::to_owned)))
    }

    /// Removes every record of the card; called when it is unscheduled or
    /// deleted.
    ///
    /// # Errors
    ///
    /// Returns [`SyncTrackerError::Repository`] when the repository fails.
    pub async fn remove_for_card(&self, card_id: CardId) -> SyncTrackerResult<()> {
        Ok(self.repository.delete_for_card(card_id).await?)
    }
}
