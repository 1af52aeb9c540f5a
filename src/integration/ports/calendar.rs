//! Calendar store port.

use crate::board::domain::CardId;
use crate::integration::domain::{CalendarEventId, CalendarEventRecord, CalendarEventSnapshot};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for calendar store operations.
pub type CalendarStoreResult<T> = Result<T, CalendarStoreError>;

/// External calendar store contract.
///
/// Events are keyed by their originating card for deletion and lookup.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// Creates an event from the given snapshot.
    async fn create_event(
        &self,
        snapshot: &CalendarEventSnapshot,
    ) -> CalendarStoreResult<CalendarEventId>;

    /// Deletes the events of the given card. Deleting a card with no events
    /// is a no-op.
    async fn delete_event(&self, card_id: CardId) -> CalendarStoreResult<()>;

    /// Returns the events created for the given card.
    async fn find_by_card(&self, card_id: CardId) -> CalendarStoreResult<Vec<CalendarEventRecord>>;

    /// Returns every stored event.
    async fn find_all(&self) -> CalendarStoreResult<Vec<CalendarEventRecord>>;
}

/// Errors returned by calendar store implementations.
#[derive(Debug, Clone, Error)]
pub enum CalendarStoreError {
    /// The store is unreachable or rejected the request.
    #[error("calendar store unavailable: {0}")]
    Unavailable(String),

    /// Backend failure.
    #[error("calendar store error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl CalendarStoreError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
