//! Repository ports for card, column, and board persistence.
//!
//! Persistence itself is an external collaborator; the engine consumes these
//! contracts and ships in-memory adapters for tests and embedding.

use crate::board::domain::{Board, BoardGroupId, BoardId, Card, CardId, CardTypeId, Column, ColumnId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for card repository operations.
pub type CardRepositoryResult<T> = Result<T, CardRepositoryError>;

/// Card persistence contract.
///
/// Every call runs inside its own storage transaction; the engine provides
/// no additional locking, so concurrent mutation of the same card is a
/// last-write-wins race.
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Finds a card by identifier.
    ///
    /// Returns `None` when the card does not exist.
    async fn find_by_id(&self, id: CardId) -> CardRepositoryResult<Option<Card>>;

    /// Stores a card, inserting or replacing the persisted state.
    async fn save(&self, card: &Card) -> CardRepositoryResult<()>;

    /// Removes a card. Removing an absent card is a no-op.
    async fn delete_by_id(&self, id: CardId) -> CardRepositoryResult<()>;

    /// Returns the cards of one column, ordered by `order_index`.
    async fn find_by_column_id(&self, column_id: ColumnId) -> CardRepositoryResult<Vec<Card>>;

    /// Returns the cards of all given columns in one batched call.
    async fn find_by_column_id_in(
        &self,
        column_ids: &[ColumnId],
    ) -> CardRepositoryResult<Vec<Card>>;

    /// Returns every card carrying a scheduled date.
    async fn find_scheduled(&self) -> CardRepositoryResult<Vec<Card>>;

    /// Counts cards of the given type, for type-deletion guards.
    async fn count_by_card_type(&self, card_type_id: CardTypeId) -> CardRepositoryResult<u64>;
}

/// Errors returned by card repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CardRepositoryError {
    /// Persistence-layer failure.
    #[error("card persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CardRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Result type for column repository operations.
pub type ColumnRepositoryResult<T> = Result<T, ColumnRepositoryError>;

/// Column lookup contract. Column management is owned by an external
/// collaborator, so the engine only reads.
#[async_trait]
pub trait ColumnRepository: Send + Sync {
    /// Finds a column by identifier.
    ///
    /// Returns `None` when the column does not exist.
    async fn find_by_id(&self, id: ColumnId) -> ColumnRepositoryResult<Option<Column>>;

    /// Returns the columns of one board, ordered by `order_index`.
    async fn find_by_board_id(&self, board_id: BoardId) -> ColumnRepositoryResult<Vec<Column>>;

    /// Returns the columns of all given boards in one batched call.
    async fn find_by_board_id_in(
        &self,
        board_ids: &[BoardId],
    ) -> ColumnRepositoryResult<Vec<Column>>;
}

/// Errors returned by column repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ColumnRepositoryError {
    /// Persistence-layer failure.
    #[error("column persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ColumnRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Result type for board repository operations.
pub type BoardRepositoryResult<T> = Result<T, BoardRepositoryError>;

/// Board lookup contract, consumed by the aggregation engine and the
/// external-sync coordinator.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Finds a board by identifier.
    ///
    /// Returns `None` when the board does not exist.
    async fn find_by_id(&self, id: BoardId) -> BoardRepositoryResult<Option<Board>>;

    /// Returns every board.
    async fn find_all(&self) -> BoardRepositoryResult<Vec<Board>>;

    /// Returns the boards belonging to the given group.
    async fn find_by_group_id(&self, group_id: BoardGroupId) -> BoardRepositoryResult<Vec<Board>>;
}

/// Errors returned by board repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardRepositoryError {
    /// Persistence-layer failure.
    #[error("board persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
