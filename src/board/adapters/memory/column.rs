//! In-memory column repository for tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::{BoardId, Column, ColumnId},
    ports::{ColumnRepository, ColumnRepositoryError, ColumnRepositoryResult},
};

/// Thread-safe in-memory column repository.
///
/// Column management is owned by an external collaborator, so the port only
/// reads; seeding happens through the inherent [`InMemoryColumnRepository::insert`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryColumnRepository {
    state: Arc<RwLock<HashMap<ColumnId, Column>>>,
}

impl InMemoryColumnRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a column into the repository.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnRepositoryError::Persistence`] when the backing lock
    /// is poisoned.
    pub fn insert(&self, column: Column) -> ColumnRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.insert(column.id(), column);
        Ok(())
    }
}

fn lock_error(err: impl std::fmt::Display) -> ColumnRepositoryError {
    ColumnRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn sorted_by_order(mut columns: Vec<Column>) -> Vec<Column> {
    columns.sort_by_key(Column::order_index);
    columns
}

#[async_trait]
impl ColumnRepository for InMemoryColumnRepository {
    async fn find_by_id(&self, id: ColumnId) -> ColumnRepositoryResult<Option<Column>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn find_by_board_id(&self, board_id: BoardId) -> ColumnRepositoryResult<Vec<Column>> {
        let state = self.state.read().map_err(lock_error)?;
        let columns = state
            .values()
            .filter(|column| column.board_id() == board_id)
            .cloned()
            .collect();
        Ok(sorted_by_order(columns))
    }

    async fn find_by_board_id_in(
        &self,
        board_ids: &[BoardId],
    ) -> ColumnRepositoryResult<Vec<Column>> {
        let state = self.state.read().map_err(lock_error)?;
        let columns = state
            .values()
            .filter(|column| board_ids.contains(&column.board_id()))
            .cloned()
            .collect();
        Ok(sorted_by_order(columns))
    }
}
