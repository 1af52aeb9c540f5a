//! In-memory board repository for tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::{Board, BoardGroupId, BoardId},
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult},
};

/// Thread-safe in-memory board repository, seeded through the inherent
/// [`InMemoryBoardRepository::insert`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardRepository {
    state: Arc<RwLock<HashMap<BoardId, Board>>>,
}

impl InMemoryBoardRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a board into the repository.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] when the backing lock is
    /// poisoned.
    pub fn insert(&self, board: Board) -> BoardRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.insert(board.id(), board);
        Ok(())
    }
}

fn lock_error(err: impl std::fmt::Display) -> BoardRepositoryError {
    BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn find_by_id(&self, id: BoardId) -> BoardRepositoryResult<Option<Board>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn find_all(&self) -> BoardRepositoryResult<Vec<Board>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.values().cloned().collect())
    }

    async fn find_by_group_id(&self, group_id: BoardGroupId) -> BoardRepositoryResult<Vec<Board>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .values()
            .filter(|board| board.group_id() == Some(group_id))
            .cloned()
            .collect())
    }
}
