//! In-memory card repository for tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::{Card, CardId, CardTypeId, ColumnId},
    ports::{CardRepository, CardRepositoryError, CardRepositoryResult},
};

/// Thread-safe in-memory card repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCardRepository {
    state: Arc<RwLock<HashMap<CardId, Card>>>,
}

impl InMemoryCardRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> CardRepositoryError {
    CardRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn sorted_by_order(mut cards: Vec<Card>) -> Vec<Card> {
    cards.sort_by_key(Card::order_index);
    cards
}

#[async_trait]
impl CardRepository for InMemoryCardRepository {
    async fn find_by_id(&self, id: CardId) -> CardRepositoryResult<Option<Card>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn save(&self, card: &Card) -> CardRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.insert(card.id(), card.clone());
        Ok(())
    }

    async fn delete_by_id(&self, id: CardId) -> CardRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.remove(&id);
        Ok(())
    }

    async fn find_by_column_id(&self, column_id: ColumnId) -> CardRepositoryResult<Vec<Card>> {
        let state = self.state.read().map_err(lock_error)?;
        let cards = state
            .values()
            .filter(|card| card.column_id() == column_id)
            .cloned()
            .collect();
        Ok(sorted_by_order(cards))
    }

    async fn find_by_column_id_in(
        &self,
        column_ids: &[ColumnId],
    ) -> CardRepositoryResult<Vec<Card>> {
        let state = self.state.read().map_err(lock_error)?;
        let cards = state
            .values()
            .filter(|card| column_ids.contains(&card.column_id()))
            .cloned()
            .collect();
        Ok(sorted_by_order(cards))
    }

    async fn find_scheduled(&self) -> CardRepositoryResult<Vec<Card>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .values()
            .filter(|card| card.scheduled_date().is_some())
            .cloned()
            .collect())
    }

    async fn count_by_card_type(&self, card_type_id: CardTypeId) -> CardRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_error)?;
        let count = state
            .values()
            .filter(|card| card.card_type_id() == card_type_id)
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }
}
