//! Service layer for card lifecycle orchestration.
//!
//! Column transitions, blocking, reordering, detail updates, and deletion.
//! Every successful mutation commits through the card repository first and
//! then publishes exactly one domain event; subscriber outcomes can never
//! affect the mutation.

use crate::board::{
    domain::{
        BoardDomainError, Card, CardId, CardProgress, CardTitle, CardTypeId, Column, ColumnId,
        ColumnKind,
    },
    ports::{
        CardRepository, CardRepositoryError, ColumnRepository, ColumnRepositoryError,
    },
};
use crate::integration::{
    bus::EventBus,
    domain::{ChangedField, DomainEvent, changed_between},
};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCardRequest {
    title: String,
    description: Option<String>,
    column_id: ColumnId,
    card_type_id: CardTypeId,
    progress: CardProgress,
}

impl CreateCardRequest {
    /// Creates a request with required fields and no progress tracking.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        column_id: ColumnId,
        card_type_id: CardTypeId,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            column_id,
            card_type_id,
            progress: CardProgress::None,
        }
    }

    /// Sets the card description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the progress tracking mode.
    #[must_use]
    pub const fn with_progress(mut self, progress: CardProgress) -> Self {
        self.progress = progress;
        self
    }
}

/// Field changes applied by [`CardLifecycleService::update_details`].
///
/// Absent fields are left untouched; progress stays decoupled from column
/// placement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCardDetails {
    title: Option<String>,
    description: Option<Option<String>>,
    card_type_id: Option<CardTypeId>,
    progress: Option<CardProgress>,
}

impl UpdateCardDetails {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    /// Clears the description.
    #[must_use]
    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    /// Replaces the card type.
    #[must_use]
    pub const fn with_card_type(mut self, card_type_id: CardTypeId) -> Self {
        self.card_type_id = Some(card_type_id);
        self
    }

    /// Replaces the progress mode and counters.
    #[must_use]
    pub const fn with_progress(mut self, progress: CardProgress) -> Self {
        self.progress = Some(progress);
        self
    }
}

/// Service-level errors for card lifecycle operations.
#[derive(Debug, Error)]
pub enum CardLifecycleError {
    /// Domain validation or state rule failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    /// Card repository operation failed.
    #[error(transparent)]
    CardRepository(#[from] CardRepositoryError),
    /// Column repository operation failed.
    #[error(transparent)]
    ColumnRepository(#[from] ColumnRepositoryError),
    /// No card exists with the given identifier.
    #[error("card {0} not found")]
    CardNotFound(CardId),
    /// No column exists with the given identifier.
    #[error("column {0} not found")]
    ColumnNotFound(ColumnId),
    /// The board-local path has no column after the card's current one.
    #[error("card {card} has no column after {column} to advance into")]
    NextColumnMissing {
        /// Card that was refused.
        card: CardId,
        /// Column the card currently occupies.
        column: ColumnId,
    },
}

/// Result type for card lifecycle operations.
pub type CardLifecycleResult<T> = Result<T, CardLifecycleError>;

/// Direction of an in-column reorder.
#[derive(Clone, Copy)]
enum Shift {
    Up,
    Down,
}

/// Card lifecycle orchestration service.
#[derive(Clone)]
pub struct CardLifecycleService<CR, LR, C>
where
    CR: CardRepository,
    LR: ColumnRepository,
    C: Clock + Send + Sync,
{
    cards: Arc<CR>,
    columns: Arc<LR>,
    bus: Arc<EventBus>,
    clock: Arc<C>,
}

impl<CR, LR, C> CardLifecycleService<CR, LR, C>
where
    CR: CardRepository,
    LR: ColumnRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new card lifecycle service.
    #[must_use]
    pub const fn new(cards: Arc<CR>, columns: Arc<LR>, bus: Arc<EventBus>, clock: Arc<C>) -> Self {
        Self {
            cards,
            columns,
            bus,
            clock,
        }
    }

    async fn find_card_or_error(&self, card_id: CardId) -> CardLifecycleResult<Card> {
        self.cards
            .find_by_id(card_id)
            .await?
            .ok_or(CardLifecycleError::CardNotFound(card_id))
    }

    async fn find_column_or_error(&self, column_id: ColumnId) -> CardLifecycleResult<Column> {
        self.columns
            .find_by_id(column_id)
            .await?
            .ok_or(CardLifecycleError::ColumnNotFound(column_id))
    }

    /// Next free position at the tail of a column.
    async fn tail_order_index(&self, column_id: ColumnId) -> CardLifecycleResult<u32> {
        let occupied = self.cards.find_by_column_id(column_id).await?.len();
        Ok(u32::try_from(occupied).unwrap_or(u32::MAX))
    }

    /// Creates a card at the tail of the given column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] for a blank title,
    /// [`CardLifecycleError::ColumnNotFound`] for an unknown column, and
    /// repository errors.
    pub async fn create(&self, request: CreateCardRequest) -> CardLifecycleResult<Card> {
        let title = CardTitle::new(request.title)?;
        let column = self.find_column_or_error(request.column_id).await?;
        let order_index = self.tail_order_index(column.id()).await?;
        let card = Card::new(
            title,
            request.description,
            column.id(),
            request.card_type_id,
            request.progress,
            order_index,
            &*self.clock,
        );
        self.cards.save(&card).await?;
        tracing::info!(card = %card.id(), column = %column.id(), "card created");
        self.bus
            .publish(&DomainEvent::Updated {
                card: card.clone(),
                changed: ChangedField::all(),
            })
            .await;
        Ok(card)
    }

    /// Retrieves a card by identifier.
    ///
    /// Returns `Ok(None)` when no card exists.
    ///
    /// # Errors
    ///
    /// Returns [`CardLifecycleError::CardRepository`] when the lookup fails.
    pub async fn find_by_id(&self, card_id: CardId) -> CardLifecycleResult<Option<Card>> {
        Ok(self.cards.find_by_id(card_id).await?)
    }

    /// Moves a card into another column of the same board, appending it at
    /// the tail.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::CardBlocked`] when the card is blocked,
    /// [`BoardDomainError::CrossBoardMove`] when the target belongs to a
    /// different board, and not-found errors for unknown identifiers.
    pub async fn move_to_column(
        &self,
        card_id: CardId,
        target_column_id: ColumnId,
    ) -> CardLifecycleResult<Card> {
        let card = self.find_card_or_error(card_id).await?;
        let current = self.find_column_or_error(card.column_id()).await?;
        let target = self.find_column_or_error(target_column_id).await?;
        self.perform_move(card, &current, &target).await
    }

    /// Moves a card into the next column on the board-local path.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::AdvanceFromFinal`] when the current
    /// column is final-kind, [`CardLifecycleError::NextColumnMissing`] when
    /// no later column exists, and the same errors as
    /// [`CardLifecycleService::move_to_column`] otherwise.
    pub async fn advance(&self, card_id: CardId) -> CardLifecycleResult<Card> {
        let card = self.find_card_or_error(card_id).await?;
        let current = self.find_column_or_error(card.column_id()).await?;
        if current.kind() == ColumnKind::Final {
            return Err(BoardDomainError::AdvanceFromFinal(card_id).into());
        }
        let columns = self.columns.find_by_board_id(current.board_id()).await?;
        let target = columns
            .into_iter()
            .find(|column| column.order_index() > current.order_index())
            .ok_or(CardLifecycleError::NextColumnMissing {
                card: card_id,
                column: current.id(),
            })?;
        self.perform_move(card, &current, &target).await
    }

    async fn perform_move(
        &self,
        mut card: Card,
        current: &Column,
        target: &Column,
    ) -> CardLifecycleResult<Card> {
        let previous_column_id = current.id();
        let order_index = self.tail_order_index(target.id()).await?;
        card.move_to_column(target, current.board_id(), order_index, &*self.clock)?;
        self.cards.save(&card).await?;
        tracing::info!(
            card = %card.id(),
            from = %previous_column_id,
            to = %target.id(),
            "card moved"
        );
        self.bus
            .publish(&DomainEvent::Moved {
                card: card.clone(),
                previous_column_id,
            })
            .await;
        Ok(card)
    }

    /// Moves a card one position towards the head of its column. Already at
    /// the head, the call is a no-op and publishes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CardLifecycleError::CardNotFound`] for unknown cards and
    /// repository errors.
    pub async fn move_up(&self, card_id: CardId) -> CardLifecycleResult<Card> {
        self.reorder(card_id, Shift::Up).await
    }

    /// Moves a card one position towards the tail of its column. Already at
    /// the tail, the call is a no-op and publishes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CardLifecycleError::CardNotFound`] for unknown cards and
    /// repository errors.
    pub async fn move_down(&self, card_id: CardId) -> CardLifecycleResult<Card> {
        self.reorder(card_id, Shift::Down).await
    }

    async fn reorder(&self, card_id: CardId, shift: Shift) -> CardLifecycleResult<Card> {
        let card = self.find_card_or_error(card_id).await?;
        let siblings = self.cards.find_by_column_id(card.column_id()).await?;
        let position = siblings
            .iter()
            .position(|sibling| sibling.id() == card_id)
            .ok_or(CardLifecycleError::CardNotFound(card_id))?;
        let neighbour_position = match shift {
            Shift::Up => position.checked_sub(1),
            Shift::Down => position.checked_add(1).filter(|next| *next < siblings.len()),
        };
        let Some(neighbour_position) = neighbour_position else {
            return Ok(card);
        };
        let Some(neighbour) = siblings.get(neighbour_position) else {
            return Ok(card);
        };

        let mut moved = card;
        let mut displaced = neighbour.clone();
        let moved_index = moved.order_index();
        moved.set_order_index(displaced.order_index(), &*self.clock);
        displaced.set_order_index(moved_index, &*self.clock);
        self.cards.save(&displaced).await?;
        self.cards.save(&moved).await?;
        self.bus
            .publish(&DomainEvent::Updated {
                card: moved.clone(),
                changed: BTreeSet::from([ChangedField::OrderIndex]),
            })
            .await;
        Ok(moved)
    }

    /// Blocks a card with a reason.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::AlreadyBlocked`] when the card is
    /// blocked, [`BoardDomainError::BlockedInTerminalColumn`] when the
    /// current column is final- or cancel-kind, and not-found errors.
    pub async fn block(
        &self,
        card_id: CardId,
        reason: impl Into<String> + Send,
    ) -> CardLifecycleResult<Card> {
        let mut card = self.find_card_or_error(card_id).await?;
        let column = self.find_column_or_error(card.column_id()).await?;
        card.block(reason, column.kind(), &*self.clock)?;
        self.cards.save(&card).await?;
        tracing::info!(card = %card.id(), "card blocked");
        self.bus
            .publish(&DomainEvent::Updated {
                card: card.clone(),
                changed: BTreeSet::from([ChangedField::Blocked]),
            })
            .await;
        Ok(card)
    }

    /// Unblocks a card. The reason is recorded in the log stream only.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NotBlocked`] when the card is not
    /// blocked, and not-found errors.
    pub async fn unblock(
        &self,
        card_id: CardId,
        reason: impl Into<String> + Send,
    ) -> CardLifecycleResult<Card> {
        let mut card = self.find_card_or_error(card_id).await?;
        card.unblock(&*self.clock)?;
        self.cards.save(&card).await?;
        let reason = reason.into();
        tracing::info!(card = %card.id(), %reason, "card unblocked");
        self.bus
            .publish(&DomainEvent::Updated {
                card: card.clone(),
                changed: BTreeSet::from([ChangedField::Blocked]),
            })
            .await;
        Ok(card)
    }

    /// Applies field changes to a card and publishes one `Updated` event
    /// carrying the observed changed-field set.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] for a blank replacement
    /// title, and not-found or repository errors.
    pub async fn update_details(
        &self,
        card_id: CardId,
        details: UpdateCardDetails,
    ) -> CardLifecycleResult<Card> {
        let previous = self.find_card_or_error(card_id).await?;
        let mut card = previous.clone();
        if let Some(title) = details.title {
            card.rename(CardTitle::new(title)?, &*self.clock);
        }
        if let Some(description) = details.description {
            card.set_description(description, &*self.clock);
        }
        if let Some(card_type_id) = details.card_type_id {
            card.set_card_type(card_type_id, &*self.clock);
        }
        if let Some(progress) = details.progress {
            card.set_progress(progress, &*self.clock);
        }
        self.cards.save(&card).await?;
        let changed = changed_between(&previous, &card);
        tracing::debug!(card = %card.id(), fields = changed.len(), "card details updated");
        self.bus
            .publish(&DomainEvent::Updated {
                card: card.clone(),
                changed,
            })
            .await;
        Ok(card)
    }

    /// Deletes a card and publishes its final snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CardLifecycleError::CardNotFound`] when no card exists, and
    /// repository errors.
    pub async fn delete(&self, card_id: CardId) -> CardLifecycleResult<()> {
        let card = self.find_card_or_error(card_id).await?;
        self.cards.delete_by_id(card_id).await?;
        tracing::info!(card = %card_id, "card deleted");
        self.bus.publish(&DomainEvent::Deleted { card }).await;
        Ok(())
    }

    /// Returns true when any card still uses the given type; consumed by
    /// external card-type deletion guards.
    ///
    /// # Errors
    ///
    /// Returns [`CardLifecycleError::CardRepository`] when the count fails.
    pub async fn cards_of_type_exist(
        &self,
        card_type_id: CardTypeId,
    ) -> CardLifecycleResult<bool> {
        Ok(self.cards.count_by_card_type(card_type_id).await? > 0)
    }
}
