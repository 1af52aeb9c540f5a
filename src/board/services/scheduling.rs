//! Decoupled writer for card scheduling dates.
//!
//! The date write always commits locally before any event reaches the
//! external-sync machinery; a calendar or task-provider outage can never
//! roll it back.

use crate::board::{
    domain::{BoardDomainError, Card, CardId},
    ports::{CardRepository, CardRepositoryError},
};
use crate::integration::{
    bus::EventBus,
    domain::{ChangedField, DomainEvent},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for scheduling operations.
#[derive(Debug, Error)]
pub enum SchedulingError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    /// Card repository operation failed.
    #[error(transparent)]
    Repository(#[from] CardRepositoryError),
    /// No card exists with the given identifier.
    #[error("card {0} not found")]
    CardNotFound(CardId),
}

/// Result type for scheduling operations.
pub type SchedulingResult<T> = Result<T, SchedulingError>;

/// Owns the scheduled and due dates of cards and classifies every change.
#[derive(Clone)]
pub struct SchedulingService<CR, C>
where
    CR: CardRepository,
    C: Clock + Send + Sync,
{
    cards: Arc<CR>,
    bus: Arc<EventBus>,
    clock: Arc<C>,
}

impl<CR, C> SchedulingService<CR, C>
where
    CR: CardRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new scheduling service.
    #[must_use]
    pub const fn new(cards: Arc<CR>, bus: Arc<EventBus>, clock: Arc<C>) -> Self {
        Self { cards, bus, clock }
    }

    /// Sets or clears the scheduled date, keeping the due date as is.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::CardNotFound`] for unknown cards and
    /// [`BoardDomainError::DueBeforeScheduled`] when the resulting pair is
    /// invalid; prior dates are left unchanged on failure.
    pub async fn set_scheduled_date(
        &self,
        card_id: CardId,
        scheduled: Option<DateTime<Utc>>,
    ) -> SchedulingResult<Card> {
        let card = self.find_card_or_error(card_id).await?;
        let due = card.due_date();
        self.apply(card, scheduled, due).await
    }

    /// Sets or clears the due date, keeping the scheduled date as is.
    ///
    /// Clearing only the due date never cascades into external deletion.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::CardNotFound`] for unknown cards and
    /// [`BoardDomainError::DueBeforeScheduled`] when the resulting pair is
    /// invalid; prior dates are left unchanged on failure.
    pub async fn set_due_date(
        &self,
        card_id: CardId,
        due: Option<DateTime<Utc>>,
    ) -> SchedulingResult<Card> {
        let card = self.find_card_or_error(card_id).await?;
        let scheduled = card.scheduled_date();
        self.apply(card, scheduled, due).await
    }

    /// Sets both dates atomically.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::CardNotFound`] for unknown cards and
    /// [`BoardDomainError::DueBeforeScheduled`] when the pair is invalid;
    /// prior dates are left unchanged on failure.
    pub async fn set_scheduling_dates(
        &self,
        card_id: CardId,
        scheduled: Option<DateTime<Utc>>,
        due: Option<DateTime<Utc>>,
    ) -> SchedulingResult<Card> {
        let card = self.find_card_or_error(card_id).await?;
        self.apply(card, scheduled, due).await
    }

    async fn find_card_or_error(&self, card_id: CardId) -> SchedulingResult<Card> {
        self.cards
            .find_by_id(card_id)
            .await?
            .ok_or(SchedulingError::CardNotFound(card_id))
    }

    /// Validates, writes, classifies, and publishes exactly one event.
    async fn apply(
        &self,
        mut card: Card,
        scheduled: Option<DateTime<Utc>>,
        due: Option<DateTime<Utc>>,
    ) -> SchedulingResult<Card> {
        let previous_scheduled = card.scheduled_date();
        let previous_due = card.due_date();
        card.set_schedule(scheduled, due, &*self.clock)?;
        self.cards.save(&card).await?;
        tracing::debug!(
            card = %card.id(),
            scheduled = ?scheduled,
            due = ?due,
            "scheduling dates saved"
        );

        let event = classify(&card, previous_scheduled, previous_due);
        self.bus.publish(&event).await;
        Ok(card)
    }
}

/// Classifies a committed date change into its domain event.
fn classify(
    current: &Card,
    previous_scheduled: Option<DateTime<Utc>>,
    previous_due: Option<DateTime<Utc>>,
) -> DomainEvent {
    let card = current.clone();
    match (previous_scheduled, current.scheduled_date()) {
        (None, Some(_)) => DomainEvent::Scheduled { card },
        (Some(previous_date), Some(new_date)) if previous_date != new_date => {
            DomainEvent::Rescheduled {
                card,
                previous_date,
            }
        }
        (Some(previous_date), None) => DomainEvent::Unscheduled {
            card,
            previous_date,
        },
        _ => {
            let mut changed = BTreeSet::new();
            if previous_due != current.due_date() {
                changed.insert(ChangedField::DueDate);
            }
            DomainEvent::Updated { card, changed }
        }
    }
}
