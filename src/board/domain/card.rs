//! Card aggregate root and progress tracking types.

use super::{BoardDomainError, BoardId, CardId, CardTypeId, Column, ColumnId, ColumnKind};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated, non-blank card title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardTitle(String);

impl CardTitle {
    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the value is empty after
    /// trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyTitle);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CardTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CardTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unit counters for progress-tracking cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUnits {
    /// Total units of work on the card.
    pub total: u32,
    /// Units completed so far.
    pub current: u32,
}

impl ProgressUnits {
    /// Creates a unit counter pair.
    #[must_use]
    pub const fn new(total: u32, current: u32) -> Self {
        Self { total, current }
    }
}

/// Progress tracking mode of a card.
///
/// Unit counters exist only on the variants that track progress, so a card
/// without progress tracking carries no units by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardProgress {
    /// No progress tracking.
    None,
    /// Percentage-style progress with unit counters.
    Percentage(ProgressUnits),
    /// Checklist-style progress with unit counters.
    Checklist(ProgressUnits),
}

impl CardProgress {
    /// Returns the unit counters, when the card tracks progress.
    #[must_use]
    pub const fn units(&self) -> Option<ProgressUnits> {
        match self {
            Self::None => None,
            Self::Percentage(units) | Self::Checklist(units) => Some(*units),
        }
    }
}

/// Card aggregate root: a unit of trackable work occupying exactly one
/// column at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    title: CardTitle,
    description: Option<String>,
    column_id: ColumnId,
    card_type_id: CardTypeId,
    progress: CardProgress,
    scheduled_date: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
    blocked: bool,
    block_reason: Option<String>,
    creation_date: DateTime<Utc>,
    last_update_date: DateTime<Utc>,
    completion_date: Option<DateTime<Utc>>,
    order_index: u32,
}

/// Parameter object for reconstructing a persisted card aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCardData {
    /// Persisted card identifier.
    pub id: CardId,
    /// Persisted title.
    pub title: CardTitle,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted column placement.
    pub column_id: ColumnId,
    /// Persisted card type.
    pub card_type_id: CardTypeId,
    /// Persisted progress mode and counters.
    pub progress: CardProgress,
    /// Persisted scheduled date, if any.
    pub scheduled_date: Option<DateTime<Utc>>,
    /// Persisted due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted blocked flag.
    pub blocked: bool,
    /// Persisted blocking reason, if any.
    pub block_reason: Option<String>,
    /// Persisted creation timestamp.
    pub creation_date: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub last_update_date: DateTime<Utc>,
    /// Persisted completion timestamp, if any.
    pub completion_date: Option<DateTime<Utc>>,
    /// Persisted position within the column.
    pub order_index: u32,
}

impl Card {
    /// Creates a new card in the given column.
    #[must_use]
    pub fn new(
        title: CardTitle,
        description: Option<String>,
        column_id: ColumnId,
        card_type_id: CardTypeId,
        progress: CardProgress,
        order_index: u32,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: CardId::new(),
            title,
            description,
            column_id,
            card_type_id,
            progress,
            scheduled_date: None,
            due_date: None,
            blocked: false,
            block_reason: None,
            creation_date: timestamp,
            last_update_date: timestamp,
            completion_date: None,
            order_index,
        }
    }

    /// Reconstructs a card from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCardData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            column_id: data.column_id,
            card_type_id: data.card_type_id,
            progress: data.progress,
            scheduled_date: data.scheduled_date,
            due_date: data.due_date,
            blocked: data.blocked,
            block_reason: data.block_reason,
            creation_date: data.creation_date,
            last_update_date: data.last_update_date,
            completion_date: data.completion_date,
            order_index: data.order_index,
        }
    }

    /// Returns the card identifier.
    #[must_use]
    pub const fn id(&self) -> CardId {
        self.id
    }

    /// Returns the card title.
    #[must_use]
    pub const fn title(&self) -> &CardTitle {
        &self.title
    }

    /// Returns the card description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the current column placement.
    #[must_use]
    pub const fn column_id(&self) -> ColumnId {
        self.column_id
    }

    /// Returns the card type.
    #[must_use]
    pub const fn card_type_id(&self) -> CardTypeId {
        self.card_type_id
    }

    /// Returns the progress mode and counters.
    #[must_use]
    pub const fn progress(&self) -> CardProgress {
        self.progress
    }

    /// Returns the scheduled date, if any.
    #[must_use]
    pub const fn scheduled_date(&self) -> Option<DateTime<Utc>> {
        self.scheduled_date
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns true when the card is blocked.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Returns the blocking reason, if the card is blocked.
    #[must_use]
    pub fn block_reason(&self) -> Option<&str> {
        self.block_reason.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn last_update_date(&self) -> DateTime<Utc> {
        self.last_update_date
    }

    /// Returns the completion timestamp, if the card reached a final column.
    #[must_use]
    pub const fn completion_date(&self) -> Option<DateTime<Utc>> {
        self.completion_date
    }

    /// Returns the position of the card within its column.
    #[must_use]
    pub const fn order_index(&self) -> u32 {
        self.order_index
    }

    /// Moves the card into the target column at the given position.
    ///
    /// Entering a final-kind column stamps the completion date; leaving one
    /// does not reset it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::CardBlocked`] when the card is blocked and
    /// [`BoardDomainError::CrossBoardMove`] when the target column belongs to
    /// a different board.
    pub fn move_to_column(
        &mut self,
        target: &Column,
        current_board: BoardId,
        order_index: u32,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        if self.blocked {
            return Err(BoardDomainError::CardBlocked(self.id));
        }
        if target.board_id() != current_board {
            return Err(BoardDomainError::CrossBoardMove {
                card: self.id,
                target: target.id(),
            });
        }
        self.column_id = target.id();
        self.order_index = order_index;
        if target.kind() == ColumnKind::Final && self.completion_date.is_none() {
            self.completion_date = Some(clock.utc());
        }
        self.touch(clock);
        Ok(())
    }

    /// Blocks the card with a reason.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::AlreadyBlocked`] when the card is blocked
    /// and [`BoardDomainError::BlockedInTerminalColumn`] when the current
    /// column kind is final or cancel.
    pub fn block(
        &mut self,
        reason: impl Into<String>,
        column_kind: ColumnKind,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        if self.blocked {
            return Err(BoardDomainError::AlreadyBlocked(self.id));
        }
        if column_kind.is_terminal() {
            return Err(BoardDomainError::BlockedInTerminalColumn {
                card: self.id,
                kind: column_kind,
            });
        }
        self.blocked = true;
        self.block_reason = Some(reason.into());
        self.touch(clock);
        Ok(())
    }

    /// Unblocks the card.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NotBlocked`] when the card is not blocked.
    pub fn unblock(&mut self, clock: &impl Clock) -> Result<(), BoardDomainError> {
        if !self.blocked {
            return Err(BoardDomainError::NotBlocked(self.id));
        }
        self.blocked = false;
        self.block_reason = None;
        self.touch(clock);
        Ok(())
    }

    /// Sets both scheduling dates atomically.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DueBeforeScheduled`] when both dates are
    /// set and the due date precedes the scheduled date; the card is left
    /// unchanged.
    pub fn set_schedule(
        &mut self,
        scheduled: Option<DateTime<Utc>>,
        due: Option<DateTime<Utc>>,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        if let (Some(scheduled_at), Some(due_at)) = (scheduled, due) {
            if due_at < scheduled_at {
                return Err(BoardDomainError::DueBeforeScheduled {
                    scheduled: scheduled_at,
                    due: due_at,
                });
            }
        }
        self.scheduled_date = scheduled;
        self.due_date = due;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the card title.
    pub fn rename(&mut self, title: CardTitle, clock: &impl Clock) {
        self.title = title;
        self.touch(clock);
    }

    /// Replaces the card description.
    pub fn set_description(&mut self, description: Option<String>, clock: &impl Clock) {
        self.description = description;
        self.touch(clock);
    }

    /// Replaces the card type.
    pub fn set_card_type(&mut self, card_type_id: CardTypeId, clock: &impl Clock) {
        self.card_type_id = card_type_id;
        self.touch(clock);
    }

    /// Replaces the progress mode and counters.
    ///
    /// Progress is decoupled from column placement; moving a card never
    /// adjusts it.
    pub fn set_progress(&mut self, progress: CardProgress, clock: &impl Clock) {
        self.progress = progress;
        self.touch(clock);
    }

    /// Replaces the position of the card within its column.
    pub fn set_order_index(&mut self, order_index: u32, clock: &impl Clock) {
        self.order_index = order_index;
        self.touch(clock);
    }

    /// Updates the `last_update_date` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.last_update_date = clock.utc();
    }
}
