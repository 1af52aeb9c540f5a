//! Transient domain events emitted after committed card mutations.
//!
//! Events are best-effort, in-process notifications; there is no durable
//! event log and no replay. Each variant carries the post-mutation card
//! snapshot plus the prior-state fields a subscriber needs.

use crate::board::domain::{Card, ColumnId};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// A card field observed to have changed in an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangedField {
    /// Card title.
    Title,
    /// Card description.
    Description,
    /// Scheduled date.
    ScheduledDate,
    /// Due date.
    DueDate,
    /// Column placement.
    ColumnId,
    /// Card type.
    CardTypeId,
    /// Progress mode or counters.
    Progress,
    /// Blocked flag or reason.
    Blocked,
    /// Position within the column.
    OrderIndex,
}

impl ChangedField {
    /// Returns the full changed-field set, used when no prior snapshot
    /// exists (card creation).
    #[must_use]
    pub fn all() -> BTreeSet<Self> {
        BTreeSet::from([
            Self::Title,
            Self::Description,
            Self::ScheduledDate,
            Self::DueDate,
            Self::ColumnId,
            Self::CardTypeId,
            Self::Progress,
            Self::Blocked,
            Self::OrderIndex,
        ])
    }
}

/// Computes the set of fields that differ between two card snapshots.
#[must_use]
pub fn changed_between(previous: &Card, current: &Card) -> BTreeSet<ChangedField> {
    let mut changed = BTreeSet::new();
    if previous.title() != current.title() {
        changed.insert(ChangedField::Title);
    }
    if previous.description() != current.description() {
        changed.insert(ChangedField::Description);
    }
    if previous.scheduled_date() != current.scheduled_date() {
        changed.insert(ChangedField::ScheduledDate);
    }
    if previous.due_date() != current.due_date() {
        changed.insert(ChangedField::DueDate);
    }
    if previous.column_id() != current.column_id() {
        changed.insert(ChangedField::ColumnId);
    }
    if previous.card_type_id() != current.card_type_id() {
        changed.insert(ChangedField::CardTypeId);
    }
    if previous.progress() != current.progress() {
        changed.insert(ChangedField::Progress);
    }
    if previous.is_blocked() != current.is_blocked()
        || previous.block_reason() != current.block_reason()
    {
        changed.insert(ChangedField::Blocked);
    }
    if previous.order_index() != current.order_index() {
        changed.insert(ChangedField::OrderIndex);
    }
    changed
}

/// Domain event published after a committed card mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    /// The card gained a scheduled date it did not have before.
    Scheduled {
        /// Post-mutation card snapshot.
        card: Card,
    },
    /// The card's scheduled date moved to a different value.
    Rescheduled {
        /// Post-mutation card snapshot.
        card: Card,
        /// Scheduled date before the mutation.
        previous_date: DateTime<Utc>,
    },
    /// The card's scheduled date was cleared.
    Unscheduled {
        /// Post-mutation card snapshot.
        card: Card,
        /// Scheduled date before the mutation.
        previous_date: DateTime<Utc>,
    },
    /// Card fields changed without a scheduling transition.
    Updated {
        /// Post-mutation card snapshot.
        card: Card,
        /// Fields that differ from the previous snapshot.
        changed: BTreeSet<ChangedField>,
    },
    /// The card moved to another column.
    Moved {
        /// Post-mutation card snapshot.
        card: Card,
        /// Column the card occupied before the move.
        previous_column_id: ColumnId,
    },
    /// The card was deleted.
    Deleted {
        /// Final snapshot taken before deletion.
        card: Card,
    },
}

impl DomainEvent {
    /// Returns the card snapshot the event carries.
    #[must_use]
    pub const fn card(&self) -> &Card {
        match self {
            Self::Scheduled { card }
            | Self::Rescheduled { card, .. }
            | Self::Unscheduled { card, .. }
            | Self::Updated { card, .. }
            | Self::Moved { card, .. }
            | Self::Deleted { card } => card,
        }
    }

    /// Returns a short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Scheduled { .. } => "scheduled",
            Self::Rescheduled { .. } => "rescheduled",
            Self::Unscheduled { .. } => "unscheduled",
            Self::Updated { .. } => "updated",
            Self::Moved { .. } => "moved",
            Self::Deleted { .. } => "deleted",
        }
    }
}
