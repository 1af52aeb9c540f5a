//! Calendar and task-provider payload types.

use crate::board::domain::{Card, CardId};
use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier assigned by the calendar store to one of its events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarEventId(Uuid);

impl CalendarEventId {
    /// Creates a new random calendar event identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for CalendarEventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CalendarEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier assigned by the task provider to a created task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalTaskId(String);

impl ExternalTaskId {
    /// Wraps a provider-assigned identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalTaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the engine hands the calendar store when mirroring a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEventSnapshot {
    card_id: CardId,
    title: String,
    description: Option<String>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    all_day: bool,
}

impl CalendarEventSnapshot {
    /// Builds a snapshot from a scheduled card.
    ///
    /// Returns `None` when the card carries no scheduled date. A card
    /// scheduled at midnight becomes an all-day hour slot; otherwise the
    /// event runs until the due date, or one hour when none is set.
    #[must_use]
    pub fn from_card(card: &Card) -> Option<Self> {
        let starts_at = card.scheduled_date()?;
        let all_day = starts_at.hour() == 0 && starts_at.minute() == 0;
        let ends_at = if all_day {
            starts_at + Duration::hours(1)
        } else {
            card.due_date().unwrap_or(starts_at + Duration::hours(1))
        };
        Some(Self {
            card_id: card.id(),
            title: card.title().as_str().to_owned(),
            description: card.description().map(str::to_owned),
            starts_at,
            ends_at,
            all_day,
        })
    }

    /// Returns the originating card.
    #[must_use]
    pub const fn card_id(&self) -> CardId {
        self.card_id
    }

    /// Returns the event title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the event description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the event start.
    #[must_use]
    pub const fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    /// Returns the event end.
    #[must_use]
    pub const fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    /// Returns true for all-day events.
    #[must_use]
    pub const fn all_day(&self) -> bool {
        self.all_day
    }
}

/// A stored calendar event together with its store-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEventRecord {
    id: CalendarEventId,
    snapshot: CalendarEventSnapshot,
}

impl CalendarEventRecord {
    /// Pairs a snapshot with its store-assigned identifier.
    #[must_use]
    pub const fn new(id: CalendarEventId, snapshot: CalendarEventSnapshot) -> Self {
        Self { id, snapshot }
    }

    /// Returns the store-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> CalendarEventId {
        self.id
    }

    /// Returns the stored snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &CalendarEventSnapshot {
        &self.snapshot
    }
}

/// What the engine hands the task provider when mirroring a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTaskDraft {
    /// Task list the task lands in; created by the provider when absent.
    pub list_name: String,
    /// Task title.
    pub title: String,
    /// Free-form notes, taken from the card description.
    pub notes: Option<String>,
    /// Provider-visible due date.
    pub due: DateTime<Utc>,
}
