//! Per-card, per-integration sync-status records.

use crate::board::domain::CardId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// External system a card change is mirrored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationKind {
    /// The calendar store.
    Calendar,
    /// The task-list provider.
    TaskProvider,
}

impl IntegrationKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::TaskProvider => "task_provider",
        }
    }
}

impl fmt::Display for IntegrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome state of the latest sync attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// No attempt recorded yet.
    Pending,
    /// The latest attempt succeeded.
    Synced,
    /// The latest attempt failed.
    Failed,
}

/// Result of one sync attempt, recorded by the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The attempt succeeded, optionally yielding an external identifier.
    Synced {
        /// Identifier assigned by the external system, if any.
        external_id: Option<String>,
    },
    /// The attempt failed.
    Failed,
}

/// Sync-status record keyed by `(card_id, integration)`.
///
/// Created when a card becomes scheduled, updated after every sync attempt,
/// and removed only when the card is unscheduled or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatusRecord {
    card_id: CardId,
    integration: IntegrationKind,
    status: SyncStatus,
    last_attempt: Option<DateTime<Utc>>,
    external_id: Option<String>,
}

impl SyncStatusRecord {
    /// Creates a pending record with no attempts on file.
    #[must_use]
    pub const fn new_pending(card_id: CardId, integration: IntegrationKind) -> Self {
        Self {
            card_id,
            integration,
            status: SyncStatus::Pending,
            last_attempt: None,
            external_id: None,
        }
    }

    /// Returns the card this record belongs to.
    #[must_use]
    pub const fn card_id(&self) -> CardId {
        self.card_id
    }

    /// Returns the external system this record tracks.
    #[must_use]
    pub const fn integration(&self) -> IntegrationKind {
        self.integration
    }

    /// Returns the latest attempt outcome state.
    #[must_use]
    pub const fn status(&self) -> SyncStatus {
        self.status
    }

    /// Returns the timestamp of the latest attempt, if any.
    #[must_use]
    pub const fn last_attempt(&self) -> Option<DateTime<Utc>> {
        self.last_attempt
    }

    /// Returns the external identifier, when the last success yielded one.
    #[must_use]
    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    /// Records the outcome of a sync attempt at the given time.
    ///
    /// A failure keeps any previously recorded external identifier so
    /// cleanup can still find the remote counterpart.
    pub fn record(&mut self, outcome: SyncOutcome, attempted_at: DateTime<Utc>) {
        self.last_attempt = Some(attempted_at);
        match outcome {
            SyncOutcome::Synced { external_id } => {
                self.status = SyncStatus::Synced;
                if external_id.is_some() {
                    self.external_id = external_id;
                }
            }
            SyncOutcome::Failed => {
                self.status = SyncStatus::Failed;
            }
        }
    }
}
