//! Error types for board domain validation and state rules.

use super::{CardId, ColumnId, ColumnKind};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned while constructing or mutating board domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The card title is empty after trimming.
    #[error("card title must not be empty")]
    EmptyTitle,

    /// The due date precedes the scheduled date.
    #[error("due date {due} must not precede scheduled date {scheduled}")]
    DueBeforeScheduled {
        /// Rejected scheduled date.
        scheduled: DateTime<Utc>,
        /// Rejected due date.
        due: DateTime<Utc>,
    },

    /// The card is blocked and cannot change columns.
    #[error("card {0} is blocked and cannot be moved")]
    CardBlocked(CardId),

    /// The card is already blocked.
    #[error("card {0} is already blocked")]
    AlreadyBlocked(CardId),

    /// The card is not blocked.
    #[error("card {0} is not blocked")]
    NotBlocked(CardId),

    /// Blocking is not permitted in a terminal column.
    #[error("card {card} cannot be blocked in a {kind} column")]
    BlockedInTerminalColumn {
        /// Card that was refused.
        card: CardId,
        /// Kind of the terminal column.
        kind: ColumnKind,
    },

    /// The target column belongs to a different board.
    #[error("card {card} cannot move to column {target} on another board")]
    CrossBoardMove {
        /// Card that was refused.
        card: CardId,
        /// Target column on the foreign board.
        target: ColumnId,
    },

    /// Automatic forward advance is refused from a final column.
    #[error("card {0} cannot advance out of a final column")]
    AdvanceFromFinal(CardId),
}

/// Error returned while parsing column kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown column kind: {0}")]
pub struct ParseColumnKindError(pub String);
