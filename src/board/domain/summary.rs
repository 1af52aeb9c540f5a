//! Derived per-board completion summaries.

use super::{BoardGroupId, BoardId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall workflow status of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardStatus {
    /// The board holds no cards.
    Empty,
    /// Every card sits in an initial-kind column.
    NotStarted,
    /// Work is underway.
    InProgress,
    /// Every card sits in a final-kind column.
    Completed,
}

impl BoardStatus {
    /// Returns the human-readable status label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::NotStarted => "Not started",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for BoardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived completion statistics for one board.
///
/// Percentages are truncated, not rounded, and cancel-kind cards count
/// toward the total without a bucket of their own, so the three values need
/// not sum to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSummary {
    /// Summarized board.
    pub board_id: BoardId,
    /// Board name, for display.
    pub name: String,
    /// Group the board belongs to, if any.
    pub group_id: Option<BoardGroupId>,
    /// Total cards on the board, terminal columns included.
    pub total_cards: usize,
    /// Cards in initial-kind columns.
    pub initial_cards: usize,
    /// Cards in pending-kind columns.
    pub pending_cards: usize,
    /// Cards in final-kind columns.
    pub final_cards: usize,
    /// Truncated percentage of cards in initial-kind columns.
    pub percent_initial: u8,
    /// Truncated percentage of cards in pending-kind columns.
    pub percent_pending: u8,
    /// Truncated percentage of cards in final-kind columns.
    pub percent_final: u8,
    /// Overall workflow status.
    pub status: BoardStatus,
}
