//! Workflow columns and their board-local ordering.

use super::{BoardId, ColumnId, ParseColumnKindError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow role of a column.
///
/// The kind enum is the sole source of truth for a column's role; column
/// names carry no semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Backlog column where new work accumulates.
    Initial,
    /// In-progress column.
    Pending,
    /// Terminal column for completed work.
    Final,
    /// Terminal column for abandoned work.
    Cancel,
}

impl ColumnKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Pending => "pending",
            Self::Final => "final",
            Self::Cancel => "cancel",
        }
    }

    /// Returns true for kinds that end forward progress (final or cancel).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Final | Self::Cancel)
    }
}

impl TryFrom<&str> for ColumnKind {
    type Error = ParseColumnKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "initial" => Ok(Self::Initial),
            "pending" => Ok(Self::Pending),
            "final" => Ok(Self::Final),
            "cancel" => Ok(Self::Cancel),
            _ => Err(ParseColumnKindError(value.to_owned())),
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A workflow column on a board.
///
/// `order_index` defines a board-local linear path; cards advance along it
/// until they reach a terminal column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    id: ColumnId,
    name: String,
    order_index: u32,
    kind: ColumnKind,
    board_id: BoardId,
}

impl Column {
    /// Creates a column with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, order_index: u32, kind: ColumnKind, board_id: BoardId) -> Self {
        Self {
            id: ColumnId::new(),
            name: name.into(),
            order_index,
            kind,
            board_id,
        }
    }

    /// Reconstructs a column from persisted storage.
    #[must_use]
    pub fn from_persisted(
        id: ColumnId,
        name: impl Into<String>,
        order_index: u32,
        kind: ColumnKind,
        board_id: BoardId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            order_index,
            kind,
            board_id,
        }
    }

    /// Returns the column identifier.
    #[must_use]
    pub const fn id(&self) -> ColumnId {
        self.id
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the board-local position of this column.
    #[must_use]
    pub const fn order_index(&self) -> u32 {
        self.order_index
    }

    /// Returns the workflow role of this column.
    #[must_use]
    pub const fn kind(&self) -> ColumnKind {
        self.kind
    }

    /// Returns the owning board identifier.
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }
}
