//! Boards and their optional grouping.

use super::{BoardGroupId, BoardId};
use serde::{Deserialize, Serialize};

/// A board owning an ordered set of workflow columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    id: BoardId,
    name: String,
    group_id: Option<BoardGroupId>,
}

impl Board {
    /// Creates a board with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, group_id: Option<BoardGroupId>) -> Self {
        Self {
            id: BoardId::new(),
            name: name.into(),
            group_id,
        }
    }

    /// Reconstructs a board from persisted storage.
    #[must_use]
    pub fn from_persisted(
        id: BoardId,
        name: impl Into<String>,
        group_id: Option<BoardGroupId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            group_id,
        }
    }

    /// Returns the board identifier.
    #[must_use]
    pub const fn id(&self) -> BoardId {
        self.id
    }

    /// Returns the board name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the group the board belongs to, if any.
    #[must_use]
    pub const fn group_id(&self) -> Option<BoardGroupId> {
        self.group_id
    }
}
