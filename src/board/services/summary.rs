//! Board-level aggregation of completion statistics.
//!
//! Columns and cards are fetched in two batched calls for the whole board
//! set, eliminating per-board and per-column query fan-out.

use crate::board::{
    domain::{Board, BoardGroupId, BoardId, BoardStatus, BoardSummary, ColumnId, ColumnKind},
    ports::{
        BoardRepository, BoardRepositoryError, CardRepository, CardRepositoryError,
        ColumnRepository, ColumnRepositoryError,
    },
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for board summarization.
#[derive(Debug, Error)]
pub enum BoardSummaryError {
    /// Board repository operation failed.
    #[error(transparent)]
    BoardRepository(#[from] BoardRepositoryError),
    /// Column repository operation failed.
    #[error(transparent)]
    ColumnRepository(#[from] ColumnRepositoryError),
    /// Card repository operation failed.
    #[error(transparent)]
    CardRepository(#[from] CardRepositoryError),
    /// No board exists with the given identifier.
    #[error("board {0} not found")]
    BoardNotFound(BoardId),
}

/// Result type for board summarization.
pub type BoardSummaryResult<T> = Result<T, BoardSummaryError>;

/// Per-board card tally, bucketed by column kind.
///
/// Cancel-kind cards count toward the total without a bucket of their own.
#[derive(Debug, Clone, Copy, Default)]
struct KindTally {
    total: usize,
    initial: usize,
    pending: usize,
    done: usize,
}

impl KindTally {
    fn bump(&mut self, kind: ColumnKind) {
        self.total += 1;
        match kind {
            ColumnKind::Initial => self.initial += 1,
            ColumnKind::Pending => self.pending += 1,
            ColumnKind::Final => self.done += 1,
            ColumnKind::Cancel => {}
        }
    }

    fn status(self) -> BoardStatus {
        if self.total == 0 {
            BoardStatus::Empty
        } else if self.initial == self.total {
            BoardStatus::NotStarted
        } else if self.done == self.total {
            BoardStatus::Completed
        } else {
            BoardStatus::InProgress
        }
    }
}

/// Truncating integer percentage; a zero total yields zero.
fn percentage(bucket: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    u8::try_from(bucket * 100 / total).unwrap_or(u8::MAX)
}

/// Batched board aggregation engine.
#[derive(Clone)]
pub struct BoardSummaryService<BR, LR, CR>
where
    BR: BoardRepository,
    LR: ColumnRepository,
    CR: CardRepository,
{
    boards: Arc<BR>,
    columns: Arc<LR>,
    cards: Arc<CR>,
}

impl<BR, LR, CR> BoardSummaryService<BR, LR, CR>
where
    BR: BoardRepository,
    LR: ColumnRepository,
    CR: CardRepository,
{
    /// Creates a new aggregation engine.
    #[must_use]
    pub const fn new(boards: Arc<BR>, columns: Arc<LR>, cards: Arc<CR>) -> Self {
        Self {
            boards,
            columns,
            cards,
        }
    }

    /// Summarizes one board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSummaryError::BoardNotFound`] for unknown boards and
    /// repository errors.
    pub async fn summarize(&self, board_id: BoardId) -> BoardSummaryResult<BoardSummary> {
        let board = self
            .boards
            .find_by_id(board_id)
            .await?
            .ok_or(BoardSummaryError::BoardNotFound(board_id))?;
        let mut summaries = self.build(vec![board]).await?;
        summaries
            .pop()
            .ok_or(BoardSummaryError::BoardNotFound(board_id))
    }

    /// Summarizes every board.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn summarize_all(&self) -> BoardSummaryResult<Vec<BoardSummary>> {
        let boards = self.boards.find_all().await?;
        self.build(boards).await
    }

    /// Summarizes the boards of one group.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn summarize_for_group(
        &self,
        group_id: BoardGroupId,
    ) -> BoardSummaryResult<Vec<BoardSummary>> {
        let boards = self.boards.find_by_group_id(group_id).await?;
        self.build(boards).await
    }

    /// Builds summaries for the given board set with two batched reads.
    async fn build(&self, boards: Vec<Board>) -> BoardSummaryResult<Vec<BoardSummary>> {
        if boards.is_empty() {
            return Ok(Vec::new());
        }

        let board_ids: Vec<BoardId> = boards.iter().map(Board::id).collect();
        let columns = self.columns.find_by_board_id_in(&board_ids).await?;
        let column_ids: Vec<ColumnId> = columns.iter().map(|column| column.id()).collect();
        let cards = self.cards.find_by_column_id_in(&column_ids).await?;

        let column_index: HashMap<ColumnId, (BoardId, ColumnKind)> = columns
            .iter()
            .map(|column| (column.id(), (column.board_id(), column.kind())))
            .collect();

        let mut tallies: HashMap<BoardId, KindTally> = HashMap::new();
        for card in &cards {
            let Some((board_id, kind)) = column_index.get(&card.column_id()) else {
                continue;
            };
            tallies.entry(*board_id).or_default().bump(*kind);
        }

        Ok(boards
            .into_iter()
            .map(|board| {
                let tally = tallies.get(&board.id()).copied().unwrap_or_default();
                summarize_board(&board, tally)
            })
            .collect())
    }
}

fn summarize_board(board: &Board, tally: KindTally) -> BoardSummary {
    BoardSummary {
        board_id: board.id(),
        name: board.name().to_owned(),
        group_id: board.group_id(),
        total_cards: tally.total,
        initial_cards: tally.initial,
        pending_cards: tally.pending,
        final_cards: tally.done,
        percent_initial: percentage(tally.initial, tally.total),
        percent_pending: percentage(tally.pending, tally.total),
        percent_final: percentage(tally.done, tally.total),
        status: tally.status(),
    }
}
