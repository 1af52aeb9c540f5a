//! Port contracts for the board context.

pub mod repository;

pub use repository::{
    BoardRepository, BoardRepositoryError, BoardRepositoryResult, CardRepository,
    CardRepositoryError, CardRepositoryResult, ColumnRepository, ColumnRepositoryError,
    ColumnRepositoryResult,
};
