//! Orchestration services for the board context.

pub mod lifecycle;
pub mod scheduling;
pub mod summary;

pub use lifecycle::{
    CardLifecycleError, CardLifecycleResult, CardLifecycleService, CreateCardRequest,
    UpdateCardDetails,
};
pub use scheduling::{SchedulingError, SchedulingResult, SchedulingService};
pub use summary::{BoardSummaryError, BoardSummaryResult, BoardSummaryService};
