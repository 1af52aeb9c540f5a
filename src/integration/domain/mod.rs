//! Domain model for cross-system synchronization.
//!
//! Covers the transient domain events the engine publishes, the sync-status
//! records it persists, and the payload types handed to the external
//! calendar store and task provider.

mod calendar;
mod event;
mod sync;

pub use calendar::{
    CalendarEventId, CalendarEventRecord, CalendarEventSnapshot, ExternalTaskId, ProviderTaskDraft,
};
pub use event::{ChangedField, DomainEvent, changed_between};
pub use sync::{IntegrationKind, SyncOutcome, SyncStatus, SyncStatusRecord};
