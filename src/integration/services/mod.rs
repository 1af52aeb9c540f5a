//! Orchestration services for cross-system synchronization.

pub mod coordinator;
pub mod reconcile;
pub mod tracker;

pub use coordinator::{ExternalSyncCoordinator, SyncSettings};
pub use reconcile::{
    ReconciliationError, ReconciliationReport, ReconciliationResult, StartupReconciler,
};
pub use tracker::{SyncTracker, SyncTrackerError, SyncTrackerResult};
