//! Idempotent startup reconciliation between cards and the calendar store.

use crate::board::ports::{CardRepository, CardRepositoryError};
use crate::integration::{
    domain::{CalendarEventSnapshot, IntegrationKind, SyncOutcome},
    ports::{CalendarStore, CalendarStoreError, SyncStatusRepository},
    services::tracker::{SyncTracker, SyncTrackerError},
};
use mockable::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Errors returned by the startup reconciler.
#[derive(Debug, Clone, Error)]
pub enum ReconciliationError {
    /// Another reconciliation run is already in flight.
    #[error("reconciliation is already running")]
    AlreadyRunning,

    /// Calendar store failure while walking or repairing events.
    #[error(transparent)]
    Calendar(#[from] CalendarStoreError),

    /// Card repository failure.
    #[error(transparent)]
    Cards(#[from] CardRepositoryError),

    /// Sync-status bookkeeping failure.
    #[error(transparent)]
    Tracker(#[from] SyncTrackerError),
}

/// Result type for reconciliation.
pub type ReconciliationResult<T> = Result<T, ReconciliationError>;

/// Counters describing what one reconciliation pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconciliationReport {
    /// Calendar events removed because their card is gone or unscheduled.
    pub orphans_removed: usize,
    /// Calendar events created for scheduled cards that lacked one.
    pub events_created: usize,
    /// Scheduled cards whose calendar event was already in place.
    pub events_kept: usize,
}

/// Repairs drift between local cards and the external calendar at startup.
///
/// The pass is idempotent: running it twice in succession yields an
/// identical calendar state. It must not run concurrently with itself, so
/// an atomic guard rejects overlapping invocations.
pub struct StartupReconciler<CR, CS, S, C>
where
    CR: CardRepository,
    CS: CalendarStore,
    S: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    cards: Arc<CR>,
    calendar: Arc<CS>,
    tracker: SyncTracker<S, C>,
    running: AtomicBool,
}

impl<CR, CS, S, C> StartupReconciler<CR, CS, S, C>
where
    CR: CardRepository,
    CS: CalendarStore,
    S: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new reconciler.
    #[must_use]
    pub const fn new(cards: Arc<CR>, calendar: Arc<CS>, tracker: SyncTracker<S, C>) -> Self {
        Self {
            cards,
            calendar,
            tracker,
            running: AtomicBool::new(false),
        }
    }

    /// Runs one reconciliation pass: ensures sync-status storage exists,
    /// removes orphaned calendar events, and creates events for scheduled
    /// cards that lack one.
    ///
    /// # Errors
    ///
    /// Returns [`ReconciliationError::AlreadyRunning`] when a pass is in
    /// flight, or the underlying failure when the calendar store or the
    /// repositories cannot be read. Per-card event creation failures are
    /// recorded as failed sync statuses instead of aborting the pass.
    pub async fn reconcile(&self) -> ReconciliationResult<ReconciliationReport> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ReconciliationError::AlreadyRunning);
        }
        let outcome = self.run().await;
        self.running.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run(&self) -> ReconciliationResult<ReconciliationReport> {
        self.tracker.ensure_storage().await?;
        let mut report = ReconciliationReport::default();
        self.remove_orphans(&mut report).await?;
        self.backfill_events(&mut report).await?;
        tracing::info!(
            orphans_removed = report.orphans_removed,
            events_created = report.events_created,
            events_kept = report.events_kept,
            "startup reconciliation finished"
        );
        Ok(report)
    }

    /// Removes calendar events whose originating card no longer exists or
    /// no longer carries a scheduled date.
    async fn remove_orphans(&self, report: &mut ReconciliationReport) -> ReconciliationResult<()> {
        for record in self.calendar.find_all().await? {
            let card_id = record.snapshot().card_id();
            let card = self.cards.find_by_id(card_id).await?;
            let still_scheduled = card
                .as_ref()
                .is_some_and(|found| found.scheduled_date().is_some());
            if still_scheduled {
                continue;
            }
            self.calendar.delete_event(card_id).await?;
            report.orphans_removed += 1;
            tracing::info!(card = %card_id, "removed orphaned calendar event");
        }
        Ok(())
    }

    /// Creates calendar events for scheduled cards that lack one.
    async fn backfill_events(&self, report: &mut ReconciliationReport) -> ReconciliationResult<()> {
        for card in self.cards.find_scheduled().await? {
            if !self.calendar.find_by_card(card.id()).await?.is_empty() {
                report.events_kept += 1;
                continue;
            }
            let Some(snapshot) = CalendarEventSnapshot::from_card(&card) else {
                continue;
            };
            self.tracker
                .ensure_status(card.id(), IntegrationKind::Calendar)
                .await?;
            match self.calendar.create_event(&snapshot).await {
                Ok(event_id) => {
                    report.events_created += 1;
                    self.tracker
                        .record_outcome(
                            card.id(),
                            IntegrationKind::Calendar,
                            SyncOutcome::Synced {
                                external_id: Some(event_id.to_string()),
                            },
                        )
                        .await?;
                    tracing::info!(card = %card.id(), event = %event_id, "backfilled calendar event");
                }
                Err(err) => {
                    tracing::warn!(card = %card.id(), %err, "calendar backfill failed for card");
                    self.tracker
                        .record_outcome(card.id(), IntegrationKind::Calendar, SyncOutcome::Failed)
                        .await?;
                }
            }
        }
        Ok(())
    }
}
