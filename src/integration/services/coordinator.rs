//! Failure-isolated coordination of external synchronization.

use crate::board::domain::Card;
use crate::board::ports::{BoardRepository, ColumnRepository};
use crate::integration::{
    bus::{EventSubscriber, SubscriberError},
    domain::{
        CalendarEventSnapshot, ChangedField, DomainEvent, ExternalTaskId, IntegrationKind,
        ProviderTaskDraft, SyncOutcome,
    },
    ports::{CalendarStore, SyncStatusRepository, TaskProvider},
    services::tracker::{SyncTracker, SyncTrackerError},
};
use async_trait::async_trait;
use mockable::Clock;
use serde::Deserialize;
use std::sync::Arc;

/// Card fields whose change requires the calendar mirror to be refreshed.
const CALENDAR_FIELDS: [ChangedField; 4] = [
    ChangedField::Title,
    ChangedField::Description,
    ChangedField::ScheduledDate,
    ChangedField::DueDate,
];

/// Configuration for the external-sync coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Task list used when a card's board cannot be resolved.
    pub fallback_task_list: String,
    /// Whether calendar mirroring is active.
    pub calendar_enabled: bool,
    /// Whether task-provider mirroring is active.
    pub tasks_enabled: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            fallback_task_list: "Trestle".to_owned(),
            calendar_enabled: true,
            tasks_enabled: true,
        }
    }
}

/// Subscribes to domain events and mirrors scheduling changes into the
/// calendar store and task provider.
///
/// Events arrive strictly after the local write has committed, and every
/// external call is wrapped: failures are logged and recorded as a failed
/// sync status, never surfaced to the caller of the original mutation.
#[derive(Clone)]
pub struct ExternalSyncCoordinator<CS, TP, S, LR, BR, C>
where
    CS: CalendarStore,
    TP: TaskProvider,
    S: SyncStatusRepository,
    LR: ColumnRepository,
    BR: BoardRepository,
    C: Clock + Send + Sync,
{
    calendar: Arc<CS>,
    tasks: Arc<TP>,
    tracker: SyncTracker<S, C>,
    columns: Arc<LR>,
    boards: Arc<BR>,
    settings: SyncSettings,
}

impl<CS, TP, S, LR, BR, C> ExternalSyncCoordinator<CS, TP, S, LR, BR, C>
where
    CS: CalendarStore,
    TP: TaskProvider,
    S: SyncStatusRepository,
    LR: ColumnRepository,
    BR: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new coordinator.
    #[must_use]
    pub const fn new(
        calendar: Arc<CS>,
        tasks: Arc<TP>,
        tracker: SyncTracker<S, C>,
        columns: Arc<LR>,
        boards: Arc<BR>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            calendar,
            tasks,
            tracker,
            columns,
            boards,
            settings,
        }
    }

    /// Returns the tracker this coordinator records through.
    #[must_use]
    pub const fn tracker(&self) -> &SyncTracker<S, C> {
        &self.tracker
    }

    async fn on_scheduled(&self, card: &Card) {
        if self.settings.calendar_enabled {
            self.note(self.tracker.ensure_status(card.id(), IntegrationKind::Calendar).await);
            self.create_calendar_event(card).await;
        }
        if self.settings.tasks_enabled {
            self.note(
                self.tracker
                    .ensure_status(card.id(), IntegrationKind::TaskProvider)
                    .await,
            );
            self.create_provider_task(card).await;
        }
    }

    async fn on_updated(&self, card: &Card, changed: &std::collections::BTreeSet<ChangedField>) {
        if !self.settings.calendar_enabled || card.scheduled_date().is_none() {
            return;
        }
        if CALENDAR_FIELDS.iter().any(|field| changed.contains(field)) {
            self.refresh_calendar_event(card).await;
        }
    }

    async fn on_removed(&self, card: &Card) {
        if self.settings.calendar_enabled {
            if let Err(err) = self.calendar.delete_event(card.id()).await {
                tracing::warn!(card = %card.id(), %err, "failed to delete calendar event");
            }
        }
        if self.settings.tasks_enabled {
            self.delete_provider_task(card).await;
        }
        if let Err(err) = self.tracker.remove_for_card(card.id()).await {
            tracing::error!(card = %card.id(), %err, "failed to remove sync status records");
        }
    }

    async fn create_calendar_event(&self, card: &Card) {
        let Some(snapshot) = CalendarEventSnapshot::from_card(card) else {
            tracing::debug!(card = %card.id(), "card has no scheduled date; skipping calendar sync");
            return;
        };
        match self.calendar.create_event(&snapshot).await {
            Ok(event_id) => {
                tracing::info!(card = %card.id(), event = %event_id, "calendar event created");
                self.note(
                    self.tracker
                        .record_outcome(
                            card.id(),
                            IntegrationKind::Calendar,
                            SyncOutcome::Synced {
                                external_id: Some(event_id.to_string()),
                            },
                        )
                        .await,
                );
            }
            Err(err) => {
                tracing::warn!(card = %card.id(), %err, "calendar event creation failed");
                self.note(
                    self.tracker
                        .record_outcome(card.id(), IntegrationKind::Calendar, SyncOutcome::Failed)
                        .await,
                );
            }
        }
    }

    async fn refresh_calendar_event(&self, card: &Card) {
        if let Err(err) = self.calendar.delete_event(card.id()).await {
            tracing::warn!(card = %card.id(), %err, "calendar event refresh failed on delete");
            self.note(
                self.tracker
                    .record_outcome(card.id(), IntegrationKind::Calendar, SyncOutcome::Failed)
                    .await,
            );
            return;
        }
        self.create_calendar_event(card).await;
    }

    async fn create_provider_task(&self, card: &Card) {
        let Some(due) = card.due_date().or(card.scheduled_date()) else {
            return;
        };
        let draft = ProviderTaskDraft {
            list_name: self.resolve_task_list(card).await,
            title: card.title().as_str().to_owned(),
            notes: card.description().map(str::to_owned),
            due,
        };
        match self.tasks.create_task(&draft).await {
            Ok(task_id) => {
                tracing::info!(card = %card.id(), task = %task_id, "provider task created");
                self.note(
                    self.tracker
                        .record_outcome(
                            card.id(),
                            IntegrationKind::TaskProvider,
                            SyncOutcome::Synced {
                                external_id: Some(task_id.as_str().to_owned()),
                            },
                        )
                        .await,
                );
            }
            Err(err) => {
                tracing::warn!(card = %card.id(), %err, "provider task creation failed");
                self.note(
                    self.tracker
                        .record_outcome(card.id(), IntegrationKind::TaskProvider, SyncOutcome::Failed)
                        .await,
                );
            }
        }
    }

    async fn delete_provider_task(&self, card: &Card) {
        let external_id = match self
            .tracker
            .external_id(card.id(), IntegrationKind::TaskProvider)
            .await
        {
            Ok(Some(id)) => ExternalTaskId::new(id),
            Ok(None) => return,
            Err(err) => {
                tracing::error!(card = %card.id(), %err, "failed to look up provider task id");
                return;
            }
        };
        if let Err(err) = self.tasks.delete_task(&external_id).await {
            tracing::warn!(card = %card.id(), task = %external_id, %err, "failed to delete provider task");
        }
    }

    /// Resolves the task list for a card: the owning board's name, or the
    /// configured fallback when the chain cannot be walked.
    async fn resolve_task_list(&self, card: &Card) -> String {
        let column = match self.columns.find_by_id(card.column_id()).await {
            Ok(Some(column)) => column,
            Ok(None) => return self.settings.fallback_task_list.clone(),
            Err(err) => {
                tracing::debug!(card = %card.id(), %err, "column lookup failed; using fallback list");
                return self.settings.fallback_task_list.clone();
            }
        };
        match self.boards.find_by_id(column.board_id()).await {
            Ok(Some(board)) => board.name().to_owned(),
            Ok(None) => self.settings.fallback_task_list.clone(),
            Err(err) => {
                tracing::debug!(card = %card.id(), %err, "board lookup failed; using fallback list");
                self.settings.fallback_task_list.clone()
            }
        }
    }

    /// Logs a tracker failure; sync bookkeeping must never break dispatch.
    fn note<T>(&self, result: Result<T, SyncTrackerError>) {
        if let Err(err) = result {
            tracing::error!(%err, "failed to record sync status");
        }
    }
}

#[async_trait]
impl<CS, TP, S, LR, BR, C> EventSubscriber for ExternalSyncCoordinator<CS, TP, S, LR, BR, C>
where
    CS: CalendarStore,
    TP: TaskProvider,
    S: SyncStatusRepository,
    LR: ColumnRepository,
    BR: BoardRepository,
    C: Clock + Send + Sync,
{
    fn name(&self) -> &str {
        "external-sync"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), SubscriberError> {
        match event {
            DomainEvent::Scheduled { card } => self.on_scheduled(card).await,
            DomainEvent::Rescheduled { card, .. } => {
                if self.settings.calendar_enabled {
                    self.refresh_calendar_event(card).await;
                }
            }
            DomainEvent::Updated { card, changed } => self.on_updated(card, changed).await,
            DomainEvent::Moved { card, .. } => {
                // Column placement is not mirrored externally.
                tracing::debug!(card = %card.id(), "move requires no external sync");
            }
            DomainEvent::Unscheduled { card, .. } | DomainEvent::Deleted { card } => {
                self.on_removed(card).await;
            }
        }
        Ok(())
    }
}
