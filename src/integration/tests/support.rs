//! Shared fixtures for integration context tests.

use crate::board::{
    adapters::memory::{InMemoryBoardRepository, InMemoryCardRepository, InMemoryColumnRepository},
    domain::{Board, Card, CardProgress, CardTitle, CardTypeId, Column, ColumnKind},
    ports::CardRepository,
};
use crate::integration::{
    adapters::memory::{InMemoryCalendarStore, InMemorySyncStatusRepository, InMemoryTaskProvider},
    bus::{EventSubscriber, SubscriberError},
    domain::DomainEvent,
    services::{ExternalSyncCoordinator, StartupReconciler, SyncSettings, SyncTracker},
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use mockable::DefaultClock;
use std::sync::{Arc, Mutex};

/// Coordinator type used throughout the integration tests.
pub type TestCoordinator = ExternalSyncCoordinator<
    InMemoryCalendarStore,
    InMemoryTaskProvider,
    InMemorySyncStatusRepository,
    InMemoryColumnRepository,
    InMemoryBoardRepository,
    DefaultClock,
>;

/// Reconciler type used throughout the integration tests.
pub type TestReconciler = StartupReconciler<
    InMemoryCardRepository,
    InMemoryCalendarStore,
    InMemorySyncStatusRepository,
    DefaultClock,
>;

/// Fully wired sync machinery over in-memory adapters.
pub struct SyncFixture {
    /// Shared card repository.
    pub cards: InMemoryCardRepository,
    /// Shared column repository.
    pub columns: InMemoryColumnRepository,
    /// Shared board repository.
    pub boards: InMemoryBoardRepository,
    /// In-memory calendar store with failure injection.
    pub calendar: Arc<InMemoryCalendarStore>,
    /// In-memory task provider with failure injection.
    pub tasks: Arc<InMemoryTaskProvider>,
    /// Sync-status repository behind the tracker.
    pub sync_repo: Arc<InMemorySyncStatusRepository>,
    /// Tracker shared with the coordinator.
    pub tracker: SyncTracker<InMemorySyncStatusRepository, DefaultClock>,
    /// Coordinator under test.
    pub coordinator: TestCoordinator,
    /// The seeded board.
    pub board: Board,
    /// Initial-kind column on the seeded board.
    pub backlog: Column,
}

impl SyncFixture {
    /// Wires the coordinator with default settings over one seeded board.
    pub fn new() -> Self {
        let cards = InMemoryCardRepository::new();
        let columns = InMemoryColumnRepository::new();
        let boards = InMemoryBoardRepository::new();
        let board = Board::new("Launch prep", None);
        boards.insert(board.clone()).expect("board seed should succeed");
        let backlog = Column::new("To do", 0, ColumnKind::Initial, board.id());
        columns
            .insert(backlog.clone())
            .expect("column seed should succeed");

        let calendar = Arc::new(InMemoryCalendarStore::new());
        let tasks = Arc::new(InMemoryTaskProvider::new());
        let sync_repo = Arc::new(InMemorySyncStatusRepository::new());
        let clock = Arc::new(DefaultClock);
        let tracker = SyncTracker::new(sync_repo.clone(), clock);
        let coordinator = ExternalSyncCoordinator::new(
            calendar.clone(),
            tasks.clone(),
            tracker.clone(),
            Arc::new(columns.clone()),
            Arc::new(boards.clone()),
            SyncSettings::default(),
        );

        Self {
            cards,
            columns,
            boards,
            calendar,
            tasks,
            sync_repo,
            tracker,
            coordinator,
            board,
            backlog,
        }
    }

    /// Builds a reconciler over the fixture's adapters.
    pub fn reconciler(&self) -> TestReconciler {
        StartupReconciler::new(
            Arc::new(self.cards.clone()),
            self.calendar.clone(),
            self.tracker.clone(),
        )
    }

    /// Creates a card in the backlog, schedules it, and saves it.
    pub async fn scheduled_card(&self, title: &str, day: u32) -> Card {
        let mut card = Card::new(
            CardTitle::new(title).expect("valid title"),
            Some("card notes".to_owned()),
            self.backlog.id(),
            CardTypeId::new(),
            CardProgress::None,
            0,
            &DefaultClock,
        );
        card.set_schedule(Some(date(day, 9)), Some(date(day, 17)), &DefaultClock)
            .expect("valid schedule");
        self.cards.save(&card).await.expect("card seed should succeed");
        card
    }
}

/// Fixed test date within June 2025.
pub fn date(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, hour, 15, 0)
        .single()
        .expect("valid date")
}

/// Subscriber that records its label into a shared log on every event.
pub struct LabelledSubscriber {
    label: String,
    log: Arc<Mutex<Vec<String>>>,
}

impl LabelledSubscriber {
    /// Creates a subscriber appending `label` to `log` on every event.
    pub fn new(label: impl Into<String>, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            label: label.into(),
            log,
        }
    }
}

#[async_trait]
impl EventSubscriber for LabelledSubscriber {
    fn name(&self) -> &str {
        &self.label
    }

    async fn handle(&self, _event: &DomainEvent) -> Result<(), SubscriberError> {
        self.log
            .lock()
            .map_err(|err| SubscriberError::message(err.to_string()))?
            .push(self.label.clone());
        Ok(())
    }
}

/// Subscriber that always fails.
pub struct FailingSubscriber;

#[async_trait]
impl EventSubscriber for FailingSubscriber {
    fn name(&self) -> &str {
        "failing"
    }

    async fn handle(&self, _event: &DomainEvent) -> Result<(), SubscriberError> {
        Err(SubscriberError::message("synthetic subscriber failure"))
    }
}
