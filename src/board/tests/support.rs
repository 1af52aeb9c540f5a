//! Shared fixtures for board context tests.

use crate::board::{
    adapters::memory::{InMemoryBoardRepository, InMemoryCardRepository, InMemoryColumnRepository},
    domain::{Board, Card, CardProgress, CardTitle, CardTypeId, Column, ColumnKind},
    services::{CardLifecycleService, SchedulingService},
};
use crate::integration::{
    bus::{EventBus, EventSubscriber, SubscriberError},
    domain::DomainEvent,
};
use async_trait::async_trait;
use mockable::DefaultClock;
use std::sync::{Arc, Mutex};

/// Captures every event it receives, in order.
#[derive(Default)]
pub struct RecordingSubscriber {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingSubscriber {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the captured events in arrival order.
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Returns the short names of the captured events, in arrival order.
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events().iter().map(DomainEvent::name).collect()
    }
}

#[async_trait]
impl EventSubscriber for RecordingSubscriber {
    fn name(&self) -> &str {
        "recording"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), SubscriberError> {
        self.events
            .lock()
            .map_err(|err| SubscriberError::message(err.to_string()))?
            .push(event.clone());
        Ok(())
    }
}

/// Lifecycle service type used throughout the board tests.
pub type TestLifecycle =
    CardLifecycleService<InMemoryCardRepository, InMemoryColumnRepository, DefaultClock>;

/// Scheduling service type used throughout the board tests.
pub type TestScheduling = SchedulingService<InMemoryCardRepository, DefaultClock>;

/// A wired board with one column of each kind and recording event capture.
pub struct BoardFixture {
    /// Shared card repository.
    pub cards: InMemoryCardRepository,
    /// Shared column repository.
    pub columns: InMemoryColumnRepository,
    /// Shared board repository.
    pub boards: InMemoryBoardRepository,
    /// Bus the services publish through.
    pub bus: Arc<EventBus>,
    /// Recorder registered on the bus.
    pub recorder: Arc<RecordingSubscriber>,
    /// Lifecycle service under test.
    pub lifecycle: TestLifecycle,
    /// Scheduling service under test.
    pub scheduling: TestScheduling,
    /// The seeded board.
    pub board: Board,
    /// Initial-kind column.
    pub backlog: Column,
    /// Pending-kind column.
    pub doing: Column,
    /// Final-kind column.
    pub done: Column,
    /// Cancel-kind column.
    pub dropped: Column,
}

impl BoardFixture {
    /// Seeds a board with the standard four columns and wires the services.
    pub fn new() -> Self {
        let cards = InMemoryCardRepository::new();
        let columns = InMemoryColumnRepository::new();
        let boards = InMemoryBoardRepository::new();
        let board = Board::new("Launch prep", None);
        boards.insert(board.clone()).expect("board seed should succeed");

        let backlog = Column::new("To do", 0, ColumnKind::Initial, board.id());
        let doing = Column::new("Doing", 1, ColumnKind::Pending, board.id());
        let done = Column::new("Done", 2, ColumnKind::Final, board.id());
        let dropped = Column::new("Dropped", 3, ColumnKind::Cancel, board.id());
        for column in [&backlog, &doing, &done, &dropped] {
            columns
                .insert(column.clone())
                .expect("column seed should succeed");
        }

        let bus = Arc::new(EventBus::new());
        let recorder = Arc::new(RecordingSubscriber::new());
        bus.subscribe(recorder.clone());

        let clock = Arc::new(DefaultClock);
        let lifecycle = CardLifecycleService::new(
            Arc::new(cards.clone()),
            Arc::new(columns.clone()),
            bus.clone(),
            clock.clone(),
        );
        let scheduling = SchedulingService::new(Arc::new(cards.clone()), bus.clone(), clock);

        Self {
            cards,
            columns,
            boards,
            bus,
            recorder,
            lifecycle,
            scheduling,
            board,
            backlog,
            doing,
            done,
            dropped,
        }
    }
}

/// Builds a bare card directly in the given column, bypassing the services.
pub fn bare_card(column: &Column, title: &str) -> Card {
    Card::new(
        CardTitle::new(title).expect("valid title"),
        None,
        column.id(),
        CardTypeId::new(),
        CardProgress::None,
        0,
        &DefaultClock,
    )
}
