//! Shared wiring helpers for full-engine integration tests.

use mockable::DefaultClock;
use std::sync::Arc;
use trestle::board::{
    adapters::memory::{InMemoryBoardRepository, InMemoryCardRepository, InMemoryColumnRepository},
    domain::{Board, Column, ColumnKind},
    services::{BoardSummaryService, CardLifecycleService, SchedulingService},
};
use trestle::integration::{
    adapters::memory::{InMemoryCalendarStore, InMemorySyncStatusRepository, InMemoryTaskProvider},
    bus::EventBus,
    services::{ExternalSyncCoordinator, StartupReconciler, SyncSettings, SyncTracker},
};

/// Lifecycle service type wired over the in-memory adapters.
pub type EngineLifecycle =
    CardLifecycleService<InMemoryCardRepository, InMemoryColumnRepository, DefaultClock>;

/// Scheduling service type wired over the in-memory adapters.
pub type EngineScheduling = SchedulingService<InMemoryCardRepository, DefaultClock>;

/// Summary service type wired over the in-memory adapters.
pub type EngineSummary =
    BoardSummaryService<InMemoryBoardRepository, InMemoryColumnRepository, InMemoryCardRepository>;

/// Reconciler type wired over the in-memory adapters.
pub type EngineReconciler = StartupReconciler<
    InMemoryCardRepository,
    InMemoryCalendarStore,
    InMemorySyncStatusRepository,
    DefaultClock,
>;

/// The whole engine wired over in-memory adapters, with the external-sync
/// coordinator subscribed to the bus.
pub struct Engine {
    /// Shared card repository.
    pub cards: InMemoryCardRepository,
    /// In-memory calendar store with failure injection.
    pub calendar: Arc<InMemoryCalendarStore>,
    /// In-memory task provider.
    pub tasks: Arc<InMemoryTaskProvider>,
    /// Tracker the coordinator records through.
    pub tracker: SyncTracker<InMemorySyncStatusRepository, DefaultClock>,
    /// Card lifecycle service.
    pub lifecycle: EngineLifecycle,
    /// Scheduling-date service.
    pub scheduling: EngineScheduling,
    /// Board aggregation service.
    pub summary: EngineSummary,
    /// Startup reconciler.
    pub reconciler: EngineReconciler,
    /// The seeded board.
    pub board: Board,
    /// Initial-kind column.
    pub backlog: Column,
    /// Pending-kind column.
    pub doing: Column,
    /// Final-kind column.
    pub done: Column,
}

/// Wires the engine over one seeded board with three columns.
pub fn engine() -> Engine {
    let cards = InMemoryCardRepository::new();
    let columns = InMemoryColumnRepository::new();
    let boards = InMemoryBoardRepository::new();

    let board = Board::new("Launch prep", None);
    boards.insert(board.clone()).expect("board seed should succeed");
    let backlog = Column::new("To do", 0, ColumnKind::Initial, board.id());
    let doing = Column::new("Doing", 1, ColumnKind::Pending, board.id());
    let done = Column::new("Done", 2, ColumnKind::Final, board.id());
    for column in [&backlog, &doing, &done] {
        columns
            .insert(column.clone())
            .expect("column seed should succeed");
    }

    let calendar = Arc::new(InMemoryCalendarStore::new());
    let tasks = Arc::new(InMemoryTaskProvider::new());
    let sync_repo = Arc::new(InMemorySyncStatusRepository::new());
    let clock = Arc::new(DefaultClock);
    let tracker = SyncTracker::new(sync_repo, clock.clone());

    let bus = Arc::new(EventBus::new());
    let coordinator = ExternalSyncCoordinator::new(
        calendar.clone(),
        tasks.clone(),
        tracker.clone(),
        Arc::new(columns.clone()),
        Arc::new(boards.clone()),
        SyncSettings::default(),
    );
    bus.subscribe(Arc::new(coordinator));

    let lifecycle = CardLifecycleService::new(
        Arc::new(cards.clone()),
        Arc::new(columns.clone()),
        bus.clone(),
        clock.clone(),
    );
    let scheduling = SchedulingService::new(Arc::new(cards.clone()), bus, clock);
    let summary = BoardSummaryService::new(
        Arc::new(boards),
        Arc::new(columns),
        Arc::new(cards.clone()),
    );
    let reconciler = StartupReconciler::new(
        Arc::new(cards.clone()),
        calendar.clone(),
        tracker.clone(),
    );

    Engine {
        cards,
        calendar,
        tasks,
        tracker,
        lifecycle,
        scheduling,
        summary,
        reconciler,
        board,
        backlog,
        doing,
        done,
    }
}
