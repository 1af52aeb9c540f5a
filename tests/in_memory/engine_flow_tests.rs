//! End-to-end flows: lifecycle mutations ripple into the external mirrors.

use super::helpers::{Engine, engine};
use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};
use trestle::board::domain::{BoardStatus, CardTypeId};
use trestle::board::services::CreateCardRequest;
use trestle::integration::domain::{IntegrationKind, SyncStatus};
use trestle::integration::ports::CalendarStore;

#[fixture]
fn wired() -> Engine {
    engine()
}

fn date(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, day, hour, 45, 0)
        .single()
        .expect("valid date")
}

async fn create_card(wired: &Engine, title: &str) -> trestle::board::domain::Card {
    wired
        .lifecycle
        .create(CreateCardRequest::new(
            title,
            wired.backlog.id(),
            CardTypeId::new(),
        ))
        .await
        .expect("creation should succeed")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn scheduling_a_card_mirrors_it_into_both_systems(wired: Engine) {
    let card = create_card(&wired, "Book the venue").await;

    wired
        .scheduling
        .set_scheduling_dates(card.id(), Some(date(5, 9)), Some(date(5, 18)))
        .await
        .expect("scheduling should succeed");

    let events = wired
        .calendar
        .find_by_card(card.id())
        .await
        .expect("calendar lookup should succeed");
    assert_eq!(events.len(), 1);
    assert_eq!(
        events.first().map(|event| event.snapshot().title()),
        Some("Book the venue")
    );

    let tasks = wired
        .tasks
        .tasks_in(wired.board.name())
        .expect("task lookup should succeed");
    assert_eq!(tasks.len(), 1);

    let statuses = wired
        .tracker
        .statuses_for_card(card.id())
        .await
        .expect("status listing should succeed");
    assert_eq!(statuses.len(), 2);
    assert!(statuses.iter().all(|record| record.status() == SyncStatus::Synced));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clearing_the_schedule_removes_the_external_mirror(wired: Engine) {
    let card = create_card(&wired, "Cancelled meetup").await;
    wired
        .scheduling
        .set_scheduled_date(card.id(), Some(date(6, 10)))
        .await
        .expect("scheduling should succeed");

    wired
        .scheduling
        .set_scheduled_date(card.id(), None)
        .await
        .expect("clearing should succeed");

    let events = wired
        .calendar
        .find_by_card(card.id())
        .await
        .expect("calendar lookup should succeed");
    assert!(events.is_empty());
    let statuses = wired
        .tracker
        .statuses_for_card(card.id())
        .await
        .expect("status listing should succeed");
    assert!(statuses.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn calendar_outage_never_blocks_the_local_write(wired: Engine) {
    let card = create_card(&wired, "Resilient work").await;
    wired.calendar.set_offline(true);

    let updated = wired
        .scheduling
        .set_scheduled_date(card.id(), Some(date(7, 11)))
        .await
        .expect("local write must succeed despite the outage");

    assert_eq!(updated.scheduled_date(), Some(date(7, 11)));
    let calendar_status = wired
        .tracker
        .statuses_for_card(card.id())
        .await
        .expect("status listing should succeed")
        .into_iter()
        .find(|record| record.integration() == IntegrationKind::Calendar)
        .expect("calendar status should exist");
    assert_eq!(calendar_status.status(), SyncStatus::Failed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_card_cleans_up_both_systems(wired: Engine) {
    let card = create_card(&wired, "Ephemeral").await;
    wired
        .scheduling
        .set_scheduled_date(card.id(), Some(date(8, 9)))
        .await
        .expect("scheduling should succeed");

    wired
        .lifecycle
        .delete(card.id())
        .await
        .expect("deletion should succeed");

    let events = wired
        .calendar
        .find_by_card(card.id())
        .await
        .expect("calendar lookup should succeed");
    assert!(events.is_empty());
    let tasks = wired
        .tasks
        .tasks_in(wired.board.name())
        .expect("task lookup should succeed");
    assert!(tasks.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn summary_tracks_cards_as_they_move(wired: Engine) {
    let first = create_card(&wired, "First").await;
    let _second = create_card(&wired, "Second").await;
    wired
        .lifecycle
        .move_to_column(first.id(), wired.done.id())
        .await
        .expect("move should succeed");

    let summary = wired
        .summary
        .summarize(wired.board.id())
        .await
        .expect("summary should succeed");

    assert_eq!(summary.total_cards, 2);
    assert_eq!(summary.status, BoardStatus::InProgress);
    assert_eq!(summary.percent_initial, 50);
    assert_eq!(summary.percent_final, 50);
}
