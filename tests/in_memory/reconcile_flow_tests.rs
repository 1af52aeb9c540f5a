//! Reconciliation flows: drift repair after outages.

use super::helpers::{Engine, engine};
use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};
use trestle::board::domain::CardTypeId;
use trestle::board::services::CreateCardRequest;
use trestle::integration::domain::{IntegrationKind, SyncStatus};
use trestle::integration::ports::CalendarStore;

#[fixture]
fn wired() -> Engine {
    engine()
}

fn date(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, day, 8, 20, 0)
        .single()
        .expect("valid date")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reconciliation_repairs_a_sync_missed_during_an_outage(wired: Engine) {
    let card = wired
        .lifecycle
        .create(CreateCardRequest::new(
            "Missed sync",
            wired.backlog.id(),
            CardTypeId::new(),
        ))
        .await
        .expect("creation should succeed");
    wired.calendar.set_offline(true);
    wired
        .scheduling
        .set_scheduled_date(card.id(), Some(date(3)))
        .await
        .expect("local write must succeed despite the outage");
    wired.calendar.set_offline(false);

    let report = wired
        .reconciler
        .reconcile()
        .await
        .expect("reconciliation should succeed");

    assert_eq!(report.events_created, 1);
    let events = wired
        .calendar
        .find_by_card(card.id())
        .await
        .expect("calendar lookup should succeed");
    assert_eq!(events.len(), 1);
    let status = wired
        .tracker
        .statuses_for_card(card.id())
        .await
        .expect("status listing should succeed")
        .into_iter()
        .find(|record| record.integration() == IntegrationKind::Calendar)
        .expect("calendar status should exist");
    assert_eq!(status.status(), SyncStatus::Synced);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reconciliation_twice_leaves_the_calendar_unchanged(wired: Engine) {
    let card = wired
        .lifecycle
        .create(CreateCardRequest::new(
            "Steady state",
            wired.backlog.id(),
            CardTypeId::new(),
        ))
        .await
        .expect("creation should succeed");
    wired
        .scheduling
        .set_scheduled_date(card.id(), Some(date(4)))
        .await
        .expect("scheduling should succeed");

    wired
        .reconciler
        .reconcile()
        .await
        .expect("first pass should succeed");
    let after_first = wired
        .calendar
        .find_all()
        .await
        .expect("calendar listing should succeed");

    let second = wired
        .reconciler
        .reconcile()
        .await
        .expect("second pass should succeed");
    let after_second = wired
        .calendar
        .find_all()
        .await
        .expect("calendar listing should succeed");

    assert_eq!(after_first, after_second);
    assert_eq!(second.orphans_removed, 0);
    assert_eq!(second.events_created, 0);
}
