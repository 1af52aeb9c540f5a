//! Event bus dispatch and isolation tests.

use crate::board::domain::{BoardId, CardProgress, CardTitle, CardTypeId, Card, Column, ColumnKind};
use crate::integration::{
    bus::EventBus,
    domain::{ChangedField, DomainEvent},
    tests::support::{FailingSubscriber, LabelledSubscriber},
};
use mockable::DefaultClock;
use rstest::rstest;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

fn sample_event() -> DomainEvent {
    let column = Column::new("To do", 0, ColumnKind::Initial, BoardId::new());
    let card = Card::new(
        CardTitle::new("Bus payload").expect("valid title"),
        None,
        column.id(),
        CardTypeId::new(),
        CardProgress::None,
        0,
        &DefaultClock,
    );
    DomainEvent::Updated {
        card,
        changed: BTreeSet::from([ChangedField::Title]),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dispatches_in_registration_order() {
    let bus = EventBus::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    bus.subscribe(Arc::new(LabelledSubscriber::new("first", log.clone())));
    bus.subscribe(Arc::new(LabelledSubscriber::new("second", log.clone())));
    bus.subscribe(Arc::new(LabelledSubscriber::new("third", log.clone())));

    bus.publish(&sample_event()).await;

    let order = log.lock().expect("log lock").clone();
    assert_eq!(order, ["first", "second", "third"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failing_subscriber_is_isolated_from_the_rest() {
    let bus = EventBus::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    bus.subscribe(Arc::new(LabelledSubscriber::new("before", log.clone())));
    bus.subscribe(Arc::new(FailingSubscriber));
    bus.subscribe(Arc::new(LabelledSubscriber::new("after", log.clone())));

    bus.publish(&sample_event()).await;

    let order = log.lock().expect("log lock").clone();
    assert_eq!(order, ["before", "after"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn publish_without_subscribers_is_harmless() {
    let bus = EventBus::new();

    bus.publish(&sample_event()).await;

    assert_eq!(bus.subscriber_count(), 0);
}

#[rstest]
fn subscriber_count_tracks_registrations() {
    let bus = EventBus::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    bus.subscribe(Arc::new(LabelledSubscriber::new("only", log)));

    assert_eq!(bus.subscriber_count(), 1);
}
