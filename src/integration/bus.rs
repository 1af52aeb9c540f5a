//! Synchronous in-process publish/subscribe of domain events.

use crate::integration::domain::DomainEvent;
use async_trait::async_trait;
use std::sync::{Arc, RwLock, RwLockReadGuard};
use thiserror::Error;

/// Error surfaced by a subscriber to the bus.
///
/// The bus logs it and moves on; it never reaches the publisher.
#[derive(Debug, Clone, Error)]
#[error("event subscriber failed: {0}")]
pub struct SubscriberError(Arc<dyn std::error::Error + Send + Sync>);

impl SubscriberError {
    /// Wraps a subscriber-side error.
    pub fn from_error(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }

    /// Creates a subscriber error from a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self(Arc::new(std::io::Error::other(message.into())))
    }
}

/// A registered consumer of domain events.
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    /// Returns the subscriber name used in log records.
    fn name(&self) -> &str;

    /// Handles one event. Dispatch happens inline on the publisher's task,
    /// so implementations must be fast or hand work off themselves.
    async fn handle(&self, event: &DomainEvent) -> Result<(), SubscriberError>;
}

/// In-process event bus dispatching to subscribers in registration order.
///
/// The bus owns its subscriber list; there is no ambient registry. A
/// subscriber's failure is logged and isolated from the other subscribers
/// and from the publisher. Events are not persisted and cannot be replayed.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<Vec<Arc<dyn EventSubscriber>>>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a subscriber; dispatch follows registration order.
    pub fn subscribe(&self, subscriber: Arc<dyn EventSubscriber>) {
        match self.subscribers.write() {
            Ok(mut subscribers) => subscribers.push(subscriber),
            Err(poisoned) => poisoned.into_inner().push(subscriber),
        }
    }

    /// Returns the number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.read_subscribers().len()
    }

    /// Publishes one event to every subscriber, in registration order, on
    /// the caller's task.
    ///
    /// Subscriber errors are logged and swallowed; publishing itself cannot
    /// fail.
    pub async fn publish(&self, event: &DomainEvent) {
        let subscribers: Vec<Arc<dyn EventSubscriber>> = self.read_subscribers().clone();
        tracing::debug!(
            event = event.name(),
            card = %event.card().id(),
            subscribers = subscribers.len(),
            "dispatching domain event"
        );
        for subscriber in subscribers {
            if let Err(err) = subscriber.handle(event).await {
                tracing::error!(
                    subscriber = subscriber.name(),
                    event = event.name(),
                    card = %event.card().id(),
                    %err,
                    "event subscriber failed; continuing dispatch"
                );
            }
        }
    }

    fn read_subscribers(&self) -> RwLockReadGuard<'_, Vec<Arc<dyn EventSubscriber>>> {
        match self.subscribers.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
