//! In-memory calendar store for tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::board::domain::CardId;
use crate::integration::{
    domain::{CalendarEventId, CalendarEventRecord, CalendarEventSnapshot},
    ports::{CalendarStore, CalendarStoreError, CalendarStoreResult},
};

/// Thread-safe in-memory calendar store.
///
/// Carries an offline switch and call counters so tests can inject outages
/// and assert exact call counts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCalendarStore {
    events: Arc<RwLock<HashMap<CardId, Vec<CalendarEventRecord>>>>,
    offline: Arc<AtomicBool>,
    delete_calls: Arc<AtomicUsize>,
    create_calls: Arc<AtomicUsize>,
}

impl InMemoryCalendarStore {
    /// Creates an empty, online store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches the store offline (every call fails) or back online.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Returns how many times `delete_event` was invoked.
    #[must_use]
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Returns how many times `create_event` was invoked.
    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> CalendarStoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CalendarStoreError::Unavailable("store is offline".to_owned()));
        }
        Ok(())
    }
}

fn lock_error(err: impl std::fmt::Display) -> CalendarStoreError {
    CalendarStoreError::backend(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl CalendarStore for InMemoryCalendarStore {
    async fn create_event(
        &self,
        snapshot: &CalendarEventSnapshot,
    ) -> CalendarStoreResult<CalendarEventId> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        let id = CalendarEventId::new();
        let mut events = self.events.write().map_err(lock_error)?;
        events
            .entry(snapshot.card_id())
            .or_default()
            .push(CalendarEventRecord::new(id, snapshot.clone()));
        Ok(id)
    }

    async fn delete_event(&self, card_id: CardId) -> CalendarStoreResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        let mut events = self.events.write().map_err(lock_error)?;
        events.remove(&card_id);
        Ok(())
    }

    async fn find_by_card(&self, card_id: CardId) -> CalendarStoreResult<Vec<CalendarEventRecord>> {
        self.check_online()?;
        let events = self.events.read().map_err(lock_error)?;
        Ok(events.get(&card_id).cloned().unwrap_or_default())
    }

    async fn find_all(&self) -> CalendarStoreResult<Vec<CalendarEventRecord>> {
        self.check_online()?;
        let events = self.events.read().map_err(lock_error)?;
        Ok(events.values().flatten().cloned().collect())
    }
}
