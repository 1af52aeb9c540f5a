//! In-memory task-list provider for tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::integration::{
    domain::{ExternalTaskId, ProviderTaskDraft},
    ports::{TaskProvider, TaskProviderError, TaskProviderResult},
};

/// A task as stored by the in-memory provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredProviderTask {
    /// Provider-assigned identifier.
    pub id: ExternalTaskId,
    /// Task title.
    pub title: String,
    /// Free-form notes, if any.
    pub notes: Option<String>,
}

/// Thread-safe in-memory task provider.
///
/// Missing lists are created on first use, matching the provider contract.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskProvider {
    lists: Arc<RwLock<HashMap<String, Vec<StoredProviderTask>>>>,
    offline: Arc<AtomicBool>,
    counter: Arc<RwLock<u64>>,
}

impl InMemoryTaskProvider {
    /// Creates an empty, online provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches the provider offline (every call fails) or back online.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Returns the names of the lists created so far.
    ///
    /// # Errors
    ///
    /// Returns [`TaskProviderError::Backend`] when the backing lock is
    /// poisoned.
    pub fn list_names(&self) -> TaskProviderResult<Vec<String>> {
        let lists = self.lists.read().map_err(lock_error)?;
        Ok(lists.keys().cloned().collect())
    }

    /// Returns the tasks of one list, empty when the list does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskProviderError::Backend`] when the backing lock is
    /// poisoned.
    pub fn tasks_in(&self, list_name: &str) -> TaskProviderResult<Vec<StoredProviderTask>> {
        let lists = self.lists.read().map_err(lock_error)?;
        Ok(lists.get(list_name).cloned().unwrap_or_default())
    }

    fn check_online(&self) -> TaskProviderResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(TaskProviderError::Unavailable(
                "provider is offline".to_owned(),
            ));
        }
        Ok(())
    }

    fn next_id(&self) -> TaskProviderResult<ExternalTaskId> {
        let mut counter = self.counter.write().map_err(lock_error)?;
        *counter += 1;
        Ok(ExternalTaskId::new(format!("task-{counter}")))
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskProviderError {
    TaskProviderError::backend(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskProvider for InMemoryTaskProvider {
    async fn create_task(&self, draft: &ProviderTaskDraft) -> TaskProviderResult<ExternalTaskId> {
        self.check_online()?;
        let id = self.next_id()?;
        let mut lists = self.lists.write().map_err(lock_error)?;
        lists
            .entry(draft.list_name.clone())
            .or_default()
            .push(StoredProviderTask {
                id: id.clone(),
                title: draft.title.clone(),
                notes: draft.notes.clone(),
            });
        Ok(id)
    }

    async fn delete_task(&self, external_id: &ExternalTaskId) -> TaskProviderResult<()> {
        self.check_online()?;
        let mut lists = self.lists.write().map_err(lock_error)?;
        let mut removed = false;
        for tasks in lists.values_mut() {
            let before = tasks.len();
            tasks.retain(|task| task.id != *external_id);
            removed = removed || tasks.len() != before;
        }
        if !removed {
            return Err(TaskProviderError::NotFound(external_id.clone()));
        }
        Ok(())
    }
}
