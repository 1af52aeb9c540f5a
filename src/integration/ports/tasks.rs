//! Task-list provider port.

use crate::integration::domain::{ExternalTaskId, ProviderTaskDraft};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task provider operations.
pub type TaskProviderResult<T> = Result<T, TaskProviderError>;

/// External task-list provider contract.
#[async_trait]
pub trait TaskProvider: Send + Sync {
    /// Creates a task in the draft's list, creating the list first when it
    /// does not exist.
    async fn create_task(&self, draft: &ProviderTaskDraft) -> TaskProviderResult<ExternalTaskId>;

    /// Deletes a previously created task.
    async fn delete_task(&self, external_id: &ExternalTaskId) -> TaskProviderResult<()>;
}

/// Errors returned by task provider implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskProviderError {
    /// The provider is unreachable or rejected the request.
    #[error("task provider unavailable: {0}")]
    Unavailable(String),

    /// No task exists for the given identifier.
    #[error("task not found: {0}")]
    NotFound(ExternalTaskId),

    /// Backend failure.
    #[error("task provider error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskProviderError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
