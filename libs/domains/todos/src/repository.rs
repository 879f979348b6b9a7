use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Task, TaskId};
use crate::values::TextValueError;

/// Failure reported by a storage collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("stored task {id} is invalid")]
    CorruptRecord {
        id: TaskId,
        #[source]
        source: TextValueError,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage collaborator for tasks
///
/// Implementations assign identity on the first save of a task and replace
/// the stored row wholesale on later saves. No ordering is promised; callers
/// sort with an [`OrderingPolicy`](crate::ordering::OrderingPolicy).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Every stored task
    async fn find_all(&self) -> StoreResult<Vec<Task>>;

    /// One task by identity
    async fn find_by_id(&self, id: TaskId) -> StoreResult<Option<Task>>;

    /// Tasks belonging to `owner_id`
    async fn find_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Task>>;

    /// Guest tasks created strictly after `since`
    async fn find_guest_created_after(&self, since: DateTime<Utc>) -> StoreResult<Vec<Task>>;

    /// Insert or replace a task, returning it with identity assigned
    async fn save(&self, task: Task) -> StoreResult<Task>;
}

/// In-memory implementation of TaskRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<BTreeMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn find_all(&self) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.values().cloned().collect())
    }

    async fn find_by_id(&self, id: TaskId) -> StoreResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .values()
            .filter(|t| t.owner_id() == Some(owner_id))
            .cloned()
            .collect())
    }

    async fn find_guest_created_after(&self, since: DateTime<Utc>) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .values()
            .filter(|t| t.owner_id().is_none() && t.created_at() > since)
            .cloned()
            .collect())
    }

    async fn save(&self, task: Task) -> StoreResult<Task> {
        let mut tasks = self.tasks.write().await;

        let id = match task.id() {
            Some(id) => id,
            None => TaskId::new(tasks.keys().next_back().map_or(1, |id| id.value() + 1)),
        };
        let task = task.with_id(id);
        tasks.insert(id, task.clone());

        tracing::debug!(task_id = %id, "Stored task in memory");
        Ok(task)
    }
}
