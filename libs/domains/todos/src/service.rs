use chrono::{DateTime, Months, Utc};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Task, TaskId};
use crate::ordering::{TaskOrdering, TaskScope};
use crate::pagination::{Page, PageRequest, paginate};
use crate::repository::TaskRepository;
use crate::values::{DescriptionValue, TitleValue};

pub const DEFAULT_GUEST_WINDOW_MONTHS: u32 = 1;

/// Task use-cases
///
/// Every operation trims its raw input, validates it, talks to storage once
/// for writes, and reports failures only as [`AppError`].
#[derive(Clone)]
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
    ordering: TaskOrdering,
    guest_window_months: u32,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            ordering: TaskOrdering::default(),
            guest_window_months: DEFAULT_GUEST_WINDOW_MONTHS,
        }
    }

    pub fn with_ordering(mut self, ordering: TaskOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_guest_window_months(mut self, months: u32) -> Self {
        self.guest_window_months = months;
        self
    }

    pub fn ordering(&self) -> TaskOrdering {
        self.ordering
    }

    /// Create a task for `owner_id`, or a guest task when it is `None`.
    #[instrument(skip(self, title, description))]
    pub async fn create_task(
        &self,
        owner_id: Option<Uuid>,
        title: &str,
        description: &str,
    ) -> AppResult<Task> {
        let (title, description) = validate(title, description)?;
        let task = Task::new(owner_id, title, description, Utc::now());

        let task = self
            .repository
            .save(task)
            .await
            .map_err(|e| AppError::from_write("Failed to create task", e))?;

        if let Some(id) = task.id() {
            tracing::info!(task_id = %id, "Created task");
        }
        Ok(task)
    }

    /// Recent guest tasks in guest order. An empty list is not an error.
    #[instrument(skip(self))]
    pub async fn list_tasks(&self) -> AppResult<Vec<Task>> {
        let since = self.guest_window_start(Utc::now());

        let mut tasks = self
            .repository
            .find_guest_created_after(since)
            .await
            .map_err(|e| AppError::from_read("Failed to fetch tasks", e))?;

        self.ordering.sort(TaskScope::Guest, &mut tasks);
        Ok(tasks)
    }

    /// One page of an owner's tasks in owner order.
    #[instrument(skip(self), fields(page = request.index(), size = request.size()))]
    pub async fn list_tasks_for_owner(
        &self,
        owner_id: Uuid,
        request: PageRequest,
    ) -> AppResult<Page<Task>> {
        let mut tasks = self
            .repository
            .find_by_owner(owner_id)
            .await
            .map_err(|e| AppError::from_read("Failed to fetch tasks for owner", e))?;

        self.ordering.sort(TaskScope::Owner(owner_id), &mut tasks);
        Ok(paginate(tasks, request))
    }

    /// One task by identity. A task outside `scope` is reported as not
    /// found, the same as a missing one.
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn get_one_task(&self, scope: TaskScope, id: TaskId) -> AppResult<Task> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(|e| AppError::from_read("Failed to fetch task", e))?
            .filter(|task| scope.contains(task))
            .ok_or_else(|| AppError::not_found("Task", id))
    }

    /// Replace title, description and completion of an existing task within
    /// `scope`.
    #[instrument(skip(self, title, description), fields(task_id = %id))]
    pub async fn update_task(
        &self,
        scope: TaskScope,
        id: TaskId,
        title: &str,
        description: &str,
        completed: bool,
    ) -> AppResult<Task> {
        let (title, description) = validate(title, description)?;
        let existing = self.get_one_task(scope, id).await?;

        let task = self
            .repository
            .save(existing.replace(title, description, completed, Utc::now()))
            .await
            .map_err(|e| AppError::from_write("Failed to update task", e))?;

        tracing::info!(task_id = %id, "Updated task");
        Ok(task)
    }

    fn guest_window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_months(Months::new(self.guest_window_months))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

fn validate(title: &str, description: &str) -> AppResult<(TitleValue, DescriptionValue)> {
    let title = TitleValue::new(title.trim())?;
    let description = DescriptionValue::new(description.trim())?;
    Ok((title, description))
}
