use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::pagination::{DEFAULT_PAGE_SIZE, Page, PageRequest};
use crate::values::{DescriptionValue, TitleValue};

/// Storage-assigned task identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Task entity
///
/// A task starts without identity; the storage collaborator assigns one on
/// first save and it never changes afterwards. The owner is fixed at
/// construction. Text and completion only change through [`Task::replace`],
/// which keeps `completed_at` set exactly when `completed` is true. Rows
/// rebuilt from storage are taken as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: Option<TaskId>,
    owner_id: Option<Uuid>,
    title: TitleValue,
    description: DescriptionValue,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// New, incomplete, unsaved task with both timestamps set to `now`.
    pub fn new(
        owner_id: Option<Uuid>,
        title: TitleValue,
        description: DescriptionValue,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            owner_id,
            title,
            description,
            completed: false,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    pub fn id(&self) -> Option<TaskId> {
        self.id
    }

    /// Rebuild a task exactly as storage holds it.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: TaskId,
        owner_id: Option<Uuid>,
        title: TitleValue,
        description: DescriptionValue,
        completed: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: Some(id),
            owner_id,
            title,
            description,
            completed,
            created_at,
            updated_at,
            completed_at,
        }
    }

    pub fn owner_id(&self) -> Option<Uuid> {
        self.owner_id
    }

    pub fn title(&self) -> &TitleValue {
        &self.title
    }

    pub fn description(&self) -> &DescriptionValue {
        &self.description
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Attach the identity chosen by storage. An identity that is already
    /// present is kept.
    pub fn with_id(mut self, id: TaskId) -> Self {
        if self.id.is_none() {
            self.id = Some(id);
        }
        self
    }

    /// Replace the mutable fields wholesale, keeping identity, owner and
    /// creation time.
    ///
    /// Completing stamps `completed_at` with `now` unless the task was already
    /// completed; reopening clears it.
    pub fn replace(
        mut self,
        title: TitleValue,
        description: DescriptionValue,
        completed: bool,
        now: DateTime<Utc>,
    ) -> Self {
        self.completed_at = match (completed, self.completed_at) {
            (false, _) => None,
            (true, Some(at)) if self.completed => Some(at),
            (true, _) => Some(now),
        };
        self.title = title;
        self.description = description;
        self.completed = completed;
        self.updated_at = now;
        self
    }
}

/// Request body for creating a task
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
}

/// Request body for replacing a task
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// Paging parameters for owner task lists
#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Zero-based page index
    pub page: Option<u32>,
    /// Page size, clamped to 1..=100
    pub size: Option<u32>,
}

impl PageQuery {
    pub fn to_request(self) -> PageRequest {
        PageRequest::new(self.page.unwrap_or(0), self.size.unwrap_or(DEFAULT_PAGE_SIZE))
    }
}

/// Task as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    pub id: Option<i64>,
    pub owner_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.map(TaskId::value),
            owner_id: task.owner_id,
            title: task.title.into_inner(),
            description: task.description.into_inner(),
            completed: task.completed,
            created_at: task.created_at,
            updated_at: task.updated_at,
            completed_at: task.completed_at,
        }
    }
}

/// One page of tasks as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskPageResponse {
    pub content: Vec<TaskResponse>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub current_page: u32,
    pub page_size: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl From<Page<Task>> for TaskPageResponse {
    fn from(page: Page<Task>) -> Self {
        let total_elements = page.total_elements();
        let total_pages = page.total_pages();
        let current_page = page.index();
        let page_size = page.size();
        let has_next = page.has_next();
        let has_previous = page.has_previous();

        Self {
            content: page.into_content().into_iter().map(Into::into).collect(),
            total_elements,
            total_pages,
            current_page,
            page_size,
            has_next,
            has_previous,
        }
    }
}
