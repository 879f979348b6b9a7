//! Todos Domain
//!
//! Guest and per-user task lists with validated text, a canonical ordering,
//! paging, and a closed error taxonomy that maps onto HTTP responses.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP routes, every result goes through `response`
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Use-cases: trim, validate, persist, classify errors
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Storage trait + in-memory and PostgreSQL implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Task entity, value objects, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_todos::{InMemoryTaskRepository, TaskService};
//!
//! # async fn example() -> Result<(), domain_todos::AppError> {
//! let service = TaskService::new(InMemoryTaskRepository::new());
//! let task = service.create_task(None, "  Buy milk  ", "2% milk").await?;
//! assert_eq!(task.title().as_str(), "Buy milk");
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod ordering;
pub mod pagination;
pub mod postgres;
pub mod repository;
pub mod response;
pub mod service;
pub mod values;

// Re-export commonly used types
pub use error::{AppError, AppResult, ClientError, ServerError};
pub use handlers::ApiDoc;
pub use models::{
    CreateTaskRequest, PageQuery, Task, TaskId, TaskPageResponse, TaskResponse, UpdateTaskRequest,
};
pub use ordering::{OrderingPolicy, TaskOrdering, TaskScope};
pub use pagination::{Page, PageRequest, paginate};
pub use postgres::PgTaskRepository;
pub use repository::{InMemoryTaskRepository, StoreError, TaskRepository};
pub use response::{ErrorBody, HttpOutcome, to_http_outcome, to_http_outcome_with_status};
pub use service::TaskService;
pub use values::{DescriptionValue, TextValueError, TitleValue};
