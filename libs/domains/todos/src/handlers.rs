use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    CreateTaskRequest, PageQuery, TaskId, TaskPageResponse, TaskResponse, UpdateTaskRequest,
};
use crate::ordering::TaskScope;
use crate::repository::TaskRepository;
use crate::response::{ErrorBody, HttpOutcome, to_http_outcome, to_http_outcome_with_status};
use crate::service::TaskService;

const TAG: &str = "todos";

/// OpenAPI documentation for the todos API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_guest_tasks,
        create_guest_task,
        get_task,
        update_task,
        list_owner_tasks,
        create_owner_task,
    ),
    components(
        schemas(
            TaskResponse,
            TaskPageResponse,
            CreateTaskRequest,
            UpdateTaskRequest,
            ErrorBody
        )
    ),
    tags(
        (name = TAG, description = "Guest and per-user todo endpoints")
    )
)]
pub struct ApiDoc;

type SharedService<R> = State<Arc<TaskService<R>>>;

/// Routes for guest and per-user tasks, meant to be nested under `/api`.
pub fn router<R: TaskRepository + 'static>(service: TaskService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/guest/todos",
            get(list_guest_tasks::<R>).post(create_guest_task::<R>),
        )
        .route(
            "/guest/todos/{id}",
            get(get_task::<R>).put(update_task::<R>),
        )
        .route(
            "/user/{user_id}/todos",
            get(list_owner_tasks::<R>).post(create_owner_task::<R>),
        )
        .with_state(shared_service)
}

fn parse_task_id(raw: &str) -> AppResult<TaskId> {
    raw.parse::<i64>()
        .map(TaskId::new)
        .map_err(|e| AppError::validation("Invalid task ID", Some(Box::new(e))))
}

fn parse_user_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| AppError::validation("Invalid user ID", Some(Box::new(e))))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|e| AppError::validation(e.body_text(), Some(Box::new(e))))
}

/// List recent guest tasks
#[utoipa::path(
    get,
    path = "/api/guest/todos",
    tag = TAG,
    responses(
        (status = 200, description = "Guest tasks in display order", body = Vec<TaskResponse>),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn list_guest_tasks<R: TaskRepository>(
    State(service): SharedService<R>,
) -> HttpOutcome<Vec<TaskResponse>> {
    let result = service
        .list_tasks()
        .await
        .map(|tasks| tasks.into_iter().map(TaskResponse::from).collect());
    to_http_outcome(result)
}

/// Create a guest task
#[utoipa::path(
    post,
    path = "/api/guest/todos",
    tag = TAG,
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Invalid title or description", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn create_guest_task<R: TaskRepository>(
    State(service): SharedService<R>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> HttpOutcome<TaskResponse> {
    let result = async {
        let input = body(payload)?;
        service
            .create_task(None, &input.title, &input.description)
            .await
    }
    .await
    .map(TaskResponse::from);
    to_http_outcome_with_status(result, StatusCode::CREATED)
}

/// Get a guest task by ID
#[utoipa::path(
    get,
    path = "/api/guest/todos/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task found", body = TaskResponse),
        (status = 400, description = "Invalid task ID", body = ErrorBody),
        (status = 404, description = "Task not found", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn get_task<R: TaskRepository>(
    State(service): SharedService<R>,
    Path(id): Path<String>,
) -> HttpOutcome<TaskResponse> {
    let result = async {
        let id = parse_task_id(&id)?;
        service.get_one_task(TaskScope::Guest, id).await
    }
    .await
    .map(TaskResponse::from);
    to_http_outcome(result)
}

/// Replace a guest task's title, description and completion
#[utoipa::path(
    put,
    path = "/api/guest/todos/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Task ID")
    ),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Task not found", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn update_task<R: TaskRepository>(
    State(service): SharedService<R>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> HttpOutcome<TaskResponse> {
    let result = async {
        let id = parse_task_id(&id)?;
        let input = body(payload)?;
        service
            .update_task(
                TaskScope::Guest,
                id,
                &input.title,
                &input.description,
                input.completed,
            )
            .await
    }
    .await
    .map(TaskResponse::from);
    to_http_outcome(result)
}

/// List one page of a user's tasks
#[utoipa::path(
    get,
    path = "/api/user/{user_id}/todos",
    tag = TAG,
    params(
        ("user_id" = Uuid, Path, description = "Owner ID"),
        PageQuery
    ),
    responses(
        (status = 200, description = "One page of the user's tasks", body = TaskPageResponse),
        (status = 400, description = "Invalid user ID or paging parameters", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn list_owner_tasks<R: TaskRepository>(
    State(service): SharedService<R>,
    Path(user_id): Path<String>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> HttpOutcome<TaskPageResponse> {
    let result = async {
        let owner_id = parse_user_id(&user_id)?;
        let Query(query) =
            query.map_err(|e| AppError::validation(e.body_text(), Some(Box::new(e))))?;
        service
            .list_tasks_for_owner(owner_id, query.to_request())
            .await
    }
    .await
    .map(TaskPageResponse::from);
    to_http_outcome(result)
}

/// Create a task owned by a user
#[utoipa::path(
    post,
    path = "/api/user/{user_id}/todos",
    tag = TAG,
    params(
        ("user_id" = Uuid, Path, description = "Owner ID")
    ),
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn create_owner_task<R: TaskRepository>(
    State(service): SharedService<R>,
    Path(user_id): Path<String>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> HttpOutcome<TaskResponse> {
    let result = async {
        let owner_id = parse_user_id(&user_id)?;
        let input = body(payload)?;
        service
            .create_task(Some(owner_id), &input.title, &input.description)
            .await
    }
    .await
    .map(TaskResponse::from);
    to_http_outcome_with_status(result, StatusCode::CREATED)
}
