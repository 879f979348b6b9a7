//! Translation of use-case results into HTTP status codes and bodies.
//!
//! This is the only place an [`AppError`] becomes a response. The table is
//! fixed:
//!
//! | Error                  | Status | `error`                   | `message`                                         |
//! |------------------------|--------|---------------------------|---------------------------------------------------|
//! | `NotFound`             | 404    | `Not Found`               | `{resource} not found: {id}`                      |
//! | `Validation`           | 400    | `Validation Error`        | the validation message                            |
//! | `Persistence`          | 500    | `Database Error`          | `An error occurred while accessing the database` |
//! | `Unexpected`           | 500    | `Internal Server Error`   | `An unexpected error occurred`                    |
//!
//! Server-side messages and causes are logged but never sent to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::error::Error as _;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult, BoxError, ClientError, ServerError};

pub const DATABASE_ERROR_MESSAGE: &str = "An error occurred while accessing the database";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Error body sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl ErrorBody {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutcomeBody<T> {
    Success(T),
    Failure(ErrorBody),
}

/// Status code plus body, ready to be written as JSON
#[derive(Debug, Clone, PartialEq)]
pub struct HttpOutcome<T> {
    pub status: StatusCode,
    pub body: OutcomeBody<T>,
}

/// Map a result with `200 OK` on success.
pub fn to_http_outcome<T>(result: AppResult<T>) -> HttpOutcome<T> {
    to_http_outcome_with_status(result, StatusCode::OK)
}

/// Map a result with a custom success status. Failures still follow the
/// fixed table.
pub fn to_http_outcome_with_status<T>(
    result: AppResult<T>,
    success_status: StatusCode,
) -> HttpOutcome<T> {
    match result {
        Ok(value) => HttpOutcome {
            status: success_status,
            body: OutcomeBody::Success(value),
        },
        Err(err) => {
            let (status, body) = error_outcome(&err);
            HttpOutcome {
                status,
                body: OutcomeBody::Failure(body),
            }
        }
    }
}

/// Status and body for one error, logging it according to its kind.
pub fn error_outcome(err: &AppError) -> (StatusCode, ErrorBody) {
    match err {
        AppError::Client(ClientError::NotFound { resource, id }) => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("Not Found", format!("{resource} not found: {id}")),
        ),
        AppError::Client(ClientError::Validation { message, cause }) => {
            tracing::warn!(cause = %render_cause(cause), "Validation error: {}", message);
            (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Validation Error", message.clone()),
            )
        }
        AppError::Server(ServerError::Persistence { message, cause }) => {
            tracing::error!(cause = %render_cause(cause), "Database error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Database Error", DATABASE_ERROR_MESSAGE),
            )
        }
        AppError::Server(ServerError::Unexpected { message, cause }) => {
            tracing::error!(cause = %render_cause(cause), "Unexpected error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Internal Server Error", UNEXPECTED_ERROR_MESSAGE),
            )
        }
    }
}

/// Flatten a cause and its sources into one line for the log.
fn render_cause(cause: &Option<BoxError>) -> String {
    let Some(cause) = cause else {
        return "none".to_string();
    };

    let mut rendered = cause.to_string();
    let mut source = cause.source();
    while let Some(err) = source {
        rendered.push_str(": ");
        rendered.push_str(&err.to_string());
        source = err.source();
    }
    rendered
}

impl<T: Serialize> IntoResponse for HttpOutcome<T> {
    fn into_response(self) -> Response {
        match self.body {
            OutcomeBody::Success(value) => (self.status, Json(value)).into_response(),
            OutcomeBody::Failure(body) => (self.status, Json(body)).into_response(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = error_outcome(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::StoreError;
    use crate::values::TextValueError;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    /// In-memory log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` under a scoped subscriber and return what it logged.
    fn captured_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(Level::TRACE)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        (result, logs)
    }

    fn failure<T: std::fmt::Debug>(outcome: HttpOutcome<T>) -> (StatusCode, ErrorBody) {
        match outcome.body {
            OutcomeBody::Failure(body) => (outcome.status, body),
            OutcomeBody::Success(value) => panic!("expected failure, got {value:?}"),
        }
    }

    #[test]
    fn test_success_defaults_to_ok() {
        let outcome = to_http_outcome(Ok::<_, AppError>("payload"));
        assert_eq!(outcome.status, StatusCode::OK);
        assert_eq!(outcome.body, OutcomeBody::Success("payload"));
    }

    #[test]
    fn test_custom_success_status() {
        let outcome = to_http_outcome_with_status(Ok::<_, AppError>(1), StatusCode::CREATED);
        assert_eq!(outcome.status, StatusCode::CREATED);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let (status, body) = failure(to_http_outcome::<()>(Err(AppError::not_found("Task", 123))));

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Not Found");
        assert_eq!(body.message, "Task not found: 123");
    }

    #[test]
    fn test_validation_maps_to_400_with_message() {
        let err: AppError = TextValueError::TooShort {
            field: "Title",
            min: 1,
        }
        .into();
        let (status, body) = failure(to_http_outcome::<()>(Err(err)));

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Validation Error");
        assert_eq!(body.message, "Title must be at least 1 character long");
    }

    #[test]
    fn test_persistence_error_does_not_leak_details() {
        let err = AppError::persistence(
            "x",
            Some(Box::new(StoreError::Unavailable("secret dsn".to_string()))),
        );
        let (status, body) = failure(to_http_outcome::<()>(Err(err)));

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Database Error");
        assert_eq!(body.message, DATABASE_ERROR_MESSAGE);

        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("\"x\""));
        assert!(!json.contains("secret dsn"));
    }

    #[test]
    fn test_unexpected_error_maps_to_500() {
        let (status, body) = failure(to_http_outcome::<()>(Err(AppError::unexpected("boom", None))));

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal Server Error");
        assert_eq!(body.message, UNEXPECTED_ERROR_MESSAGE);
    }

    #[test]
    fn test_custom_status_does_not_change_failures() {
        let (status, body) = failure(to_http_outcome_with_status::<()>(
            Err(AppError::not_found("Task", 9)),
            StatusCode::CREATED,
        ));

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "Task not found: 9");
    }

    #[test]
    fn test_render_cause_walks_sources() {
        let err = StoreError::CorruptRecord {
            id: crate::models::TaskId::new(4),
            source: TextValueError::DisallowedCharacter { field: "Title" },
        };
        let rendered = render_cause(&Some(Box::new(err)));

        assert_eq!(
            rendered,
            "stored task 4 is invalid: Title contains a character that is not allowed"
        );
        assert_eq!(render_cause(&None), "none");
    }

    #[test]
    fn test_error_body_field_names() {
        let body = ErrorBody::new("Not Found", "Task not found: 1");
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["error"], "Not Found");
        assert_eq!(json["message"], "Task not found: 1");
    }

    #[test]
    fn test_validation_is_logged_at_warn_with_cause() {
        let err: AppError = TextValueError::DisallowedCharacter { field: "Title" }.into();
        let ((status, body), logs) = captured_logs(|| error_outcome(&err));

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Title contains a character that is not allowed");
        assert!(logs.contains("WARN"), "{logs}");
        assert!(!logs.contains("ERROR"), "{logs}");
        assert!(
            logs.contains("Validation error: Title contains a character that is not allowed"),
            "{logs}"
        );
        assert!(logs.contains("cause="), "{logs}");
    }

    #[test]
    fn test_persistence_is_logged_at_error_but_kept_out_of_body() {
        let err = AppError::persistence(
            "insert failed",
            Some(Box::new(StoreError::Unavailable("secret dsn".to_string()))),
        );
        let ((_, body), logs) = captured_logs(|| error_outcome(&err));

        assert!(logs.contains("ERROR"), "{logs}");
        assert!(logs.contains("Database error: insert failed"), "{logs}");
        assert!(logs.contains("storage unavailable: secret dsn"), "{logs}");

        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("insert failed"));
        assert!(!json.contains("secret dsn"));
    }

    #[test]
    fn test_unexpected_is_logged_at_error() {
        let err = AppError::unexpected("clock went backwards", None);
        let ((_, body), logs) = captured_logs(|| error_outcome(&err));

        assert!(logs.contains("ERROR"), "{logs}");
        assert!(logs.contains("Unexpected error: clock went backwards"), "{logs}");
        assert!(logs.contains("cause=none"), "{logs}");
        assert_eq!(body.message, UNEXPECTED_ERROR_MESSAGE);
    }

    #[test]
    fn test_not_found_is_not_logged() {
        let err = AppError::not_found("Task", 5);
        let ((status, _), logs) = captured_logs(|| error_outcome(&err));

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(logs.is_empty(), "{logs}");
    }
}
