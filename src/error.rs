//! Defines the store error taxonomy and the JSON error responses returned by
//! the request handlers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur while operating on the store.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The database could not be reached or opened.
    #[error("could not connect to the database: {0}")]
    Connection(String),

    /// A uniqueness or foreign key rule was broken by a write.
    ///
    /// The string is the constraint description reported by the database,
    /// e.g. which column's UNIQUE rule failed.
    #[error("a database constraint was violated: {0}")]
    Constraint(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    Sql(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 787 =>
            {
                Error::Constraint(desc.clone())
            }
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 =>
            {
                Error::Constraint(desc.clone())
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.code == rusqlite::ErrorCode::CannotOpen =>
            {
                Error::Connection(desc.clone())
            }
            error => Error::Sql(error.to_string()),
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::Database(db_error) => match db_error.kind() {
                sqlx::error::ErrorKind::UniqueViolation
                | sqlx::error::ErrorKind::ForeignKeyViolation
                | sqlx::error::ErrorKind::NotNullViolation
                | sqlx::error::ErrorKind::CheckViolation => {
                    Error::Constraint(db_error.message().to_string())
                }
                _ => Error::Sql(db_error.to_string()),
            },
            sqlx::Error::Io(io_error) => Error::Connection(io_error.to_string()),
            error @ (sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Configuration(_)
            | sqlx::Error::Tls(_)) => Error::Connection(error.to_string()),
            error => Error::Sql(error.to_string()),
        }
    }
}

/// The error responses the request handlers can produce.
///
/// Every variant renders as a JSON body of the shape `{"error": <message>}`.
#[derive(Debug, PartialEq)]
pub(crate) enum ApiError {
    /// A required field was missing from the request body (400).
    Validation(String),
    /// No row matched the requested id (404).
    NotFound(&'static str),
    /// The store reported a failure (500).
    Store(Error),
}

impl ApiError {
    /// Log a store failure together with the operation that triggered it,
    /// then wrap it for the response.
    pub(crate) fn store(operation: &'static str, error: Error) -> Self {
        tracing::error!("Error {operation}: {error}");

        Self::Store(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.to_string()),
            ApiError::Store(error) => (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::http::StatusCode;

    use super::{ApiError, Error};

    #[test]
    fn duplicate_name_maps_to_constraint_error() {
        let connection = rusqlite::Connection::open_in_memory().unwrap();
        connection
            .execute("CREATE TABLE foo (name TEXT NOT NULL UNIQUE)", ())
            .unwrap();
        connection
            .execute("INSERT INTO foo (name) VALUES ('bar')", ())
            .unwrap();

        let error: Error = connection
            .execute("INSERT INTO foo (name) VALUES ('bar')", ())
            .unwrap_err()
            .into();

        assert!(matches!(error, Error::Constraint(_)));
    }

    #[test]
    fn api_error_statuses() {
        let cases = [
            (
                ApiError::Validation("Missing required field: name".to_owned()),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::NotFound("Category not found"), StatusCode::NOT_FOUND),
            (
                ApiError::Store(Error::DatabaseLock),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, want) in cases {
            let response = axum::response::IntoResponse::into_response(error);
            assert_eq!(response.status(), want);
        }
    }
}
