use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::pagination::PaginationError;

const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

/// Any possible API errors
#[derive(Debug, Error)]
pub(crate) enum ApiError {
    /// Required body fields were absent or `null`, in declaration order.
    #[error("Missing required fields: {}", quote_all(.0))]
    MissingFields(Vec<&'static str>),

    /// A write was rejected by the database. The driver message is returned to the client.
    #[error("Database error")]
    Database(#[source] sqlx::Error),

    /// A read failed in the database.
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// An integer query parameter too large to bind.
    #[error("query parameter {0} is out of range")]
    OutOfRange(&'static str),

    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

fn quote_all(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| format!("'{field}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingFields(ref fields) => {
                let body = json!({
                    "error": self.to_string(),
                    "missing_fields": fields,
                });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::Database(ref e) => {
                tracing::warn!("database rejected write: {e}");
                let body = json!({
                    "error": self.to_string(),
                    "details": e.to_string(),
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            ApiError::Query(_)
            | ApiError::MalformedBody(_)
            | ApiError::OutOfRange(_)
            | ApiError::Pagination(_) => {
                tracing::error!("unhandled error: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_SERVER_ERROR_MESSAGE,
                )
                    .into_response()
            }
        }
    }
}
