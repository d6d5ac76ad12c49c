use crate::engine::{ErrorKind, LinkError};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Link(#[from] LinkError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, error_code) = match self {
            ApiError::Link(e) => match e.kind() {
                ErrorKind::InvalidInput => (StatusCode::BAD_REQUEST, e.to_string(), "INVALID_INPUT"),
                ErrorKind::NotFound => (StatusCode::NOT_FOUND, e.to_string(), "NOT_FOUND"),
                ErrorKind::Internal => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    e.to_string(),
                    "INTERNAL_ERROR",
                ),
            },
            ApiError::InvalidRequest(e) => (StatusCode::BAD_REQUEST, e, "INVALID_REQUEST"),
        };

        let body = Json(json!({
            "error": error_message,
            "code": error_code,
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
