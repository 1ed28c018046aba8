mod announcements;

pub use announcements::*;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::AnnouncementId;
use crate::repo::Repositories;
use crate::scheduler::Scheduler;

#[derive(Clone)]
pub struct AppState {
    pub scheduler: Scheduler,
    pub repos: Repositories,
}

pub type HandlerResult<T> = Result<T, ApiError>;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ApiError {
    #[display("invalid request: {_0}")]
    Validation(#[error(not(source))] String),
    #[display("announcement {_0} not found")]
    NotFound(#[error(not(source))] AnnouncementId),
    #[display("internal error: {_0}")]
    Internal(#[error(not(source))] anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::Validation(value.body_text())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Internal(e) => {
                log::error!("internal error on a query path: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };
        let body = Json(ErrorResponse { error, message: self.to_string() });
        (status, body).into_response()
    }
}
