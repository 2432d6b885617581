use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::domain::error::TodoError;

use super::views;

/// Handler-level error: domain failures mapped onto page responses.
#[derive(Debug)]
pub struct PageError(pub TodoError);

impl From<TodoError> for PageError {
    fn from(err: TodoError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self.0 {
            TodoError::NotFound(id) => {
                tracing::debug!(%id, "todo not found");
                (StatusCode::NOT_FOUND, Html(views::not_found())).into_response()
            }
            // EmptyTitle is handled in the handlers; reaching here is a bug,
            // but answer 500 rather than panic.
            err => {
                tracing::error!(error = %err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
