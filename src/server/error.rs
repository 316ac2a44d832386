//! HTTP mapping for action errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::error::ActionError;

/// Wraps [`ActionError`] for axum handlers
#[derive(Debug)]
pub struct AppError(pub ActionError);

impl From<ActionError> for AppError {
    fn from(err: ActionError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            ActionError::UnknownAction(name) => (
                StatusCode::NOT_FOUND,
                json!({ "error": self.0.to_string(), "action_name": name }),
            ),
            ActionError::InvalidRequest(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": self.0.to_string(), "code": self.0.code() }),
            ),
            _ => {
                tracing::error!(code = self.0.code(), "Action failed: {}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.0.to_string(), "code": self.0.code() }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
