//! Box-style error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use box_core::BoxError;
use serde::Serialize;

/// Wire body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    #[serde(rename = "type")]
    item_type: &'static str,
    status: u16,
    code: &'a str,
    message: &'a str,
}

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "unauthorized",
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<BoxError> for ApiError {
    fn from(err: BoxError) -> Self {
        let (status, code) = match &err {
            BoxError::Lookup(_) | BoxError::Principal(_) => (StatusCode::NOT_FOUND, "not_found"),
            BoxError::BadRequest(_) | BoxError::Deserialization(_) => {
                (StatusCode::BAD_REQUEST, "bad_request")
            }
            BoxError::Move { .. } => (StatusCode::CONFLICT, "operation_blocked"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_server_error"),
        };
        if status.is_server_error() {
            tracing::error!("request failed: {:?}", err);
        } else {
            tracing::debug!("request rejected: {}", err);
        }
        Self {
            status,
            code,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            item_type: "error",
            status: self.status.as_u16(),
            code: self.code,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
