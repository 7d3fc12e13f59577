//! HTTP rendering of proxy errors: `(status, {"message": ...})`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use cpgate_core::{AuthError, ProxyError};

/// A `ProxyError` on its way out of a handler.
#[derive(Debug)]
pub struct ErrorResponse(pub ProxyError);

impl From<ProxyError> for ErrorResponse {
    fn from(err: ProxyError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for ErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        Self(ProxyError::Validation {
            field: "body",
            message: rejection.body_text(),
        })
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "message": self.0.message() }))).into_response()
    }
}
