//! Unified error handling for the `createAdminUser` endpoint.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::AdminAccountError;

/// Application-level error type for the HTTP function.
///
/// Every variant renders as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Admin account operation failed.
    #[error(transparent)]
    Account(#[from] AdminAccountError),

    /// Request body could not be read as JSON.
    #[error("{0}")]
    BadRequest(String),

    /// Any method other than `POST` (and the `OPTIONS` preflight).
    #[error("Metodo non consentito. Usa POST.")]
    MethodNotAllowed,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Account(err) => match err {
                AdminAccountError::DuplicateIdentity => StatusCode::CONFLICT,
                AdminAccountError::SignInMethodDisabled => StatusCode::FORBIDDEN,
                AdminAccountError::Auth(_) | AdminAccountError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                AdminAccountError::Validation(_)
                | AdminAccountError::InvalidEmail
                | AdminAccountError::WeakPassword
                | AdminAccountError::NotFound(_) => StatusCode::BAD_REQUEST,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin creation failed"
            );
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Admin creation rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
