//! Firebase Auth errors.

use thiserror::Error;

use crate::firebase::credentials::CredentialsError;

/// Error codes the admin tooling distinguishes.
///
/// Names follow the Admin SDK's `auth/...` codes; the REST API reports the
/// same conditions as `EMAIL_EXISTS`, `WEAK_PASSWORD : ...` and so on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorCode {
    EmailAlreadyExists,
    InvalidEmail,
    WeakPassword,
    OperationNotAllowed,
    UserNotFound,
    Other(String),
}

impl AuthErrorCode {
    /// Map a REST error message (`"WEAK_PASSWORD : Password should be ..."`)
    /// to a code. Only the part before the first colon is significant.
    #[must_use]
    pub fn from_server_message(message: &str) -> Self {
        let code = message.split(':').next().unwrap_or("").trim();
        match code {
            "EMAIL_EXISTS" | "DUPLICATE_EMAIL" => Self::EmailAlreadyExists,
            "INVALID_EMAIL" => Self::InvalidEmail,
            "WEAK_PASSWORD" => Self::WeakPassword,
            "OPERATION_NOT_ALLOWED" => Self::OperationNotAllowed,
            "USER_NOT_FOUND" | "EMAIL_NOT_FOUND" => Self::UserNotFound,
            other => Self::Other(other.to_string()),
        }
    }

    /// The Admin SDK style code (`auth/email-already-exists`, ...).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::EmailAlreadyExists => "auth/email-already-exists",
            Self::InvalidEmail => "auth/invalid-email",
            Self::WeakPassword => "auth/weak-password",
            Self::OperationNotAllowed => "auth/operation-not-allowed",
            Self::UserNotFound => "auth/user-not-found",
            Self::Other(code) => code,
        }
    }
}

impl std::fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur when calling Firebase Auth.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Firebase Auth rejected the request.
    #[error("{message}")]
    Api { code: AuthErrorCode, message: String },

    /// HTTP request failed.
    #[error("Firebase Auth request failed: {0}")]
    Request(String),

    /// Failed to parse response.
    #[error("Firebase Auth response error: {0}")]
    Response(String),

    /// No access token could be obtained.
    #[error("Firebase credentials error: {0}")]
    Credentials(#[from] CredentialsError),
}

impl AuthError {
    /// Build an API error from the provider's message.
    #[must_use]
    pub fn api(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Api {
            code: AuthErrorCode::from_server_message(&message),
            message,
        }
    }

    /// The provider error code, if the provider answered with one.
    #[must_use]
    pub const fn code(&self) -> Option<&AuthErrorCode> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}
