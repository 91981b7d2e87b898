//! Firestore errors.

use thiserror::Error;

use crate::firebase::credentials::CredentialsError;

/// Errors that can occur when calling Firestore.
#[derive(Debug, Error)]
pub enum FirestoreError {
    /// Firestore rejected the request.
    #[error("Firestore error {status}: {message}")]
    Api {
        code: u16,
        status: String,
        message: String,
    },

    /// HTTP request failed.
    #[error("Firestore request failed: {0}")]
    Request(String),

    /// Unreadable response.
    #[error("Firestore response error: {0}")]
    Response(String),

    /// A document could not be decoded.
    #[error("Firestore decode error: {0}")]
    Decode(String),

    /// No access token could be obtained.
    #[error("Firebase credentials error: {0}")]
    Credentials(#[from] CredentialsError),
}
