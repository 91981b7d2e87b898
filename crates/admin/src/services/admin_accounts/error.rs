//! Admin account error types.

use longeviva_core::ValidationError;
use thiserror::Error;

use crate::firebase::{AuthError, AuthErrorCode, FirestoreError};

/// Errors that can occur while creating, finding or deleting admins.
///
/// `Display` is the localized message shown to operators and API callers.
#[derive(Debug, Error)]
pub enum AdminAccountError {
    /// Input rejected before any remote call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The email is already registered.
    #[error("L'email specificata è già registrata nel sistema.")]
    DuplicateIdentity,

    /// The identity provider rejected the email.
    #[error("L'email specificata non è valida.")]
    InvalidEmail,

    /// The identity provider rejected the password.
    #[error("La password è troppo debole (min. 6 caratteri per Firebase Auth).")]
    WeakPassword,

    /// Email/password accounts are disabled for the project.
    #[error(
        "La creazione di account email/password non è abilitata per il tuo progetto. \
         Abilitale nella console Firebase sotto \"Authentication\" -> \"Sign-in method\"."
    )]
    SignInMethodDisabled,

    /// No identity has the given email.
    #[error("Nessun utente trovato con l'email {0}.")]
    NotFound(String),

    /// Any other identity provider failure; the raw message is kept.
    #[error("Errore Firebase Auth: {0}")]
    Auth(String),

    /// Any document store failure.
    #[error("Errore Firestore: {0}")]
    Store(String),
}

impl From<AuthError> for AdminAccountError {
    fn from(err: AuthError) -> Self {
        match err.code() {
            Some(AuthErrorCode::EmailAlreadyExists) => Self::DuplicateIdentity,
            Some(AuthErrorCode::InvalidEmail) => Self::InvalidEmail,
            Some(AuthErrorCode::WeakPassword) => Self::WeakPassword,
            Some(AuthErrorCode::OperationNotAllowed) => Self::SignInMethodDisabled,
            _ => Self::Auth(err.to_string()),
        }
    }
}

impl From<FirestoreError> for AdminAccountError {
    fn from(err: FirestoreError) -> Self {
        Self::Store(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_code_mapping() {
        assert!(matches!(
            AdminAccountError::from(AuthError::api("EMAIL_EXISTS")),
            AdminAccountError::DuplicateIdentity
        ));
        assert!(matches!(
            AdminAccountError::from(AuthError::api("INVALID_EMAIL")),
            AdminAccountError::InvalidEmail
        ));
        assert!(matches!(
            AdminAccountError::from(AuthError::api("WEAK_PASSWORD : too short")),
            AdminAccountError::WeakPassword
        ));
        assert!(matches!(
            AdminAccountError::from(AuthError::api("OPERATION_NOT_ALLOWED")),
            AdminAccountError::SignInMethodDisabled
        ));
    }

    #[test]
    fn test_unknown_code_keeps_raw_message() {
        let err = AdminAccountError::from(AuthError::api("QUOTA_EXCEEDED"));
        assert!(matches!(err, AdminAccountError::Auth(_)));
        assert_eq!(err.to_string(), "Errore Firebase Auth: QUOTA_EXCEEDED");
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = AdminAccountError::from(ValidationError::InvalidEmail);
        assert!(matches!(err, AdminAccountError::Validation(_)));
        assert_eq!(err.to_string(), "Email non valida");
    }
}
