//! Input validation for admin account operations.
//!
//! Validation runs before any remote call. The first violated rule wins, in
//! this order: all fields present, password length, email shape.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::types::email::Email;

/// Minimum password length accepted locally.
///
/// The identity provider enforces its own (lower) minimum as well.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validation failures. Messages are shown verbatim to operators and API
/// callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One of name, email or password is empty.
    #[error("Tutti i campi (nome, email, password) sono obbligatori")]
    MissingFields,

    /// Password shorter than [`MIN_PASSWORD_LENGTH`].
    #[error("La password deve essere almeno {min} caratteri")]
    PasswordTooShort { min: usize },

    /// Email without an `@`.
    #[error("Email non valida")]
    InvalidEmail,
}

/// A validated request to create an admin.
///
/// `name` and `email` are trimmed; the password is kept exactly as typed.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub name: String,
    pub email: Email,
    pub password: SecretString,
}

impl NewAdmin {
    /// Validate raw operator input.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] the input violates.
    pub fn validate(name: &str, email: &str, password: &str) -> Result<Self, ValidationError> {
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(ValidationError::MissingFields);
        }

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        if !email.contains('@') {
            return Err(ValidationError::InvalidEmail);
        }

        let email = Email::parse(email).map_err(|_| ValidationError::InvalidEmail)?;

        Ok(Self {
            name: name.trim().to_owned(),
            email,
            password: SecretString::from(password.to_owned()),
        })
    }

    /// The password, for handing to the identity provider.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

/// Answer to a destructive-operation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    /// Only a literal `yes` (any letter case) confirms. Whitespace is not
    /// trimmed.
    #[must_use]
    pub fn parse(answer: &str) -> Self {
        if answer.to_lowercase() == "yes" {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }

    #[must_use]
    pub const fn is_confirmed(self) -> bool {
        matches!(self, Self::Confirmed)
    }
}
