//! Firebase Authentication (Identity Toolkit v1).
//!
//! [`IdentityProvider`] is the seam the admin account service works
//! against; [`AuthClient`] talks to the real service (or the Auth emulator)
//! and `InMemoryFirebase` backs tests.

mod client;
mod error;
pub(crate) mod types;

pub use client::AuthClient;
pub use error::{AuthError, AuthErrorCode};

use async_trait::async_trait;
use longeviva_core::{IdentityRecord, Uid};
use secrecy::SecretString;
use serde_json::{Map, Value};

/// Page size used when listing users; also the provider's maximum.
pub const MAX_LIST_RESULTS: u32 = 1000;

/// Parameters for creating an email/password identity.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: SecretString,
    pub display_name: String,
    pub email_verified: bool,
}

/// Operations on the Firebase Authentication user store.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a user and return its uid.
    async fn create_user(&self, request: &CreateUserRequest) -> Result<Uid, AuthError>;

    /// Replace the user's custom claims.
    async fn set_custom_claims(&self, uid: &Uid, claims: &Map<String, Value>)
    -> Result<(), AuthError>;

    /// Fetch a user by uid. Fails with `UserNotFound` if absent.
    async fn get_user(&self, uid: &Uid) -> Result<IdentityRecord, AuthError>;

    /// Fetch a user by email. Fails with `UserNotFound` if absent.
    async fn get_user_by_email(&self, email: &str) -> Result<IdentityRecord, AuthError>;

    /// Delete a user. Fails with `UserNotFound` if absent.
    async fn delete_user(&self, uid: &Uid) -> Result<(), AuthError>;

    /// Return the first page of users, at most `max_results` of them.
    async fn list_users(&self, max_results: u32) -> Result<Vec<IdentityRecord>, AuthError>;
}
