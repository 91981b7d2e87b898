//! Firebase REST clients.
//!
//! - [`auth`] - Firebase Authentication users and custom claims
//! - [`firestore`] - Cloud Firestore point reads and batch writes
//! - [`credentials`] - OAuth2 access tokens shared by both clients
//! - [`memory`] - In-memory backend for tests and local runs

pub mod auth;
pub mod credentials;
pub mod firestore;
pub mod memory;

use std::sync::Arc;

use reqwest::Client;
use thiserror::Error;
use tracing::info;

pub use auth::{AuthClient, AuthError, AuthErrorCode, CreateUserRequest, IdentityProvider};
pub use credentials::{Credentials, CredentialsError, ServiceAccountKey, TokenProvider};
pub use firestore::{
    Document, DocumentPath, DocumentStore, FieldValue, Fields, FirestoreClient, FirestoreError,
    WriteBatch,
};
pub use memory::InMemoryFirebase;

use crate::config::{CredentialSource, DEFAULT_PROJECT_ID, FirebaseConfig};

/// Errors that can occur while setting up the Firebase clients.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Auth and Firestore clients sharing one HTTP client and token cache.
#[derive(Debug, Clone)]
pub struct FirebaseClients {
    pub project_id: String,
    pub auth: AuthClient,
    pub firestore: FirestoreClient,
}

impl FirebaseClients {
    /// Build clients from configuration.
    ///
    /// The project is the configured one, else the service account's
    /// `project_id`, else [`DEFAULT_PROJECT_ID`].
    ///
    /// # Errors
    ///
    /// Returns `SetupError` if the service account key cannot be loaded.
    pub fn from_config(config: &FirebaseConfig) -> Result<Self, SetupError> {
        let client = Client::builder()
            .user_agent(concat!("longeviva-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SetupError::HttpClient(e.to_string()))?;

        let (credentials, key_project) = match &config.credentials {
            CredentialSource::Emulator => (Credentials::Emulator, None),
            CredentialSource::ServiceAccountFile(path) => {
                let key = ServiceAccountKey::from_file(path)?;
                let project = key.project_id.clone();
                (Credentials::ServiceAccount(key), project)
            }
            CredentialSource::MetadataServer => (
                Credentials::MetadataServer {
                    token_url: credentials::METADATA_TOKEN_URL.to_string(),
                },
                None,
            ),
        };

        let project_id = config
            .project_id
            .clone()
            .or(key_project)
            .unwrap_or_else(|| DEFAULT_PROJECT_ID.to_string());

        info!(
            project_id = %project_id,
            emulator = matches!(credentials, Credentials::Emulator),
            "Firebase clients configured"
        );

        let tokens = Arc::new(TokenProvider::new(client.clone(), credentials));

        Ok(Self {
            auth: AuthClient::new(
                client.clone(),
                &config.auth_base_url,
                &project_id,
                Arc::clone(&tokens),
            ),
            firestore: FirestoreClient::new(
                client,
                &config.firestore_base_url,
                &project_id,
                tokens,
            ),
            project_id,
        })
    }
}
