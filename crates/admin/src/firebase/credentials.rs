//! OAuth2 access tokens for the Firebase REST APIs.
//!
//! Three sources are supported:
//! - a service account key: a self-signed RS256 JWT is exchanged for an
//!   access token at the key's `token_uri`
//! - the platform metadata server (hosted function)
//! - the local emulators, which accept the static token `owner`
//!
//! Tokens are cached and refreshed shortly before they expire.

use std::path::Path;
use std::time::{Duration, Instant};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

const TOKEN_SCOPES: &str = "https://www.googleapis.com/auth/cloud-platform \
https://www.googleapis.com/auth/firebase \
https://www.googleapis.com/auth/identitytoolkit \
https://www.googleapis.com/auth/userinfo.email";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

const EMULATOR_TOKEN: &str = "owner";

/// Refresh this long before the provider-reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime requested for the self-signed assertion.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Errors that can occur while obtaining an access token.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// The service account key file could not be read.
    #[error("cannot read service account key {path}: {source}")]
    KeyFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The service account key is not valid JSON or lacks required fields.
    #[error("invalid service account key: {0}")]
    InvalidKey(String),

    /// Signing the token assertion failed.
    #[error("failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// HTTP request to the token endpoint failed.
    #[error("token request failed: {0}")]
    Request(String),

    /// Token endpoint returned an error or an unreadable response.
    #[error("token response error: {0}")]
    Response(String),
}

/// The fields of a Google service account key file this crate needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: Option<String>,
    pub client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    /// Parse a key from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns `CredentialsError::InvalidKey` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, CredentialsError> {
        serde_json::from_str(json).map_err(|e| CredentialsError::InvalidKey(e.to_string()))
    }

    /// Read and parse a key file.
    ///
    /// # Errors
    ///
    /// Returns `CredentialsError::KeyFile` if the file cannot be read and
    /// `CredentialsError::InvalidKey` if it cannot be parsed.
    pub fn from_file(path: &Path) -> Result<Self, CredentialsError> {
        let json = std::fs::read_to_string(path).map_err(|source| CredentialsError::KeyFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Build the signed JWT assertion for the token exchange.
    fn assertion(&self, now: i64) -> Result<String, CredentialsError> {
        #[derive(Serialize)]
        struct AssertionClaims<'a> {
            iss: &'a str,
            scope: &'a str,
            aud: &'a str,
            iat: i64,
            exp: i64,
        }

        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: TOKEN_SCOPES,
            aud: &self.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())?;
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &key,
        )?)
    }
}

/// Where access tokens come from.
#[derive(Debug, Clone)]
pub enum Credentials {
    ServiceAccount(ServiceAccountKey),
    MetadataServer { token_url: String },
    Emulator,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: SecretString,
    refresh_at: Instant,
}

/// Hands out access tokens, caching them until shortly before expiry.
pub struct TokenProvider {
    client: Client,
    credentials: Credentials,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl TokenProvider {
    #[must_use]
    pub fn new(client: Client, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
            cached: Mutex::new(None),
        }
    }

    /// Token provider for the local emulators.
    #[must_use]
    pub fn emulator() -> Self {
        Self::new(Client::new(), Credentials::Emulator)
    }

    /// Return a valid access token, fetching a new one if needed.
    ///
    /// # Errors
    ///
    /// Returns `CredentialsError` if signing or the token request fails.
    pub async fn access_token(&self) -> Result<SecretString, CredentialsError> {
        if matches!(self.credentials, Credentials::Emulator) {
            return Ok(SecretString::from(EMULATOR_TOKEN));
        }

        let mut cached = self.cached.lock().await;
        if let Some(entry) = cached.as_ref()
            && Instant::now() < entry.refresh_at
        {
            return Ok(entry.token.clone());
        }

        let response = self.fetch().await?;
        let lifetime = Duration::from_secs(response.expires_in).saturating_sub(EXPIRY_MARGIN);
        let token = SecretString::from(response.access_token);
        *cached = Some(CachedToken {
            token: token.clone(),
            refresh_at: Instant::now() + lifetime,
        });

        Ok(token)
    }

    #[instrument(skip(self))]
    async fn fetch(&self) -> Result<TokenResponse, CredentialsError> {
        let request = match &self.credentials {
            Credentials::ServiceAccount(key) => {
                let assertion = key.assertion(chrono::Utc::now().timestamp())?;
                self.client
                    .post(&key.token_uri)
                    .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            }
            Credentials::MetadataServer { token_url } => self
                .client
                .get(token_url)
                .header("Metadata-Flavor", "Google"),
            Credentials::Emulator => {
                return Ok(TokenResponse {
                    access_token: EMULATOR_TOKEN.to_string(),
                    expires_in: ASSERTION_LIFETIME_SECS.unsigned_abs(),
                });
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| CredentialsError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CredentialsError::Response(format!("{status}: {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| CredentialsError::Response(e.to_string()))?;

        debug!(expires_in = token.expires_in, "Fetched access token");
        Ok(token)
    }
}

/// Expose a token for use in an `Authorization` header.
pub(crate) fn bearer(token: &SecretString) -> &str {
    token.expose_secret()
}
