//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Firebase (CLI and HTTP function)
//! - `FIREBASE_PROJECT_ID` - Target project (falls back to `GOOGLE_CLOUD_PROJECT`,
//!   `GCLOUD_PROJECT`, the service account's `project_id`, then `longeviva-app`)
//! - `GOOGLE_APPLICATION_CREDENTIALS` - Path to a service account key file
//!   (CLI default: `./serviceAccountKey.json`)
//! - `FIREBASE_AUTH_EMULATOR_HOST` / `FIRESTORE_EMULATOR_HOST` - Emulator
//!   hosts, must be set together; switches to emulator credentials
//!
//! ## HTTP function only
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 8080)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sample rates (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Project used when nothing else names one.
pub const DEFAULT_PROJECT_ID: &str = "longeviva-app";

/// Key file the admin scripts look for next to where they run.
pub const DEFAULT_SERVICE_ACCOUNT_PATH: &str = "./serviceAccountKey.json";

pub const DEFAULT_AUTH_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where OAuth credentials come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Local emulators accept a static `owner` token.
    Emulator,
    /// Service account key file (local admin scripts).
    ServiceAccountFile(PathBuf),
    /// Platform metadata server (hosted function).
    MetadataServer,
}

/// Credential source to use when neither an emulator nor
/// `GOOGLE_APPLICATION_CREDENTIALS` is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialDefault {
    ServiceAccountFile,
    MetadataServer,
}

/// Firebase project and endpoint configuration.
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Explicitly configured project, if any.
    pub project_id: Option<String>,
    pub credentials: CredentialSource,
    /// Identity Toolkit base URL (no trailing slash).
    pub auth_base_url: String,
    /// Firestore base URL (no trailing slash).
    pub firestore_base_url: String,
}

impl FirebaseConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the emulator variables are only half set.
    pub fn from_env(default: CredentialDefault) -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(&|key: &str| std::env::var(key).ok(), default)
    }

    fn from_lookup(
        lookup: &impl Fn(&str) -> Option<String>,
        default: CredentialDefault,
    ) -> Result<Self, ConfigError> {
        let project_id = ["FIREBASE_PROJECT_ID", "GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT"]
            .into_iter()
            .find_map(|key| get_optional_env(lookup, key));

        let auth_emulator = get_optional_env(lookup, "FIREBASE_AUTH_EMULATOR_HOST");
        let firestore_emulator = get_optional_env(lookup, "FIRESTORE_EMULATOR_HOST");

        match (auth_emulator, firestore_emulator) {
            (Some(auth_host), Some(firestore_host)) => {
                return Ok(Self {
                    project_id,
                    credentials: CredentialSource::Emulator,
                    auth_base_url: format!("http://{auth_host}/identitytoolkit.googleapis.com"),
                    firestore_base_url: format!("http://{firestore_host}"),
                });
            }
            (None, None) => {}
            _ => {
                return Err(ConfigError::InvalidEnvVar(
                    "*_EMULATOR_HOST".to_string(),
                    "Both FIREBASE_AUTH_EMULATOR_HOST and FIRESTORE_EMULATOR_HOST must be set together"
                        .to_string(),
                ));
            }
        }

        let credentials = match get_optional_env(lookup, "GOOGLE_APPLICATION_CREDENTIALS") {
            Some(path) => CredentialSource::ServiceAccountFile(PathBuf::from(path)),
            None => match default {
                CredentialDefault::ServiceAccountFile => {
                    CredentialSource::ServiceAccountFile(PathBuf::from(DEFAULT_SERVICE_ACCOUNT_PATH))
                }
                CredentialDefault::MetadataServer => CredentialSource::MetadataServer,
            },
        };

        Ok(Self {
            project_id,
            credentials,
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            firestore_base_url: DEFAULT_FIRESTORE_BASE_URL.to_string(),
        })
    }
}

/// Configuration for the `createAdminUser` HTTP function.
#[derive(Debug, Clone)]
pub struct FunctionsConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    pub firebase: FirebaseConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl FunctionsConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = get_env_or_default(lookup, "HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default(lookup, "PORT", "8080")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let firebase = FirebaseConfig::from_lookup(lookup, CredentialDefault::MetadataServer)?;

        let sentry_dsn = get_optional_env(lookup, "SENTRY_DSN");
        let sentry_environment = get_optional_env(lookup, "SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env(lookup, "SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env(lookup, "SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            firebase,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}
