//! Admin account commands.
//!
//! # Usage
//!
//! ```bash
//! # Create an admin interactively
//! lv-cli admin create
//!
//! # Create an admin directly
//! lv-cli admin create "Mario Rossi" mario@longeviva.it "password123"
//!
//! # Delete an admin (asks for the email and a confirmation)
//! lv-cli admin delete
//!
//! # List admins
//! lv-cli admin list
//! ```
//!
//! # Environment Variables
//!
//! - `GOOGLE_APPLICATION_CREDENTIALS` - Service account key
//!   (default: `./serviceAccountKey.json`)
//! - `FIREBASE_PROJECT_ID` - Target project (default: the key's project)
//! - `FIREBASE_AUTH_EMULATOR_HOST` / `FIRESTORE_EMULATOR_HOST` - Use the
//!   local emulators instead

pub mod create;
pub mod delete;
pub mod list;

use longeviva_admin::config::{ConfigError, CredentialDefault, FirebaseConfig};
use longeviva_admin::firebase::{FirebaseClients, SetupError};
use thiserror::Error;

/// Errors that stop an admin command before it reaches Firebase.
#[derive(Debug, Error)]
pub enum AdminCommandError {
    /// Configuration could not be loaded.
    #[error("Configurazione non valida: {0}")]
    Config(#[from] ConfigError),

    /// Firebase clients could not be built (usually a missing key file).
    #[error("Inizializzazione Firebase fallita: {0}")]
    Setup(#[from] SetupError),

    /// Console I/O failed.
    #[error("Errore di I/O: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the Firebase clients the admin commands use.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the service account
/// key cannot be loaded.
pub fn connect() -> Result<FirebaseClients, AdminCommandError> {
    let config = FirebaseConfig::from_env(CredentialDefault::ServiceAccountFile)?;
    tracing::debug!(credentials = ?config.credentials, "Loaded Firebase configuration");
    Ok(FirebaseClients::from_config(&config)?)
}

/// Horizontal rule used by the reports.
pub(crate) fn rule(ch: char) -> String {
    ch.to_string().repeat(50)
}
