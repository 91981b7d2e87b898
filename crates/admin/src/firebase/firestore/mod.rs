//! Cloud Firestore (v1 REST).
//!
//! Only what the admin tooling needs: point reads and atomic batch writes
//! against the `(default)` database.

mod client;
mod error;
mod types;
pub(crate) mod value;

pub use client::FirestoreClient;
pub use error::FirestoreError;
pub use types::{Document, DocumentPath, FieldValue, Fields, Write, WriteBatch};

use async_trait::async_trait;

/// Document storage operations.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a document; `Ok(None)` if it does not exist.
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, FirestoreError>;

    /// Apply every write in the batch atomically.
    async fn commit(&self, batch: WriteBatch) -> Result<(), FirestoreError>;
}
