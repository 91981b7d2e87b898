//! Firestore REST client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, error, instrument};

use super::types::{Document, DocumentPath, Write, WriteBatch};
use super::value::{decode_fields, encode_fields};
use super::{DocumentStore, FirestoreError};
use crate::firebase::credentials::{TokenProvider, bearer};

/// Firestore client for the `(default)` database of one project.
#[derive(Clone)]
pub struct FirestoreClient {
    client: Client,
    /// Base URL without trailing slash, e.g. `https://firestore.googleapis.com`.
    base_url: String,
    project_id: String,
    tokens: Arc<TokenProvider>,
}

impl std::fmt::Debug for FirestoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreClient")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

impl FirestoreClient {
    /// Create a new Firestore client.
    #[must_use]
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        tokens: Arc<TokenProvider>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            tokens,
        }
    }

    /// `projects/{project}/databases/(default)/documents`
    fn database_root(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    /// Fully qualified resource name of a document.
    fn document_name(&self, path: &DocumentPath) -> String {
        format!("{}/{}/{}", self.database_root(), path.collection, path.id)
    }

    fn encode_write(&self, write: &Write) -> Value {
        match write {
            Write::Set { path, fields } => {
                let (encoded, server_timestamps) = encode_fields(fields);
                let mut write = json!({
                    "update": {
                        "name": self.document_name(path),
                        "fields": encoded,
                    }
                });
                if !server_timestamps.is_empty() {
                    write["updateTransforms"] = server_timestamps
                        .into_iter()
                        .map(|field_path| {
                            json!({ "fieldPath": field_path, "setToServerValue": "REQUEST_TIME" })
                        })
                        .collect();
                }
                write
            }
            Write::Delete { path } => json!({ "delete": self.document_name(path) }),
        }
    }
}

async fn api_error(response: Response) -> FirestoreError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => {
            error!(%status, message = %envelope.error.message, "Firestore error");
            FirestoreError::Api {
                code: envelope.error.code,
                status: envelope.error.status,
                message: envelope.error.message,
            }
        }
        Err(_) => FirestoreError::Response(format!("{status}: {body}")),
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    #[instrument(skip(self), fields(path = %path))]
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, FirestoreError> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/v1/{}", self.base_url, self.document_name(path));

        let response = self
            .client
            .get(url)
            .bearer_auth(bearer(&token))
            .send()
            .await
            .map_err(|e| FirestoreError::Request(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Document not found");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let raw: RawDocument = response
            .json()
            .await
            .map_err(|e| FirestoreError::Decode(e.to_string()))?;

        Ok(Some(Document {
            path: path.clone(),
            fields: decode_fields(&raw.fields),
        }))
    }

    #[instrument(skip(self, batch), fields(writes = batch.len()))]
    async fn commit(&self, batch: WriteBatch) -> Result<(), FirestoreError> {
        if batch.is_empty() {
            return Ok(());
        }

        let writes: Vec<Value> = batch.writes().iter().map(|w| self.encode_write(w)).collect();
        let token = self.tokens.access_token().await?;
        let url = format!("{}/v1/{}:commit", self.base_url, self.database_root());

        let response = self
            .client
            .post(url)
            .bearer_auth(bearer(&token))
            .json(&json!({ "writes": writes }))
            .send()
            .await
            .map_err(|e| FirestoreError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        debug!("Batch committed");
        Ok(())
    }
}
