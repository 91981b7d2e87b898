//! In-memory Firebase backend.
//!
//! Implements both [`IdentityProvider`] and [`DocumentStore`] with the
//! provider-side rules the admin flows depend on: unique emails, a
//! 6-character password floor, email/password sign-in that can be switched
//! off, and all-or-nothing batch commits. Failures can be injected and
//! every trait call is counted.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use longeviva_core::{IdentityRecord, Uid, UserMetadata};
use rand::Rng;
use rand::distr::Alphanumeric;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use super::auth::{AuthError, CreateUserRequest, IdentityProvider};
use super::firestore::{
    Document, DocumentPath, DocumentStore, FieldValue, Fields, FirestoreError, Write, WriteBatch,
};

/// Length of generated uids, matching the provider's.
const UID_LENGTH: usize = 28;

/// The provider's own minimum password length.
const PROVIDER_MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug)]
struct StoredUser {
    record: IdentityRecord,
    password: SecretString,
}

#[derive(Debug)]
struct State {
    users: BTreeMap<Uid, StoredUser>,
    documents: BTreeMap<DocumentPath, Fields>,
    remote_calls: usize,
    password_sign_in_enabled: bool,
    fail_claims: bool,
    fail_commits: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            documents: BTreeMap::new(),
            remote_calls: 0,
            password_sign_in_enabled: true,
            fail_claims: false,
            fail_commits: false,
        }
    }
}

impl State {
    fn email_taken(&self, email: &str) -> bool {
        self.users
            .values()
            .any(|u| u.record.email.as_deref() == Some(email))
    }

    fn find_by_email(&self, email: &str) -> Option<&StoredUser> {
        let email = email.to_lowercase();
        self.users
            .values()
            .find(|u| u.record.email.as_deref() == Some(email.as_str()))
    }
}

/// Firebase Auth and Firestore held in memory.
#[derive(Debug, Default)]
pub struct InMemoryFirebase {
    state: Mutex<State>,
}

fn not_found() -> AuthError {
    AuthError::api("USER_NOT_FOUND")
}

fn generate_uid() -> Uid {
    let uid: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(UID_LENGTH)
        .map(char::from)
        .collect();
    Uid::new(uid)
}

impl InMemoryFirebase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Behave like a project where email/password sign-in is disabled.
    #[must_use]
    pub fn without_password_sign_in(mut self) -> Self {
        self.state.get_mut().password_sign_in_enabled = false;
        self
    }

    /// Make every custom-claims update fail.
    pub async fn fail_claims(&self, fail: bool) {
        self.state.lock().await.fail_claims = fail;
    }

    /// Make every batch commit fail without applying any write.
    pub async fn fail_commits(&self, fail: bool) {
        self.state.lock().await.fail_commits = fail;
    }

    /// Store an identity directly, bypassing the trait and the call counter.
    pub async fn insert_user(&self, record: IdentityRecord) {
        let mut state = self.state.lock().await;
        state.users.insert(
            record.uid.clone(),
            StoredUser {
                record,
                password: SecretString::from(""),
            },
        );
    }

    /// Number of trait calls made against this backend so far.
    pub async fn remote_calls(&self) -> usize {
        self.state.lock().await.remote_calls
    }

    pub async fn user(&self, uid: &Uid) -> Option<IdentityRecord> {
        self.state
            .lock()
            .await
            .users
            .get(uid)
            .map(|u| u.record.clone())
    }

    pub async fn user_count(&self) -> usize {
        self.state.lock().await.users.len()
    }

    /// Whether `password` is the stored password of `uid`.
    pub async fn password_matches(&self, uid: &Uid, password: &str) -> bool {
        self.state
            .lock()
            .await
            .users
            .get(uid)
            .is_some_and(|u| u.password.expose_secret() == password)
    }

    pub async fn document(&self, path: &DocumentPath) -> Option<Fields> {
        self.state.lock().await.documents.get(path).cloned()
    }

    pub async fn document_count(&self) -> usize {
        self.state.lock().await.documents.len()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryFirebase {
    async fn create_user(&self, request: &CreateUserRequest) -> Result<Uid, AuthError> {
        let mut state = self.state.lock().await;
        state.remote_calls += 1;

        if !state.password_sign_in_enabled {
            return Err(AuthError::api("OPERATION_NOT_ALLOWED"));
        }
        if !request.email.contains('@') {
            return Err(AuthError::api("INVALID_EMAIL"));
        }
        if request.password.expose_secret().chars().count() < PROVIDER_MIN_PASSWORD_LENGTH {
            return Err(AuthError::api(
                "WEAK_PASSWORD : Password should be at least 6 characters",
            ));
        }
        let email = request.email.to_lowercase();
        if state.email_taken(&email) {
            return Err(AuthError::api("EMAIL_EXISTS"));
        }

        let uid = generate_uid();
        let record = IdentityRecord {
            uid: uid.clone(),
            email: Some(email),
            display_name: Some(request.display_name.clone()),
            email_verified: request.email_verified,
            disabled: false,
            metadata: UserMetadata {
                creation_time: Utc::now(),
                last_sign_in_time: None,
            },
            custom_claims: None,
        };
        state.users.insert(
            uid.clone(),
            StoredUser {
                record,
                password: request.password.clone(),
            },
        );

        Ok(uid)
    }

    async fn set_custom_claims(
        &self,
        uid: &Uid,
        claims: &Map<String, Value>,
    ) -> Result<(), AuthError> {
        let mut state = self.state.lock().await;
        state.remote_calls += 1;

        if state.fail_claims {
            return Err(AuthError::Request("injected claims failure".to_string()));
        }
        let user = state.users.get_mut(uid).ok_or_else(not_found)?;
        user.record.custom_claims = Some(claims.clone());
        Ok(())
    }

    async fn get_user(&self, uid: &Uid) -> Result<IdentityRecord, AuthError> {
        let mut state = self.state.lock().await;
        state.remote_calls += 1;

        state
            .users
            .get(uid)
            .map(|u| u.record.clone())
            .ok_or_else(not_found)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<IdentityRecord, AuthError> {
        let mut state = self.state.lock().await;
        state.remote_calls += 1;

        state
            .find_by_email(email)
            .map(|u| u.record.clone())
            .ok_or_else(not_found)
    }

    async fn delete_user(&self, uid: &Uid) -> Result<(), AuthError> {
        let mut state = self.state.lock().await;
        state.remote_calls += 1;

        state.users.remove(uid).map(|_| ()).ok_or_else(not_found)
    }

    async fn list_users(&self, max_results: u32) -> Result<Vec<IdentityRecord>, AuthError> {
        let mut state = self.state.lock().await;
        state.remote_calls += 1;

        let limit = usize::try_from(max_results).unwrap_or(usize::MAX);
        Ok(state
            .users
            .values()
            .take(limit)
            .map(|u| u.record.clone())
            .collect())
    }
}

#[async_trait]
impl DocumentStore for InMemoryFirebase {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, FirestoreError> {
        let mut state = self.state.lock().await;
        state.remote_calls += 1;

        Ok(state.documents.get(path).map(|fields| Document {
            path: path.clone(),
            fields: fields.clone(),
        }))
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), FirestoreError> {
        let mut state = self.state.lock().await;
        state.remote_calls += 1;

        if state.fail_commits {
            return Err(FirestoreError::Api {
                code: 503,
                status: "UNAVAILABLE".to_string(),
                message: "injected commit failure".to_string(),
            });
        }

        let now = Utc::now();
        for write in batch.into_writes() {
            match write {
                Write::Set { path, mut fields } => {
                    for value in fields.values_mut() {
                        if matches!(value, FieldValue::ServerTimestamp) {
                            *value = FieldValue::Timestamp(now);
                        }
                    }
                    state.documents.insert(path, fields);
                }
                Write::Delete { path } => {
                    state.documents.remove(&path);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::firebase::auth::AuthErrorCode;

    fn request(email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            password: SecretString::from(password),
            display_name: "Mario Rossi".to_string(),
            email_verified: true,
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let firebase = InMemoryFirebase::new();
        let uid = firebase
            .create_user(&request("Admin@Longeviva.it", "password123"))
            .await
            .unwrap();

        assert_eq!(uid.as_str().len(), UID_LENGTH);
        assert!(uid.as_str().chars().all(|c| c.is_ascii_alphanumeric()));

        let by_email = firebase.get_user_by_email("admin@longeviva.it").await.unwrap();
        assert_eq!(by_email.uid, uid);
        assert!(firebase.password_matches(&uid, "password123").await);
        assert_eq!(firebase.remote_calls().await, 2);
    }

    #[tokio::test]
    async fn test_provider_rules() {
        let firebase = InMemoryFirebase::new();
        firebase
            .create_user(&request("a@longeviva.it", "password123"))
            .await
            .unwrap();

        let duplicate = firebase
            .create_user(&request("a@longeviva.it", "password123"))
            .await
            .unwrap_err();
        assert_eq!(duplicate.code(), Some(&AuthErrorCode::EmailAlreadyExists));

        let weak = firebase
            .create_user(&request("b@longeviva.it", "12345"))
            .await
            .unwrap_err();
        assert_eq!(weak.code(), Some(&AuthErrorCode::WeakPassword));

        let invalid = firebase
            .create_user(&request("nope", "password123"))
            .await
            .unwrap_err();
        assert_eq!(invalid.code(), Some(&AuthErrorCode::InvalidEmail));

        assert_eq!(firebase.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_password_sign_in_disabled() {
        let firebase = InMemoryFirebase::new().without_password_sign_in();
        let err = firebase
            .create_user(&request("a@longeviva.it", "password123"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(&AuthErrorCode::OperationNotAllowed));
    }

    #[tokio::test]
    async fn test_failed_commit_applies_nothing() {
        let firebase = InMemoryFirebase::new();
        firebase.fail_commits(true).await;

        let mut batch = WriteBatch::new();
        batch
            .set(DocumentPath::new("admin_profiles", "u1"), Fields::new())
            .set(DocumentPath::new("admins", "u1"), Fields::new());

        assert!(firebase.commit(batch).await.is_err());
        assert_eq!(firebase.document_count().await, 0);
    }

    #[tokio::test]
    async fn test_server_timestamp_resolved_on_commit() {
        let firebase = InMemoryFirebase::new();
        let path = DocumentPath::new("admin_profiles", "u1");
        let mut fields = Fields::new();
        fields.insert("createdAt".into(), FieldValue::ServerTimestamp);

        let mut batch = WriteBatch::new();
        batch.set(path.clone(), fields);
        firebase.commit(batch).await.unwrap();

        let stored = firebase.document(&path).await.unwrap();
        assert!(matches!(stored.get("createdAt"), Some(FieldValue::Timestamp(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let firebase = InMemoryFirebase::new();
        let err = firebase.delete_user(&Uid::from("ghost")).await.unwrap_err();
        assert_eq!(err.code(), Some(&AuthErrorCode::UserNotFound));
    }
}
