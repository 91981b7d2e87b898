//! Admin account service.
//!
//! Creates, verifies, finds, deletes and lists admin identities. An admin is
//! an identity carrying `{admin: true, role: "ADMIN"}` custom claims plus its
//! two Firestore documents (see [`crate::models::admin_account`]).
//!
//! Creating an admin is three dependent remote steps: identity, claims, then
//! one batch with both documents. Only the batch is atomic. By default a
//! failure after the identity exists leaves it in place; with compensation
//! enabled the identity is deleted again before the error is returned.

mod error;

pub use error::AdminAccountError;

use longeviva_core::{AdminClaims, Email, IdentityRecord, NewAdmin, Uid};
use tracing::{error, info, instrument, warn};

use crate::firebase::auth::MAX_LIST_RESULTS;
use crate::firebase::{
    AuthErrorCode, CreateUserRequest, DocumentStore, IdentityProvider, WriteBatch,
};
use crate::models::admin_account::{legacy_fields, legacy_path, profile_fields, profile_path};

/// Progress events emitted while an admin is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateProgress {
    CreatingIdentity,
    IdentityCreated(Uid),
    AssigningClaims,
    ClaimsAssigned,
    WritingDocuments,
    DocumentsWritten,
}

/// A successfully created admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedAdmin {
    pub uid: Uid,
    /// Trimmed display name.
    pub name: String,
    /// Trimmed email.
    pub email: Email,
}

/// Result of re-reading a freshly created admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationReport {
    /// The identity carries `admin = true`.
    pub claims: bool,
    /// `admin_profiles/{uid}` exists.
    pub profile: bool,
    /// `admins/{uid}` exists.
    pub legacy: bool,
}

impl VerificationReport {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.claims && self.profile && self.legacy
    }
}

/// Admin account operations over an identity provider and a document store.
pub struct AdminAccountService<'a> {
    auth: &'a dyn IdentityProvider,
    store: &'a dyn DocumentStore,
    compensate: bool,
}

impl<'a> AdminAccountService<'a> {
    /// Create a new admin account service. Compensation is off.
    #[must_use]
    pub const fn new(auth: &'a dyn IdentityProvider, store: &'a dyn DocumentStore) -> Self {
        Self {
            auth,
            store,
            compensate: false,
        }
    }

    /// Delete the new identity again if a later creation step fails.
    #[must_use]
    pub const fn with_compensation(mut self, enabled: bool) -> Self {
        self.compensate = enabled;
        self
    }

    /// Create an admin.
    ///
    /// # Errors
    ///
    /// Returns the mapped provider or store error of the first failing step.
    pub async fn create(&self, admin: &NewAdmin) -> Result<CreatedAdmin, AdminAccountError> {
        self.create_observed(admin, &mut |_: CreateProgress| {}).await
    }

    /// Create an admin, reporting each step to `progress`.
    ///
    /// # Errors
    ///
    /// Returns the mapped provider or store error of the first failing step.
    #[instrument(skip_all, fields(email = %admin.email))]
    pub async fn create_observed(
        &self,
        admin: &NewAdmin,
        progress: &mut (dyn FnMut(CreateProgress) + Send),
    ) -> Result<CreatedAdmin, AdminAccountError> {
        progress(CreateProgress::CreatingIdentity);
        let request = CreateUserRequest {
            email: admin.email.as_str().to_owned(),
            password: admin.password.clone(),
            display_name: admin.name.clone(),
            email_verified: true,
        };
        let uid = self.auth.create_user(&request).await?;
        info!(uid = %uid, "Admin identity created");
        progress(CreateProgress::IdentityCreated(uid.clone()));

        progress(CreateProgress::AssigningClaims);
        let claims = AdminClaims::default().to_map();
        if let Err(err) = self.auth.set_custom_claims(&uid, &claims).await {
            return Err(self.after_partial_create(&uid, err.into()).await);
        }
        progress(CreateProgress::ClaimsAssigned);

        progress(CreateProgress::WritingDocuments);
        let email = admin.email.as_str();
        let mut batch = WriteBatch::new();
        batch
            .set(profile_path(&uid), profile_fields(&admin.name, email))
            .set(legacy_path(&uid), legacy_fields(&uid, &admin.name, email));
        if let Err(err) = self.store.commit(batch).await {
            return Err(self.after_partial_create(&uid, err.into()).await);
        }
        progress(CreateProgress::DocumentsWritten);

        info!(uid = %uid, "Admin created");
        Ok(CreatedAdmin {
            uid,
            name: admin.name.clone(),
            email: admin.email.clone(),
        })
    }

    /// Log the partial state and, if enabled, delete the new identity.
    async fn after_partial_create(&self, uid: &Uid, err: AdminAccountError) -> AdminAccountError {
        if !self.compensate {
            warn!(uid = %uid, error = %err, "Admin identity left without complete setup");
            return err;
        }

        match self.auth.delete_user(uid).await {
            Ok(()) => warn!(uid = %uid, error = %err, "Admin creation rolled back"),
            Err(cleanup) => error!(
                uid = %uid,
                error = %err,
                cleanup_error = %cleanup,
                "Failed to roll back admin identity"
            ),
        }
        err
    }

    /// Re-read an admin's claims and both documents.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the reads fails.
    #[instrument(skip(self), fields(uid = %uid))]
    pub async fn verify(&self, uid: &Uid) -> Result<VerificationReport, AdminAccountError> {
        let user = self.auth.get_user(uid).await?;
        let profile = self.store.get(&profile_path(uid)).await?.is_some();
        let legacy = self.store.get(&legacy_path(uid)).await?.is_some();

        Ok(VerificationReport {
            claims: user.is_admin(),
            profile,
            legacy,
        })
    }

    /// Look up an identity by email.
    ///
    /// # Errors
    ///
    /// Returns `AdminAccountError::NotFound` if no identity has this email.
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<IdentityRecord, AdminAccountError> {
        self.auth.get_user_by_email(email).await.map_err(|err| {
            if err.code() == Some(&AuthErrorCode::UserNotFound) {
                AdminAccountError::NotFound(email.to_owned())
            } else {
                err.into()
            }
        })
    }

    /// Delete an identity, then both of its documents in one batch.
    ///
    /// The two calls are independent: if the batch fails the documents
    /// remain although the identity is gone.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing call.
    #[instrument(skip(self), fields(uid = %uid))]
    pub async fn delete(&self, uid: &Uid) -> Result<(), AdminAccountError> {
        self.auth.delete_user(uid).await?;
        info!("Admin identity deleted");

        let mut batch = WriteBatch::new();
        batch.delete(profile_path(uid)).delete(legacy_path(uid));
        self.store.commit(batch).await.inspect_err(|err| {
            error!(error = %err, "Admin documents orphaned after identity deletion");
        })?;

        info!("Admin documents deleted");
        Ok(())
    }

    /// Identities carrying `admin = true`, from the first page of users.
    ///
    /// # Errors
    ///
    /// Returns an error if listing users fails.
    #[instrument(skip(self))]
    pub async fn list_admins(&self) -> Result<Vec<IdentityRecord>, AdminAccountError> {
        let users = self.auth.list_users(MAX_LIST_RESULTS).await?;
        let total = users.len();
        let admins: Vec<_> = users.into_iter().filter(IdentityRecord::is_admin).collect();

        info!(total, admins = admins.len(), "Listed admins");
        Ok(admins)
    }
}
