//! Firestore documents kept for every admin identity.
//!
//! Each admin has two documents keyed by its uid:
//! - `admin_profiles/{uid}` - the profile read by the admin app
//! - `admins/{uid}` - legacy copy kept for older clients; its `password`
//!   field is always empty

use longeviva_core::{AdminRole, Uid};

use crate::firebase::{DocumentPath, FieldValue, Fields};

/// Collection read by the admin app.
pub const ADMIN_PROFILES: &str = "admin_profiles";

/// Legacy collection kept for compatibility.
pub const LEGACY_ADMINS: &str = "admins";

#[must_use]
pub fn profile_path(uid: &Uid) -> DocumentPath {
    DocumentPath::new(ADMIN_PROFILES, uid.as_str())
}

#[must_use]
pub fn legacy_path(uid: &Uid) -> DocumentPath {
    DocumentPath::new(LEGACY_ADMINS, uid.as_str())
}

/// Fields of `admin_profiles/{uid}`. `createdAt` is set by the server.
#[must_use]
pub fn profile_fields(name: &str, email: &str) -> Fields {
    Fields::from([
        ("name".to_owned(), FieldValue::from(name)),
        ("email".to_owned(), FieldValue::from(email)),
        ("role".to_owned(), FieldValue::from(AdminRole::Admin.as_str())),
        ("createdAt".to_owned(), FieldValue::ServerTimestamp),
    ])
}

/// Fields of `admins/{uid}`. The password placeholder is never filled in.
#[must_use]
pub fn legacy_fields(uid: &Uid, name: &str, email: &str) -> Fields {
    Fields::from([
        ("id".to_owned(), FieldValue::from(uid.as_str())),
        ("name".to_owned(), FieldValue::from(name)),
        ("email".to_owned(), FieldValue::from(email)),
        ("password".to_owned(), FieldValue::from("")),
        ("createdAt".to_owned(), FieldValue::ServerTimestamp),
    ])
}
