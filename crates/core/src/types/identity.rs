//! Identity provider user records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::role::AdminClaims;
use super::uid::Uid;

/// Timestamps the identity provider keeps for every user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    pub creation_time: DateTime<Utc>,
    pub last_sign_in_time: Option<DateTime<Utc>>,
}

/// A user as returned by the identity provider.
///
/// The password is write-only on the provider side and never appears here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub uid: Uid,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub email_verified: bool,
    pub disabled: bool,
    pub metadata: UserMetadata,
    pub custom_claims: Option<Map<String, Value>>,
}

impl IdentityRecord {
    /// Whether this identity carries `admin = true` in its custom claims.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        AdminClaims::grants_admin(self.custom_claims.as_ref())
    }
}
