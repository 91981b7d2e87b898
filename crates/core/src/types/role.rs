//! Admin role and the custom claims attached to admin identities.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Admin role stored both in custom claims and in `admin_profiles`.
///
/// The admin app only knows a single role today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminRole {
    /// Full access to the Longeviva admin app.
    #[default]
    Admin,
}

impl AdminRole {
    /// Wire representation (`"ADMIN"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Custom claims set on every admin identity: `{"admin": true, "role": "ADMIN"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub admin: bool,
    pub role: AdminRole,
}

impl Default for AdminClaims {
    fn default() -> Self {
        Self {
            admin: true,
            role: AdminRole::Admin,
        }
    }
}

impl AdminClaims {
    /// Claims as a JSON object, the shape the identity provider stores.
    #[must_use]
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("admin".to_owned(), Value::Bool(self.admin));
        map.insert("role".to_owned(), Value::String(self.role.as_str().to_owned()));
        map
    }

    /// Whether a set of custom claims marks its identity as an admin.
    ///
    /// Only a boolean `true` under `admin` counts; a missing key, `false`,
    /// or a non-boolean value does not.
    #[must_use]
    pub fn grants_admin(claims: Option<&Map<String, Value>>) -> bool {
        claims
            .and_then(|c| c.get("admin"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
