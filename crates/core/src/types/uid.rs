//! Identity provider user IDs.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier assigned to a user by the identity provider.
///
/// Opaque to this codebase: it is only ever compared, displayed and used as
/// the document ID for the admin's Firestore records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    /// Wrap a provider-assigned identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Uid` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Uid {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for Uid {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<Uid> for String {
    fn from(id: Uid) -> Self {
        id.0
    }
}

impl AsRef<str> for Uid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
