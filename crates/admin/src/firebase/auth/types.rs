//! Identity Toolkit v1 wire types.

use chrono::{DateTime, Utc};
use longeviva_core::{IdentityRecord, Uid, UserMetadata};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::AuthError;

/// Body of `POST /v1/projects/{project}/accounts`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignUpRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub display_name: &'a str,
    pub email_verified: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignUpResponse {
    pub local_id: String,
}

/// Body of `accounts:update` when only custom claims change.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SetClaimsRequest<'a> {
    pub local_id: &'a str,
    /// Claims are sent as a JSON-encoded string.
    pub custom_attributes: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LookupRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_id: Option<[&'a str; 1]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<[&'a str; 1]>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteRequest<'a> {
    pub local_id: &'a str,
}

/// Response of `accounts:lookup` and `accounts:batchGet`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UsersResponse {
    #[serde(default)]
    pub users: Vec<UserInfo>,
    pub next_page_token: Option<String>,
}

/// A user as the REST API returns it. Timestamps are millisecond strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserInfo {
    pub local_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub disabled: bool,
    pub created_at: Option<String>,
    pub last_login_at: Option<String>,
    pub custom_attributes: Option<String>,
}

/// Error envelope shared by Google APIs.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

fn parse_millis(field: &str, value: &str) -> Result<DateTime<Utc>, AuthError> {
    value
        .parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .ok_or_else(|| AuthError::Response(format!("invalid {field} timestamp: {value}")))
}

impl TryFrom<UserInfo> for IdentityRecord {
    type Error = AuthError;

    fn try_from(user: UserInfo) -> Result<Self, Self::Error> {
        let creation_time = match user.created_at.as_deref() {
            Some(ms) => parse_millis("createdAt", ms)?,
            None => DateTime::<Utc>::UNIX_EPOCH,
        };
        let last_sign_in_time = user
            .last_login_at
            .as_deref()
            .map(|ms| parse_millis("lastLoginAt", ms))
            .transpose()?;

        let custom_claims = match user.custom_attributes.as_deref() {
            None | Some("") => None,
            Some(raw) => {
                let value: Value = serde_json::from_str(raw)
                    .map_err(|e| AuthError::Response(format!("invalid customAttributes: {e}")))?;
                match value {
                    Value::Object(map) => Some(map),
                    _ => Some(Map::new()),
                }
            }
        };

        Ok(Self {
            uid: Uid::new(user.local_id),
            email: user.email,
            display_name: user.display_name,
            email_verified: user.email_verified,
            disabled: user.disabled,
            metadata: UserMetadata {
                creation_time,
                last_sign_in_time,
            },
            custom_claims,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_info_conversion() {
        let info: UserInfo = serde_json::from_value(json!({
            "localId": "abc123",
            "email": "admin@example.com",
            "displayName": "Mario Rossi",
            "emailVerified": true,
            "createdAt": "1700000000000",
            "lastLoginAt": "1700000500000",
            "customAttributes": "{\"admin\":true,\"role\":\"ADMIN\"}"
        }))
        .unwrap();

        let record = IdentityRecord::try_from(info).unwrap();
        assert_eq!(record.uid.as_str(), "abc123");
        assert!(record.email_verified);
        assert!(!record.disabled);
        assert!(record.is_admin());
        assert_eq!(record.metadata.creation_time.timestamp(), 1_700_000_000);
        assert_eq!(
            record.metadata.last_sign_in_time.map(|t| t.timestamp()),
            Some(1_700_000_500)
        );
    }

    #[test]
    fn test_user_without_claims_or_login() {
        let info: UserInfo = serde_json::from_value(json!({
            "localId": "u1",
            "createdAt": "1700000000000"
        }))
        .unwrap();

        let record = IdentityRecord::try_from(info).unwrap();
        assert_eq!(record.custom_claims, None);
        assert_eq!(record.metadata.last_sign_in_time, None);
        assert!(!record.is_admin());
    }

    #[test]
    fn test_lookup_request_shape() {
        let by_email = LookupRequest {
            local_id: None,
            email: Some(["a@b.c"]),
        };
        assert_eq!(
            serde_json::to_value(&by_email).unwrap(),
            json!({"email": ["a@b.c"]})
        );
    }
}
