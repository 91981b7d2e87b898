//! Identity Toolkit REST client.

use std::sync::Arc;

use async_trait::async_trait;
use longeviva_core::{IdentityRecord, Uid};
use reqwest::{Client, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, error, instrument};
use url::Url;

use super::types::{
    DeleteRequest, ErrorEnvelope, LookupRequest, SetClaimsRequest, SignUpRequest, SignUpResponse,
    UsersResponse,
};
use super::{AuthError, CreateUserRequest, IdentityProvider};
use crate::firebase::credentials::{TokenProvider, bearer};

/// Firebase Auth client for a single project.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    /// Base URL without trailing slash, e.g. `https://identitytoolkit.googleapis.com`.
    base_url: String,
    project_id: String,
    tokens: Arc<TokenProvider>,
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl AuthClient {
    /// Create a new Auth client.
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

    /// The project this client operates on.
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/v1/projects/{}/{method}",
            self.base_url, self.project_id
        )
    }

    async fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, AuthError> {
        let token = self.tokens.access_token().await?;
        Ok(request.bearer_auth(bearer(&token)))
    }

    async fn post<B, R>(&self, method: &str, body: &B) -> Result<R, AuthError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let request = self
            .authorized(self.client.post(self.endpoint(method)))
            .await?
            .json(body);
        let response = request
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;
        decode(method, response).await
    }

    async fn lookup(&self, request: &LookupRequest<'_>) -> Result<IdentityRecord, AuthError> {
        let response: UsersResponse = self.post("accounts:lookup", request).await?;
        let user = response
            .users
            .into_iter()
            .next()
            .ok_or_else(|| AuthError::api("USER_NOT_FOUND"))?;
        IdentityRecord::try_from(user)
    }
}

async fn decode<R: DeserializeOwned>(method: &str, response: Response) -> Result<R, AuthError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => {
                error!(method, %status, message = %envelope.error.message, "Firebase Auth error");
                AuthError::api(envelope.error.message)
            }
            Err(_) => AuthError::Response(format!("{status}: {body}")),
        });
    }

    response
        .json()
        .await
        .map_err(|e| AuthError::Response(e.to_string()))
}

#[async_trait]
impl IdentityProvider for AuthClient {
    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn create_user(&self, request: &CreateUserRequest) -> Result<Uid, AuthError> {
        let body = SignUpRequest {
            email: &request.email,
            password: request.password.expose_secret(),
            display_name: &request.display_name,
            email_verified: request.email_verified,
        };
        let response: SignUpResponse = self.post("accounts", &body).await?;

        debug!(uid = %response.local_id, "User created");
        Ok(Uid::new(response.local_id))
    }

    #[instrument(skip(self, claims), fields(uid = %uid))]
    async fn set_custom_claims(
        &self,
        uid: &Uid,
        claims: &Map<String, Value>,
    ) -> Result<(), AuthError> {
        let custom_attributes = serde_json::to_string(claims)
            .map_err(|e| AuthError::Response(format!("cannot encode claims: {e}")))?;
        let body = SetClaimsRequest {
            local_id: uid.as_str(),
            custom_attributes,
        };
        let _: Value = self.post("accounts:update", &body).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(uid = %uid))]
    async fn get_user(&self, uid: &Uid) -> Result<IdentityRecord, AuthError> {
        self.lookup(&LookupRequest {
            local_id: Some([uid.as_str()]),
            email: None,
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_user_by_email(&self, email: &str) -> Result<IdentityRecord, AuthError> {
        self.lookup(&LookupRequest {
            local_id: None,
            email: Some([email]),
        })
        .await
    }

    #[instrument(skip(self), fields(uid = %uid))]
    async fn delete_user(&self, uid: &Uid) -> Result<(), AuthError> {
        let body = DeleteRequest {
            local_id: uid.as_str(),
        };
        let _: Value = self.post("accounts:delete", &body).await?;
        debug!("User deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_users(&self, max_results: u32) -> Result<Vec<IdentityRecord>, AuthError> {
        let mut url = Url::parse(&self.endpoint("accounts:batchGet"))
            .map_err(|e| AuthError::Request(format!("invalid Auth URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("maxResults", &max_results.to_string());

        let response = self
            .authorized(self.client.get(url))
            .await?
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;
        let page: UsersResponse = decode("accounts:batchGet", response).await?;

        debug!(
            count = page.users.len(),
            has_more = page.next_page_token.is_some(),
            "Listed users"
        );
        page.users.into_iter().map(IdentityRecord::try_from).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::firebase::auth::AuthErrorCode;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PROJECT: &str = "demo-longeviva";

    fn client(server: &MockServer) -> AuthClient {
        AuthClient::new(
            Client::new(),
            server.uri(),
            PROJECT,
            Arc::new(TokenProvider::emulator()),
        )
    }

    fn request() -> CreateUserRequest {
        CreateUserRequest {
            email: "admin@longeviva.it".to_string(),
            password: SecretString::from("supersecret"),
            display_name: "Mario Rossi".to_string(),
            email_verified: true,
        }
    }

    #[tokio::test]
    async fn test_create_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/v1/projects/{PROJECT}/accounts")))
            .and(header("authorization", "Bearer owner"))
            .and(body_json(json!({
                "email": "admin@longeviva.it",
                "password": "supersecret",
                "displayName": "Mario Rossi",
                "emailVerified": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "identitytoolkit#SignupNewUserResponse",
                "localId": "uid-123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let uid = client(&server).create_user(&request()).await.unwrap();
        assert_eq!(uid.as_str(), "uid-123");
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/v1/projects/{PROJECT}/accounts")))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "EMAIL_EXISTS"}
            })))
            .mount(&server)
            .await;

        let err = client(&server).create_user(&request()).await.unwrap_err();
        assert_eq!(err.code(), Some(&AuthErrorCode::EmailAlreadyExists));
    }

    #[tokio::test]
    async fn test_set_custom_claims_sends_json_string() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/v1/projects/{PROJECT}/accounts:update")))
            .and(body_json(json!({
                "localId": "uid-123",
                "customAttributes": "{\"admin\":true,\"role\":\"ADMIN\"}"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"localId": "uid-123"})))
            .expect(1)
            .mount(&server)
            .await;

        let claims = longeviva_core::AdminClaims::default().to_map();
        client(&server)
            .set_custom_claims(&Uid::from("uid-123"), &claims)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_user_by_email_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/v1/projects/{PROJECT}/accounts:lookup")))
            .and(body_json(json!({"email": ["missing@longeviva.it"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "identitytoolkit#GetAccountInfoResponse"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .get_user_by_email("missing@longeviva.it")
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(&AuthErrorCode::UserNotFound));
    }

    #[tokio::test]
    async fn test_get_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/v1/projects/{PROJECT}/accounts:lookup")))
            .and(body_json(json!({"localId": ["uid-123"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users": [{
                    "localId": "uid-123",
                    "email": "admin@longeviva.it",
                    "createdAt": "1700000000000",
                    "customAttributes": "{\"admin\":true}"
                }]
            })))
            .mount(&server)
            .await;

        let user = client(&server).get_user(&Uid::from("uid-123")).await.unwrap();
        assert_eq!(user.email.as_deref(), Some("admin@longeviva.it"));
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/v1/projects/{PROJECT}/accounts:delete")))
            .and(body_json(json!({"localId": "uid-123"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .delete_user(&Uid::from("uid-123"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_users_single_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/projects/{PROJECT}/accounts:batchGet")))
            .and(query_param("maxResults", "1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users": [
                    {"localId": "a", "createdAt": "1700000000000"},
                    {"localId": "b", "createdAt": "1700000000000", "customAttributes": "{\"admin\":true}"}
                ],
                "nextPageToken": "next"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let users = client(&server).list_users(1000).await.unwrap();
        assert_eq!(users.len(), 2);
        assert!(users[1].is_admin());
    }

    #[tokio::test]
    async fn test_unparseable_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = client(&server).delete_user(&Uid::from("x")).await.unwrap_err();
        assert!(matches!(err, AuthError::Response(_)));
    }
}
