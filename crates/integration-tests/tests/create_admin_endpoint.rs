//! Integration tests for the `createAdminUser` HTTP function.
//!
//! Requests go through the full router (CORS headers included) via
//! `tower::ServiceExt::oneshot`; no socket is opened.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use longeviva_admin::firebase::{IdentityProvider, InMemoryFirebase};
use longeviva_admin::routes;
use longeviva_integration_tests::{in_memory_state, state_over};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, json)
}

fn mario() -> Value {
    json!({
        "name": "  Mario Rossi ",
        "email": " mario@longeviva.it ",
        "password": "password123"
    })
}

#[tokio::test]
async fn test_valid_request_creates_admin() {
    let (firebase, state) = in_memory_state();

    let (status, headers, body) = send(
        routes::app(state),
        Method::POST,
        "/createAdminUser",
        Some(mario()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Admin creato con successo!");
    assert_eq!(body["email"], "mario@longeviva.it");
    assert_eq!(body["name"], "Mario Rossi");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let uid = body["uid"].as_str().unwrap();
    let user = firebase.get_user_by_email("mario@longeviva.it").await.unwrap();
    assert_eq!(user.uid.as_str(), uid);
    assert!(user.is_admin());
    assert_eq!(firebase.document_count().await, 2);
}

#[tokio::test]
async fn test_root_path_serves_the_same_function() {
    let (_firebase, state) = in_memory_state();

    let (status, _, body) = send(routes::app(state), Method::POST, "/", Some(mario())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["uid"].is_string());
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let (_firebase, state) = in_memory_state();
    let app = routes::app(state);

    let (first, _, _) = send(app.clone(), Method::POST, "/createAdminUser", Some(mario())).await;
    assert_eq!(first, StatusCode::OK);

    let (status, headers, body) = send(app, Method::POST, "/createAdminUser", Some(mario())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"],
        "L'email specificata è già registrata nel sistema."
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_validation_errors_are_bad_request_without_remote_calls() {
    let (firebase, state) = in_memory_state();
    let app = routes::app(state);

    let cases = [
        (
            json!({"name": "Mario", "email": "mario@longeviva.it"}),
            "Tutti i campi (nome, email, password) sono obbligatori",
        ),
        (
            json!({"name": "Mario", "email": "mario@longeviva.it", "password": "short"}),
            "La password deve essere almeno 8 caratteri",
        ),
        (
            json!({"name": "Mario", "email": "mario.longeviva.it", "password": "password123"}),
            "Email non valida",
        ),
        (
            json!({"name": null, "email": "mario@longeviva.it", "password": "password123"}),
            "Tutti i campi (nome, email, password) sono obbligatori",
        ),
        (
            json!({"name": "Mario", "email": "mario@longeviva.it", "password": 12_345_678}),
            "Tutti i campi (nome, email, password) sono obbligatori",
        ),
        (
            json!({}),
            "Tutti i campi (nome, email, password) sono obbligatori",
        ),
    ];

    for (request, message) in cases {
        let (status, _, body) =
            send(app.clone(), Method::POST, "/createAdminUser", Some(request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], message);
    }

    assert_eq!(firebase.remote_calls().await, 0);
}

#[tokio::test]
async fn test_null_name_is_missing_field() {
    let (firebase, state) = in_memory_state();

    let (status, _, body) = send(
        routes::app(state),
        Method::POST,
        "/createAdminUser",
        Some(json!({"name": null, "email": "m@l.it", "password": "password123"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Tutti i campi (nome, email, password) sono obbligatori"
    );
    assert_eq!(firebase.remote_calls().await, 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (firebase, state) = in_memory_state();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/createAdminUser")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = routes::app(state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(firebase.remote_calls().await, 0);
}

#[tokio::test]
async fn test_disabled_sign_in_method_is_forbidden() {
    let (_firebase, state) = state_over(InMemoryFirebase::new().without_password_sign_in());

    let (status, _, body) = send(
        routes::app(state),
        Method::POST,
        "/createAdminUser",
        Some(mario()),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let firebase = InMemoryFirebase::new();
    firebase.fail_commits(true).await;
    let (firebase, state) = state_over(firebase);

    let (status, _, body) = send(
        routes::app(state),
        Method::POST,
        "/createAdminUser",
        Some(mario()),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("Errore Firestore"));
    // No compensation on the endpoint
    assert_eq!(firebase.user_count().await, 1);
}

#[tokio::test]
async fn test_preflight_is_no_content_with_cors_headers() {
    let (firebase, state) = in_memory_state();

    let (status, headers, body) =
        send(routes::app(state), Method::OPTIONS, "/createAdminUser", None).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    assert_eq!(firebase.remote_calls().await, 0);
}

#[tokio::test]
async fn test_other_methods_are_not_allowed() {
    let (firebase, state) = in_memory_state();
    let app = routes::app(state);

    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let (status, headers, body) = send(app.clone(), method, "/createAdminUser", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "Metodo non consentito. Usa POST.");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    assert_eq!(firebase.remote_calls().await, 0);
}

#[tokio::test]
async fn test_health_check() {
    let (_firebase, state) = in_memory_state();

    let response = routes::app(state)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
