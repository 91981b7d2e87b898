//! `createAdminUser` HTTP function.
//!
//! Accepts `POST` with `{name, email, password}` and creates an admin
//! account. `OPTIONS` answers the CORS preflight; any other method is
//! rejected with 405.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use longeviva_core::NewAdmin;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::error::AppError;
use crate::services::AdminAccountError;
use crate::state::AppState;

/// Request body. Fields are kept as raw JSON: absent, `null` and
/// non-string values all count as missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateAdminRequest {
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub password: Option<Value>,
}

fn text(field: Option<&Value>) -> &str {
    field.and_then(Value::as_str).unwrap_or_default()
}

/// Success body.
#[derive(Debug, Serialize)]
pub struct CreateAdminResponse {
    pub message: &'static str,
    pub uid: String,
    pub email: String,
    pub name: String,
}

/// Handle any method on the function's path.
#[instrument(skip_all, fields(method = %method))]
pub async fn create_admin_user(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    match method {
        Method::POST => match create(&state, &body).await {
            Ok(response) => (StatusCode::OK, Json(response)).into_response(),
            Err(err) => err.into_response(),
        },
        Method::OPTIONS => StatusCode::NO_CONTENT.into_response(),
        other => {
            warn!(method = %other, "HTTP method not allowed");
            AppError::MethodNotAllowed.into_response()
        }
    }
}

async fn create(state: &AppState, body: &[u8]) -> Result<CreateAdminResponse, AppError> {
    let request: CreateAdminRequest = if body.is_empty() {
        CreateAdminRequest::default()
    } else {
        serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Corpo della richiesta non valido: {e}")))?
    };

    let admin = NewAdmin::validate(
        text(request.name.as_ref()),
        text(request.email.as_ref()),
        text(request.password.as_ref()),
    )
    .map_err(AdminAccountError::from)?;

    info!(email = %admin.email, "Creating admin");
    let created = state.accounts().create(&admin).await?;

    Ok(CreateAdminResponse {
        message: "Admin creato con successo!",
        uid: created.uid.into_inner(),
        email: created.email.into_inner(),
        name: created.name,
    })
}
