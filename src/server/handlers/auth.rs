//! Login handlers.

use axum::{Json, extract::State, http::StatusCode};
use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{self, Session};

use super::super::state::AppState;
use super::ApiResult;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginInfo {
    pub last_username: Option<String>,
}

/// GET /api/login - The username to prefill.
pub async fn info(State(state): State<Arc<AppState>>) -> ApiResult<Json<LoginInfo>> {
    let last_username = auth::last_username(state.store.as_ref())?;
    Ok(Json(LoginInfo { last_username }))
}

/// POST /api/login - Check credentials and remember the username.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(form): Json<LoginForm>,
) -> ApiResult<Json<Session>> {
    let session = state.gate.authenticate(&form.username, &form.password)?;
    if let Err(e) = auth::remember(state.store.as_ref(), &session) {
        // Signing in still works without the prefill
        warn!("[auth] Could not remember username: {}", e);
    }
    Ok(Json(session))
}

/// POST /api/logout - Nothing is held server-side; the username stays
/// remembered for the next sign-in.
pub async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}
