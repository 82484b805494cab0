//! Symbol backend status.

use axum::{Json, extract::State};
use std::sync::Arc;

use crate::symbol::Readiness;

use super::super::state::AppState;

/// GET /api/symbols/status - Current adapter readiness.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<Readiness> {
    Json(state.adapter.readiness())
}

/// POST /api/symbols/load - Load the backend if needed and wait for it.
pub async fn load(State(state): State<Arc<AppState>>) -> Json<Readiness> {
    Json(state.adapter.load().await)
}
