//! HTTP handlers for the server.

pub mod auth;
pub mod barcode;
pub mod catalog;
pub mod gs1;
pub mod symbols;

use axum::{
    Json,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::auth::AuthError;
use crate::catalog::CatalogError;
use crate::error::ScanbookError;

use super::state::AppState;

/// Header naming the signed-in tester on mutating requests.
pub const USER_HEADER: &str = "x-scanbook-user";

/// JSON error body with a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "success": false, "error": self.message })),
        )
            .into_response()
    }
}

impl From<ScanbookError> for ApiError {
    fn from(err: ScanbookError) -> Self {
        let status = match &err {
            ScanbookError::Catalog(CatalogError::DuplicateSku(_)) => StatusCode::CONFLICT,
            ScanbookError::Catalog(CatalogError::UnknownSku(_)) => StatusCode::NOT_FOUND,
            ScanbookError::Catalog(CatalogError::ReadOnly(_)) => StatusCode::FORBIDDEN,
            ScanbookError::Catalog(_) | ScanbookError::Gs1(_) | ScanbookError::Json(_) => {
                StatusCode::BAD_REQUEST
            }
            ScanbookError::Auth(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ScanbookError::from(err).into()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ScanbookError::from(err).into()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The tester named by the user header, if it is a known account.
pub fn require_user(state: &AppState, headers: &HeaderMap) -> ApiResult<String> {
    let user = headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|u| !u.is_empty());

    match user {
        Some(user) if state.gate.is_known(user) => Ok(user.to_string()),
        _ => Err(ApiError::new(StatusCode::UNAUTHORIZED, "sign in first")),
    }
}

/// PNG response.
pub fn png_response(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "image/png")], bytes).into_response()
}
