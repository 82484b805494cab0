//! GS1 element string preview and parsing.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::gs1::{self, Gs1Fields, Segment};

use super::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(flatten)]
    pub fields: Gs1Fields,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    /// Lenient element string, no separators
    pub element: String,
    /// Human-readable form
    pub display: String,
    pub segments: Vec<Segment>,
    /// Why strict validation would reject these fields, if it would
    pub strict_error: Option<String>,
}

/// POST /api/gs1/preview - Build an element string from editor fields.
pub async fn preview(Json(req): Json<PreviewRequest>) -> Json<PreviewResponse> {
    let element = gs1::build(&req.fields);
    let strict_error = gs1::build_strict(&req.fields).err().map(|e| e.to_string());
    Json(PreviewResponse {
        element: element.to_string(),
        display: element.to_display(),
        segments: element.segments().to_vec(),
        strict_error,
    })
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub input: String,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub display: String,
    pub segments: Vec<Segment>,
    pub fields: Gs1Fields,
}

/// POST /api/gs1/parse - Split a scanned element string back into fields.
pub async fn parse(Json(req): Json<ParseRequest>) -> ApiResult<Json<ParseResponse>> {
    let element = gs1::parse(&req.input)
        .map_err(|e| ApiError::new(axum::http::StatusCode::BAD_REQUEST, e.to_string()))?;
    let today = chrono::Local::now().date_naive();
    Ok(Json(ParseResponse {
        display: element.to_display(),
        segments: element.segments().to_vec(),
        fields: Gs1Fields::from_element(&element, today),
    }))
}
