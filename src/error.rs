//! # Error Types
//!
//! This module defines the crate-level error type. Each subsystem keeps its
//! own narrower error (`Gs1Error`, `RenderError`, `CatalogError`,
//! `AuthError`) and converts into [`ScanbookError`] at the edges.

use thiserror::Error;

use crate::auth::AuthError;
use crate::catalog::CatalogError;
use crate::gs1::Gs1Error;
use crate::symbol::RenderError;

/// Main error type for scanbook operations
#[derive(Debug, Error)]
pub enum ScanbookError {
    /// Symbol rendering failed after all fallbacks
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// GS1 strict validation rejected the field set
    #[error("GS1 error: {0}")]
    Gs1(#[from] Gs1Error),

    /// Catalog integrity error (duplicate SKU, invalid field)
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Login gate rejected the credentials
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Local key-value store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Bad command-line input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Server startup or runtime error
    #[error("Server error: {0}")]
    Server(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
