//! # Scanbook - Barcode Sheets for Retail POS Testing
//!
//! Scanbook renders the barcodes a point-of-sale tester needs to ring up a
//! scenario: packaged goods, weighed produce, dated perishables, coupons and
//! receipts. It provides:
//!
//! - **Linear symbols**: a deterministic numeric bar encoder
//! - **GS1 element strings**: build, validate and parse AI element strings
//! - **2D symbols**: DataMatrix, QR, Code128 and PDF417 through a lazily
//!   loaded backend with a two-step fallback
//! - **Portal**: catalog, scanbooks and barcode images over HTTP
//!
//! ## Quick Start
//!
//! ```
//! use scanbook::gs1::{self, Gs1Fields};
//! use scanbook::symbol::linear;
//!
//! // Linear symbol for a UPC-style SKU
//! let symbol = linear::encode("05100006007", 80);
//! assert_eq!(symbol.width(), 282);
//! let png = symbol.rasterize().to_png()?;
//! assert!(!png.is_empty());
//!
//! // GS1 element string for a dated item
//! let fields = Gs1Fields {
//!     gtin: Some("00049000000443".into()),
//!     batch: Some("L42".into()),
//!     ..Default::default()
//! };
//! assert_eq!(gs1::build(&fields).to_display(), "(01)00049000000443(10)L42");
//!
//! # Ok::<(), scanbook::ScanbookError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`symbol`] | Linear encoder and the 2D symbol adapter |
//! | [`gs1`] | GS1 element string codec |
//! | [`render`] | Raster canvas, PNG cache and sheets |
//! | [`catalog`] | Scanbooks, built-in and custom items |
//! | [`auth`] | Login gate |
//! | [`store`] | Key-value persistence |
//! | [`server`] | HTTP portal |
//! | [`error`] | Error types |

pub mod auth;
pub mod catalog;
pub mod error;
pub mod gs1;
pub mod render;
pub mod server;
pub mod store;
pub mod symbol;

// Re-exports for convenience
pub use error::ScanbookError;
