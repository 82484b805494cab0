//! # Rendering Module
//!
//! Turns catalog items into pixels.
//!
//! ## Modules
//!
//! - [`raster`]: 1-bit canvas with PNG output
//! - [`font`]: Bitmap glyphs for human-readable text
//! - [`cache`]: LRU cache of encoded PNGs
//! - [`sheet`]: A whole scanbook on one page
//!
//! ## Usage Example
//!
//! ```
//! use scanbook::catalog::CatalogItem;
//! use scanbook::render::{self, RenderSettings};
//! use scanbook::symbol::SymbolAdapter;
//!
//! let adapter = SymbolAdapter::builtin();
//! let item = CatalogItem::new("Cola", "049000000443");
//!
//! // Linear items never touch the adapter
//! let barcode = render::render_item(&item, &adapter, &RenderSettings::default());
//! assert!(!barcode.is_placeholder());
//! let png = barcode.raster.to_png().unwrap();
//! assert_eq!(&png[1..4], b"PNG");
//! ```

pub mod cache;
pub mod font;
pub mod raster;
pub mod sheet;

pub use cache::{CacheKey, SymbolCache};
pub use raster::Raster;
pub use sheet::render_sheet;

use serde::Serialize;

use crate::catalog::CatalogItem;
use crate::symbol::{
    Attempt, LinearOptions, RenderError, RenderOptions, RenderedSymbol, SymbolAdapter, Symbology,
    linear,
};

/// Options for both symbol families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderSettings {
    pub linear: LinearOptions,
    pub symbol: RenderOptions,
}

/// How a barcode image came to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    Rendered(Attempt),
    /// A labeled placeholder was drawn; carries the reason
    Placeholder(String),
}

/// A rendered item barcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemBarcode {
    pub raster: Raster,
    pub symbology: Symbology,
    /// The payload the item asked for
    pub payload: String,
    /// Human-readable text shown with the symbol
    pub text: Option<String>,
    pub outcome: Outcome,
}

impl ItemBarcode {
    pub fn is_placeholder(&self) -> bool {
        matches!(self.outcome, Outcome::Placeholder(_))
    }
}

/// Render a catalog item's barcode. GS1 items go to the adapter as
/// element strings.
pub fn render_item(
    item: &CatalogItem,
    adapter: &SymbolAdapter,
    settings: &RenderSettings,
) -> ItemBarcode {
    let symbology = item.effective_symbology();
    match (symbology.matrix(), item.element()) {
        (Some(matrix), Some(element)) => {
            let options = RenderOptions {
                gs1: true,
                ..settings.symbol
            };
            let result = adapter.render_element_or_placeholder(matrix, &element, &options);
            item_barcode(symbology, item.payload(), result)
        }
        _ => render_payload(symbology, &item.payload(), adapter, settings),
    }
}

/// Render any payload. Linear symbols are drawn directly; everything else
/// goes through the adapter and falls back to a placeholder.
pub fn render_payload(
    symbology: Symbology,
    payload: &str,
    adapter: &SymbolAdapter,
    settings: &RenderSettings,
) -> ItemBarcode {
    let Some(matrix) = symbology.matrix() else {
        let symbol = linear::encode_with(payload, &settings.linear);
        return ItemBarcode {
            raster: symbol.rasterize(),
            symbology,
            payload: payload.to_string(),
            text: Some(symbol.display_text),
            outcome: Outcome::Rendered(Attempt::Primary),
        };
    };

    let options = RenderOptions {
        gs1: symbology.is_gs1(),
        ..settings.symbol
    };
    let result = adapter.render_or_placeholder(matrix, payload, &options);
    item_barcode(symbology, payload.to_string(), result)
}

fn item_barcode(
    symbology: Symbology,
    payload: String,
    result: Result<RenderedSymbol, (RenderError, Raster)>,
) -> ItemBarcode {
    match result {
        Ok(rendered) => ItemBarcode {
            raster: rendered.raster,
            symbology,
            payload,
            text: rendered.text,
            outcome: Outcome::Rendered(rendered.attempt),
        },
        Err((error, raster)) => ItemBarcode {
            raster,
            symbology,
            payload,
            text: None,
            outcome: Outcome::Placeholder(error.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gs1::Gs1Fields;
    use crate::symbol::BuiltinBackend;
    use std::sync::Arc;

    #[test]
    fn test_linear_item_width() {
        let adapter = SymbolAdapter::builtin();
        let item = CatalogItem::new("Soup", "05100006007");
        let barcode = render_item(&item, &adapter, &RenderSettings::default());
        assert_eq!(barcode.raster.width(), 282);
        assert_eq!(barcode.text.as_deref(), Some("05100006007"));
    }

    #[test]
    fn test_unloaded_adapter_gives_placeholder() {
        let adapter = SymbolAdapter::builtin();
        let item = CatalogItem::new("Milk", "070470000329").gs1(Gs1Fields {
            batch: Some("L1".into()),
            ..Default::default()
        });
        let barcode = render_item(&item, &adapter, &RenderSettings::default());
        assert!(barcode.is_placeholder());
        assert!(barcode.raster.width() >= 160);
    }

    #[test]
    fn test_gs1_item_renders_with_text() {
        let adapter = SymbolAdapter::with_backend(Arc::new(BuiltinBackend));
        let item = CatalogItem::new("Milk", "070470000329")
            .symbology(Symbology::Gs1Qr)
            .gs1(Gs1Fields {
                best_before_date: Some("2026-10-25".into()),
                ..Default::default()
            });
        let barcode = render_item(&item, &adapter, &RenderSettings::default());
        assert_eq!(barcode.outcome, Outcome::Rendered(Attempt::Primary));
        assert_eq!(
            barcode.text.as_deref(),
            Some("(01)00070470000329(15)261025")
        );
    }

    #[test]
    fn test_gs1_batch_containing_ai_digits() {
        let adapter = SymbolAdapter::with_backend(Arc::new(BuiltinBackend));
        let item = CatalogItem::new("Ham", "DELI-HAM")
            .symbology(Symbology::Gs1Qr)
            .gs1(Gs1Fields {
                gtin: Some("00049000000443".into()),
                batch: Some("B2101".into()),
                serial: Some("S1".into()),
                ..Default::default()
            });
        let barcode = render_item(&item, &adapter, &RenderSettings::default());
        assert_eq!(barcode.outcome, Outcome::Rendered(Attempt::Primary));
        assert_eq!(
            barcode.text.as_deref(),
            Some("(01)00049000000443(10)B2101(21)S1")
        );
        assert_eq!(barcode.payload, "010004900000044310B2101\u{1d}21S1");
    }

    #[test]
    fn test_gs1_datamatrix_retries_digits_only() {
        let adapter = SymbolAdapter::with_backend(Arc::new(BuiltinBackend));
        let item = CatalogItem::new("Milk", "070470000329").gs1(Gs1Fields {
            best_before_date: Some("2026-10-25".into()),
            ..Default::default()
        });
        let barcode = render_item(&item, &adapter, &RenderSettings::default());
        assert_eq!(barcode.outcome, Outcome::Rendered(Attempt::DigitsOnly));
        assert_eq!(barcode.text.as_deref(), Some("010007047000032915261025"));
    }

    #[test]
    fn test_same_item_same_png() {
        let adapter = SymbolAdapter::with_backend(Arc::new(BuiltinBackend));
        let settings = RenderSettings::default();
        for item in [
            CatalogItem::new("Cola", "049000000443"),
            CatalogItem::new("Coupon", "CPN-1").symbology(Symbology::Code128),
        ] {
            let a = render_item(&item, &adapter, &settings).raster.to_png().unwrap();
            let b = render_item(&item, &adapter, &settings).raster.to_png().unwrap();
            assert_eq!(a, b);
        }
    }
}
