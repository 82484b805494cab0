//! Printable scanbook sheet: title, then one labeled barcode per item.
//!
//! Items are rendered in parallel and stacked in catalog order.

use rayon::prelude::*;

use super::font::GLYPH_HEIGHT;
use super::{ItemBarcode, Raster, RenderSettings, render_item};
use crate::catalog::CatalogItem;
use crate::symbol::SymbolAdapter;

const MARGIN: usize = 16;
const ITEM_GAP: usize = 24;
const LABEL_GAP: usize = 4;

/// Lay out a sheet for `items`.
pub fn render_sheet(
    title: &str,
    items: &[&CatalogItem],
    adapter: &SymbolAdapter,
    settings: &RenderSettings,
) -> Raster {
    let barcodes: Vec<ItemBarcode> = items
        .par_iter()
        .map(|item| render_item(item, adapter, settings))
        .collect();

    let labels: Vec<String> = items
        .iter()
        .map(|item| format!("{}  [{}]", item.name, item.sku))
        .collect();

    let content_width = barcodes
        .iter()
        .map(|b| b.raster.width())
        .chain(labels.iter().map(|l| super::font::text_width(l)))
        .chain(std::iter::once(super::font::text_width(title)))
        .max()
        .unwrap_or(0);
    let width = content_width + 2 * MARGIN;

    let height = MARGIN
        + GLYPH_HEIGHT
        + ITEM_GAP
        + barcodes
            .iter()
            .map(|b| GLYPH_HEIGHT + LABEL_GAP + b.raster.height() + ITEM_GAP)
            .sum::<usize>()
        + MARGIN;

    let mut sheet = Raster::new(width, height);
    sheet.draw_text(MARGIN, MARGIN, title);
    let mut y = MARGIN + GLYPH_HEIGHT;
    sheet.fill_rect(MARGIN, y + 4, content_width, 1);
    y += ITEM_GAP;

    for (label, barcode) in labels.iter().zip(&barcodes) {
        sheet.draw_text(MARGIN, y, label);
        y += GLYPH_HEIGHT + LABEL_GAP;
        sheet.blit(&barcode.raster, MARGIN, y);
        y += barcode.raster.height() + ITEM_GAP;
    }

    sheet
}
