//! Item barcode images.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use log::{debug, warn};
use std::sync::Arc;

use crate::render::{CacheKey, render_item};

use super::super::state::AppState;
use super::{ApiError, ApiResult, png_response};

/// GET /api/items/:sku/barcode.png - The item's barcode.
///
/// Never waits for the symbol backend: until it is ready, 2D items come
/// back as a "loading..." placeholder, which is not cached.
pub async fn barcode_png(
    State(state): State<Arc<AppState>>,
    Path(sku): Path<String>,
) -> ApiResult<Response> {
    let item = {
        let catalog = state.catalog.read().await;
        catalog
            .find(&sku)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("SKU '{}' not found", sku)))?
    };

    let key = CacheKey::new(item.effective_symbology(), item.payload(), state.settings);
    if let Some(png) = lock_cache(&state)?.get(&key) {
        debug!("[cache] Hit for {}", sku);
        return Ok(png_response(png.as_ref().clone()));
    }

    let render_state = state.clone();
    let (barcode, png) = tokio::task::spawn_blocking(move || {
        let barcode = render_item(&item, &render_state.adapter, &render_state.settings);
        let png = barcode.raster.to_png();
        png.map(|png| (barcode, png))
    })
    .await
    .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Task error: {}", e)))??;

    if barcode.is_placeholder() {
        warn!("[symbols] Placeholder for {}: {:?}", sku, barcode.outcome);
    } else {
        lock_cache(&state)?.insert(key, Arc::new(png.clone()));
    }
    Ok(png_response(png))
}

fn lock_cache(state: &AppState) -> ApiResult<std::sync::MutexGuard<'_, crate::render::SymbolCache>> {
    state
        .cache
        .lock()
        .map_err(|_| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "cache lock poisoned"))
}
