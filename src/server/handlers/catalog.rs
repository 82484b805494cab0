//! Catalog and scanbook handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use log::info;
use serde::Serialize;
use std::sync::Arc;

use crate::catalog::{CatalogItem, ImportReport, Scanbook};
use crate::render::render_sheet;
use crate::symbol::Symbology;

use super::super::state::AppState;
use super::{ApiError, ApiResult, png_response, require_user};

/// An item as the portal sees it.
#[derive(Debug, Serialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub custom: bool,
    pub effective_symbology: Symbology,
    /// Payload handed to the encoder
    pub payload: String,
    /// Human-readable form of the payload
    pub display: String,
}

impl ItemView {
    fn new(item: &CatalogItem, custom: bool) -> Self {
        Self {
            item: item.clone(),
            custom,
            effective_symbology: item.effective_symbology(),
            payload: item.payload(),
            display: item.display(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScanbookView {
    #[serde(flatten)]
    pub scanbook: Scanbook,
    pub items: Vec<ItemView>,
}

/// GET /api/items - Built-in and custom items.
pub async fn list_items(State(state): State<Arc<AppState>>) -> Json<Vec<ItemView>> {
    let catalog = state.catalog.read().await;
    let views = catalog
        .items()
        .map(|item| ItemView::new(item, catalog.is_custom(&item.sku)))
        .collect();
    Json(views)
}

/// POST /api/items - Add a custom item.
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(item): Json<CatalogItem>,
) -> ApiResult<(StatusCode, Json<ItemView>)> {
    let user = require_user(&state, &headers)?;
    let mut catalog = state.catalog.write().await;
    let sku = item.sku.trim().to_string();
    catalog.add_custom(item)?;
    state.save_custom(&catalog)?;
    info!("[catalog] {} added {}", user, sku);

    let item = catalog
        .find(&sku)
        .ok_or_else(|| ApiError::not_found(format!("SKU '{}' not found", sku)))?;
    Ok((StatusCode::CREATED, Json(ItemView::new(item, true))))
}

/// PUT /api/items/:sku - Replace a custom item.
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(sku): Path<String>,
    headers: HeaderMap,
    Json(item): Json<CatalogItem>,
) -> ApiResult<Json<ItemView>> {
    let user = require_user(&state, &headers)?;
    let mut catalog = state.catalog.write().await;
    let new_sku = item.sku.trim().to_string();
    catalog.update_custom(&sku, item)?;
    state.save_custom(&catalog)?;
    info!("[catalog] {} updated {}", user, sku);

    let item = catalog
        .find(&new_sku)
        .ok_or_else(|| ApiError::not_found(format!("SKU '{}' not found", new_sku)))?;
    Ok(Json(ItemView::new(item, true)))
}

/// DELETE /api/items/:sku - Remove a custom item.
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(sku): Path<String>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let user = require_user(&state, &headers)?;
    let mut catalog = state.catalog.write().await;
    catalog.remove_custom(&sku)?;
    state.save_custom(&catalog)?;
    info!("[catalog] {} removed {}", user, sku);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/items/import - Import a JSON array of items.
///
/// The body is read as text so a malformed document is reported as a
/// catalog error rather than a framework rejection.
pub async fn import_items(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<Json<ImportReport>> {
    let user = require_user(&state, &headers)?;
    let mut catalog = state.catalog.write().await;
    let report = catalog.import_json(&body)?;
    if !report.added.is_empty() {
        state.save_custom(&catalog)?;
    }
    info!(
        "[catalog] {} imported {} items ({} rejected)",
        user,
        report.added.len(),
        report.rejected.len()
    );
    Ok(Json(report))
}

/// GET /api/items/export - Custom items in import format.
pub async fn export_items(State(state): State<Arc<AppState>>) -> Json<Vec<CatalogItem>> {
    let catalog = state.catalog.read().await;
    Json(catalog.custom_items().to_vec())
}

/// GET /api/scanbooks - All scanbooks.
pub async fn list_scanbooks(State(state): State<Arc<AppState>>) -> Json<Vec<Scanbook>> {
    let catalog = state.catalog.read().await;
    Json(catalog.scanbooks().to_vec())
}

/// GET /api/scanbooks/:id - One scanbook with its items.
pub async fn scanbook(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ScanbookView>> {
    let catalog = state.catalog.read().await;
    let scanbook = catalog
        .scanbook(&id)
        .ok_or_else(|| ApiError::not_found(format!("No scanbook '{}'", id)))?
        .clone();
    let items = catalog
        .scanbook_items(&id)
        .unwrap_or_default()
        .into_iter()
        .map(|item| ItemView::new(item, catalog.is_custom(&item.sku)))
        .collect();
    Ok(Json(ScanbookView { scanbook, items }))
}

/// GET /api/scanbooks/:id/sheet.png - Every item of a scanbook on one page.
pub async fn sheet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let (title, items) = {
        let catalog = state.catalog.read().await;
        let scanbook = catalog
            .scanbook(&id)
            .ok_or_else(|| ApiError::not_found(format!("No scanbook '{}'", id)))?;
        let items: Vec<CatalogItem> = catalog
            .scanbook_items(&id)
            .unwrap_or_default()
            .into_iter()
            .cloned()
            .collect();
        (scanbook.title.clone(), items)
    };

    // Give the backend a chance to load so the sheet has real symbols
    state.adapter.load().await;

    let render_state = state.clone();
    let png = tokio::task::spawn_blocking(move || {
        let refs: Vec<&CatalogItem> = items.iter().collect();
        render_sheet(&title, &refs, &render_state.adapter, &render_state.settings).to_png()
    })
    .await
    .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Task error: {}", e)))??;

    Ok(png_response(png))
}
