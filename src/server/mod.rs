//! # HTTP Server for the Scanbook Portal
//!
//! Serves the portal page, the catalog API and barcode images.
//!
//! ## Usage
//!
//! ```bash
//! scanbook serve --listen 0.0.0.0:8080 --data-dir ./scanbook-data
//! ```
//!
//! Then open http://localhost:8080 in a browser.
//!
//! The symbol backend starts loading in the background at boot. Until it is
//! ready, 2D barcodes are served as placeholders and linear barcodes render
//! normally.

mod handlers;
mod state;
mod static_files;

pub use handlers::USER_HEADER;
pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    routing::{get, post, put},
};
use log::info;
use std::sync::Arc;

use crate::error::ScanbookError;

/// Build the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Frontend
        .route("/", get(static_files::index_handler))
        // Login
        .route(
            "/api/login",
            get(handlers::auth::info).post(handlers::auth::login),
        )
        .route("/api/logout", post(handlers::auth::logout))
        // Scanbooks
        .route("/api/scanbooks", get(handlers::catalog::list_scanbooks))
        .route("/api/scanbooks/:id", get(handlers::catalog::scanbook))
        .route("/api/scanbooks/:id/sheet.png", get(handlers::catalog::sheet))
        // Items
        .route(
            "/api/items",
            get(handlers::catalog::list_items).post(handlers::catalog::create_item),
        )
        .route("/api/items/import", post(handlers::catalog::import_items))
        .route("/api/items/export", get(handlers::catalog::export_items))
        .route(
            "/api/items/:sku",
            put(handlers::catalog::update_item).delete(handlers::catalog::delete_item),
        )
        .route(
            "/api/items/:sku/barcode.png",
            get(handlers::barcode::barcode_png),
        )
        // GS1
        .route("/api/gs1/preview", post(handlers::gs1::preview))
        .route("/api/gs1/parse", post(handlers::gs1::parse))
        // Symbol backend
        .route("/api/symbols/status", get(handlers::symbols::status))
        .route("/api/symbols/load", post(handlers::symbols::load))
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use scanbook::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), scanbook::ScanbookError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     data_dir: None,
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), ScanbookError> {
    let app_state = Arc::new(AppState::new(config.clone())?);

    // Load the symbol backend without holding up startup
    let adapter = app_state.adapter.clone();
    tokio::spawn(async move {
        adapter.load().await;
    });

    let app = router(app_state);

    info!("Scanbook HTTP server starting...");
    info!("Listening on: {}", config.listen_addr);
    match &config.data_dir {
        Some(dir) => info!("Data directory: {}", dir.display()),
        None => info!("No data directory; custom items are kept in memory"),
    }
    info!("Open http://{}/ in your browser", config.listen_addr);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            ScanbookError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ScanbookError::Server(format!("Server error: {}", e)))?;

    Ok(())
}
