//! Server state and configuration.

use log::{info, warn};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

use crate::auth::LoginGate;
use crate::catalog::{Catalog, CatalogItem};
use crate::error::ScanbookError;
use crate::render::{RenderSettings, SymbolCache};
use crate::store::{CUSTOM_ITEMS_KEY, JsonStore, KvStore, KvStoreExt, MemoryStore};
use crate::symbol::SymbolAdapter;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Where custom items and the remembered username are kept.
    /// `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub catalog: RwLock<Catalog>,
    pub adapter: Arc<SymbolAdapter>,
    pub cache: Mutex<SymbolCache>,
    pub store: Arc<dyn KvStore>,
    pub gate: LoginGate,
    pub settings: RenderSettings,
    /// Unix timestamp of server boot for cache busting.
    pub boot_time: u64,
}

impl AppState {
    /// State backed by the configured store and the built-in symbol backend.
    pub fn new(config: ServerConfig) -> Result<Self, ScanbookError> {
        let store: Arc<dyn KvStore> = match &config.data_dir {
            Some(dir) => Arc::new(JsonStore::open(dir)?),
            None => Arc::new(MemoryStore::new()),
        };
        Self::with_parts(config, store, Arc::new(SymbolAdapter::builtin()))
    }

    /// State over an explicit store and adapter. Saved custom items are
    /// loaded from the store.
    pub fn with_parts(
        config: ServerConfig,
        store: Arc<dyn KvStore>,
        adapter: Arc<SymbolAdapter>,
    ) -> Result<Self, ScanbookError> {
        let saved: Vec<CatalogItem> = store.get_list(CUSTOM_ITEMS_KEY).unwrap_or_else(|e| {
            warn!("[store] Could not read saved items: {}", e);
            Vec::new()
        });
        if !saved.is_empty() {
            info!("[catalog] Loaded {} custom items", saved.len());
        }

        let boot_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        Ok(Self {
            config,
            catalog: RwLock::new(Catalog::with_custom(saved)),
            adapter,
            cache: Mutex::new(SymbolCache::default()),
            store,
            gate: LoginGate::builtin(),
            settings: RenderSettings::default(),
            boot_time,
        })
    }

    /// Write the custom items back to the store.
    pub fn save_custom(&self, catalog: &Catalog) -> Result<(), ScanbookError> {
        self.store.set_list(CUSTOM_ITEMS_KEY, catalog.custom_items())
    }
}
