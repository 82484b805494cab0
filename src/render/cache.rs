//! LRU cache of encoded barcode PNGs.
//!
//! Rendering is deterministic for a given symbology, payload and settings,
//! so the PNG bytes can be reused. Placeholders are never cached; once the
//! backend is ready the real symbol replaces them.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use super::RenderSettings;
use crate::symbol::Symbology;

/// Default number of PNGs kept.
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub symbology: Symbology,
    pub payload: String,
    pub settings: RenderSettings,
}

impl CacheKey {
    pub fn new(symbology: Symbology, payload: impl Into<String>, settings: RenderSettings) -> Self {
        Self {
            symbology,
            payload: payload.into(),
            settings,
        }
    }
}

#[derive(Debug)]
pub struct SymbolCache {
    capacity: usize,
    entries: HashMap<CacheKey, Arc<Vec<u8>>>,
    /// Least recently used at the front
    order: VecDeque<CacheKey>,
    hits: u64,
    misses: u64,
}

impl Default for SymbolCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SymbolCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<Vec<u8>>> {
        match self.entries.get(key) {
            Some(png) => {
                let png = Arc::clone(png);
                self.touch(key);
                self.hits += 1;
                Some(png)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: CacheKey, png: Arc<Vec<u8>>) {
        if self.entries.insert(key.clone(), png).is_some() {
            self.touch(&key);
            return;
        }
        self.order.push_back(key);
        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses)
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    fn touch(&mut self, key: &CacheKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }
}
