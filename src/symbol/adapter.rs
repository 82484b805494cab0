//! # Symbol Adapter
//!
//! Front door for 2D and alphanumeric symbols. The adapter owns the backend's
//! lifecycle and the fallback policy; the geometry itself comes from a
//! [`SymbolBackend`].
//!
//! ## Readiness
//!
//! ```text
//! Unloaded ──load()──▶ Loading ──ok──▶ Ready
//!                         │
//!                         └──err──▶ Failed   (not retried)
//! ```
//!
//! The state is published on a `tokio::sync::watch` channel, so callers can
//! poll [`SymbolAdapter::readiness`] or [`subscribe`](SymbolAdapter::subscribe)
//! to changes. [`render`](SymbolAdapter::render) never runs against a backend
//! that isn't ready; [`render_when_ready`](SymbolAdapter::render_when_ready)
//! waits for loading to settle first.
//!
//! ## Fallback
//!
//! 1. Render the payload as given (GS1 payloads with GS separators and GS1
//!    framing).
//! 2. On error, retry once with the payload reduced to its digits, unframed.
//! 3. On a second error, return [`RenderError::Failed`], which carries what a
//!    caller needs to draw a labeled placeholder.

use log::{debug, info, warn};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tokio::sync::watch;

use super::MatrixSymbology;
use super::backend::{BackendError, BackendLoader, BuiltinLoader, Framing, ModuleGrid, SymbolBackend};
use crate::gs1::{self, ElementString};
use crate::render::Raster;
use crate::render::font::{GLYPH_HEIGHT, text_width};

/// Lifecycle of the symbol backend.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "state", content = "error", rename_all = "snake_case")]
pub enum Readiness {
    Unloaded,
    Loading,
    Ready,
    Failed(String),
}

impl Readiness {
    fn is_settled(&self) -> bool {
        matches!(self, Readiness::Ready | Readiness::Failed(_))
    }
}

/// Output options for adapter renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderOptions {
    /// Pixels per module
    pub scale: usize,
    /// White border around the symbol, in pixels
    pub padding: usize,
    /// Print the human-readable text under the symbol
    pub include_text: bool,
    /// The payload is a GS1 element string
    pub gs1: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 4,
            padding: 16,
            include_text: true,
            gs1: false,
        }
    }
}

impl RenderOptions {
    pub fn gs1() -> Self {
        Self {
            gs1: true,
            ..Default::default()
        }
    }
}

/// Which rendering attempt produced the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attempt {
    /// The payload as given
    Primary,
    /// Digits-only retry after the primary attempt failed
    DigitsOnly,
}

/// A successfully rendered symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSymbol {
    pub raster: Raster,
    /// Text printed under the symbol, if any
    pub text: Option<String>,
    /// The payload actually handed to the backend
    pub encoded: String,
    pub attempt: Attempt,
}

/// Render failures the caller has to handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("symbol backend is not ready ({0:?})")]
    NotReady(Readiness),

    #[error("{symbology} render of '{payload}' failed: {reason}")]
    Failed {
        symbology: MatrixSymbology,
        payload: String,
        reason: String,
    },
}

impl RenderError {
    /// Lines for a textual placeholder in place of the symbol.
    pub fn placeholder_lines(&self, symbology: MatrixSymbology, payload: &str) -> Vec<String> {
        match self {
            RenderError::NotReady(Readiness::Loading | Readiness::Unloaded) => {
                vec![symbology.to_string(), "loading...".to_string()]
            }
            RenderError::NotReady(_) => vec![symbology.to_string(), payload.to_string()],
            RenderError::Failed {
                symbology, payload, ..
            } => vec![symbology.to_string(), payload.clone()],
        }
    }
}

/// Lazily loaded symbol backend with fallback rendering.
pub struct SymbolAdapter {
    loader: Box<dyn BackendLoader>,
    backend: OnceLock<Arc<dyn SymbolBackend>>,
    readiness: watch::Sender<Readiness>,
}

impl SymbolAdapter {
    /// Adapter that will load `loader`'s backend on first use.
    pub fn new(loader: impl BackendLoader + 'static) -> Self {
        let (readiness, _) = watch::channel(Readiness::Unloaded);
        Self {
            loader: Box::new(loader),
            backend: OnceLock::new(),
            readiness,
        }
    }

    /// Adapter over the built-in crate backends.
    pub fn builtin() -> Self {
        Self::new(BuiltinLoader)
    }

    /// Adapter that starts out ready with the given backend.
    pub fn with_backend(backend: Arc<dyn SymbolBackend>) -> Self {
        let adapter = Self::new(BuiltinLoader);
        let _ = adapter.backend.set(backend);
        adapter.readiness.send_replace(Readiness::Ready);
        adapter
    }

    /// Current readiness.
    pub fn readiness(&self) -> Readiness {
        self.readiness.borrow().clone()
    }

    /// Watch readiness changes.
    pub fn subscribe(&self) -> watch::Receiver<Readiness> {
        self.readiness.subscribe()
    }

    /// Load the backend if nobody has yet, then wait for loading to settle.
    ///
    /// Only the first call runs the loader. A failed load stays failed.
    pub async fn load(&self) -> Readiness {
        let claimed = self.readiness.send_if_modified(|state| {
            if *state == Readiness::Unloaded {
                *state = Readiness::Loading;
                true
            } else {
                false
            }
        });

        if !claimed {
            return self.settled().await;
        }

        info!("[symbols] Loading symbol backend...");
        match self.loader.load().await {
            Ok(backend) => {
                let _ = self.backend.set(backend);
                self.readiness.send_replace(Readiness::Ready);
                info!("[symbols] Symbol backend ready");
            }
            Err(e) => {
                warn!("[symbols] Symbol backend failed to load: {}", e);
                self.readiness.send_replace(Readiness::Failed(e.to_string()));
            }
        }
        self.readiness()
    }

    async fn settled(&self) -> Readiness {
        let mut rx = self.readiness.subscribe();
        match rx.wait_for(Readiness::is_settled).await {
            Ok(state) => (*state).clone(),
            Err(_) => self.readiness(),
        }
    }

    /// Render now, or report [`RenderError::NotReady`].
    pub fn render(
        &self,
        symbology: MatrixSymbology,
        payload: &str,
        options: &RenderOptions,
    ) -> Result<RenderedSymbol, RenderError> {
        let backend = self.ready_backend()?;
        render_with_fallback(backend.as_ref(), symbology, payload, options)
    }

    /// Render a GS1 element string, keeping its field boundaries.
    pub fn render_element(
        &self,
        symbology: MatrixSymbology,
        element: &ElementString,
        options: &RenderOptions,
    ) -> Result<RenderedSymbol, RenderError> {
        let backend = self.ready_backend()?;
        render_element_with_fallback(backend.as_ref(), symbology, element, options)
    }

    // The backend cell is only filled once loading succeeded
    fn ready_backend(&self) -> Result<&Arc<dyn SymbolBackend>, RenderError> {
        self.backend
            .get()
            .ok_or_else(|| RenderError::NotReady(self.readiness()))
    }

    /// Load if needed, wait for readiness, then render.
    pub async fn render_when_ready(
        &self,
        symbology: MatrixSymbology,
        payload: &str,
        options: &RenderOptions,
    ) -> Result<RenderedSymbol, RenderError> {
        self.load().await;
        self.render(symbology, payload, options)
    }

    /// Render, drawing a labeled placeholder instead of failing.
    pub fn render_or_placeholder(
        &self,
        symbology: MatrixSymbology,
        payload: &str,
        options: &RenderOptions,
    ) -> Result<RenderedSymbol, (RenderError, Raster)> {
        self.render(symbology, payload, options)
            .map_err(|e| with_placeholder(e, symbology, payload))
    }

    /// [`render_element`](Self::render_element) with a placeholder on failure.
    pub fn render_element_or_placeholder(
        &self,
        symbology: MatrixSymbology,
        element: &ElementString,
        options: &RenderOptions,
    ) -> Result<RenderedSymbol, (RenderError, Raster)> {
        self.render_element(symbology, element, options)
            .map_err(|e| with_placeholder(e, symbology, &element.to_display()))
    }
}

fn with_placeholder(
    error: RenderError,
    symbology: MatrixSymbology,
    label: &str,
) -> (RenderError, Raster) {
    let lines = error.placeholder_lines(symbology, label);
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    (error, Raster::placeholder(&refs))
}

/// Two-tier render: the payload as given, then digits only.
///
/// With `options.gs1`, the payload is parsed as an element string first.
/// Raw input without GS separators is split at the earliest valid field
/// boundary; callers holding an [`ElementString`] should use
/// [`render_element_with_fallback`] instead.
pub fn render_with_fallback(
    backend: &dyn SymbolBackend,
    symbology: MatrixSymbology,
    payload: &str,
    options: &RenderOptions,
) -> Result<RenderedSymbol, RenderError> {
    if !options.gs1 {
        return attempt_both(
            backend,
            symbology,
            payload,
            (payload.to_string(), Framing::Plain),
            payload.to_string(),
            options,
        );
    }
    match gs1::parse(payload) {
        Ok(element) => render_element_with_fallback(backend, symbology, &element, options),
        Err(_) => attempt_both(
            backend,
            symbology,
            payload,
            (payload.to_string(), Framing::Gs1),
            gs1::to_display(payload),
            options,
        ),
    }
}

/// Two-tier render of an element string: GS1-framed with GS separators,
/// then its digits unframed.
pub fn render_element_with_fallback(
    backend: &dyn SymbolBackend,
    symbology: MatrixSymbology,
    element: &ElementString,
    options: &RenderOptions,
) -> Result<RenderedSymbol, RenderError> {
    attempt_both(
        backend,
        symbology,
        &element.to_string(),
        (element.to_fnc1(gs1::GROUP_SEPARATOR), Framing::Gs1),
        element.to_display(),
        options,
    )
}

fn attempt_both(
    backend: &dyn SymbolBackend,
    symbology: MatrixSymbology,
    payload: &str,
    (primary, framing): (String, Framing),
    display: String,
    options: &RenderOptions,
) -> Result<RenderedSymbol, RenderError> {
    let primary_error = match backend.encode(symbology, &primary, framing) {
        Ok(grid) => {
            let text = options.include_text.then_some(display);
            return Ok(finish(&grid, options, text, primary, Attempt::Primary));
        }
        Err(e) => e,
    };
    debug!(
        "[symbols] {} primary render failed ({}), retrying digits only",
        symbology, primary_error
    );

    let digits: String = payload.chars().filter(|c| c.is_ascii_digit()).collect();
    match backend.encode(symbology, &digits, Framing::Plain) {
        Ok(grid) => {
            let text = options.include_text.then(|| digits.clone());
            Ok(finish(&grid, options, text, digits, Attempt::DigitsOnly))
        }
        Err(e) => {
            warn!("[symbols] {} render of '{}' failed: {}", symbology, payload, e);
            Err(RenderError::Failed {
                symbology,
                payload: payload.to_string(),
                reason: combine_reasons(&primary_error, &e),
            })
        }
    }
}

fn combine_reasons(primary: &BackendError, retry: &BackendError) -> String {
    if primary == retry {
        primary.to_string()
    } else {
        format!("{}; digits-only retry: {}", primary, retry)
    }
}

fn finish(
    grid: &ModuleGrid,
    options: &RenderOptions,
    text: Option<String>,
    encoded: String,
    attempt: Attempt,
) -> RenderedSymbol {
    RenderedSymbol {
        raster: rasterize(grid, options, text.as_deref()),
        text,
        encoded,
        attempt,
    }
}

/// Paint a module grid with padding and optional text underneath.
pub fn rasterize(grid: &ModuleGrid, options: &RenderOptions, text: Option<&str>) -> Raster {
    let scale = options.scale.max(1);
    let pad = options.padding;
    let row_px = grid.row_height * scale;

    let symbol_w = grid.width * scale;
    let symbol_h = grid.height * row_px;
    let text_w = text.map(text_width).unwrap_or(0);
    let text_h = if text.is_some() { GLYPH_HEIGHT + 4 } else { 0 };

    let width = symbol_w.max(text_w) + 2 * pad;
    let height = symbol_h + text_h + 2 * pad;
    let mut raster = Raster::new(width, height);

    let x0 = (width - symbol_w) / 2;
    for y in 0..grid.height {
        for x in 0..grid.width {
            if grid.is_dark(x, y) {
                raster.fill_rect(x0 + x * scale, pad + y * row_px, scale, row_px);
            }
        }
    }

    if let Some(text) = text {
        raster.draw_text_centered(pad + symbol_h + 4, text);
    }
    raster
}
