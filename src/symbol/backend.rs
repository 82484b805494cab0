//! # Symbol Backends
//!
//! The module geometry of 2D and alphanumeric symbols comes from external
//! crates. A [`SymbolBackend`] wraps them behind one call that returns a
//! [`ModuleGrid`]; a [`BackendLoader`] produces the backend once, possibly
//! asynchronously.
//!
//! | Symbology | Crate | GS1 framing |
//! |-----------|-------|-------------|
//! | DataMatrix | `datamatrix` | not supported |
//! | Code128 | `barcoders`, GS1-128 by hand | FNC1 after start and for each GS |
//! | QR | `qrcode` | FNC1 in first position |
//! | PDF417 | `pdf417` | not supported |
//!
//! A backend that can't frame a GS1 payload returns
//! [`BackendError::Unsupported`]; the adapter's digits-only retry takes over.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use super::{MatrixSymbology, code128};

/// How the payload should be framed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Framing {
    /// Payload is a GS1 element string with GS separators
    Gs1,
    /// Payload is encoded as plain data
    Plain,
}

/// Errors from a symbol backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("{symbology} encoding failed: {reason}")]
    Encode {
        symbology: MatrixSymbology,
        reason: String,
    },

    #[error("{symbology} does not support {framing:?} framing")]
    Unsupported {
        symbology: MatrixSymbology,
        framing: Framing,
    },

    #[error("backend failed to load: {0}")]
    Load(String),
}

/// Symbol modules, row-major. `true` is a dark module.
///
/// Linear symbols are a single row; `row_height` says how many module
/// heights each row is drawn at (PDF417 rows are three modules tall).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    pub width: usize,
    pub height: usize,
    pub row_height: usize,
    pub modules: Vec<bool>,
}

impl ModuleGrid {
    pub fn new(width: usize, height: usize, row_height: usize) -> Self {
        Self {
            width,
            height,
            row_height: row_height.max(1),
            modules: vec![false; width * height],
        }
    }

    /// A single-row grid from a bar sequence.
    pub fn from_bars(bars: &[bool], row_height: usize) -> Self {
        Self {
            width: bars.len(),
            height: 1,
            row_height: row_height.max(1),
            modules: bars.to_vec(),
        }
    }

    pub fn set(&mut self, x: usize, y: usize, dark: bool) {
        if x < self.width && y < self.height {
            self.modules[y * self.width + x] = dark;
        }
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.modules[y * self.width + x]
    }
}

/// Encodes payloads into module grids.
pub trait SymbolBackend: Send + Sync {
    fn encode(
        &self,
        symbology: MatrixSymbology,
        payload: &str,
        framing: Framing,
    ) -> Result<ModuleGrid, BackendError>;
}

/// One-time asynchronous setup of a backend.
#[async_trait]
pub trait BackendLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn SymbolBackend>, BackendError>;
}

/// Backend built on the `datamatrix`, `barcoders`, `qrcode` and `pdf417` crates.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinBackend;

/// Height of Code128 bars in modules.
const CODE128_ROW_HEIGHT: usize = 40;

/// PDF417 row:module aspect ratio.
const PDF417_ROW_HEIGHT: usize = 3;

/// PDF417 layouts tried in order, as (rows, data columns).
const PDF417_LAYOUTS: [(u8, u8); 4] = [(10, 4), (16, 5), (24, 6), (32, 8)];

impl SymbolBackend for BuiltinBackend {
    fn encode(
        &self,
        symbology: MatrixSymbology,
        payload: &str,
        framing: Framing,
    ) -> Result<ModuleGrid, BackendError> {
        if payload.is_empty() {
            return Err(BackendError::Encode {
                symbology,
                reason: "empty payload".to_string(),
            });
        }
        match symbology {
            MatrixSymbology::DataMatrix => match framing {
                Framing::Plain => encode_datamatrix(payload),
                Framing::Gs1 => Err(BackendError::Unsupported { symbology, framing }),
            },
            MatrixSymbology::Code128 => match framing {
                Framing::Plain => encode_code128(payload),
                Framing::Gs1 => Ok(ModuleGrid::from_bars(
                    &code128::encode(payload)?,
                    CODE128_ROW_HEIGHT,
                )),
            },
            MatrixSymbology::Qr => encode_qr(payload, framing),
            MatrixSymbology::Pdf417 => match framing {
                Framing::Plain => encode_pdf417(payload),
                Framing::Gs1 => Err(BackendError::Unsupported { symbology, framing }),
            },
        }
    }
}

fn encode_datamatrix(payload: &str) -> Result<ModuleGrid, BackendError> {
    use datamatrix::{DataMatrix, SymbolList};

    let code = DataMatrix::encode(payload.as_bytes(), SymbolList::default()).map_err(|e| {
        BackendError::Encode {
            symbology: MatrixSymbology::DataMatrix,
            reason: format!("{:?}", e),
        }
    })?;

    let bitmap = code.bitmap();
    let mut grid = ModuleGrid::new(bitmap.width(), bitmap.height(), 1);
    for (x, y) in bitmap.pixels() {
        grid.set(x, y, true);
    }
    Ok(grid)
}

fn encode_code128(payload: &str) -> Result<ModuleGrid, BackendError> {
    use barcoders::sym::code128::Code128;

    // Set B (Ɓ) covers printable ASCII
    let prefixed = format!("\u{0181}{}", payload);

    let barcode = Code128::new(&prefixed).map_err(|e| BackendError::Encode {
        symbology: MatrixSymbology::Code128,
        reason: format!("{:?}", e),
    })?;

    let bars: Vec<bool> = barcode.encode().iter().map(|&m| m == 1).collect();
    Ok(ModuleGrid::from_bars(&bars, CODE128_ROW_HEIGHT))
}

fn encode_qr(payload: &str, framing: Framing) -> Result<ModuleGrid, BackendError> {
    use qrcode::{Color, EcLevel, QrCode};

    let to_error = |e: qrcode::types::QrError| BackendError::Encode {
        symbology: MatrixSymbology::Qr,
        reason: e.to_string(),
    };

    let code = match framing {
        Framing::Plain => QrCode::with_error_correction_level(payload, EcLevel::M).map_err(to_error)?,
        Framing::Gs1 => gs1_qr(payload, EcLevel::M).map_err(to_error)?,
    };

    let width = code.width();
    let mut grid = ModuleGrid::new(width, width, 1);
    for (i, color) in code.to_colors().into_iter().enumerate() {
        grid.set(i % width, i / width, color == Color::Dark);
    }
    Ok(grid)
}

/// QR code with FNC1 in first position, in the smallest version that fits.
fn gs1_qr(payload: &str, ec_level: qrcode::EcLevel) -> qrcode::types::QrResult<qrcode::QrCode> {
    use qrcode::bits::Bits;
    use qrcode::types::QrError;
    use qrcode::{QrCode, Version};

    let mut last_error = QrError::DataTooLong;
    for version in 1..=40 {
        let mut bits = Bits::new(Version::Normal(version));
        match push_gs1_bits(&mut bits, payload, ec_level) {
            Ok(()) => return QrCode::with_bits(bits, ec_level),
            Err(e) => last_error = e,
        }
    }
    Err(last_error)
}

fn push_gs1_bits(
    bits: &mut qrcode::bits::Bits,
    payload: &str,
    ec_level: qrcode::EcLevel,
) -> qrcode::types::QrResult<()> {
    bits.push_fnc1_first_position()?;
    bits.push_byte_data(payload.as_bytes())?;
    bits.push_terminator(ec_level)
}

fn encode_pdf417(payload: &str) -> Result<ModuleGrid, BackendError> {
    use pdf417::{END_PATTERN, PDF417, PDF417Encoder, START_PATTERN};

    for (rows, cols) in PDF417_LAYOUTS {
        // start + left row indicator + data columns + right row indicator + end
        let width = START_PATTERN.size() as usize
            + 17
            + (cols as usize * 17)
            + 17
            + END_PATTERN.size() as usize;

        let mut codewords = vec![0u16; rows as usize * cols as usize];
        let Some((level, filled)) = PDF417Encoder::new(&mut codewords[..], false)
            .append_ascii(payload)
            .fit_seal()
        else {
            continue;
        };

        let barcode = PDF417::new(filled, rows, cols, level);
        let mut grid = ModuleGrid::new(width, rows as usize, PDF417_ROW_HEIGHT);
        for (i, bit) in barcode.bits().enumerate() {
            if i < grid.modules.len() {
                grid.modules[i] = bit;
            }
        }
        return Ok(grid);
    }

    Err(BackendError::Encode {
        symbology: MatrixSymbology::Pdf417,
        reason: "payload too long".to_string(),
    })
}

/// Loads the [`BuiltinBackend`], checking each symbology with a probe
/// payload on a blocking thread first.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinLoader;

#[async_trait]
impl BackendLoader for BuiltinLoader {
    async fn load(&self) -> Result<Arc<dyn SymbolBackend>, BackendError> {
        let probe = tokio::task::spawn_blocking(|| {
            let backend = BuiltinBackend;
            for symbology in MatrixSymbology::ALL {
                backend.encode(symbology, "0123456789", Framing::Plain)?;
            }
            Ok::<_, BackendError>(backend)
        })
        .await
        .map_err(|e| BackendError::Load(format!("probe task failed: {}", e)))??;

        Ok(Arc::new(probe))
    }
}
