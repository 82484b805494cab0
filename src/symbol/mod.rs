//! # Barcode Symbols
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`linear`] | Numeric linear symbol encoder |
//! | [`adapter`] | 2D / alphanumeric symbols with readiness and fallback |
//! | [`backend`] | External symbol generators behind one trait |

pub mod adapter;
pub mod backend;
mod code128;
pub mod linear;

pub use adapter::{Attempt, Readiness, RenderError, RenderOptions, RenderedSymbol, SymbolAdapter};
pub use backend::{BackendError, BackendLoader, BuiltinBackend, BuiltinLoader, Framing, ModuleGrid, SymbolBackend};
pub use linear::{LinearOptions, LinearSymbol};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Barcode symbology attached to a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    /// Numeric linear symbol from [`linear`]
    #[default]
    Linear,
    Code128,
    Gs1DataMatrix,
    Gs1Qr,
    Qr,
    Pdf417,
}

impl Symbology {
    pub const ALL: [Symbology; 6] = [
        Symbology::Linear,
        Symbology::Code128,
        Symbology::Gs1DataMatrix,
        Symbology::Gs1Qr,
        Symbology::Qr,
        Symbology::Pdf417,
    ];

    /// Whether the payload is a GS1 element string.
    pub fn is_gs1(self) -> bool {
        matches!(self, Symbology::Gs1DataMatrix | Symbology::Gs1Qr)
    }

    /// The adapter symbology, or `None` for the linear encoder.
    pub fn matrix(self) -> Option<MatrixSymbology> {
        match self {
            Symbology::Linear => None,
            Symbology::Code128 => Some(MatrixSymbology::Code128),
            Symbology::Gs1DataMatrix => Some(MatrixSymbology::DataMatrix),
            Symbology::Gs1Qr | Symbology::Qr => Some(MatrixSymbology::Qr),
            Symbology::Pdf417 => Some(MatrixSymbology::Pdf417),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Symbology::Linear => "linear",
            Symbology::Code128 => "code128",
            Symbology::Gs1DataMatrix => "gs1_datamatrix",
            Symbology::Gs1Qr => "gs1_qr",
            Symbology::Qr => "qr",
            Symbology::Pdf417 => "pdf417",
        }
    }

    /// Parse a symbology name, accepting a few common spellings.
    pub fn parse(s: &str) -> Option<Symbology> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "linear" | "upc" | "1d" => Some(Symbology::Linear),
            "code128" | "code_128" => Some(Symbology::Code128),
            "gs1_datamatrix" | "datamatrix" | "dm" => Some(Symbology::Gs1DataMatrix),
            "gs1_qr" => Some(Symbology::Gs1Qr),
            "qr" | "qrcode" => Some(Symbology::Qr),
            "pdf417" => Some(Symbology::Pdf417),
            _ => None,
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Symbologies whose geometry comes from a [`SymbolBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixSymbology {
    DataMatrix,
    Code128,
    Qr,
    Pdf417,
}

impl MatrixSymbology {
    pub const ALL: [MatrixSymbology; 4] = [
        MatrixSymbology::DataMatrix,
        MatrixSymbology::Code128,
        MatrixSymbology::Qr,
        MatrixSymbology::Pdf417,
    ];
}

impl fmt::Display for MatrixSymbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatrixSymbology::DataMatrix => "DataMatrix",
            MatrixSymbology::Code128 => "Code128",
            MatrixSymbology::Qr => "QR",
            MatrixSymbology::Pdf417 => "PDF417",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for symbology in Symbology::ALL {
            assert_eq!(Symbology::parse(symbology.name()), Some(symbology));
        }
        assert_eq!(Symbology::parse("DataMatrix"), Some(Symbology::Gs1DataMatrix));
        assert_eq!(Symbology::parse("code-128"), Some(Symbology::Code128));
        assert_eq!(Symbology::parse("aztec"), None);
    }

    #[test]
    fn test_matrix_mapping() {
        assert_eq!(Symbology::Linear.matrix(), None);
        assert_eq!(Symbology::Gs1Qr.matrix(), Some(MatrixSymbology::Qr));
        assert!(Symbology::Gs1DataMatrix.is_gs1());
        assert!(!Symbology::Qr.is_gs1());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Symbology::Gs1DataMatrix).unwrap();
        assert_eq!(json, "\"gs1_datamatrix\"");
    }
}
