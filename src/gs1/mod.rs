//! # GS1 Element String Codec
//!
//! Builds GS1 Application Identifier (AI) element strings from a typed field
//! set and turns element strings back into the parenthesized display form.
//!
//! ## Field Order
//!
//! Segments always appear in this order, whatever subset is present:
//!
//! | Field | AI | Value |
//! |-------|----|-------|
//! | GTIN | 01 | 14 digits, zero-padded left |
//! | Production date | 11 | YYMMDD |
//! | Best-before date | 15 | YYMMDD |
//! | Sell-by date | 16 | YYMMDD |
//! | Expiration date | 17 | YYMMDD |
//! | Batch/Lot | 10 | up to 20 chars |
//! | Serial | 21 | up to 20 chars |
//! | Net weight kg | 3103 | 6 digits, grams |
//! | Net weight lb | 3203 | 6 digits, thousandths of a pound |
//!
//! ## Lenient vs Strict
//!
//! [`build`] is total: it backs live previews in the item editor, so fields
//! that are missing or malformed are dropped or truncated. [`build_strict`]
//! rejects the same inputs with a [`Gs1Error`].
//!
//! ```
//! use scanbook::gs1::{self, Gs1Fields};
//!
//! let fields = Gs1Fields {
//!     gtin: Some("00049000000443".into()),
//!     sell_by_date: Some("2025-12-15".into()),
//!     ..Default::default()
//! };
//! let element = gs1::build(&fields);
//! assert_eq!(element.to_string(), "010004900000044316251215");
//! assert_eq!(gs1::to_display(&element.to_string()), "(01)00049000000443(16)251215");
//! ```

pub mod date;
pub mod validate;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use date::DateProblem;

/// ASCII group separator, the transmitted form of FNC1 between fields.
pub const GROUP_SEPARATOR: char = '\u{1d}';

/// Maximum length of the variable-length fields (batch, serial).
pub const MAX_VARIABLE_LEN: usize = 20;

/// Largest net weight encodable in six digits with three decimals.
pub const MAX_WEIGHT: f64 = 999.999;

/// Application Identifiers this codec understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ai {
    Gtin,
    ProductionDate,
    BestBeforeDate,
    SellByDate,
    ExpirationDate,
    Batch,
    Serial,
    NetWeightKg,
    NetWeightLb,
}

impl Ai {
    /// Every AI in element string order.
    pub const ALL: [Ai; 9] = [
        Ai::Gtin,
        Ai::ProductionDate,
        Ai::BestBeforeDate,
        Ai::SellByDate,
        Ai::ExpirationDate,
        Ai::Batch,
        Ai::Serial,
        Ai::NetWeightKg,
        Ai::NetWeightLb,
    ];

    /// The numeric AI tag.
    pub fn code(self) -> &'static str {
        match self {
            Ai::Gtin => "01",
            Ai::ProductionDate => "11",
            Ai::BestBeforeDate => "15",
            Ai::SellByDate => "16",
            Ai::ExpirationDate => "17",
            Ai::Batch => "10",
            Ai::Serial => "21",
            Ai::NetWeightKg => "3103",
            Ai::NetWeightLb => "3203",
        }
    }

    /// Human-readable field name.
    pub fn label(self) -> &'static str {
        match self {
            Ai::Gtin => "GTIN",
            Ai::ProductionDate => "Production date",
            Ai::BestBeforeDate => "Best before",
            Ai::SellByDate => "Sell by",
            Ai::ExpirationDate => "Expiration",
            Ai::Batch => "Batch/Lot",
            Ai::Serial => "Serial",
            Ai::NetWeightKg => "Net weight (kg)",
            Ai::NetWeightLb => "Net weight (lb)",
        }
    }

    /// Fixed value length, or `None` for variable-length fields.
    pub fn fixed_len(self) -> Option<usize> {
        match self {
            Ai::Gtin => Some(14),
            Ai::ProductionDate
            | Ai::BestBeforeDate
            | Ai::SellByDate
            | Ai::ExpirationDate
            | Ai::NetWeightKg
            | Ai::NetWeightLb => Some(6),
            Ai::Batch | Ai::Serial => None,
        }
    }

    /// Slot in the fixed field order. Both weight AIs share the last slot.
    fn position(self) -> usize {
        match self {
            Ai::Gtin => 0,
            Ai::ProductionDate => 1,
            Ai::BestBeforeDate => 2,
            Ai::SellByDate => 3,
            Ai::ExpirationDate => 4,
            Ai::Batch => 5,
            Ai::Serial => 6,
            Ai::NetWeightKg | Ai::NetWeightLb => 7,
        }
    }

    pub fn from_code(code: &str) -> Option<Ai> {
        Ai::ALL.into_iter().find(|ai| ai.code() == code)
    }
}

impl fmt::Display for Ai {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.code())
    }
}

/// Unit of a net weight field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl WeightUnit {
    fn ai(self) -> Ai {
        match self {
            WeightUnit::Kg => Ai::NetWeightKg,
            WeightUnit::Lb => Ai::NetWeightLb,
        }
    }
}

/// A net weight with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetWeight {
    pub value: f64,
    #[serde(default)]
    pub unit: WeightUnit,
}

/// The GS1 fields of an item, as entered in the item editor.
///
/// Dates are ISO `YYYY-MM-DD` strings. When `gtin` is absent the SKU is
/// used, left-padded to 14 digits. That fallback is a convenience and the
/// result usually fails GS1 check-digit validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gs1Fields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gtin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_before_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sell_by_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_weight: Option<NetWeight>,
}

impl Gs1Fields {
    /// Fields for an item that only has a SKU.
    pub fn from_sku(sku: impl Into<String>) -> Self {
        Self {
            sku: Some(sku.into()),
            ..Default::default()
        }
    }

    /// The raw input for a date AI.
    fn date(&self, ai: Ai) -> Option<&str> {
        match ai {
            Ai::ProductionDate => self.production_date.as_deref(),
            Ai::BestBeforeDate => self.best_before_date.as_deref(),
            Ai::SellByDate => self.sell_by_date.as_deref(),
            Ai::ExpirationDate => self.expiration_date.as_deref(),
            _ => None,
        }
    }

    /// Rebuild editor fields from an element string. Dates come back as ISO
    /// strings using the GS1 century window around `reference`.
    pub fn from_element(element: &ElementString, reference: NaiveDate) -> Self {
        let mut fields = Self::default();
        for segment in element.segments() {
            let value = segment.value.clone();
            match segment.ai {
                Ai::Gtin => fields.gtin = Some(value),
                Ai::ProductionDate => fields.production_date = date::to_iso(&value, reference),
                Ai::BestBeforeDate => fields.best_before_date = date::to_iso(&value, reference),
                Ai::SellByDate => fields.sell_by_date = date::to_iso(&value, reference),
                Ai::ExpirationDate => fields.expiration_date = date::to_iso(&value, reference),
                Ai::Batch => fields.batch = Some(value),
                Ai::Serial => fields.serial = Some(value),
                Ai::NetWeightKg | Ai::NetWeightLb => {
                    let unit = if segment.ai == Ai::NetWeightKg {
                        WeightUnit::Kg
                    } else {
                        WeightUnit::Lb
                    };
                    fields.net_weight = value.parse::<u32>().ok().map(|thousandths| NetWeight {
                        value: thousandths as f64 / 1000.0,
                        unit,
                    });
                }
            }
        }
        fields
    }
}

/// One `(AI)value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub ai: Ai,
    pub value: String,
}

/// An element string: segments in fixed AI order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ElementString {
    segments: Vec<Segment>,
}

impl ElementString {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Value of a given AI, if present.
    pub fn get(&self, ai: Ai) -> Option<&str> {
        self.segments
            .iter()
            .find(|s| s.ai == ai)
            .map(|s| s.value.as_str())
    }

    /// Human-readable form: `(01)00049000000443(16)251215`.
    pub fn to_display(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("{}{}", s.ai, s.value))
            .collect()
    }

    /// Symbol payload form: variable-length fields that are followed by
    /// another field are terminated with `separator` (FNC1 / GS).
    pub fn to_fnc1(&self, separator: char) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            out.push_str(segment.ai.code());
            out.push_str(&segment.value);
            let last = i + 1 == self.segments.len();
            if segment.ai.fixed_len().is_none() && !last {
                out.push(separator);
            }
        }
        out
    }

    fn push(&mut self, ai: Ai, value: String) {
        self.segments.push(Segment { ai, value });
    }
}

impl fmt::Display for ElementString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}{}", segment.ai.code(), segment.value)?;
        }
        Ok(())
    }
}

/// Strict validation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Gs1Error {
    #[error("GTIN '{0}' must be 8, 12, 13 or 14 digits")]
    GtinFormat(String),

    #[error("GTIN '{gtin}' has a bad check digit (expected {expected})")]
    GtinCheckDigit { gtin: String, expected: u8 },

    #[error("{} '{value}' is not a valid YYYY-MM-DD date", .ai.label())]
    DateFormat { ai: Ai, value: String },

    #[error("{} year {year} can't be represented as YYMMDD relative to today", .ai.label())]
    DateCentury { ai: Ai, year: i32 },

    #[error("{} is longer than {max} characters", .ai.label())]
    TooLong { ai: Ai, max: usize },

    #[error("{} contains '{ch}', which is outside GS1 character set 82", .ai.label())]
    InvalidCharacter { ai: Ai, ch: char },

    #[error("net weight {0} is outside 0..=999.999")]
    Weight(f64),

    #[error("element string has no fields")]
    Empty,

    #[error("cannot parse element string at '{0}'")]
    Parse(String),
}

/// Build an element string, dropping anything that doesn't fit.
///
/// Never fails. Dates keep the last six characters of the separator-free
/// input, so the century is lost. Batch and serial are cut to 20
/// characters. A weight outside the six-digit range is dropped.
pub fn build(fields: &Gs1Fields) -> ElementString {
    let mut element = ElementString::default();

    let gtin = fields
        .gtin
        .as_deref()
        .and_then(lenient_gtin)
        .or_else(|| fields.sku.as_deref().and_then(lenient_gtin));
    if let Some(gtin) = gtin {
        element.push(Ai::Gtin, gtin);
    }

    for ai in [
        Ai::ProductionDate,
        Ai::BestBeforeDate,
        Ai::SellByDate,
        Ai::ExpirationDate,
    ] {
        if let Some(yymmdd) = fields.date(ai).and_then(date::lenient_yymmdd) {
            element.push(ai, yymmdd);
        }
    }

    if let Some(batch) = fields.batch.as_deref().and_then(lenient_text) {
        element.push(Ai::Batch, batch);
    }
    if let Some(serial) = fields.serial.as_deref().and_then(lenient_text) {
        element.push(Ai::Serial, serial);
    }

    if let Some(weight) = fields.net_weight {
        if let Some(value) = weight_value(weight.value) {
            element.push(weight.unit.ai(), value);
        }
    }

    element
}

/// Build an element string, validating every field against today's date.
pub fn build_strict(fields: &Gs1Fields) -> Result<ElementString, Gs1Error> {
    build_strict_at(fields, chrono::Local::now().date_naive())
}

/// Build an element string, validating every field. Dates are checked
/// against the GS1 century window around `reference`.
pub fn build_strict_at(fields: &Gs1Fields, reference: NaiveDate) -> Result<ElementString, Gs1Error> {
    let mut element = ElementString::default();

    let gtin_input = fields.gtin.as_deref().or(fields.sku.as_deref());
    if let Some(raw) = gtin_input.map(str::trim).filter(|s| !s.is_empty()) {
        element.push(Ai::Gtin, strict_gtin(raw, fields.gtin.is_none())?);
    }

    for ai in [
        Ai::ProductionDate,
        Ai::BestBeforeDate,
        Ai::SellByDate,
        Ai::ExpirationDate,
    ] {
        let Some(raw) = fields.date(ai).map(str::trim).filter(|s| !s.is_empty()) else {
            continue;
        };
        let yymmdd = date::strict_yymmdd(raw, reference).map_err(|problem| match problem {
            DateProblem::Malformed => Gs1Error::DateFormat {
                ai,
                value: raw.to_string(),
            },
            DateProblem::OutsideCenturyWindow { year } => Gs1Error::DateCentury { ai, year },
        })?;
        element.push(ai, yymmdd);
    }

    for (ai, raw) in [(Ai::Batch, &fields.batch), (Ai::Serial, &fields.serial)] {
        if let Some(raw) = raw.as_deref().filter(|s| !s.is_empty()) {
            element.push(ai, strict_text(ai, raw)?);
        }
    }

    if let Some(weight) = fields.net_weight {
        let value = weight_value(weight.value).ok_or(Gs1Error::Weight(weight.value))?;
        element.push(weight.unit.ai(), value);
    }

    if element.is_empty() {
        return Err(Gs1Error::Empty);
    }
    Ok(element)
}

/// Digits only, last 14 kept, padded left with zeros.
fn lenient_gtin(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let tail = &digits[digits.len().saturating_sub(14)..];
    Some(format!("{:0>14}", tail))
}

fn strict_gtin(raw: &str, from_sku: bool) -> Result<String, Gs1Error> {
    let digits_only = raw.bytes().all(|b| b.is_ascii_digit());
    // A SKU is padded whatever its length, then must still check out
    let valid_len = if from_sku {
        raw.len() <= 14
    } else {
        matches!(raw.len(), 8 | 12 | 13 | 14)
    };
    if !digits_only || !valid_len {
        return Err(Gs1Error::GtinFormat(raw.to_string()));
    }
    let padded = format!("{:0>14}", raw);

    if !validate::is_valid_gtin(&padded) {
        let expected = validate::check_digit(&padded[..13]).unwrap_or(0);
        return Err(Gs1Error::GtinCheckDigit {
            gtin: padded,
            expected,
        });
    }
    Ok(padded)
}

/// Trimmed, control characters removed, cut to 20 characters.
fn lenient_text(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_VARIABLE_LEN)
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

fn strict_text(ai: Ai, raw: &str) -> Result<String, Gs1Error> {
    if let Some(ch) = raw.chars().find(|&c| !validate::is_cset82(c)) {
        return Err(Gs1Error::InvalidCharacter { ai, ch });
    }
    if raw.chars().count() > MAX_VARIABLE_LEN {
        return Err(Gs1Error::TooLong {
            ai,
            max: MAX_VARIABLE_LEN,
        });
    }
    Ok(raw.to_string())
}

/// Weight × 1000, rounded, as six digits.
fn weight_value(weight: f64) -> Option<String> {
    if !weight.is_finite() || weight < 0.0 {
        return None;
    }
    let thousandths = (weight * 1000.0).round();
    if thousandths > 999_999.0 {
        return None;
    }
    Some(format!("{:06}", thousandths as u32))
}

/// Parse an element string.
///
/// Accepts the raw form (`0100049000000443...`, optionally with GS
/// separators after variable-length fields) and the display form
/// (`(01)00049000000443(16)...`). Segments must follow the fixed field
/// order. Without a separator, a batch or serial value ends at the earliest
/// point where the rest still parses.
pub fn parse(input: &str) -> Result<ElementString, Gs1Error> {
    let input = input.trim();
    let segments = if input.starts_with('(') {
        parse_display(input)?
    } else {
        parse_raw(input, 0).ok_or_else(|| Gs1Error::Parse(input.to_string()))?
    };
    if segments.is_empty() {
        return Err(Gs1Error::Empty);
    }
    Ok(ElementString { segments })
}

/// Display form of an element string. Anything that can't be parsed is
/// appended unchanged, so the result always shows the whole input.
pub fn to_display(input: &str) -> String {
    match parse(input) {
        Ok(element) => element.to_display(),
        Err(_) => {
            let (segments, rest) = parse_greedy(input.trim());
            let mut out: String = segments
                .iter()
                .map(|s| format!("{}{}", s.ai, s.value))
                .collect();
            out.push_str(rest);
            out
        }
    }
}

/// Full parse of the raw form from field slot `min_pos` on.
fn parse_raw(input: &str, min_pos: usize) -> Option<Vec<Segment>> {
    let input = input.strip_prefix(GROUP_SEPARATOR).unwrap_or(input);
    if input.is_empty() {
        return Some(Vec::new());
    }

    let ai = match_ai(input, min_pos)?;
    let body = &input[ai.code().len()..];

    let mut candidates = Vec::new();
    match ai.fixed_len() {
        Some(len) => {
            let value = body.get(..len)?;
            if !value.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            candidates.push((value, &body[len..]));
        }
        None => {
            if let Some(gs) = body.find(GROUP_SEPARATOR) {
                candidates.push((&body[..gs], &body[gs..]));
            } else {
                for end in 1..=body.len().min(MAX_VARIABLE_LEN * 4) {
                    if body.is_char_boundary(end) {
                        candidates.push((&body[..end], &body[end..]));
                    }
                }
            }
        }
    }

    for (value, rest) in candidates {
        if value.is_empty() || value.chars().count() > MAX_VARIABLE_LEN {
            continue;
        }
        if let Some(mut tail) = parse_raw(rest, ai.position() + 1) {
            let mut segments = vec![Segment {
                ai,
                value: value.to_string(),
            }];
            segments.append(&mut tail);
            return Some(segments);
        }
    }
    None
}

fn match_ai(input: &str, min_pos: usize) -> Option<Ai> {
    Ai::ALL
        .into_iter()
        .filter(|ai| ai.position() >= min_pos)
        .find(|ai| input.starts_with(ai.code()))
}

fn parse_display(input: &str) -> Result<Vec<Segment>, Gs1Error> {
    let mut segments = Vec::new();
    let mut min_pos = 0;
    for part in input.split('(').skip(1) {
        let (code, value) = part
            .split_once(')')
            .ok_or_else(|| Gs1Error::Parse(part.to_string()))?;
        let ai = Ai::from_code(code).ok_or_else(|| Gs1Error::Parse(part.to_string()))?;
        let valid_len = match ai.fixed_len() {
            Some(len) => value.len() == len && value.bytes().all(|b| b.is_ascii_digit()),
            None => !value.is_empty() && value.chars().count() <= MAX_VARIABLE_LEN,
        };
        if ai.position() < min_pos || !valid_len {
            return Err(Gs1Error::Parse(part.to_string()));
        }
        min_pos = ai.position() + 1;
        segments.push(Segment {
            ai,
            value: value.to_string(),
        });
    }
    Ok(segments)
}

/// Best-effort prefix parse for display: takes fields one at a time and
/// stops at the first thing it doesn't recognize.
fn parse_greedy(input: &str) -> (Vec<Segment>, &str) {
    let mut segments = Vec::new();
    let mut rest = input;
    let mut min_pos = 0;

    loop {
        rest = rest.strip_prefix(GROUP_SEPARATOR).unwrap_or(rest);
        let Some(ai) = match_ai(rest, min_pos) else {
            return (segments, rest);
        };
        let body = &rest[ai.code().len()..];
        let end = match ai.fixed_len() {
            Some(len) => match body.get(..len) {
                Some(value) if value.bytes().all(|b| b.is_ascii_digit()) => len,
                _ => return (segments, rest),
            },
            None => body.find(GROUP_SEPARATOR).unwrap_or(body.len()),
        };
        if end == 0 {
            return (segments, rest);
        }
        segments.push(Segment {
            ai,
            value: body[..end].to_string(),
        });
        rest = &body[end..];
        min_pos = ai.position() + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_ai_codes_unique() {
        for a in Ai::ALL {
            for b in Ai::ALL {
                if a != b {
                    assert!(!a.code().starts_with(b.code()), "{:?} vs {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_build_gtin_and_sell_by() {
        let fields = Gs1Fields {
            gtin: Some("00049000000443".into()),
            sell_by_date: Some("2025-12-15".into()),
            ..Default::default()
        };
        assert_eq!(build(&fields).to_string(), "010004900000044316251215");
    }

    #[test]
    fn test_build_pads_short_gtin() {
        let fields = Gs1Fields {
            gtin: Some("036000291452".into()),
            ..Default::default()
        };
        assert_eq!(build(&fields).get(Ai::Gtin), Some("00036000291452"));
    }

    #[test]
    fn test_build_keeps_last_14_of_long_gtin() {
        let fields = Gs1Fields {
            gtin: Some("9900049000000443".into()),
            ..Default::default()
        };
        assert_eq!(build(&fields).get(Ai::Gtin), Some("00049000000443"));
    }

    #[test]
    fn test_build_gtin_wins_over_sku() {
        let fields = Gs1Fields {
            gtin: Some("00049000000443".into()),
            sku: Some("123456".into()),
            ..Default::default()
        };
        assert_eq!(build(&fields).get(Ai::Gtin), Some("00049000000443"));
    }

    #[test]
    fn test_build_sku_without_digits_has_no_gtin() {
        let element = build(&Gs1Fields::from_sku("ABC"));
        assert!(element.is_empty());
    }

    #[test]
    fn test_build_lb_weight() {
        let fields = Gs1Fields {
            net_weight: Some(NetWeight {
                value: 2.2046,
                unit: WeightUnit::Lb,
            }),
            ..Default::default()
        };
        assert_eq!(build(&fields).to_string(), "3203002205");
    }

    #[test]
    fn test_build_drops_bad_weight() {
        for value in [-1.0, f64::NAN, 1000.0] {
            let fields = Gs1Fields {
                net_weight: Some(NetWeight {
                    value,
                    unit: WeightUnit::Kg,
                }),
                ..Default::default()
            };
            assert!(build(&fields).is_empty(), "weight {}", value);
        }
    }

    #[test]
    fn test_build_truncates_batch() {
        let fields = Gs1Fields {
            batch: Some("ABCDEFGHIJKLMNOPQRSTUVWXYZ".into()),
            ..Default::default()
        };
        assert_eq!(build(&fields).get(Ai::Batch), Some("ABCDEFGHIJKLMNOPQRST"));
    }

    #[test]
    fn test_build_skips_blank_text_and_bad_dates() {
        let fields = Gs1Fields {
            batch: Some("   ".into()),
            expiration_date: Some("soon".into()),
            ..Default::default()
        };
        assert!(build(&fields).is_empty());
    }

    #[test]
    fn test_fnc1_separators() {
        let fields = Gs1Fields {
            gtin: Some("00049000000443".into()),
            batch: Some("LOT7".into()),
            serial: Some("SN1".into()),
            ..Default::default()
        };
        let element = build(&fields);
        assert_eq!(
            element.to_fnc1(GROUP_SEPARATOR),
            "010004900000044310LOT7\u{1d}21SN1"
        );
    }

    #[test]
    fn test_strict_accepts_valid() {
        let fields = Gs1Fields {
            gtin: Some("00049000000443".into()),
            expiration_date: Some("2027-03-01".into()),
            batch: Some("L-42".into()),
            ..Default::default()
        };
        let element = build_strict_at(&fields, reference()).unwrap();
        assert_eq!(element.to_display(), "(01)00049000000443(17)270301(10)L-42");
    }

    #[test]
    fn test_strict_rejects_check_digit() {
        let fields = Gs1Fields {
            gtin: Some("00049000000444".into()),
            ..Default::default()
        };
        assert_eq!(
            build_strict_at(&fields, reference()),
            Err(Gs1Error::GtinCheckDigit {
                gtin: "00049000000444".into(),
                expected: 3
            })
        );
    }

    #[test]
    fn test_strict_rejects_sku_padding() {
        let fields = Gs1Fields::from_sku("123456");
        assert!(matches!(
            build_strict_at(&fields, reference()),
            Err(Gs1Error::GtinCheckDigit { .. })
        ));
    }

    #[test]
    fn test_strict_rejects_gtin_length() {
        let fields = Gs1Fields {
            gtin: Some("12345".into()),
            ..Default::default()
        };
        assert_eq!(
            build_strict_at(&fields, reference()),
            Err(Gs1Error::GtinFormat("12345".into()))
        );
    }

    #[test]
    fn test_strict_rejects_dates() {
        let fields = Gs1Fields {
            sell_by_date: Some("2025-13-01".into()),
            ..Default::default()
        };
        assert!(matches!(
            build_strict_at(&fields, reference()),
            Err(Gs1Error::DateFormat {
                ai: Ai::SellByDate,
                ..
            })
        ));

        let fields = Gs1Fields {
            production_date: Some("1950-01-01".into()),
            ..Default::default()
        };
        assert_eq!(
            build_strict_at(&fields, reference()),
            Err(Gs1Error::DateCentury {
                ai: Ai::ProductionDate,
                year: 1950
            })
        );
    }

    #[test]
    fn test_strict_rejects_text() {
        let fields = Gs1Fields {
            serial: Some("SN 1".into()),
            ..Default::default()
        };
        assert_eq!(
            build_strict_at(&fields, reference()),
            Err(Gs1Error::InvalidCharacter {
                ai: Ai::Serial,
                ch: ' '
            })
        );

        let fields = Gs1Fields {
            batch: Some("A".repeat(21)),
            ..Default::default()
        };
        assert_eq!(
            build_strict_at(&fields, reference()),
            Err(Gs1Error::TooLong {
                ai: Ai::Batch,
                max: 20
            })
        );
    }

    #[test]
    fn test_strict_rejects_weight_and_empty() {
        let fields = Gs1Fields {
            net_weight: Some(NetWeight {
                value: 1500.0,
                unit: WeightUnit::Kg,
            }),
            ..Default::default()
        };
        assert_eq!(
            build_strict_at(&fields, reference()),
            Err(Gs1Error::Weight(1500.0))
        );
        assert_eq!(
            build_strict_at(&Gs1Fields::default(), reference()),
            Err(Gs1Error::Empty)
        );
    }

    #[test]
    fn test_parse_batch_then_weight() {
        let element = parse("10LOT423103001500").unwrap();
        assert_eq!(element.get(Ai::Batch), Some("LOT42"));
        assert_eq!(element.get(Ai::NetWeightKg), Some("001500"));
    }

    #[test]
    fn test_parse_batch_then_serial() {
        let element = parse("10LOT4221SER").unwrap();
        assert_eq!(element.get(Ai::Batch), Some("LOT42"));
        assert_eq!(element.get(Ai::Serial), Some("SER"));
    }

    #[test]
    fn test_parse_with_group_separator() {
        let element = parse("10A21\u{1d}21B").unwrap();
        assert_eq!(element.get(Ai::Batch), Some("A21"));
        assert_eq!(element.get(Ai::Serial), Some("B"));
    }

    #[test]
    fn test_parse_display_form() {
        let element = parse("(01)00049000000443(16)251215").unwrap();
        assert_eq!(element.to_string(), "010004900000044316251215");
    }

    #[test]
    fn test_parse_rejects_out_of_order() {
        assert!(parse("16251215010004900000044").is_err());
        assert!(parse("(16)251215(01)00049000000443").is_err());
    }

    #[test]
    fn test_to_display_keeps_unparsed_tail() {
        assert_eq!(to_display("0100049000000443XYZ"), "(01)00049000000443XYZ");
        assert_eq!(to_display("hello"), "hello");
    }

    #[test]
    fn test_fields_round_trip_through_element() {
        let fields = Gs1Fields {
            gtin: Some("00049000000443".into()),
            best_before_date: Some("2026-11-30".into()),
            serial: Some("SN-0001".into()),
            net_weight: Some(NetWeight {
                value: 0.75,
                unit: WeightUnit::Kg,
            }),
            ..Default::default()
        };
        let element = build(&fields);
        let back = Gs1Fields::from_element(&element, reference());
        assert_eq!(back, fields);
    }
}
