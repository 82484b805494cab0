//! # Catalog
//!
//! Built-in scanbooks and items plus the tester's own custom items.
//!
//! ## SKU Uniqueness
//!
//! A SKU identifies one item across the combined built-in and custom set.
//! Adding, updating or importing an item whose SKU is already taken is
//! rejected and reported; nothing is silently overwritten. Built-in items
//! are read-only.
//!
//! ```
//! use scanbook::catalog::{Catalog, CatalogItem, CatalogError};
//!
//! let mut catalog = Catalog::builtin();
//! catalog.add_custom(CatalogItem::new("Test Soda", "990001")).unwrap();
//!
//! let dup = catalog.add_custom(CatalogItem::new("Other Soda", "990001"));
//! assert!(matches!(dup, Err(CatalogError::DuplicateSku(_))));
//! ```

mod builtin;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gs1::{self, ElementString, GROUP_SEPARATOR, Gs1Fields};
use crate::symbol::Symbology;

/// Maximum SKU length.
pub const MAX_SKU_LEN: usize = 20;

/// Maximum item name length.
pub const MAX_NAME_LEN: usize = 80;

/// How an item is sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitOfMeasure {
    #[default]
    Each,
    Kg,
    Lb,
    Case,
    Pack,
}

/// One scannable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub unit_of_measure: UnitOfMeasure,
    /// Symbology to render; defaults from the presence of GS1 fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbology: Option<Symbology>,
    /// Value to encode instead of the SKU
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gs1: Option<Gs1Fields>,
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, sku: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            unit_of_measure: UnitOfMeasure::Each,
            symbology: None,
            barcode: None,
            gs1: None,
        }
    }

    pub fn unit(mut self, unit: UnitOfMeasure) -> Self {
        self.unit_of_measure = unit;
        self
    }

    pub fn symbology(mut self, symbology: Symbology) -> Self {
        self.symbology = Some(symbology);
        self
    }

    pub fn barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }

    pub fn gs1(mut self, fields: Gs1Fields) -> Self {
        self.gs1 = Some(fields);
        self
    }

    /// Effective symbology: explicit, else GS1 DataMatrix for items with GS1
    /// fields, else linear.
    pub fn effective_symbology(&self) -> Symbology {
        match (self.symbology, &self.gs1) {
            (Some(symbology), _) => symbology,
            (None, Some(_)) => Symbology::Gs1DataMatrix,
            (None, None) => Symbology::Linear,
        }
    }

    /// GS1 fields with the SKU filled in for the GTIN fallback.
    pub fn gs1_fields(&self) -> Gs1Fields {
        let mut fields = self.gs1.clone().unwrap_or_default();
        if fields.sku.is_none() {
            fields.sku = Some(self.barcode.clone().unwrap_or_else(|| self.sku.clone()));
        }
        fields
    }

    /// Element string for GS1 symbologies.
    pub fn element(&self) -> Option<ElementString> {
        self.effective_symbology()
            .is_gs1()
            .then(|| gs1::build(&self.gs1_fields()))
    }

    /// The string handed to the symbol encoder. GS1 payloads carry GS
    /// separators after variable-length fields.
    pub fn payload(&self) -> String {
        match self.element() {
            Some(element) => element.to_fnc1(GROUP_SEPARATOR),
            None => self.barcode.clone().unwrap_or_else(|| self.sku.clone()),
        }
    }

    /// Human-readable payload: parenthesized AIs for GS1 items.
    pub fn display(&self) -> String {
        match self.element() {
            Some(element) => element.to_display(),
            None => self.payload(),
        }
    }

    /// Check the fields a tester can type.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CatalogError::invalid("name", "must not be empty"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(CatalogError::invalid(
                "name",
                format!("must be at most {} characters", MAX_NAME_LEN),
            ));
        }
        validate_sku(&self.sku)?;
        if let Some(barcode) = &self.barcode {
            if barcode.trim().is_empty() {
                return Err(CatalogError::invalid("barcode", "must not be blank"));
            }
        }
        Ok(())
    }

    /// Trim user-entered text.
    fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.sku = self.sku.trim().to_string();
        self.barcode = self.barcode.map(|b| b.trim().to_string());
        self
    }
}

fn validate_sku(sku: &str) -> Result<(), CatalogError> {
    let sku = sku.trim();
    if sku.is_empty() {
        return Err(CatalogError::invalid("sku", "must not be empty"));
    }
    if sku.len() > MAX_SKU_LEN {
        return Err(CatalogError::invalid(
            "sku",
            format!("must be at most {} characters", MAX_SKU_LEN),
        ));
    }
    if !sku.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(CatalogError::invalid(
            "sku",
            "may only contain letters, digits and '-'",
        ));
    }
    Ok(())
}

/// A retail test scenario: what to ring up and what to check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scanbook {
    pub id: String,
    pub title: String,
    pub description: String,
    pub steps: Vec<String>,
    pub skus: Vec<String>,
}

/// Catalog integrity errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("SKU '{0}' already exists")]
    DuplicateSku(String),

    #[error("SKU '{0}' not found")]
    UnknownSku(String),

    #[error("SKU '{0}' is a built-in item and can't be changed")]
    ReadOnly(String),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("import is not a JSON list of items: {0}")]
    Parse(String),
}

impl CatalogError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CatalogError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// One record an import skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub sku: String,
    pub reason: String,
}

/// Outcome of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub added: Vec<String>,
    pub rejected: Vec<Rejection>,
}

/// Built-in data plus custom items.
#[derive(Debug, Clone)]
pub struct Catalog {
    builtin: Vec<CatalogItem>,
    custom: Vec<CatalogItem>,
    scanbooks: Vec<Scanbook>,
}

impl Catalog {
    /// The built-in catalog with no custom items.
    pub fn builtin() -> Self {
        Self {
            builtin: builtin::items(),
            custom: Vec::new(),
            scanbooks: builtin::scanbooks(),
        }
    }

    /// The built-in catalog plus previously saved custom items.
    ///
    /// Saved items that collide with an earlier SKU are dropped with a warning.
    pub fn with_custom(custom: Vec<CatalogItem>) -> Self {
        let mut catalog = Self::builtin();
        let report = catalog.import(custom);
        for rejection in &report.rejected {
            warn!(
                "[catalog] Dropping saved item {}: {}",
                rejection.sku, rejection.reason
            );
        }
        catalog
    }

    /// Every item, built-ins first.
    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.builtin.iter().chain(self.custom.iter())
    }

    pub fn custom_items(&self) -> &[CatalogItem] {
        &self.custom
    }

    pub fn find(&self, sku: &str) -> Option<&CatalogItem> {
        let sku = sku.trim();
        self.items().find(|item| item.sku == sku)
    }

    pub fn is_custom(&self, sku: &str) -> bool {
        self.custom.iter().any(|item| item.sku == sku.trim())
    }

    pub fn scanbooks(&self) -> &[Scanbook] {
        &self.scanbooks
    }

    pub fn scanbook(&self, id: &str) -> Option<&Scanbook> {
        self.scanbooks.iter().find(|s| s.id == id)
    }

    /// The items a scanbook lists, skipping SKUs that aren't in the catalog.
    pub fn scanbook_items(&self, id: &str) -> Option<Vec<&CatalogItem>> {
        let scanbook = self.scanbook(id)?;
        Some(scanbook.skus.iter().filter_map(|sku| self.find(sku)).collect())
    }

    /// Add a custom item.
    pub fn add_custom(&mut self, item: CatalogItem) -> Result<(), CatalogError> {
        let item = item.normalized();
        item.validate()?;
        if self.find(&item.sku).is_some() {
            return Err(CatalogError::DuplicateSku(item.sku));
        }
        info!("[catalog] Added custom item {} ({})", item.sku, item.name);
        self.custom.push(item);
        Ok(())
    }

    /// Replace the custom item `sku`. The replacement may change the SKU as
    /// long as the new one is free.
    pub fn update_custom(&mut self, sku: &str, item: CatalogItem) -> Result<(), CatalogError> {
        let sku = sku.trim();
        let item = item.normalized();
        item.validate()?;

        let index = self.custom_index(sku)?;
        if item.sku != sku && self.find(&item.sku).is_some() {
            return Err(CatalogError::DuplicateSku(item.sku));
        }
        info!("[catalog] Updated custom item {}", sku);
        self.custom[index] = item;
        Ok(())
    }

    /// Remove a custom item, returning it.
    pub fn remove_custom(&mut self, sku: &str) -> Result<CatalogItem, CatalogError> {
        let index = self.custom_index(sku.trim())?;
        info!("[catalog] Removed custom item {}", sku.trim());
        Ok(self.custom.remove(index))
    }

    fn custom_index(&self, sku: &str) -> Result<usize, CatalogError> {
        match self.custom.iter().position(|item| item.sku == sku) {
            Some(index) => Ok(index),
            None if self.builtin.iter().any(|item| item.sku == sku) => {
                Err(CatalogError::ReadOnly(sku.to_string()))
            }
            None => Err(CatalogError::UnknownSku(sku.to_string())),
        }
    }

    /// Add many items, keeping the good ones and reporting the rest.
    /// Duplicates within the batch are rejected after the first.
    pub fn import(&mut self, items: Vec<CatalogItem>) -> ImportReport {
        let mut report = ImportReport::default();
        for item in items {
            let sku = item.sku.trim().to_string();
            match self.add_custom(item) {
                Ok(()) => report.added.push(sku),
                Err(e) => report.rejected.push(Rejection {
                    sku,
                    reason: e.to_string(),
                }),
            }
        }
        report
    }

    /// Import a JSON array of items.
    pub fn import_json(&mut self, json: &str) -> Result<ImportReport, CatalogError> {
        let items: Vec<CatalogItem> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Ok(self.import(items))
    }

    /// Custom items as pretty JSON, in the format `import_json` reads.
    pub fn export_custom(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gs1::{NetWeight, WeightUnit};

    #[test]
    fn test_builtin_skus_unique() {
        let catalog = Catalog::builtin();
        let mut skus: Vec<&str> = catalog.items().map(|i| i.sku.as_str()).collect();
        let total = skus.len();
        skus.sort();
        skus.dedup();
        assert_eq!(skus.len(), total);
    }

    #[test]
    fn test_builtin_items_valid() {
        for item in Catalog::builtin().items() {
            item.validate().unwrap();
        }
    }

    #[test]
    fn test_scanbooks_reference_known_items() {
        let catalog = Catalog::builtin();
        for scanbook in catalog.scanbooks() {
            for sku in &scanbook.skus {
                assert!(catalog.find(sku).is_some(), "{} in {}", sku, scanbook.id);
            }
        }
    }

    #[test]
    fn test_add_rejects_builtin_sku() {
        let mut catalog = Catalog::builtin();
        let sku = catalog.items().next().unwrap().sku.clone();
        assert_eq!(
            catalog.add_custom(CatalogItem::new("Clash", sku.clone())),
            Err(CatalogError::DuplicateSku(sku))
        );
        assert!(catalog.custom_items().is_empty());
    }

    #[test]
    fn test_add_trims_and_validates() {
        let mut catalog = Catalog::builtin();
        catalog
            .add_custom(CatalogItem::new("  Gum  ", " 990002 "))
            .unwrap();
        let item = catalog.find("990002").unwrap();
        assert_eq!(item.name, "Gum");
        assert!(catalog.is_custom("990002"));

        assert!(matches!(
            catalog.add_custom(CatalogItem::new("", "990003")),
            Err(CatalogError::InvalidField { field: "name", .. })
        ));
        assert!(matches!(
            catalog.add_custom(CatalogItem::new("Bad", "99 0003")),
            Err(CatalogError::InvalidField { field: "sku", .. })
        ));
    }

    #[test]
    fn test_update_and_remove() {
        let mut catalog = Catalog::builtin();
        catalog.add_custom(CatalogItem::new("A", "990010")).unwrap();
        catalog.add_custom(CatalogItem::new("B", "990011")).unwrap();

        // Renaming onto a taken SKU is refused
        assert_eq!(
            catalog.update_custom("990010", CatalogItem::new("A", "990011")),
            Err(CatalogError::DuplicateSku("990011".into()))
        );

        catalog
            .update_custom("990010", CatalogItem::new("A2", "990012"))
            .unwrap();
        assert!(catalog.find("990010").is_none());
        assert_eq!(catalog.find("990012").unwrap().name, "A2");

        let removed = catalog.remove_custom("990011").unwrap();
        assert_eq!(removed.name, "B");
        assert_eq!(
            catalog.remove_custom("990011"),
            Err(CatalogError::UnknownSku("990011".into()))
        );
    }

    #[test]
    fn test_builtin_is_read_only() {
        let mut catalog = Catalog::builtin();
        let sku = catalog.items().next().unwrap().sku.clone();
        assert_eq!(
            catalog.remove_custom(&sku),
            Err(CatalogError::ReadOnly(sku))
        );
    }

    #[test]
    fn test_import_reports_duplicates() {
        let mut catalog = Catalog::builtin();
        let json = r#"[
            {"name": "One", "sku": "880001"},
            {"name": "Two", "sku": "880001"},
            {"name": "", "sku": "880002"},
            {"name": "Three", "sku": "880003", "unit_of_measure": "kg"}
        ]"#;
        let report = catalog.import_json(json).unwrap();
        assert_eq!(report.added, vec!["880001", "880003"]);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].sku, "880001");
        assert!(report.rejected[0].reason.contains("already exists"));
        assert_eq!(
            catalog.find("880003").unwrap().unit_of_measure,
            UnitOfMeasure::Kg
        );
    }

    #[test]
    fn test_import_rejects_non_list() {
        let mut catalog = Catalog::builtin();
        assert!(matches!(
            catalog.import_json("{\"name\": \"x\"}"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_export_round_trip() {
        let mut catalog = Catalog::builtin();
        catalog
            .add_custom(CatalogItem::new("Steak", "770001").gs1(Gs1Fields {
                net_weight: Some(NetWeight {
                    value: 0.5,
                    unit: WeightUnit::Kg,
                }),
                ..Default::default()
            }))
            .unwrap();
        let json = catalog.export_custom().unwrap();

        let mut other = Catalog::builtin();
        let report = other.import_json(&json).unwrap();
        assert_eq!(report.added, vec!["770001"]);
        assert_eq!(other.custom_items(), catalog.custom_items());
    }

    #[test]
    fn test_with_custom_drops_collisions() {
        let catalog = Catalog::with_custom(vec![
            CatalogItem::new("X", "660001"),
            CatalogItem::new("Y", "660001"),
        ]);
        assert_eq!(catalog.custom_items().len(), 1);
        assert_eq!(catalog.find("660001").unwrap().name, "X");
    }

    #[test]
    fn test_payload_by_symbology() {
        let plain = CatalogItem::new("Soda", "049000000443");
        assert_eq!(plain.effective_symbology(), Symbology::Linear);
        assert_eq!(plain.payload(), "049000000443");

        let gs1 = CatalogItem::new("Milk", "123456").gs1(Gs1Fields {
            sell_by_date: Some("2025-12-15".into()),
            ..Default::default()
        });
        assert_eq!(gs1.effective_symbology(), Symbology::Gs1DataMatrix);
        assert_eq!(gs1.payload(), "010000000012345616251215");

        let overridden = CatalogItem::new("Coupon", "C-1").barcode("5100001234");
        assert_eq!(overridden.payload(), "5100001234");
        assert_eq!(overridden.display(), "5100001234");
        assert!(overridden.element().is_none());
    }

    #[test]
    fn test_gs1_payload_keeps_separators() {
        let item = CatalogItem::new("Ham", "DELI-HAM").gs1(Gs1Fields {
            gtin: Some("00049000000443".into()),
            batch: Some("B2101".into()),
            serial: Some("S1".into()),
            ..Default::default()
        });
        assert_eq!(item.payload(), "010004900000044310B2101\u{1d}21S1");
        assert_eq!(item.display(), "(01)00049000000443(10)B2101(21)S1");
        assert_eq!(
            item.element().unwrap().get(gs1::Ai::Batch),
            Some("B2101")
        );
    }
}
