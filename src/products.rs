//! Products
//!
//! Product references and the catalog snapshot used to price line items.

use std::{fmt, fs, path::Path};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix used for packs assembled in the custom pack builder.
const CUSTOM_PACK_PREFIX: &str = "custom-";

/// Reference to a product or gift pack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductRef(String);

impl ProductRef {
    /// Create a new product reference.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this reference points at a pack built in the custom pack builder.
    ///
    /// Custom packs are created on the fly and never appear in the catalog.
    pub fn is_custom(&self) -> bool {
        self.0.starts_with(CUSTOM_PACK_PREFIX)
    }
}

impl fmt::Display for ProductRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Catalog entry: list price and percentage discount for a product or pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Product reference
    pub id: ProductRef,

    /// List price in whole currency units
    pub price: u64,

    /// Percentage discount on the list price (0-100)
    #[serde(default)]
    pub discount_percentage: u8,
}

impl CatalogEntry {
    /// Create a new catalog entry.
    pub fn new(id: impl Into<ProductRef>, price: u64, discount_percentage: u8) -> Self {
        Self {
            id: id.into(),
            price,
            discount_percentage,
        }
    }

    /// The product discount as a percentage, capped at 100%.
    pub fn discount(&self) -> Percentage {
        Percentage::from(Decimal::from(self.discount_percentage.min(100)) / Decimal::ONE_HUNDRED)
    }

    /// Unit price after the product discount, unrounded.
    pub fn unit_price(&self) -> Decimal {
        let price = Decimal::from(self.price);

        price - self.discount() * price
    }
}

/// Errors raised while reading a catalog snapshot file.
#[derive(Debug, Error)]
pub enum CatalogFileError {
    /// IO error reading the snapshot file
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Catalog snapshot file layout.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<CatalogEntry>,
}

/// A snapshot of the product catalog keyed by product reference.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: FxHashMap<ProductRef, CatalogEntry>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog snapshot from YAML.
    ///
    /// ```yaml
    /// products:
    ///   - id: birthday-bliss
    ///     price: 2499
    ///     discountPercentage: 10
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`CatalogFileError::Yaml`] if the document is not a valid snapshot.
    pub fn from_yaml(contents: &str) -> Result<Self, CatalogFileError> {
        let file: CatalogFile = serde_norway::from_str(contents)?;

        Ok(file.products.into_iter().collect())
    }

    /// Load a catalog snapshot from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_yaml(path: impl AsRef<Path>) -> Result<Self, CatalogFileError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Insert or replace an entry, returning the previous one.
    pub fn insert(&mut self, entry: CatalogEntry) -> Option<CatalogEntry> {
        self.entries.insert(entry.id.clone(), entry)
    }

    /// Look up an entry by product reference.
    pub fn get(&self, product: &ProductRef) -> Option<&CatalogEntry> {
        self.entries.get(product)
    }

    /// Number of entries in the snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        let mut catalog = Catalog::new();

        for entry in iter {
            catalog.insert(entry);
        }

        catalog
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn unit_price_applies_discount() {
        let entry = CatalogEntry::new("birthday-bliss", 2000, 10);

        assert_eq!(entry.unit_price(), Decimal::from(1800));
    }

    #[test]
    fn unit_price_keeps_fractions() {
        let entry = CatalogEntry::new("festive-hamper", 999, 15);

        assert_eq!(entry.unit_price(), Decimal::new(84915, 2));
    }

    #[test]
    fn discount_is_capped_at_one_hundred_percent() {
        let entry = CatalogEntry::new("free-sample", 500, 150);

        assert_eq!(entry.unit_price(), Decimal::ZERO);
    }

    #[test]
    fn custom_references_are_detected() {
        assert!(ProductRef::from("custom-1700000000").is_custom());
        assert!(!ProductRef::from("birthday-bliss").is_custom());
    }

    #[test]
    fn later_entries_replace_earlier_ones() {
        let catalog: Catalog = [
            CatalogEntry::new("a", 100, 0),
            CatalogEntry::new("a", 150, 0),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(&"a".into()).map(|e| e.price), Some(150));
    }

    #[test]
    fn parses_yaml_snapshot() -> TestResult {
        let catalog = Catalog::from_yaml(
            "products:\n  - id: birthday-bliss\n    price: 2499\n    discountPercentage: 10\n  - id: corporate-crate\n    price: 4999\n",
        )?;

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get(&"corporate-crate".into()),
            Some(&CatalogEntry::new("corporate-crate", 4999, 0))
        );

        Ok(())
    }

    #[test]
    fn rejects_malformed_yaml() {
        let result = Catalog::from_yaml("products: [");

        assert!(matches!(result, Err(CatalogFileError::Yaml(_))));
    }
}
