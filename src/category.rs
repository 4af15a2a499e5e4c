use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Label used for codes that have no entry in the table
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Merchant category code to label table
///
/// Passed into [`CategoryResolver`] at construction, so every aggregation call
/// sees an explicit table instead of process-wide state.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    labels: HashMap<String, String>,
    fallback: String,
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    code: String,
    label: String,
}

impl CategoryTable {
    /// Empty table; every code resolves to the fallback label
    pub fn empty() -> Self {
        Self {
            labels: HashMap::new(),
            fallback: UNCATEGORIZED.to_string(),
        }
    }

    /// Build a table from `(code, label)` pairs
    pub fn from_pairs<I, C, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, L)>,
        C: Into<String>,
        L: Into<String>,
    {
        let mut table = Self::empty();
        for (code, label) in pairs {
            table.insert(code, label);
        }
        table
    }

    /// Load a table from CSV with a `code,label` header
    ///
    /// Entries are layered over the built-in defaults, so a file only needs
    /// the codes it wants to add or rename.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut table = Self::default();
        for row in csv_reader.deserialize() {
            let row: CategoryRow = row?;
            table.insert(row.code, row.label);
        }
        Ok(table)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Add or replace one mapping
    pub fn insert(&mut self, code: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(code.into(), label.into());
    }

    /// Replace the label returned for unknown codes
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::from_pairs([
            ("5411", "Supermarkets"),
            ("5812", "Restaurants"),
            ("5814", "Fast food"),
            ("5541", "Fuel"),
            ("5912", "Pharmacies"),
            ("4111", "Transport"),
            ("4814", "Telecom"),
            ("5311", "Department stores"),
            ("5651", "Clothing"),
            ("7832", "Cinema"),
        ])
    }
}

/// Resolves raw category codes to human-readable labels
///
/// Resolution is total: codes missing from the table map to the table's
/// fallback label ([`UNCATEGORIZED`] unless overridden).
#[derive(Debug, Clone, Default)]
pub struct CategoryResolver {
    table: CategoryTable,
}

impl CategoryResolver {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    pub fn resolve(&self, code: &str) -> &str {
        self.table
            .labels
            .get(code)
            .map(String::as_str)
            .unwrap_or(self.table.fallback.as_str())
    }
}
