//! Flat, row-oriented snapshot of store entries.
//!
//! A [`SnapshotTable`] is a transport structure for bulk display and editing:
//! three string columns (`Section`, `Key`, `Value`) and an ordered list of
//! rows.  It does not enforce key uniqueness; two rows with the same section
//! and key are the caller's business.
//!
//! Populate one with [`crate::ConfigStore::snapshot`], or build it by hand and
//! write it back with [`crate::ConfigStore::apply_snapshot`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name given to every new table.
pub const TABLE_NAME: &str = "Info";

/// A single (section, key, value) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub section: String,
    pub key: String,
    pub value: String,
}

impl Entry {
    pub fn new(
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Returns the cell for `column`.
    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::Section => &self.section,
            Column::Key => &self.key,
            Column::Value => &self.value,
        }
    }
}

/// The three string-typed columns of a snapshot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Section,
    Key,
    Value,
}

impl Column {
    /// All columns in display order.
    pub const ALL: [Column; 3] = [Column::Section, Column::Key, Column::Value];

    /// Column header text.
    pub fn name(self) -> &'static str {
        match self {
            Column::Section => "Section",
            Column::Key => "Key",
            Column::Value => "Value",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Row-oriented copy of some or all entries of a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotTable {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Entry>,
}

impl SnapshotTable {
    /// Creates an empty table named `"Info"` with the `Section`, `Key` and
    /// `Value` columns.
    pub fn new() -> Self {
        Self {
            name: TABLE_NAME.to_string(),
            columns: Column::ALL.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Entry] {
        &self.rows
    }

    /// Mutable access for in-place editing of cells or row order.
    pub fn rows_mut(&mut self) -> &mut Vec<Entry> {
        &mut self.rows
    }

    pub fn push(&mut self, entry: Entry) {
        self.rows.push(entry);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.rows.iter()
    }

    /// Stable sort by one column using ordinal (culture-invariant) ordering.
    pub fn sort_by(&mut self, column: Column) {
        self.rows.sort_by(|a, b| a.get(column).cmp(b.get(column)));
    }
}

impl Default for SnapshotTable {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a SnapshotTable {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl Extend<Entry> for SnapshotTable {
    fn extend<I: IntoIterator<Item = Entry>>(&mut self, iter: I) {
        self.rows.extend(iter);
    }
}
