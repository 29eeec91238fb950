//! Table types.

use serde::{Deserialize, Serialize};

/// A table structure.
///
/// Rows may be ragged. The model keeps them as extracted so partial source
/// tables round-trip without loss; mismatches are reported by the validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Header cells (defines the column count)
    #[serde(default)]
    pub headers: Vec<String>,

    /// Data rows
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table with the given headers and no rows.
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Create a table from string-like headers and rows.
    pub fn from_rows<H, R, S>(headers: H, rows: R) -> Self
    where
        H: IntoIterator<Item = S>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Add a data row.
    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Number of columns, as defined by the header.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row, header included.
    pub fn max_width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    /// Check if any data row differs in length from the header.
    pub fn is_ragged(&self) -> bool {
        self.rows.iter().any(|r| r.len() != self.headers.len())
    }

    /// Check if the table has no cells: no headers and only empty rows.
    pub fn is_empty(&self) -> bool {
        self.max_width() == 0
    }

    /// Get plain text representation (tab-separated cells).
    pub fn plain_text(&self) -> String {
        std::iter::once(&self.headers)
            .chain(self.rows.iter())
            .filter(|row| !row.is_empty())
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
