//! Serializer options.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Options for serializing a document to Markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Added to every heading level before clamping to 1-6.
    ///
    /// The clamp saturates, so distinct source levels can collapse onto
    /// the same output level (`4`, `5` and `6` with offset `+2` all render
    /// as `######`). The mapping is lossy at both bounds.
    pub heading_offset: i32,

    /// Emit a front matter block with document metadata
    pub include_metadata: bool,

    /// Table syntax
    pub table_style: TableStyle,

    /// Handling of rows whose length differs from the header
    pub ragged_rows: RaggedRows,
}

impl SerializeOptions {
    /// Create new serialize options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading offset.
    pub fn with_heading_offset(mut self, offset: i32) -> Self {
        self.heading_offset = offset;
        self
    }

    /// Enable or disable the metadata block.
    pub fn with_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }

    /// Set the table style.
    pub fn with_table_style(mut self, style: TableStyle) -> Self {
        self.table_style = style;
        self
    }

    /// Set the ragged row policy.
    pub fn with_ragged_rows(mut self, policy: RaggedRows) -> Self {
        self.ragged_rows = policy;
        self
    }
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            heading_offset: 0,
            include_metadata: false,
            table_style: TableStyle::Standard,
            ragged_rows: RaggedRows::Normalize,
        }
    }
}

/// Table syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStyle {
    /// GFM pipe table: header row, `---` separator, data rows
    #[default]
    Standard,
}

impl FromStr for TableStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(TableStyle::Standard),
            other => Err(format!("unknown table style '{}'", other)),
        }
    }
}

impl fmt::Display for TableStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableStyle::Standard => f.write_str("standard"),
        }
    }
}

/// What the serializer does with rows whose cell count differs from the
/// header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaggedRows {
    /// Pad short rows with empty cells and drop extra cells before
    /// emitting. Output is always rectangular.
    #[default]
    Normalize,
    /// Emit rows as they are, leaving the mismatch for the validator to
    /// report.
    Preserve,
}

impl FromStr for RaggedRows {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preserve" => Ok(RaggedRows::Preserve),
            "normalize" => Ok(RaggedRows::Normalize),
            other => Err(format!("unknown ragged row policy '{}'", other)),
        }
    }
}
