//! Source format detection.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Formats a source document can arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Word processing document (OOXML)
    Docx,
    /// Spreadsheet (OOXML)
    Xlsx,
    /// Portable Document Format
    Pdf,
    /// Serialized document IR
    Json,
    /// UTF-8 text
    PlainText,
}

impl SourceFormat {
    /// Short lowercase name, also used as the extractor error label.
    pub fn name(self) -> &'static str {
        match self {
            SourceFormat::Docx => "docx",
            SourceFormat::Xlsx => "xlsx",
            SourceFormat::Pdf => "pdf",
            SourceFormat::Json => "json",
            SourceFormat::PlainText => "text",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "docx" => Some(SourceFormat::Docx),
            "xlsx" => Some(SourceFormat::Xlsx),
            "pdf" => Some(SourceFormat::Pdf),
            "json" => Some(SourceFormat::Json),
            "txt" | "text" | "md" | "markdown" => Some(SourceFormat::PlainText),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// ZIP local file header: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
/// UTF-8 byte order mark
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Detect the format of a file on disk.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<SourceFormat> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let name = path.file_name().and_then(|n| n.to_str());
    detect_format(&data, name)
}

/// Detect the format of `data`.
///
/// Content wins over the file name: magic bytes are checked first and the
/// extension of `file_name` is only consulted to break ties (an OOXML
/// package whose parts could not be identified, or text that might be
/// JSON).
pub fn detect_format(data: &[u8], file_name: Option<&str>) -> Result<SourceFormat> {
    let by_name = file_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .and_then(SourceFormat::from_extension);

    if data.starts_with(ZIP_MAGIC) {
        if contains(data, b"word/") {
            return Ok(SourceFormat::Docx);
        }
        if contains(data, b"xl/") {
            return Ok(SourceFormat::Xlsx);
        }
        return match by_name {
            Some(format @ (SourceFormat::Docx | SourceFormat::Xlsx)) => Ok(format),
            _ => Err(Error::UnknownFormat),
        };
    }

    if data.starts_with(PDF_MAGIC) {
        return Ok(SourceFormat::Pdf);
    }

    let body = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let Ok(text) = std::str::from_utf8(body) else {
        return Err(Error::UnknownFormat);
    };
    if text.contains('\0') {
        return Err(Error::UnknownFormat);
    }

    if looks_like_json(text) || by_name == Some(SourceFormat::Json) {
        return Ok(SourceFormat::Json);
    }
    Ok(SourceFormat::PlainText)
}

fn looks_like_json(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.starts_with('{')
        && trimmed.ends_with('}')
        && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
