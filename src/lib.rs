//! # doc2md
//!
//! Format-agnostic document model with a deterministic Markdown
//! serializer, pretty printer and validator.
//!
//! Source formats are read by extractors into a [`Document`]; the
//! document is serialized to Markdown, normalized by the pretty printer
//! and checked by the validator. Serialization, formatting and
//! validation never fail: malformed input degrades to the closest safe
//! output, and validation findings are returned as data.
//!
//! ## Quick Start
//!
//! ```no_run
//! use doc2md::model::{Document, Heading, Paragraph, Section};
//! use doc2md::SerializeOptions;
//!
//! let mut doc = Document::new();
//! doc.add_section(
//!     Section::with_heading(Heading::new(1, "Report"))
//!         .with_block(Paragraph::new("Quarterly figures.")),
//! );
//!
//! let markdown = doc2md::serialize(&doc, &SerializeOptions::default());
//! let markdown = doc2md::format(&markdown);
//! let result = doc2md::validate(&markdown);
//! assert!(result.valid);
//! ```
//!
//! ## Features
//!
//! - **Heading offset**: levels shifted and clamped to 1-6
//! - **Idempotent escaping**: escaping escaped text changes nothing
//! - **Tables, lists, images**: ragged rows, nesting, OCR captions and
//!   diagram blocks with sibling artifacts
//! - **Pretty printing**: idempotent, aligns tables, leaves fences alone
//! - **Validation**: errors, warnings and info with line numbers
//! - **Batch conversion**: files converted in parallel with Rayon

pub mod config;
pub mod convert;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod output;
pub mod render;
pub mod roundtrip;
mod syntax;
pub mod validate;

// Re-export commonly used types
pub use config::{ConfigOverrides, ConversionConfig};
pub use convert::{BatchProgress, ConversionOutcome, Converter, FileConversion};
pub use detect::{detect_format, detect_format_from_path, SourceFormat};
pub use error::{Error, Result};
pub use extract::{ExtractFn, ExtractorRegistry};
pub use model::{
    CodeBlock, ContentBlock, Document, FormatSpan, Heading, ImageReference, ListBlock, ListItem,
    Metadata, Paragraph, Section, SpanKind, Table,
};
pub use output::{ImageAsset, OutputEncoding, OutputWriter};
pub use render::{
    effective_heading_level, escape, JsonFormat, PrettyPrinter, RaggedRows, RenderResult,
    RenderStats, SerializeOptions, TableStyle,
};
pub use roundtrip::RoundTripReport;
pub use validate::{Issue, Severity, ValidationResult, Validator};

use std::path::Path;

/// Serialize a document to Markdown.
///
/// # Example
///
/// ```
/// use doc2md::{Document, Heading, Section, SerializeOptions};
///
/// let mut doc = Document::new();
/// doc.add_section(Section::with_heading(Heading::new(5, "Deep")));
///
/// let options = SerializeOptions::new().with_heading_offset(2);
/// assert_eq!(doc2md::serialize(&doc, &options), "###### Deep\n");
/// ```
pub fn serialize(doc: &Document, options: &SerializeOptions) -> String {
    render::serialize(doc, options)
}

/// Normalize Markdown layout. `format(format(m)) == format(m)`.
pub fn format(markup: &str) -> String {
    render::format(markup)
}

/// Validate Markdown text.
///
/// # Example
///
/// ```
/// let result = doc2md::validate("```\nunclosed\n");
/// assert!(!result.valid);
/// assert_eq!(result.error_count(), 1);
/// ```
pub fn validate(markup: &str) -> ValidationResult {
    validate::validate(markup)
}

/// Read a file into a document with the built-in extractors.
///
/// # Example
///
/// ```no_run
/// let doc = doc2md::parse_file("notes.txt").unwrap();
/// println!("Sections: {}", doc.section_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let name = path.file_name().and_then(|n| n.to_str());
    let format = detect_format(&data, name)?;
    ExtractorRegistry::with_defaults().extract(format, &data)
}

/// Convert a file to pretty-printed Markdown with default settings.
///
/// # Example
///
/// ```no_run
/// let markdown = doc2md::to_markdown("notes.txt").unwrap();
/// std::fs::write("notes.md", markdown).unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    Converter::default()
        .convert_file(path)
        .map(|outcome| outcome.markdown)
}

/// Convert a file's document model to JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_json(&doc, format)
}
