//! Extractor dispatch table.
//!
//! An extractor turns the bytes of one source format into a [`Document`].
//! Extractors are plain functions registered per [`SourceFormat`]; the
//! crate ships the JSON (serialized IR) and plain-text ones. Word, Excel
//! and PDF extractors are supplied by the embedding application.

use crate::detect::SourceFormat;
use crate::error::{Error, Result};
use crate::model::{Document, Heading, Metadata, Paragraph, Section};
use std::collections::HashMap;

/// Extractor entry point.
pub type ExtractFn = fn(&[u8]) -> Result<Document>;

/// Registry mapping source formats to extractors.
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: HashMap<SourceFormat, ExtractFn>,
}

impl ExtractorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Create a registry with the built-in extractors.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SourceFormat::Json, extract_json);
        registry.register(SourceFormat::PlainText, extract_plain_text);
        registry
    }

    /// Register an extractor, replacing any previous one for `format`.
    pub fn register(&mut self, format: SourceFormat, extractor: ExtractFn) {
        self.extractors.insert(format, extractor);
    }

    /// Check if a format has an extractor.
    pub fn supports(&self, format: SourceFormat) -> bool {
        self.extractors.contains_key(&format)
    }

    /// Registered formats.
    pub fn formats(&self) -> Vec<SourceFormat> {
        let mut formats: Vec<SourceFormat> = self.extractors.keys().copied().collect();
        formats.sort_by_key(|f| f.name());
        formats
    }

    /// Run the extractor registered for `format`.
    pub fn extract(&self, format: SourceFormat, data: &[u8]) -> Result<Document> {
        let extractor = self
            .extractors
            .get(&format)
            .ok_or_else(|| Error::UnsupportedFormat(format.to_string()))?;

        let mut doc = extractor(data)?;
        if doc.metadata.source_format.is_none() {
            doc.metadata.source_format = Some(format.to_string());
        }
        Ok(doc)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("formats", &self.formats())
            .finish()
    }
}

/// Deserialize a document IR from JSON.
pub fn extract_json(data: &[u8]) -> Result<Document> {
    serde_json::from_slice(data).map_err(|e| Error::extract(SourceFormat::Json.name(), e.to_string()))
}

/// Read UTF-8 text as a document.
///
/// Lines starting with `#` become headings, each opening a new section.
/// Blank lines separate paragraphs.
pub fn extract_plain_text(data: &[u8]) -> Result<Document> {
    let text = std::str::from_utf8(data)
        .map_err(|e| Error::extract(SourceFormat::PlainText.name(), e.to_string()))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut doc = Document::with_metadata(Metadata::with_source_format(
        SourceFormat::PlainText.name(),
    ));
    let mut section = Section::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();

        if let Some(heading) = parse_heading(trimmed) {
            flush_paragraph(&mut section, &mut paragraph);
            if !section.is_empty() {
                doc.add_section(std::mem::take(&mut section));
            }
            section = Section::with_heading(heading);
        } else if trimmed.is_empty() {
            flush_paragraph(&mut section, &mut paragraph);
        } else {
            paragraph.push(trimmed);
        }
    }

    flush_paragraph(&mut section, &mut paragraph);
    if !section.is_empty() {
        doc.add_section(section);
    }
    Ok(doc)
}

fn parse_heading(line: &str) -> Option<Heading> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 {
        return None;
    }
    let text = line[level..].trim();
    if text.is_empty() {
        return None;
    }
    Some(Heading::new(level.min(usize::from(u8::MAX)) as u8, text))
}

fn flush_paragraph(section: &mut Section, lines: &mut Vec<&str>) {
    if !lines.is_empty() {
        section.push(Paragraph::new(lines.join("\n")));
        lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContentBlock;

    #[test]
    fn test_plain_text_sections() {
        let doc = extract_plain_text(b"preamble\n\n# First\nline one\nline two\n\nnext\n## Second\n").unwrap();
        assert_eq!(doc.section_count(), 3);
        assert!(doc.sections[0].heading.is_none());

        let first = &doc.sections[1];
        assert_eq!(first.heading.as_ref().unwrap().text, "First");
        assert_eq!(first.blocks.len(), 2);
        match &first.blocks[0] {
            ContentBlock::Paragraph(p) => assert_eq!(p.text, "line one\nline two"),
            other => panic!("unexpected block {:?}", other),
        }

        let second = &doc.sections[2];
        assert_eq!(second.heading.as_ref().unwrap().level, 2);
        assert_eq!(doc.metadata.source_format.as_deref(), Some("text"));
    }

    #[test]
    fn test_plain_text_rejects_invalid_utf8() {
        let err = extract_plain_text(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, Error::Extract { .. }));
    }

    #[test]
    fn test_json_extractor() {
        let doc = extract_json(br#"{"sections":[{"blocks":[{"type":"paragraph","text":"hi"}]}]}"#).unwrap();
        assert_eq!(doc.plain_text().trim(), "hi");
        assert!(extract_json(b"[1, 2]").is_err());
    }

    #[test]
    fn test_unregistered_format() {
        let registry = ExtractorRegistry::with_defaults();
        assert!(registry.supports(SourceFormat::Json));
        assert!(!registry.supports(SourceFormat::Docx));

        let err = registry.extract(SourceFormat::Docx, b"").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref f) if f == "docx"));
    }

    #[test]
    fn test_registry_sets_source_format() {
        let registry = ExtractorRegistry::with_defaults();
        let doc = registry
            .extract(SourceFormat::Json, br#"{"sections":[]}"#)
            .unwrap();
        assert_eq!(doc.metadata.source_format.as_deref(), Some("json"));
    }

    #[test]
    fn test_custom_extractor() {
        fn fake_docx(_: &[u8]) -> Result<Document> {
            Ok(Document::new())
        }
        let mut registry = ExtractorRegistry::new();
        registry.register(SourceFormat::Docx, fake_docx);
        assert_eq!(registry.formats(), vec![SourceFormat::Docx]);
        assert!(registry.extract(SourceFormat::Docx, b"").is_ok());
    }
}
