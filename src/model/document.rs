//! Document-level types.

use super::{ContentBlock, Heading, ImageReference};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A converted document.
///
/// Built once per conversion by an extractor and consumed read-only by the
/// serializer. Hierarchy is carried by heading levels only; sections never
/// nest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, author, etc.)
    #[serde(default)]
    pub metadata: Metadata,

    /// Sections in document order
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document with the given metadata.
    pub fn with_metadata(metadata: Metadata) -> Self {
        Self {
            metadata,
            sections: Vec::new(),
        }
    }

    /// Add a section to the document.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Get the number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Check if the document has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Iterate over every content block of every section, in order.
    pub fn blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.sections.iter().flat_map(|s| s.blocks.iter())
    }

    /// Iterate over every image reference in the document.
    pub fn images(&self) -> impl Iterator<Item = &ImageReference> {
        self.blocks().filter_map(|block| match block {
            ContentBlock::Image(image) => Some(image),
            _ => None,
        })
    }

    /// Return a copy of the document with every image reference replaced by
    /// the result of `f`.
    ///
    /// Collaborators use this to enrich images (paths, OCR text, diagram
    /// markup) without mutating a document another stage may still read.
    pub fn map_images<F>(&self, mut f: F) -> Document
    where
        F: FnMut(&ImageReference) -> ImageReference,
    {
        let sections = self
            .sections
            .iter()
            .map(|section| Section {
                heading: section.heading.clone(),
                blocks: section
                    .blocks
                    .iter()
                    .map(|block| match block {
                        ContentBlock::Image(image) => ContentBlock::Image(f(image)),
                        other => other.clone(),
                    })
                    .collect(),
            })
            .collect();

        Document {
            metadata: self.metadata.clone(),
            sections,
        }
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.sections
            .iter()
            .map(|section| section.plain_text())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A run of content blocks, optionally introduced by a heading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section heading
    #[serde(default)]
    pub heading: Option<Heading>,

    /// Content blocks in order
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
}

impl Section {
    /// Create an empty section without a heading.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty section introduced by `heading`.
    pub fn with_heading(heading: Heading) -> Self {
        Self {
            heading: Some(heading),
            blocks: Vec::new(),
        }
    }

    /// Add a block to the section.
    pub fn push(&mut self, block: impl Into<ContentBlock>) {
        self.blocks.push(block.into());
    }

    /// Builder form of [`Section::push`].
    pub fn with_block(mut self, block: impl Into<ContentBlock>) -> Self {
        self.push(block);
        self
    }

    /// Check if the section has neither a heading nor content.
    pub fn is_empty(&self) -> bool {
        self.heading.is_none() && self.blocks.is_empty()
    }

    /// Get plain text content of the section.
    pub fn plain_text(&self) -> String {
        let heading = self.heading.iter().map(|h| h.text.clone());
        let blocks = self.blocks.iter().map(ContentBlock::plain_text);
        heading
            .chain(blocks)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Source format name (e.g., "docx", "xlsx", "pdf")
    pub source_format: Option<String>,

    /// Number of pages, for paged sources
    pub page_count: Option<u32>,

    /// Number of sheets, for workbooks
    pub sheet_count: Option<u32>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Create metadata carrying only the source format.
    pub fn with_source_format(format: impl Into<String>) -> Self {
        Self {
            source_format: Some(format.into()),
            ..Default::default()
        }
    }

    /// Check if no field is populated.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.source_format.is_none()
            && self.page_count.is_none()
            && self.sheet_count.is_none()
            && self.created.is_none()
            && self.modified.is_none()
    }

    /// Convert metadata to a YAML front matter block.
    ///
    /// Returns `None` when no field is populated; otherwise every present
    /// field is emitted, in a fixed order, between `---` delimiters.
    pub fn to_front_matter(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let mut lines = vec!["---".to_string()];

        if let Some(ref title) = self.title {
            lines.push(format!("title: \"{}\"", escape_yaml(title)));
        }
        if let Some(ref author) = self.author {
            lines.push(format!("author: \"{}\"", escape_yaml(author)));
        }
        if let Some(ref format) = self.source_format {
            lines.push(format!("source_format: \"{}\"", escape_yaml(format)));
        }
        if let Some(pages) = self.page_count {
            lines.push(format!("pages: {}", pages));
        }
        if let Some(sheets) = self.sheet_count {
            lines.push(format!("sheets: {}", sheets));
        }
        if let Some(ref created) = self.created {
            lines.push(format!("created: {}", created.to_rfc3339()));
        }
        if let Some(ref modified) = self.modified {
            lines.push(format!("modified: {}", modified.to_rfc3339()));
        }

        lines.push("---".to_string());
        Some(lines.join("\n"))
    }
}

/// Escape a value for a double-quoted YAML scalar. Control characters
/// and Unicode line separators become escapes, so the value stays on one
/// line.
fn escape_yaml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}') => {
                out.push_str(&format!("\\u{:04X}", u32::from(c)));
            }
            c => out.push(c),
        }
    }
    out
}
