//! Content block union and the small block types.

use super::{ImageReference, ListBlock, Paragraph, Table};
use serde::{Deserialize, Serialize};

/// A block-level element of a section.
///
/// The set of variants is closed; consumers match exhaustively so that a
/// new block kind is a compile error everywhere it needs handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// An inline heading inside a section
    Heading(Heading),
    /// A paragraph of text
    Paragraph(Paragraph),
    /// A table
    Table(Table),
    /// An ordered or unordered list
    List(ListBlock),
    /// An image reference
    Image(ImageReference),
    /// A fenced code block
    CodeBlock(CodeBlock),
}

impl ContentBlock {
    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        match self {
            ContentBlock::Heading(h) => h.text.clone(),
            ContentBlock::Paragraph(p) => p.text.clone(),
            ContentBlock::Table(t) => t.plain_text(),
            ContentBlock::List(l) => l.plain_text(),
            ContentBlock::Image(i) => i.alt_text.clone().unwrap_or_default(),
            ContentBlock::CodeBlock(c) => c.text.clone(),
        }
    }

    /// Short lowercase name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Heading(_) => "heading",
            ContentBlock::Paragraph(_) => "paragraph",
            ContentBlock::Table(_) => "table",
            ContentBlock::List(_) => "list",
            ContentBlock::Image(_) => "image",
            ContentBlock::CodeBlock(_) => "code_block",
        }
    }
}

impl From<Heading> for ContentBlock {
    fn from(h: Heading) -> Self {
        ContentBlock::Heading(h)
    }
}

impl From<Paragraph> for ContentBlock {
    fn from(p: Paragraph) -> Self {
        ContentBlock::Paragraph(p)
    }
}

impl From<Table> for ContentBlock {
    fn from(t: Table) -> Self {
        ContentBlock::Table(t)
    }
}

impl From<ListBlock> for ContentBlock {
    fn from(l: ListBlock) -> Self {
        ContentBlock::List(l)
    }
}

impl From<ImageReference> for ContentBlock {
    fn from(i: ImageReference) -> Self {
        ContentBlock::Image(i)
    }
}

impl From<CodeBlock> for ContentBlock {
    fn from(c: CodeBlock) -> Self {
        ContentBlock::CodeBlock(c)
    }
}

/// A heading.
///
/// `level` is nominally 1-6 before the heading offset is applied; values
/// outside that range are kept and clamped at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level
    pub level: u8,
    /// Heading text
    pub text: String,
}

impl Heading {
    /// Create a heading.
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// A code block. Text is raw and never escaped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Info-string language tag
    #[serde(default)]
    pub language: Option<String>,
    /// Raw code
    pub text: String,
}

impl CodeBlock {
    /// Create a code block without a language.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            language: None,
            text: text.into(),
        }
    }

    /// Set the language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}
