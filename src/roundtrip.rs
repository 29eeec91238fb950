//! Structural round-trip check.
//!
//! Serialized Markdown is parsed back with a CommonMark + GFM-tables
//! parser and the text of headings, paragraphs and table cells is compared
//! with the text the document carried. Whitespace is normalized on both
//! sides. Lists, images, code blocks and front matter are not compared.
//!
//! The serializer adds blocks of its own (OCR captions, for instance), so
//! the document's blocks only have to appear in order among the parsed
//! ones, not match them one to one.

use crate::model::{ContentBlock, Document, Table};
use crate::render::{self, SerializeOptions};
use crate::syntax;
use pulldown_cmark::{Event, Options, Parser, Tag};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Outcome of a round-trip check.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundTripReport {
    /// Every expected block was recovered, in order
    pub equivalent: bool,

    /// Normalized text blocks taken from the document
    pub expected: Vec<String>,

    /// Normalized text blocks recovered from the Markdown
    pub actual: Vec<String>,

    /// Expected blocks that were not recovered
    pub missing: Vec<String>,
}

/// Serialize `doc` with `options` and check the output against it.
pub fn verify(doc: &Document, options: &SerializeOptions) -> RoundTripReport {
    let markup = render::serialize(doc, options);
    check(doc, &markup)
}

/// Check that `markup` carries the heading, paragraph and table text of
/// `doc`.
pub fn check(doc: &Document, markup: &str) -> RoundTripReport {
    let expected = document_blocks(doc);
    let actual = markdown_blocks(markup);

    let mut missing = Vec::new();
    let mut cursor = 0;
    for block in &expected {
        match actual[cursor..].iter().position(|a| a == block) {
            Some(offset) => cursor += offset + 1,
            None => missing.push(block.clone()),
        }
    }

    if !missing.is_empty() {
        log::debug!(
            "Round trip lost {} of {} blocks",
            missing.len(),
            expected.len()
        );
    }

    RoundTripReport {
        equivalent: missing.is_empty(),
        expected,
        actual,
        missing,
    }
}

/// Normalized heading, paragraph and table-cell text of a document, in
/// reading order.
pub fn document_blocks(doc: &Document) -> Vec<String> {
    let mut blocks = Vec::new();

    for section in &doc.sections {
        if let Some(ref heading) = section.heading {
            push_normalized(&mut blocks, &heading.text);
        }
        for block in &section.blocks {
            match block {
                ContentBlock::Heading(h) => push_normalized(&mut blocks, &h.text),
                ContentBlock::Paragraph(p) => push_normalized(&mut blocks, &p.text),
                ContentBlock::Table(t) => table_cells(&mut blocks, t),
                ContentBlock::List(_) | ContentBlock::Image(_) | ContentBlock::CodeBlock(_) => {}
            }
        }
    }

    blocks
}

fn table_cells(blocks: &mut Vec<String>, table: &Table) {
    let width = if table.headers.is_empty() {
        table.max_width()
    } else {
        table.headers.len()
    };
    for cell in &table.headers {
        push_normalized(blocks, cell);
    }
    for row in &table.rows {
        for cell in row.iter().take(width) {
            push_normalized(blocks, cell);
        }
    }
}

/// Normalized heading, paragraph and table-cell text recovered by parsing
/// Markdown. Paragraphs inside list items and image alt text are skipped.
pub fn markdown_blocks(markup: &str) -> Vec<String> {
    let masked = syntax::mask_front_matter(markup);
    let parser = Parser::new_ext(&masked, Options::ENABLE_TABLES);

    let mut blocks = Vec::new();
    let mut current: Option<String> = None;
    let mut list_depth = 0usize;
    let mut image_depth = 0usize;

    for event in parser {
        match event {
            Event::Start(Tag::List(_)) => list_depth += 1,
            Event::End(Tag::List(_)) => list_depth = list_depth.saturating_sub(1),
            Event::Start(Tag::Image(..)) => image_depth += 1,
            Event::End(Tag::Image(..)) => image_depth = image_depth.saturating_sub(1),

            Event::Start(Tag::Heading(..)) | Event::Start(Tag::TableCell) => {
                current = Some(String::new());
            }
            Event::Start(Tag::Paragraph) if list_depth == 0 => {
                current = Some(String::new());
            }
            Event::End(Tag::Heading(..))
            | Event::End(Tag::TableCell)
            | Event::End(Tag::Paragraph) => {
                if let Some(text) = current.take() {
                    push_normalized(&mut blocks, &text);
                }
            }

            Event::Text(t) | Event::Code(t) if image_depth == 0 => {
                if let Some(ref mut text) = current {
                    text.push_str(&t);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(ref mut text) = current {
                    text.push(' ');
                }
            }
            Event::Html(html) if html.trim().to_ascii_lowercase().starts_with("<br") => {
                if let Some(ref mut text) = current {
                    text.push(' ');
                }
            }
            _ => {}
        }
    }

    blocks
}

fn push_normalized(blocks: &mut Vec<String>, text: &str) {
    let normalized = normalize(text);
    if !normalized.is_empty() {
        blocks.push(normalized);
    }
}

/// NFC, whitespace runs collapsed to one space, trimmed.
fn normalize(text: &str) -> String {
    let composed: String = text.nfc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}
