//! Rendering result with artifacts and statistics.

use crate::model::Metadata;
use serde::{Deserialize, Serialize};

/// Result of serializing a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered Markdown
    pub content: String,

    /// Document metadata (copied from source document)
    pub metadata: Metadata,

    /// Diagram markup to persist next to its image
    pub artifacts: Vec<DiagramArtifact>,

    /// Rendering statistics
    pub stats: RenderStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(
        content: String,
        metadata: Metadata,
        artifacts: Vec<DiagramArtifact>,
        stats: RenderStats,
    ) -> Self {
        Self {
            content,
            metadata,
            artifacts,
            stats,
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Diagram markup destined for a sibling file of its source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramArtifact {
    /// Path relative to the markup file (image path with `.mmd` extension)
    pub relative_path: String,

    /// Diagram source
    pub markup: String,
}

/// Statistics collected while serializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Number of sections
    pub section_count: u32,

    /// Number of headings rendered (section and inline)
    pub heading_count: u32,

    /// Number of paragraphs rendered
    pub paragraph_count: u32,

    /// Number of tables rendered
    pub table_count: u32,

    /// Number of lists rendered
    pub list_count: u32,

    /// Number of list items, nested included
    pub list_item_count: u32,

    /// Number of image references
    pub image_count: u32,

    /// Images rendered as an extraction-failure placeholder
    pub missing_image_count: u32,

    /// OCR captions emitted
    pub ocr_caption_count: u32,

    /// Diagram blocks emitted
    pub diagram_count: u32,

    /// Number of code blocks
    pub code_block_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_section(&mut self) {
        self.section_count += 1;
    }

    pub fn add_heading(&mut self) {
        self.heading_count += 1;
    }

    pub fn add_paragraph(&mut self) {
        self.paragraph_count += 1;
    }

    pub fn add_table(&mut self) {
        self.table_count += 1;
    }

    pub fn add_list(&mut self) {
        self.list_count += 1;
    }

    pub fn add_list_item(&mut self) {
        self.list_item_count += 1;
    }

    pub fn add_image(&mut self) {
        self.image_count += 1;
    }

    pub fn add_missing_image(&mut self) {
        self.missing_image_count += 1;
    }

    pub fn add_ocr_caption(&mut self) {
        self.ocr_caption_count += 1;
    }

    pub fn add_diagram(&mut self) {
        self.diagram_count += 1;
    }

    pub fn add_code_block(&mut self) {
        self.code_block_count += 1;
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_stats_count_text() {
        let mut stats = RenderStats::new();
        stats.count_text("Hello, world! This is a test.");

        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.char_count, 24);
    }

    #[test]
    fn test_render_result_len() {
        let result = RenderResult::new(
            "# Hello\n".to_string(),
            Metadata::default(),
            Vec::new(),
            RenderStats::new(),
        );
        assert_eq!(result.content_len(), 8);
        assert!(result.artifacts.is_empty());
    }
}
