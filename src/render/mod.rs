//! Rendering module for converting documents to Markdown and JSON.

mod escape;
mod json;
mod markdown;
mod options;
mod pretty;
mod result;

pub use escape::{escape, escape_url, escape_with, EscapeContext};
pub use json::{to_json, JsonFormat};
pub use markdown::{
    effective_heading_level, serialize, to_markdown_with_stats, MarkdownSerializer,
    DIAGRAM_LANGUAGE, MISSING_IMAGE_PREFIX, OCR_CAPTION_PREFIX,
};
pub use options::{RaggedRows, SerializeOptions, TableStyle};
pub use pretty::{format, PrettyOptions, PrettyPrinter};
pub use result::{DiagramArtifact, RenderResult, RenderStats};
