//! Document model types shared by every source format.
//!
//! This module defines the intermediate representation (IR) that bridges
//! format extraction and Markdown rendering. The model favours structural
//! completeness over correctness: ragged tables, empty lists, zero-length
//! text and out-of-range heading levels are all representable, and every
//! validity judgment is left to the validator.

mod block;
mod document;
mod image;
mod list;
mod paragraph;
mod table;

pub use block::{CodeBlock, ContentBlock, Heading};
pub use document::{Document, Metadata, Section};
pub use image::ImageReference;
pub use list::{ListBlock, ListItem};
pub use paragraph::{FormatSpan, Paragraph, SpanKind};
pub use table::Table;
