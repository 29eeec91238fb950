//! Image references.

use serde::{Deserialize, Serialize};

/// Extension used for persisted diagram markup.
pub const DIAGRAM_EXTENSION: &str = "mmd";

/// Reference to an image held in an external asset store.
///
/// Extractors create it with only `source_identifier`. The image writer,
/// OCR and diagram collaborators each add one field through the `with_*`
/// methods, which return an updated copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageReference {
    /// Opaque key into the asset store
    pub source_identifier: String,
    /// Path relative to the markup file, once persisted
    pub relative_path: Option<String>,
    /// Alternative text
    pub alt_text: Option<String>,
    /// Machine-recognized text
    pub ocr_text: Option<String>,
    /// Diagram-language rendition of the image
    pub diagram_markup: Option<String>,
}

impl ImageReference {
    /// Create a reference with only its source identifier.
    pub fn new(source_identifier: impl Into<String>) -> Self {
        Self {
            source_identifier: source_identifier.into(),
            ..Default::default()
        }
    }

    pub fn with_relative_path(mut self, path: impl Into<String>) -> Self {
        self.relative_path = Some(path.into());
        self
    }

    pub fn with_alt_text(mut self, alt: impl Into<String>) -> Self {
        self.alt_text = Some(alt.into());
        self
    }

    pub fn with_ocr_text(mut self, text: impl Into<String>) -> Self {
        self.ocr_text = Some(text.into());
        self
    }

    pub fn with_diagram_markup(mut self, markup: impl Into<String>) -> Self {
        self.diagram_markup = Some(markup.into());
        self
    }

    /// Whether the image has been persisted.
    pub fn is_persisted(&self) -> bool {
        self.relative_path
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty())
    }

    /// Whether the image travels inline as a `data:` URL.
    pub fn is_embedded(&self) -> bool {
        self.relative_path
            .as_deref()
            .is_some_and(|p| p.trim_start().starts_with("data:"))
    }

    /// Label used for alt text and placeholders: alt text, else the
    /// source identifier.
    pub fn label(&self) -> &str {
        match self.alt_text.as_deref() {
            Some(alt) if !alt.trim().is_empty() => alt,
            _ => &self.source_identifier,
        }
    }

    /// Sibling path for persisted diagram markup: `relative_path` with its
    /// extension replaced by `mmd`. `None` for embedded images.
    pub fn diagram_artifact_path(&self) -> Option<String> {
        if self.is_embedded() {
            return None;
        }
        let path = self.relative_path.as_deref().filter(|p| !p.trim().is_empty())?;
        let file_start = path.rfind('/').map_or(0, |i| i + 1);
        let stem_end = match path[file_start..].rfind('.') {
            Some(dot) if dot > 0 => file_start + dot,
            _ => path.len(),
        };
        Some(format!("{}.{}", &path[..stem_end], DIAGRAM_EXTENSION))
    }
}
