//! Paragraph and text-level types.

use serde::{Deserialize, Serialize};

/// A paragraph of text content.
///
/// `formatting` holds byte ranges over `text`. Extractors are expected to
/// emit ordered, non-overlapping spans within bounds, but the model accepts
/// anything; the serializer resolves malformed spans when rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// The text content
    pub text: String,

    /// Formatting spans over `text`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formatting: Vec<FormatSpan>,
}

impl Paragraph {
    /// Create a paragraph with plain text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            formatting: Vec::new(),
        }
    }

    /// Add a formatting span.
    pub fn with_span(mut self, start: usize, end: usize, kind: SpanKind) -> Self {
        self.formatting.push(FormatSpan { start, end, kind });
        self
    }

    /// Append a styled run, recording its span.
    pub fn push_run(&mut self, text: &str, kind: Option<SpanKind>) {
        let start = self.text.len();
        self.text.push_str(text);
        if let Some(kind) = kind {
            if !text.is_empty() {
                self.formatting.push(FormatSpan {
                    start,
                    end: self.text.len(),
                    kind,
                });
            }
        }
    }

    /// Check if the paragraph is empty.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Check whether the spans are ordered, non-overlapping and in bounds.
    pub fn spans_well_formed(&self) -> bool {
        let mut cursor = 0;
        for span in &self.formatting {
            if span.start < cursor || span.start > span.end || span.end > self.text.len() {
                return false;
            }
            cursor = span.end;
        }
        true
    }
}

/// A formatting range over paragraph text, in byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSpan {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// Formatting applied to the range
    pub kind: SpanKind,
}

impl FormatSpan {
    /// Length of the span in bytes, zero for inverted ranges.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span covers no text.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Inline formatting kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    /// `**bold**`
    Bold,
    /// `*italic*`
    Italic,
    /// `***bold italic***`
    BoldItalic,
    /// `` `code` ``
    Code,
}

impl SpanKind {
    /// Opening/closing marker for emphasis kinds; `None` for code.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            SpanKind::Bold => Some("**"),
            SpanKind::Italic => Some("*"),
            SpanKind::BoldItalic => Some("***"),
            SpanKind::Code => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_run_records_spans() {
        let mut p = Paragraph::default();
        p.push_run("Hello ", None);
        p.push_run("world", Some(SpanKind::Bold));
        p.push_run("!", None);

        assert_eq!(p.text, "Hello world!");
        assert_eq!(
            p.formatting,
            vec![FormatSpan {
                start: 6,
                end: 11,
                kind: SpanKind::Bold
            }]
        );
        assert!(p.spans_well_formed());
    }

    #[test]
    fn test_overlapping_spans_are_representable() {
        let p = Paragraph::new("abcdef")
            .with_span(0, 4, SpanKind::Bold)
            .with_span(2, 6, SpanKind::Italic);
        assert!(!p.spans_well_formed());
        assert_eq!(p.formatting.len(), 2);
    }

    #[test]
    fn test_out_of_bounds_span() {
        let p = Paragraph::new("abc").with_span(1, 10, SpanKind::Code);
        assert!(!p.spans_well_formed());
    }

    #[test]
    fn test_is_empty() {
        assert!(Paragraph::new("  \n").is_empty());
        assert!(!Paragraph::new("x").is_empty());
    }

    #[test]
    fn test_span_kind_marker() {
        assert_eq!(SpanKind::Bold.marker(), Some("**"));
        assert_eq!(SpanKind::Code.marker(), None);
    }
}
