//! Markdown validation.
//!
//! [`validate`] is a pure function over Markup text. Every check runs on
//! every call and reports its findings as [`Issue`]s; nothing is ever
//! raised. A result is invalid only when an [`Severity::Error`] issue
//! exists.
//!
//! Checks:
//!
//! - unclosed fenced code block (error)
//! - table separator or row cell count differing from the header (warning,
//!   one per offending row)
//! - ATX heading without a space after `#`, or deeper than six (warning)
//! - link with empty text, link or image with empty target (warning)
//! - ordered-list marker not followed by a space (warning)
//! - anomalies found by a full CommonMark parse that no check above
//!   covers: setext headings, empty headings, raw HTML, undefined
//!   reference links, pipe rows without a separator (info)

mod checks;
mod grammar;
mod issue;

pub use issue::{Issue, Severity, ValidationResult, MAX_CONTEXT_CHARS};

use crate::syntax::{self, FenceRegion};

/// Validate Markdown text with the default validator.
pub fn validate(markup: &str) -> ValidationResult {
    Validator::new().validate(markup)
}

/// Markdown validator.
#[derive(Debug, Clone)]
pub struct Validator {
    grammar_checks: bool,
}

impl Validator {
    /// Create a validator running every check.
    pub fn new() -> Self {
        Self {
            grammar_checks: true,
        }
    }

    /// Enable or disable the informational full-parse pass.
    pub fn with_grammar_checks(mut self, enabled: bool) -> Self {
        self.grammar_checks = enabled;
        self
    }

    /// Validate Markdown text.
    pub fn validate(&self, markup: &str) -> ValidationResult {
        let masked = syntax::mask_front_matter(markup);
        let view = LineView::new(markup);

        let mut issues = Vec::new();
        issues.extend(checks::code_fences(&view));
        issues.extend(checks::tables(&view));
        issues.extend(checks::headings(&view));
        issues.extend(checks::links(&view));
        issues.extend(checks::ordered_lists(&view));

        if self.grammar_checks {
            for info in grammar::parse_anomalies(&masked, &view) {
                if !issues.iter().any(|i| i.line == info.line) {
                    issues.push(info);
                }
            }
        }

        let result = ValidationResult::from_issues(issues);
        log::debug!(
            "Validated {} lines: {} errors, {} warnings, {} info",
            view.lines.len(),
            result.error_count(),
            result.warning_count(),
            result.info_count()
        );
        result
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Lines of the input with fenced blocks and front matter marked as
/// inactive, plus a byte-offset to line index map.
pub(crate) struct LineView<'a> {
    lines: Vec<&'a str>,
    line_starts: Vec<usize>,
    active: Vec<bool>,
    fences: Vec<FenceRegion>,
}

impl<'a> LineView<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut line_starts = Vec::new();
        let mut offset = 0;
        for raw in text.split_inclusive('\n') {
            line_starts.push(offset);
            offset += raw.len();
            lines.push(raw.trim_end_matches(['\n', '\r']));
        }

        let mut active = vec![true; lines.len()];
        if let Some((start, end)) = syntax::front_matter_lines(&lines) {
            active[start..=end].iter_mut().for_each(|a| *a = false);
        }

        let fences: Vec<FenceRegion> = syntax::fence_regions(&lines)
            .into_iter()
            .filter(|region| active[region.start])
            .collect();
        for region in &fences {
            let last = region.last_line(lines.len());
            active[region.start..=last].iter_mut().for_each(|a| *a = false);
        }

        Self {
            lines,
            line_starts,
            active,
            fences,
        }
    }

    fn is_active(&self, idx: usize) -> bool {
        self.active.get(idx).copied().unwrap_or(false)
    }

    fn active_lines(&self) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .filter(|(idx, _)| self.is_active(*idx))
            .map(|(idx, line)| (idx, *line))
    }

    /// Line index holding byte `offset`.
    fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_document_is_valid() {
        let text = "# Title\n\nBody text.\n\n| a | b |\n| --- | --- |\n| 1 | 2 |\n";
        let result = validate(text);
        assert!(result.valid);
        assert!(result.issues.is_empty(), "{:?}", result.issues);
    }

    #[test]
    fn test_unclosed_fence_is_single_error() {
        let result = validate("# Code\n\n```python\nprint('hi')\n");
        assert!(!result.valid);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].line, 3);
    }

    #[test]
    fn test_warnings_keep_document_valid() {
        let result = validate("#Bad\n\n[](x)\n");
        assert!(result.valid);
        assert_eq!(result.warning_count(), 2);
    }

    #[test]
    fn test_lines_inside_fences_are_not_checked() {
        let result = validate("```\n#Bad\n[](x)\n1.x\n```\n");
        assert!(result.valid);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_front_matter_is_skipped() {
        let result = validate("---\ntitle: \"x\"\n---\n\n# Body\n");
        assert!(result.issues.is_empty(), "{:?}", result.issues);
    }

    #[test]
    fn test_info_deduplicated_by_line() {
        // Raw HTML info is dropped; the link warning already covers line 1.
        let result = validate("<div>[](x)</div>\n");
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_line_of() {
        let view = LineView::new("ab\ncd\r\nef");
        assert_eq!(view.lines, vec!["ab", "cd", "ef"]);
        assert_eq!(view.line_of(0), 0);
        assert_eq!(view.line_of(4), 1);
        assert_eq!(view.line_of(7), 2);
    }

    #[test]
    fn test_grammar_checks_can_be_disabled() {
        let result = Validator::new()
            .with_grammar_checks(false)
            .validate("<div>x</div>\n");
        assert!(result.issues.is_empty());
    }
}
