//! Line-based structural checks.

use super::{Issue, LineView};
use crate::syntax::{self, AtxMarker};
use once_cell::sync::Lazy;
use regex::Regex;

static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(!?)\[([^\]]*)\]\(([^)]*)\)").expect("link pattern is valid")
});

static ORDERED_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}\d{1,9}[.)][^\s\d]").expect("list pattern is valid"));

/// Unclosed fenced code blocks, one error at each opening fence.
pub(super) fn code_fences(view: &LineView<'_>) -> Vec<Issue> {
    view.fences
        .iter()
        .filter(|region| region.end.is_none())
        .map(|region| {
            Issue::error(region.start + 1, "Unclosed code block")
                .with_context(view.lines[region.start])
        })
        .collect()
}

/// Tables whose separator or rows disagree with the header cell count.
pub(super) fn tables(view: &LineView<'_>) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut i = 0;

    while i < view.lines.len() {
        if !view.is_active(i) || !syntax::is_table_row(view.lines[i]) {
            i += 1;
            continue;
        }

        let start = i;
        while i < view.lines.len() && view.is_active(i) && syntax::is_table_row(view.lines[i]) {
            i += 1;
        }
        let block = &view.lines[start..i];

        if block.len() < 2 || !syntax::is_separator_row(block[1]) {
            issues.push(
                Issue::info(start + 1, "Table-like rows without a header separator are not a table")
                    .with_context(block[0]),
            );
            continue;
        }

        let header = syntax::split_cells(block[0]).len();
        let separator = syntax::split_cells(block[1]).len();
        if separator != header {
            issues.push(
                Issue::warning(
                    start + 2,
                    format!(
                        "Table header has {} columns but separator has {}",
                        header, separator
                    ),
                )
                .with_context(block[1]),
            );
        }

        for (offset, row) in block.iter().enumerate().skip(2) {
            let cells = syntax::split_cells(row).len();
            if cells != header {
                issues.push(
                    Issue::warning(
                        start + offset + 1,
                        format!("Table row has {} cells but header has {}", cells, header),
                    )
                    .with_context(row),
                );
            }
        }
    }

    issues
}

/// ATX headings without a space after the marker or deeper than six.
pub(super) fn headings(view: &LineView<'_>) -> Vec<Issue> {
    view.active_lines()
        .filter_map(|(idx, line)| {
            let marker = AtxMarker::parse(line)?;
            if marker.level > 6 {
                Some(
                    Issue::warning(
                        idx + 1,
                        format!("Heading level {} exceeds maximum of 6", marker.level),
                    )
                    .with_context(line),
                )
            } else if !marker.has_space() {
                Some(
                    Issue::warning(idx + 1, "Heading marker should be followed by a space")
                        .with_context(line),
                )
            } else {
                None
            }
        })
        .collect()
}

/// Inline links and images with empty text or target.
pub(super) fn links(view: &LineView<'_>) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (idx, line) in view.active_lines() {
        for caps in LINK_RE.captures_iter(line) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if is_escaped(line, whole.start()) {
                continue;
            }
            let is_image = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            let text = caps.get(2).map_or("", |m| m.as_str());
            let target = caps.get(3).map_or("", |m| m.as_str());

            if !is_image && text.trim().is_empty() {
                issues.push(Issue::warning(idx + 1, "Link has empty text").with_context(line));
            }
            if target.trim().is_empty() {
                let message = if is_image {
                    "Image has empty path"
                } else {
                    "Link has empty URL"
                };
                issues.push(Issue::warning(idx + 1, message).with_context(line));
            }
        }
    }

    issues
}

/// Ordered-list markers not followed by a space (`1.item`).
pub(super) fn ordered_lists(view: &LineView<'_>) -> Vec<Issue> {
    view.active_lines()
        .filter(|(_, line)| ORDERED_MARKER_RE.is_match(line))
        .map(|(idx, line)| {
            Issue::warning(idx + 1, "Ordered list marker should be followed by a space")
                .with_context(line)
        })
        .collect()
}

/// Whether the byte at `pos` is preceded by an odd number of backslashes.
fn is_escaped(line: &str, pos: usize) -> bool {
    line[..pos].chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}
