//! Line-level Markdown recognizers shared by the pretty printer, the
//! validator and the round-trip harness.
//!
//! These are deliberately narrow: they recognize exactly the constructs
//! the serializer emits (fences, ATX headings, pipe tables, front matter)
//! and the common ways hand-written Markdown gets them wrong.

use std::borrow::Cow;

/// Lines indented this far or more are indented code, not block markers.
const CODE_INDENT: usize = 4;

/// An opening code fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    /// Recognize an opening fence: three or more backticks or tildes,
    /// indented at most three spaces. A backtick fence's info string may
    /// not contain backticks.
    pub(crate) fn open(line: &str) -> Option<Fence> {
        let body = strip_block_indent(line)?;
        let marker = body.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = body.chars().take_while(|c| *c == marker).count();
        if len < 3 {
            return None;
        }
        let info = &body[len..];
        if marker == '`' && info.contains('`') {
            return None;
        }
        Some(Fence { marker, len })
    }

    /// Whether `line` closes this fence.
    pub(crate) fn is_closed_by(&self, line: &str) -> bool {
        let Some(body) = strip_block_indent(line) else {
            return false;
        };
        let len = body.chars().take_while(|c| *c == self.marker).count();
        len >= self.len && body[len..].trim().is_empty()
    }
}

/// A fenced code block as a range of line indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FenceRegion {
    /// Index of the opening fence line
    pub start: usize,
    /// Index of the closing fence line; `None` when the fence is never
    /// closed and runs to the end of the text
    pub end: Option<usize>,
}

impl FenceRegion {
    /// Last line index covered by the region.
    pub(crate) fn last_line(&self, line_count: usize) -> usize {
        self.end.unwrap_or(line_count.saturating_sub(1))
    }
}

/// Find every fenced code block, tracking open/close state line by line.
pub(crate) fn fence_regions<S: AsRef<str>>(lines: &[S]) -> Vec<FenceRegion> {
    let mut regions = Vec::new();
    let mut open: Option<(Fence, usize)> = None;

    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        match open {
            Some((fence, start)) => {
                if fence.is_closed_by(line) {
                    regions.push(FenceRegion {
                        start,
                        end: Some(idx),
                    });
                    open = None;
                }
            }
            None => {
                if let Some(fence) = Fence::open(line) {
                    open = Some((fence, idx));
                }
            }
        }
    }

    if let Some((_, start)) = open {
        regions.push(FenceRegion { start, end: None });
    }
    regions
}

/// An ATX heading marker (`#` run) at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AtxMarker<'a> {
    /// Number of `#` characters
    pub level: usize,
    /// Text after the marker, untrimmed
    pub rest: &'a str,
}

impl<'a> AtxMarker<'a> {
    /// Recognize a line that starts with `#`, whether or not it is a
    /// well-formed heading.
    pub(crate) fn parse(line: &'a str) -> Option<Self> {
        let body = strip_block_indent(line)?;
        let level = body.chars().take_while(|c| *c == '#').count();
        if level == 0 {
            return None;
        }
        Some(AtxMarker {
            level,
            rest: &body[level..],
        })
    }

    /// Marker is followed by whitespace or nothing.
    pub(crate) fn has_space(&self) -> bool {
        self.rest.is_empty() || self.rest.starts_with([' ', '\t'])
    }

    /// A heading a CommonMark parser would accept.
    pub(crate) fn is_valid(&self) -> bool {
        self.level <= 6 && self.has_space()
    }
}

/// Check whether a line looks like a pipe-table row: it starts and ends
/// with an unescaped `|`.
pub(crate) fn is_table_row(line: &str) -> bool {
    let Some(body) = strip_block_indent(line) else {
        return false;
    };
    let body = body.trim_end();
    body.len() >= 2 && body.starts_with('|') && ends_with_unescaped_pipe(body)
}

/// Check whether a row is a header separator (`| --- | :-: |`).
pub(crate) fn is_separator_row(line: &str) -> bool {
    if !is_table_row(line) {
        return false;
    }
    let cells = split_cells(line);
    !cells.is_empty() && cells.iter().all(|c| is_separator_cell(c))
}

/// Check whether a cell is a separator cell (`---`, `:--`, `--:`, `:-:`).
pub(crate) fn is_separator_cell(cell: &str) -> bool {
    let cell = cell.trim();
    let inner = cell.strip_prefix(':').unwrap_or(cell);
    let inner = inner.strip_suffix(':').unwrap_or(inner);
    !inner.is_empty() && inner.chars().all(|c| c == '-')
}

/// Split a table row into trimmed cells. Outer pipes are removed and
/// escaped pipes (`\|`) stay inside their cell.
pub(crate) fn split_cells(line: &str) -> Vec<String> {
    let body = line.trim();
    let body = body.strip_prefix('|').unwrap_or(body);
    let body = if ends_with_unescaped_pipe(body) {
        &body[..body.len() - 1]
    } else {
        body
    };

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

/// Range of lines holding a leading front matter block, delimiters
/// included. Front matter must open on the first non-blank line.
pub(crate) fn front_matter_lines<S: AsRef<str>>(lines: &[S]) -> Option<(usize, usize)> {
    let start = lines.iter().position(|l| !l.as_ref().trim().is_empty())?;
    if lines[start].as_ref().trim_end() != "---" {
        return None;
    }
    let end = lines[start + 1..]
        .iter()
        .position(|l| l.as_ref().trim_end() == "---")
        .map(|offset| start + 1 + offset)?;
    Some((start, end))
}

/// Replace a leading front matter block with spaces, keeping byte offsets
/// and line numbers intact, so a Markdown parser does not read it as a
/// thematic break and a setext heading.
pub(crate) fn mask_front_matter(text: &str) -> Cow<'_, str> {
    let lines: Vec<&str> = text.split('\n').collect();
    let Some((start, end)) = front_matter_lines(&lines) else {
        return Cow::Borrowed(text);
    };

    let masked = lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            if idx >= start && idx <= end {
                line.chars()
                    .map(|c| if c == '\r' { "\r".to_string() } else { " ".repeat(c.len_utf8()) })
                    .collect::<String>()
            } else {
                (*line).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    Cow::Owned(masked)
}

/// Indentation width of a line, counting tabs as four columns.
pub(crate) fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 4 - (width % 4),
            _ => break,
        }
    }
    width
}

fn strip_block_indent(line: &str) -> Option<&str> {
    if indent_width(line) >= CODE_INDENT {
        return None;
    }
    Some(line.trim_start_matches([' ', '\t']))
}

fn ends_with_unescaped_pipe(s: &str) -> bool {
    if !s.ends_with('|') {
        return false;
    }
    let backslashes = s[..s.len() - 1]
        .chars()
        .rev()
        .take_while(|c| *c == '\\')
        .count();
    backslashes % 2 == 0
}
