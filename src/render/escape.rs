//! Markdown escaping.
//!
//! Escaping is idempotent: a backslash already followed by ASCII punctuation
//! is treated as an existing escape and copied through, so escaping escaped
//! text changes nothing. The price is that source text which literally
//! contains such a pair (for example `\*`) is rendered as the escaped
//! character rather than a visible backslash.

/// Where escaped text will appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeContext {
    /// Paragraph or list item text. Block markers at the start of a line
    /// (`-`, `+`, `>`, `=`, `~`, `1.`) are escaped as well.
    #[default]
    Block,
    /// Heading text. Line breaks become spaces.
    Heading,
    /// Table cell text. `|` is escaped and line breaks become `<br>`.
    TableCell,
}

/// Characters escaped wherever they appear.
const ALWAYS_ESCAPED: &[char] = &['\\', '`', '*', '_', '#', '[', ']', '(', ')', '|', '<'];

/// Characters escaped only as the first non-blank character of a line.
const LINE_START_ESCAPED: &[char] = &['-', '+', '>', '=', '~'];

const LINE_BREAK_TAG: &str = "<br>";

/// Escape paragraph text.
pub fn escape(text: &str) -> String {
    escape_with(text, EscapeContext::Block)
}

/// Escape text for the given context.
pub fn escape_with(text: &str, context: EscapeContext) -> String {
    escape_segment(text, context, true)
}

/// Escape a fragment that may begin mid-line.
///
/// `at_line_start` tells whether the first character sits at the start of
/// a line, which matters only for [`EscapeContext::Block`].
pub(crate) fn escape_segment(text: &str, context: EscapeContext, at_line_start: bool) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut line_start = at_line_start && context == EscapeContext::Block;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Existing escape: copy the pair.
        if c == '\\' {
            match chars.get(i + 1) {
                Some(&next) if next.is_ascii_punctuation() => {
                    out.push(c);
                    out.push(next);
                    i += 2;
                }
                _ => {
                    out.push_str("\\\\");
                    i += 1;
                }
            }
            line_start = false;
            continue;
        }

        if c == '\n' || c == '\r' {
            match context {
                EscapeContext::Block => {
                    out.push(c);
                    line_start = true;
                }
                EscapeContext::Heading => {
                    if !(c == '\n' && i > 0 && chars[i - 1] == '\r') {
                        out.push(' ');
                    }
                }
                EscapeContext::TableCell => {
                    if !(c == '\n' && i > 0 && chars[i - 1] == '\r') {
                        out.push_str(LINE_BREAK_TAG);
                    }
                }
            }
            i += 1;
            continue;
        }

        if context == EscapeContext::TableCell && starts_with_at(&chars, i, LINE_BREAK_TAG) {
            out.push_str(LINE_BREAK_TAG);
            i += LINE_BREAK_TAG.len();
            continue;
        }

        if line_start {
            if c == ' ' || c == '\t' {
                out.push(c);
                i += 1;
                continue;
            }
            line_start = false;

            if LINE_START_ESCAPED.contains(&c) {
                out.push('\\');
                out.push(c);
                i += 1;
                continue;
            }

            if c.is_ascii_digit() {
                let mut j = i;
                while j < chars.len() && chars[j].is_ascii_digit() {
                    j += 1;
                }
                let delimiter = chars.get(j).copied();
                let followed_by_space = chars.get(j + 1).map_or(true, |n| n.is_whitespace());
                if matches!(delimiter, Some('.') | Some(')')) && followed_by_space {
                    out.extend(&chars[i..j]);
                    out.push('\\');
                    out.push(chars[j]);
                    i = j + 1;
                    continue;
                }
            }
        }

        if ALWAYS_ESCAPED.contains(&c) || (c == '&' && looks_like_entity(&chars[i..])) {
            out.push('\\');
        }
        out.push(c);
        i += 1;
    }

    out
}

/// Escape a link or image destination.
pub fn escape_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.trim().chars() {
        match c {
            ' ' => out.push_str("%20"),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            _ => out.push(c),
        }
    }
    out
}

fn starts_with_at(chars: &[char], at: usize, pattern: &str) -> bool {
    let mut idx = at;
    for p in pattern.chars() {
        if chars.get(idx) != Some(&p) {
            return false;
        }
        idx += 1;
    }
    true
}

/// `&name;` or `&#123;` which a Markdown parser would decode.
fn looks_like_entity(chars: &[char]) -> bool {
    let body = &chars[1..];
    let len = body
        .iter()
        .take_while(|c| c.is_ascii_alphanumeric() || **c == '#')
        .count();
    len > 0 && body.get(len) == Some(&';')
}
