//! Markdown layout normalization.
//!
//! The pretty printer is a pure text-to-text pass. It collapses blank-line
//! runs, puts exactly one blank line around headings, tables and fenced
//! blocks, trims trailing whitespace and pads table cells so columns line
//! up. Fenced code is passed through byte for byte. `format` is
//! idempotent.

use crate::syntax::{self, AtxMarker, Fence};
use unicode_normalization::UnicodeNormalization;
use unicode_width::UnicodeWidthStr;

/// Minimum width of a separator cell (`---`).
const MIN_COLUMN_WIDTH: usize = 3;

/// Normalize Markdown layout with default options.
pub fn format(markup: &str) -> String {
    PrettyPrinter::default().format(markup)
}

/// Options for the pretty printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrettyOptions {
    /// Pad table cells so columns align
    pub align_tables: bool,

    /// Normalize text outside fenced blocks to Unicode NFC
    pub normalize_unicode: bool,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self {
            align_tables: true,
            normalize_unicode: false,
        }
    }
}

/// A run of input lines with one layout role.
#[derive(Debug)]
enum Chunk<'a> {
    Blank,
    Text(&'a str),
    Heading(&'a str),
    Table(Vec<&'a str>),
    Fence(Vec<&'a str>),
    FrontMatter(Vec<&'a str>),
}

impl Chunk<'_> {
    /// Chunks that get exactly one blank line on each side.
    fn is_spaced(&self) -> bool {
        matches!(
            self,
            Chunk::Heading(_) | Chunk::Table(_) | Chunk::Fence(_) | Chunk::FrontMatter(_)
        )
    }
}

/// Markdown pretty printer.
#[derive(Debug, Clone, Default)]
pub struct PrettyPrinter {
    options: PrettyOptions,
}

impl PrettyPrinter {
    /// Create a pretty printer with the given options.
    pub fn new(options: PrettyOptions) -> Self {
        Self { options }
    }

    /// Enable or disable table alignment.
    pub fn with_table_alignment(mut self, align: bool) -> Self {
        self.options.align_tables = align;
        self
    }

    /// Enable or disable NFC normalization.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.options.normalize_unicode = normalize;
        self
    }

    /// Format Markdown text.
    pub fn format(&self, markup: &str) -> String {
        let mut lines: Vec<&str> = markup.split('\n').collect();
        if markup.ends_with('\n') {
            lines.pop();
        }

        let chunks = classify(&lines);
        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut pending_blank = false;
        let mut after_spaced = false;

        for chunk in &chunks {
            if let Chunk::Blank = chunk {
                pending_blank = !out.is_empty();
                continue;
            }

            let needs_gap = chunk.is_spaced() || after_spaced || pending_blank;
            if needs_gap && !out.is_empty() {
                out.push(String::new());
            }
            pending_blank = false;
            after_spaced = chunk.is_spaced();

            match chunk {
                Chunk::Blank => {}
                Chunk::Text(line) | Chunk::Heading(line) => out.push(self.clean(line)),
                Chunk::FrontMatter(block) => {
                    out.extend(block.iter().map(|l| l.trim_end().to_string()))
                }
                Chunk::Fence(block) => out.extend(block.iter().map(|l| (*l).to_string())),
                Chunk::Table(rows) => {
                    if self.options.align_tables {
                        out.extend(align_table(rows).into_iter().map(|row| self.clean(&row)));
                    } else {
                        out.extend(rows.iter().map(|row| self.clean(row)));
                    }
                }
            }
        }

        if out.is_empty() {
            return String::new();
        }
        let mut result = out.join("\n");
        result.push('\n');
        result
    }

    fn clean(&self, line: &str) -> String {
        let line = line.trim_end();
        if self.options.normalize_unicode {
            line.nfc().collect()
        } else {
            line.to_string()
        }
    }
}

fn classify<'a>(lines: &[&'a str]) -> Vec<Chunk<'a>> {
    let mut chunks = Vec::new();
    let mut i = 0;

    if let Some((start, end)) = syntax::front_matter_lines(lines) {
        chunks.extend((0..start).map(|_| Chunk::Blank));
        chunks.push(Chunk::FrontMatter(lines[start..=end].to_vec()));
        i = end + 1;
    }

    while i < lines.len() {
        let line = lines[i];

        if line.trim().is_empty() {
            chunks.push(Chunk::Blank);
            i += 1;
            continue;
        }

        if let Some(fence) = Fence::open(line) {
            let end = lines[i + 1..]
                .iter()
                .position(|l| fence.is_closed_by(l))
                .map_or(lines.len(), |offset| i + 1 + offset + 1);
            chunks.push(Chunk::Fence(lines[i..end].to_vec()));
            i = end;
            continue;
        }

        if syntax::is_table_row(line)
            && lines.get(i + 1).is_some_and(|next| syntax::is_separator_row(next))
        {
            let end = lines[i..]
                .iter()
                .position(|l| !syntax::is_table_row(l))
                .map_or(lines.len(), |offset| i + offset);
            chunks.push(Chunk::Table(lines[i..end].to_vec()));
            i = end;
            continue;
        }

        if AtxMarker::parse(line).is_some_and(|m| m.is_valid()) {
            chunks.push(Chunk::Heading(line));
        } else {
            chunks.push(Chunk::Text(line));
        }
        i += 1;
    }

    chunks
}

/// Pad every cell to its column's display width. Rows keep their own cell
/// count; missing cells are not invented.
fn align_table(rows: &[&str]) -> Vec<String> {
    let indent_len = rows
        .first()
        .map_or(0, |r| r.len() - r.trim_start().len());
    let indent = rows.first().map_or("", |r| &r[..indent_len]);

    let parsed: Vec<(bool, Vec<String>)> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| (idx == 1, syntax::split_cells(row)))
        .collect();

    let columns = parsed.iter().map(|(_, cells)| cells.len()).max().unwrap_or(0);
    let mut widths = vec![MIN_COLUMN_WIDTH; columns];
    for (is_separator, cells) in &parsed {
        if *is_separator {
            continue;
        }
        for (col, cell) in cells.iter().enumerate() {
            widths[col] = widths[col].max(cell.width());
        }
    }

    parsed
        .iter()
        .map(|(is_separator, cells)| {
            let mut line = String::from(indent);
            line.push('|');
            for (col, cell) in cells.iter().enumerate() {
                let width = widths[col];
                let padded = if *is_separator {
                    separator_cell(cell, width)
                } else {
                    let pad = width.saturating_sub(cell.width());
                    format!("{}{}", cell, " ".repeat(pad))
                };
                line.push(' ');
                line.push_str(&padded);
                line.push_str(" |");
            }
            line
        })
        .collect()
}

fn separator_cell(cell: &str, width: usize) -> String {
    let left = cell.starts_with(':');
    let right = cell.len() > 1 && cell.ends_with(':');
    let colons = usize::from(left) + usize::from(right);
    let dashes = width.saturating_sub(colons).max(1);
    format!(
        "{}{}{}",
        if left { ":" } else { "" },
        "-".repeat(dashes),
        if right { ":" } else { "" }
    )
}
