//! Markdown serialization for documents.

use crate::model::{
    CodeBlock, ContentBlock, Document, FormatSpan, Heading, ImageReference, ListBlock, Paragraph,
    Section, Table,
};

use super::escape::{escape_segment, escape_url, escape_with, EscapeContext};
use super::{DiagramArtifact, RaggedRows, RenderResult, RenderStats, SerializeOptions, TableStyle};

/// Language tag of fenced diagram blocks.
pub const DIAGRAM_LANGUAGE: &str = "mermaid";

/// Marker distinguishing machine-recognized text from document content.
pub const OCR_CAPTION_PREFIX: &str = "OCR extracted text:";

/// Placeholder prefix for images that were never persisted.
pub const MISSING_IMAGE_PREFIX: &str = "Image extraction failed:";

const LIST_INDENT: &str = "    ";

/// Convert a document to Markdown.
///
/// Never fails. Malformed input (ragged tables, overlapping spans, images
/// without a path) degrades to the closest safe textual form.
pub fn serialize(doc: &Document, options: &SerializeOptions) -> String {
    MarkdownSerializer::new(options.clone()).render(doc)
}

/// Convert a document to Markdown, returning statistics and the diagram
/// artifacts to persist next to their images.
pub fn to_markdown_with_stats(doc: &Document, options: &SerializeOptions) -> RenderResult {
    MarkdownSerializer::new(options.clone()).render_with_stats(doc)
}

/// Heading level after applying `offset`, saturated to `1..=6`.
///
/// Levels that fall outside the range are clamped, not wrapped, so the
/// mapping is lossy at both ends.
pub fn effective_heading_level(level: u8, offset: i32) -> u8 {
    i32::from(level).saturating_add(offset).clamp(1, 6) as u8
}

/// Markdown serializer.
pub struct MarkdownSerializer {
    options: SerializeOptions,
    stats: RenderStats,
    artifacts: Vec<DiagramArtifact>,
    blocks: Vec<String>,
}

impl MarkdownSerializer {
    /// Create a new serializer.
    pub fn new(options: SerializeOptions) -> Self {
        Self {
            options,
            stats: RenderStats::new(),
            artifacts: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Render a document to Markdown.
    pub fn render(self, doc: &Document) -> String {
        self.render_with_stats(doc).content
    }

    /// Render a document to Markdown with statistics and artifacts.
    pub fn render_with_stats(mut self, doc: &Document) -> RenderResult {
        if self.options.include_metadata {
            if let Some(front_matter) = doc.metadata.to_front_matter() {
                self.blocks.push(front_matter);
            }
        }

        for section in &doc.sections {
            self.render_section(section);
        }

        let mut content = self.blocks.join("\n\n");
        if !content.is_empty() {
            content.push('\n');
        }
        self.stats.count_text(&content);

        log::debug!(
            "Serialized {} sections into {} blocks ({} bytes)",
            self.stats.section_count,
            self.blocks.len(),
            content.len()
        );

        RenderResult::new(content, doc.metadata.clone(), self.artifacts, self.stats)
    }

    fn render_section(&mut self, section: &Section) {
        self.stats.add_section();
        if let Some(ref heading) = section.heading {
            self.render_heading(heading);
        }
        for block in &section.blocks {
            self.render_block(block);
        }
    }

    fn render_block(&mut self, block: &ContentBlock) {
        match block {
            ContentBlock::Heading(h) => self.render_heading(h),
            ContentBlock::Paragraph(p) => self.render_paragraph(p),
            ContentBlock::Table(t) => self.render_table(t),
            ContentBlock::List(l) => self.render_list(l),
            ContentBlock::Image(i) => self.render_image(i),
            ContentBlock::CodeBlock(c) => self.render_code_block(c),
        }
    }

    fn render_heading(&mut self, heading: &Heading) {
        let text = escape_with(heading.text.trim(), EscapeContext::Heading);
        let text = text.trim();
        if text.is_empty() {
            log::debug!("Skipping empty heading (level {})", heading.level);
            return;
        }

        let level = effective_heading_level(heading.level, self.options.heading_offset);
        self.stats.add_heading();
        self.blocks
            .push(format!("{} {}", "#".repeat(level as usize), text));
    }

    fn render_paragraph(&mut self, para: &Paragraph) {
        if para.is_empty() {
            return;
        }

        let inline = render_inline(para);
        let text = inline
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if text.is_empty() {
            return;
        }

        self.stats.add_paragraph();
        self.blocks.push(text);
    }

    fn render_table(&mut self, table: &Table) {
        if table.is_empty() {
            log::debug!("Skipping empty table");
            return;
        }

        let headers: Vec<String> = if table.headers.is_empty() {
            log::debug!("Table without headers, using a blank header row");
            vec![String::new(); table.max_width()]
        } else {
            table.headers.clone()
        };
        let width = headers.len();

        if table.is_ragged() {
            log::debug!(
                "Ragged table: {} columns, row widths {:?}",
                width,
                table.rows.iter().map(Vec::len).collect::<Vec<_>>()
            );
        }

        let mut lines = Vec::with_capacity(table.rows.len() + 2);
        match self.options.table_style {
            TableStyle::Standard => {
                lines.push(table_row(&headers));
                lines.push(format!("|{}", " --- |".repeat(width)));
                for row in &table.rows {
                    let line = match self.options.ragged_rows {
                        RaggedRows::Preserve => table_row(row),
                        RaggedRows::Normalize => {
                            let mut cells: Vec<String> = row.iter().take(width).cloned().collect();
                            cells.resize(width, String::new());
                            table_row(&cells)
                        }
                    };
                    lines.push(line);
                }
            }
        }

        self.stats.add_table();
        self.blocks.push(lines.join("\n"));
    }

    fn render_list(&mut self, list: &ListBlock) {
        if list.is_empty() {
            log::debug!("Skipping empty list");
            return;
        }

        let mut lines = Vec::new();
        self.render_list_items(list, 0, &mut lines);
        self.stats.add_list();
        self.blocks.push(lines.join("\n"));
    }

    fn render_list_items(&mut self, list: &ListBlock, depth: usize, lines: &mut Vec<String>) {
        let indent = LIST_INDENT.repeat(depth);
        for (i, item) in list.items.iter().enumerate() {
            let marker = if list.ordered {
                format!("{}.", i + 1)
            } else {
                "-".to_string()
            };
            let flat = item.text.split_whitespace().collect::<Vec<_>>().join(" ");
            let text = escape_with(&flat, EscapeContext::Block);

            self.stats.add_list_item();
            if text.is_empty() {
                lines.push(format!("{}{}", indent, marker));
            } else {
                lines.push(format!("{}{} {}", indent, marker, text));
            }

            if let Some(ref nested) = item.nested {
                self.render_list_items(nested, depth + 1, lines);
            }
        }
    }

    fn render_image(&mut self, image: &ImageReference) {
        self.stats.add_image();

        match image.relative_path.as_deref().filter(|_| image.is_persisted()) {
            Some(path) => {
                let alt = escape_with(image.label().trim(), EscapeContext::Heading);
                self.blocks
                    .push(format!("![{}]({})", alt.trim(), escape_url(path)));
            }
            None => {
                log::debug!(
                    "Image '{}' has no relative path, emitting placeholder",
                    image.source_identifier
                );
                self.stats.add_missing_image();
                self.blocks.push(format!(
                    "<!-- {} {} -->",
                    MISSING_IMAGE_PREFIX,
                    comment_safe(image.label())
                ));
            }
        }

        if let Some(ocr) = image.ocr_text.as_deref().filter(|t| !t.trim().is_empty()) {
            let caption = escape_with(ocr.trim(), EscapeContext::Heading);
            self.stats.add_ocr_caption();
            self.blocks
                .push(format!("*({} {})*", OCR_CAPTION_PREFIX, caption.trim()));
        }

        if let Some(markup) = image
            .diagram_markup
            .as_deref()
            .filter(|m| !m.trim().is_empty())
        {
            self.stats.add_diagram();
            self.blocks.push(fenced(Some(DIAGRAM_LANGUAGE), markup));
            match image.diagram_artifact_path() {
                Some(relative_path) => self.artifacts.push(DiagramArtifact {
                    relative_path,
                    markup: markup.to_string(),
                }),
                None => log::warn!(
                    "Diagram for image '{}' has no image file; markup is inline only",
                    image.source_identifier
                ),
            }
        }
    }

    fn render_code_block(&mut self, code: &CodeBlock) {
        self.stats.add_code_block();
        self.blocks.push(fenced(code.language.as_deref(), &code.text));
    }
}

/// Render paragraph text with its formatting spans.
///
/// Spans are applied in start order. A span whose end crosses the next
/// span's start is cut there; spans that end up empty are dropped and
/// touching spans of one kind merge. Emphasis that would not parse at its
/// position is emitted as plain text.
fn render_inline(para: &Paragraph) -> String {
    let text = para.text.as_str();
    let len = text.len();

    let mut spans: Vec<FormatSpan> = para
        .formatting
        .iter()
        .map(|s| FormatSpan {
            start: floor_char_boundary(text, s.start.min(len)),
            end: floor_char_boundary(text, s.end.min(len)),
            kind: s.kind,
        })
        .collect();
    spans.sort_by_key(|s| s.start);

    for i in 0..spans.len() {
        if let Some(next_start) = spans.get(i + 1).map(|s| s.start) {
            if spans[i].end > next_start {
                log::debug!(
                    "Truncating {:?} span {}..{} at {}",
                    spans[i].kind,
                    spans[i].start,
                    spans[i].end,
                    next_start
                );
                spans[i].end = next_start;
            }
        }
    }

    let mut merged: Vec<FormatSpan> = Vec::with_capacity(spans.len());
    for span in spans.into_iter().filter(|s| !s.is_empty()) {
        match merged.last_mut() {
            Some(last) if last.kind == span.kind && last.end == span.start => last.end = span.end,
            _ => merged.push(span),
        }
    }

    let mut out = String::with_capacity(len + len / 4);
    let mut cursor = 0;
    for span in &merged {
        push_plain(&mut out, text, cursor, span.start);
        let inner = &text[span.start..span.end];
        match span.kind.marker() {
            Some(marker) => {
                let next = text[span.end..].chars().next();
                if !push_emphasis(&mut out, inner, marker, next) {
                    log::debug!(
                        "Emitting {:?} span {}..{} as plain text",
                        span.kind,
                        span.start,
                        span.end
                    );
                    push_plain(&mut out, text, span.start, span.end);
                }
            }
            None => push_code_span(&mut out, inner),
        }
        cursor = span.end;
    }
    push_plain(&mut out, text, cursor, len);
    out
}

fn push_plain(out: &mut String, text: &str, from: usize, to: usize) {
    if from >= to {
        return;
    }
    let at_line_start = from == 0 || text[..from].ends_with('\n');
    out.push_str(&escape_segment(
        &text[from..to],
        EscapeContext::Block,
        at_line_start,
    ));
}

/// Emphasis markers must hug non-blank text, so surrounding whitespace is
/// moved outside them. Writes nothing and returns false when the markers
/// would not open and close at this position.
fn push_emphasis(out: &mut String, inner: &str, marker: &str, next: Option<char>) -> bool {
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        return false;
    }
    let leading = &inner[..inner.len() - inner.trim_start().len()];
    let trailing = &inner[inner.trim_end().len()..];
    let body = escape_segment(trimmed, EscapeContext::Block, false);

    let before = if leading.is_empty() { out.chars().last() } else { Some(' ') };
    let after = if trailing.is_empty() { next } else { Some(' ') };

    // A marker right after another delimiter run would merge with it.
    if matches!(before, Some('*' | '_')) {
        return false;
    }
    let opens = body.chars().next().is_some_and(char::is_alphanumeric) || flanks_delimiter(before);
    let closes = body.chars().last().is_some_and(char::is_alphanumeric) || flanks_delimiter(after);
    if !(opens && closes) {
        return false;
    }

    out.push_str(leading);
    out.push_str(marker);
    out.push_str(&body);
    out.push_str(marker);
    out.push_str(trailing);
    true
}

/// Neighbors that let a delimiter run sit next to punctuation.
fn flanks_delimiter(c: Option<char>) -> bool {
    c.map_or(true, |c| c.is_ascii_whitespace() || c.is_ascii_punctuation())
}

fn push_code_span(out: &mut String, inner: &str) {
    let content = inner.replace(['\r', '\n'], " ");
    if content.is_empty() {
        return;
    }
    let ticks = "`".repeat(longest_run(&content, '`') + 1);
    let pad = content.starts_with('`')
        || content.ends_with('`')
        || (content.starts_with(' ') && content.ends_with(' ') && !content.trim().is_empty());
    if pad {
        out.push_str(&format!("{ticks} {content} {ticks}"));
    } else {
        out.push_str(&format!("{ticks}{content}{ticks}"));
    }
}

fn table_row(cells: &[String]) -> String {
    if cells.is_empty() {
        return "| |".to_string();
    }
    let mut line = String::from("|");
    for cell in cells {
        let escaped = escape_with(cell.trim(), EscapeContext::TableCell);
        line.push(' ');
        line.push_str(escaped.trim());
        line.push_str(" |");
    }
    line
}

/// Fenced block whose backtick fence is longer than any backtick run in
/// `body`, so the body can never close it early.
fn fenced(language: Option<&str>, body: &str) -> String {
    let fence = "`".repeat(longest_run(body, '`').max(2) + 1);
    let info = language
        .and_then(|l| l.split_whitespace().next())
        .map(|l| l.replace('`', ""))
        .unwrap_or_default();
    let body = body.strip_suffix('\n').unwrap_or(body);
    if body.is_empty() {
        format!("{fence}{info}\n{fence}")
    } else {
        format!("{fence}{info}\n{body}\n{fence}")
    }
}

/// Single line with no `--` run, so the label cannot end the comment.
fn comment_safe(label: &str) -> String {
    let flat = label.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(flat.len());
    for c in flat.chars() {
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out
}

fn longest_run(text: &str, ch: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == ch {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListItem, Metadata, SpanKind};

    fn doc_with(blocks: Vec<ContentBlock>) -> Document {
        let mut doc = Document::new();
        doc.add_section(Section {
            heading: None,
            blocks,
        });
        doc
    }

    fn render(blocks: Vec<ContentBlock>) -> String {
        serialize(&doc_with(blocks), &SerializeOptions::default())
    }

    #[test]
    fn test_effective_heading_level() {
        assert_eq!(effective_heading_level(5, 2), 6);
        assert_eq!(effective_heading_level(1, -5), 1);
        assert_eq!(effective_heading_level(3, 0), 3);
        assert_eq!(effective_heading_level(0, 0), 1);
        assert_eq!(effective_heading_level(200, i32::MAX), 6);
        assert_eq!(effective_heading_level(1, i32::MIN), 1);
    }

    #[test]
    fn test_heading_offset_upper_bound() {
        let mut doc = Document::new();
        for level in [4, 5, 6] {
            doc.add_section(Section::with_heading(Heading::new(level, "Deep")));
        }
        let md = serialize(&doc, &SerializeOptions::new().with_heading_offset(2));
        assert_eq!(md, "###### Deep\n\n###### Deep\n\n###### Deep\n");
    }

    #[test]
    fn test_empty_heading_skipped() {
        let md = render(vec![
            Heading::new(2, "   ").into(),
            Paragraph::new("body").into(),
        ]);
        assert_eq!(md, "body\n");
    }

    #[test]
    fn test_paragraph_escaping_and_spans() {
        let para = Paragraph::new("Use the *star* and bold text")
            .with_span(19, 23, SpanKind::Bold);
        let md = render(vec![para.into()]);
        assert_eq!(md, "Use the \\*star\\* and **bold** text\n");
    }

    #[test]
    fn test_overlapping_spans_are_truncated() {
        let para = Paragraph::new("abcdef")
            .with_span(0, 4, SpanKind::Bold)
            .with_span(2, 6, SpanKind::Italic);
        let md = render(vec![para.into()]);
        assert_eq!(md, "**ab**cdef\n");
    }

    #[test]
    fn test_emphasis_that_cannot_flank_is_plain() {
        let para = Paragraph::new("a(b)c").with_span(1, 4, SpanKind::Italic);
        assert_eq!(render(vec![para.into()]), "a\\(b\\)c\n");

        let spaced = Paragraph::new("a (b) c").with_span(2, 5, SpanKind::Italic);
        assert_eq!(render(vec![spaced.into()]), "a *\\(b\\)* c\n");

        let blank = Paragraph::new("a  b").with_span(1, 3, SpanKind::Bold);
        assert_eq!(render(vec![blank.into()]), "a  b\n");
    }

    #[test]
    fn test_adjacent_spans_of_one_kind_merge() {
        let para = Paragraph::new("ab")
            .with_span(0, 1, SpanKind::Bold)
            .with_span(1, 2, SpanKind::Bold);
        assert_eq!(render(vec![para.into()]), "**ab**\n");

        let code = Paragraph::new("xy")
            .with_span(0, 1, SpanKind::Code)
            .with_span(1, 2, SpanKind::Code);
        assert_eq!(render(vec![code.into()]), "`xy`\n");
    }

    #[test]
    fn test_out_of_bounds_span_is_clamped() {
        let para = Paragraph::new("héllo").with_span(1, 99, SpanKind::Italic);
        let md = render(vec![para.into()]);
        assert_eq!(md, "h*éllo*\n");
    }

    #[test]
    fn test_code_span_not_escaped() {
        let para = Paragraph::new("call a_b() now").with_span(5, 10, SpanKind::Code);
        let md = render(vec![para.into()]);
        assert_eq!(md, "call `a_b()` now\n");

        let ticks = Paragraph::new("x`y").with_span(0, 3, SpanKind::Code);
        assert_eq!(render(vec![ticks.into()]), "``x`y``\n");
    }

    #[test]
    fn test_paragraph_lines_are_trimmed() {
        let md = render(vec![Paragraph::new("    indented\n\n   next").into()]);
        assert_eq!(md, "indented\nnext\n");
    }

    #[test]
    fn test_table_rendering() {
        let table = Table::from_rows(["Name", "Note"], [["a|b", "line1\nline2"]]);
        let md = render(vec![table.into()]);
        assert_eq!(
            md,
            "| Name | Note |\n| --- | --- |\n| a\\|b | line1<br>line2 |\n"
        );
    }

    #[test]
    fn test_ragged_table_normalized_by_default() {
        let table = Table::from_rows(
            vec!["A", "B"],
            vec![vec!["1", "2", "3"], vec!["4"]],
        );
        let doc = doc_with(vec![table.into()]);

        let normalized = serialize(&doc, &SerializeOptions::default());
        assert_eq!(
            normalized,
            "| A | B |\n| --- | --- |\n| 1 | 2 |\n| 4 |  |\n"
        );

        let preserved = serialize(
            &doc,
            &SerializeOptions::new().with_ragged_rows(RaggedRows::Preserve),
        );
        assert_eq!(preserved, "| A | B |\n| --- | --- |\n| 1 | 2 | 3 |\n| 4 |\n");
    }

    #[test]
    fn test_headerless_table_gets_blank_header() {
        let table = Table::from_rows(Vec::<&str>::new(), vec![vec!["x", "y"]]);
        let md = render(vec![table.into()]);
        assert_eq!(md, "|  |  |\n| --- | --- |\n| x | y |\n");
    }

    #[test]
    fn test_table_without_cells_skipped() {
        let table = Table::from_rows(Vec::<&str>::new(), vec![Vec::<&str>::new(), vec![]]);
        let result = to_markdown_with_stats(&doc_with(vec![table.into()]), &SerializeOptions::default());
        assert_eq!(result.content, "");
        assert_eq!(result.stats.table_count, 0);
    }

    #[test]
    fn test_nested_lists() {
        let list = ListBlock::ordered()
            .with_item("first")
            .with_nested("second", ListBlock::unordered().with_item("inner"))
            .with_item("third");
        let md = render(vec![list.into()]);
        assert_eq!(md, "1. first\n2. second\n    - inner\n3. third\n");
    }

    #[test]
    fn test_list_item_escaping() {
        let list = ListBlock {
            ordered: false,
            items: vec![ListItem::new("- dash\ncontinued"), ListItem::new("")],
        };
        let md = render(vec![list.into()]);
        assert_eq!(md, "- \\- dash continued\n-\n");
    }

    #[test]
    fn test_empty_list_skipped() {
        assert_eq!(render(vec![ListBlock::unordered().into()]), "");
    }

    #[test]
    fn test_missing_image_placeholder() {
        let md = render(vec![ImageReference::new("img1").into()]);
        assert_eq!(md, "<!-- Image extraction failed: img1 -->\n");
        assert!(!md.contains("!["));
    }

    #[test]
    fn test_placeholder_label_cannot_close_comment() {
        for label in ["--->x", "a---b", "x--", "-- -->"] {
            let md = render(vec![ImageReference::new(label).into()]);
            let body = md
                .strip_prefix("<!--")
                .and_then(|rest| rest.strip_suffix("-->\n"))
                .unwrap();
            assert!(!body.contains("--"), "{:?}", md);
        }
        let md = render(vec![ImageReference::new("--->x").into()]);
        assert_eq!(md, "<!-- Image extraction failed: ->x -->\n");
    }

    #[test]
    fn test_image_with_ocr_and_diagram() {
        let image = ImageReference::new("img2")
            .with_relative_path("report/images/image 001.png")
            .with_alt_text("Flow")
            .with_ocr_text("Start -> End")
            .with_diagram_markup("graph TD\n  A --> B");
        let result = to_markdown_with_stats(&doc_with(vec![image.into()]), &SerializeOptions::default());

        assert_eq!(
            result.content,
            "![Flow](report/images/image%20001.png)\n\n\
             *(OCR extracted text: Start -> End)*\n\n\
             ```mermaid\ngraph TD\n  A --> B\n```\n"
        );
        assert_eq!(
            result.artifacts,
            vec![DiagramArtifact {
                relative_path: "report/images/image 001.mmd".to_string(),
                markup: "graph TD\n  A --> B".to_string(),
            }]
        );
        assert_eq!(result.stats.ocr_caption_count, 1);
        assert_eq!(result.stats.diagram_count, 1);
    }

    #[test]
    fn test_diagram_without_path_has_no_artifact() {
        let image = ImageReference::new("img3").with_diagram_markup("graph LR");
        let result = to_markdown_with_stats(&doc_with(vec![image.into()]), &SerializeOptions::default());
        assert!(result.content.contains("```mermaid\ngraph LR\n```"));
        assert!(result.artifacts.is_empty());
        assert_eq!(result.stats.missing_image_count, 1);
    }

    #[test]
    fn test_code_block_fence() {
        let code = CodeBlock::new("let s = \"```\";\n").with_language("rust");
        let md = render(vec![code.into()]);
        assert_eq!(md, "````rust\nlet s = \"```\";\n````\n");
    }

    #[test]
    fn test_metadata_front_matter() {
        let mut doc = doc_with(vec![Paragraph::new("x").into()]);
        doc.metadata = Metadata {
            title: Some("T".to_string()),
            ..Default::default()
        };

        let without = serialize(&doc, &SerializeOptions::default());
        assert_eq!(without, "x\n");

        let with = serialize(&doc, &SerializeOptions::new().with_metadata(true));
        assert_eq!(with, "---\ntitle: \"T\"\n---\n\nx\n");

        doc.metadata = Metadata::default();
        let empty = serialize(&doc, &SerializeOptions::new().with_metadata(true));
        assert_eq!(empty, "x\n");
    }

    #[test]
    fn test_stats() {
        let mut doc = Document::new();
        doc.add_section(
            Section::with_heading(Heading::new(1, "Title"))
                .with_block(Paragraph::new("one two"))
                .with_block(ListBlock::unordered().with_nested("a", ListBlock::unordered().with_item("b"))),
        );
        let result = to_markdown_with_stats(&doc, &SerializeOptions::default());
        assert_eq!(result.stats.section_count, 1);
        assert_eq!(result.stats.heading_count, 1);
        assert_eq!(result.stats.paragraph_count, 1);
        assert_eq!(result.stats.list_count, 1);
        assert_eq!(result.stats.list_item_count, 2);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(serialize(&Document::new(), &SerializeOptions::default()), "");
    }
}
