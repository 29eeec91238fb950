//! Anomalies reported by a full CommonMark + GFM-tables parse.

use super::{Issue, LineView};
use pulldown_cmark::{BrokenLink, Event, HeadingLevel, Options, Parser, Tag};

/// Parse `text` and report structural oddities as informational issues.
///
/// `text` must already have its front matter masked so offsets line up
/// with `view`.
pub(super) fn parse_anomalies(text: &str, view: &LineView<'_>) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut broken_links: Vec<(usize, String)> = Vec::new();

    {
        let mut on_broken_link = |link: BrokenLink| {
            broken_links.push((link.span.start, link.reference.to_string()));
            None
        };
        let parser = Parser::new_with_broken_link_callback(
            text,
            Options::ENABLE_TABLES,
            Some(&mut on_broken_link),
        );

        let mut open_heading: Option<(usize, HeadingLevel, bool)> = None;

        for (event, range) in parser.into_offset_iter() {
            match event {
                Event::Start(Tag::Heading(level, _, _)) => {
                    let line = view.line_of(range.start);
                    let source = view.lines.get(line).copied().unwrap_or_default();
                    if !source.trim_start().starts_with('#') {
                        issues.push(
                            Issue::info(line + 1, "Setext-style heading; ATX (`#`) is preferred")
                                .with_context(source),
                        );
                    }
                    open_heading = Some((line, level, false));
                }
                Event::End(Tag::Heading(..)) => {
                    if let Some((line, level, false)) = open_heading.take() {
                        issues.push(
                            Issue::info(line + 1, format!("Empty {:?} heading", level))
                                .with_context(view.lines.get(line).copied().unwrap_or_default()),
                        );
                    }
                }
                Event::Text(ref t) | Event::Code(ref t) if !t.trim().is_empty() => {
                    if let Some((_, _, ref mut has_text)) = open_heading {
                        *has_text = true;
                    }
                }
                Event::Html(ref html) => {
                    if !is_benign_html(html) {
                        let line = view.line_of(range.start);
                        issues.push(
                            Issue::info(line + 1, "Raw HTML")
                                .with_context(view.lines.get(line).copied().unwrap_or_default()),
                        );
                    }
                }
                _ => {}
            }
        }
    }

    for (offset, reference) in broken_links {
        let line = view.line_of(offset);
        issues.push(
            Issue::info(
                line + 1,
                format!("Reference link [{}] has no definition", reference),
            )
            .with_context(view.lines.get(line).copied().unwrap_or_default()),
        );
    }

    issues
}

/// Comments and line breaks are emitted by the serializer itself.
fn is_benign_html(html: &str) -> bool {
    let trimmed = html.trim();
    if trimmed.starts_with("<!--") {
        return true;
    }
    let lower = trimmed.to_ascii_lowercase();
    matches!(lower.as_str(), "<br>" | "<br/>" | "<br />")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Severity;

    fn run(text: &str) -> Vec<Issue> {
        parse_anomalies(text, &LineView::new(text))
    }

    #[test]
    fn test_clean_markdown_has_no_anomalies() {
        let text = "# Title\n\nSome *text*.\n\n| a | b |\n| --- | --- |\n| 1<br>2 | 3 |\n\n<!-- Image extraction failed: img1 -->\n";
        assert!(run(text).is_empty());
    }

    #[test]
    fn test_setext_heading() {
        let issues = run("Title\n=====\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 1);
        assert_eq!(issues[0].severity, Severity::Info);
    }

    #[test]
    fn test_empty_heading() {
        let issues = run("para\n\n##\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 3);
        assert!(issues[0].message.starts_with("Empty"));
    }

    #[test]
    fn test_raw_html() {
        let issues = run("<div>block</div>\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Raw HTML");
    }

    #[test]
    fn test_broken_reference() {
        let issues = run("see [the docs][docs]\n");
        assert!(!issues.is_empty());
        assert!(issues
            .iter()
            .all(|i| i.severity == Severity::Info && i.message.contains("docs")));
    }
}
