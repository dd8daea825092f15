//! Inline HTML tag pairs rendered as their content.

use std::ops::Range;

use super::{HandlerContext, HandlerOutput, TextScanner};
use crate::decoration::{Decoration, Widget};

/// Tags rendered inline; anything else stays raw text.
const INLINE_TAGS: &[&str] = &[
    "b", "strong", "i", "em", "u", "s", "del", "ins", "mark", "sub", "sup", "kbd", "small",
    "span", "abbr",
];

pub struct HtmlScanner;

/// A recognised `<tag ...>content</tag>` pair, offsets relative to the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlSpan<'t> {
    pub range: Range<usize>,
    pub tag: &'t str,
    pub content: &'t str,
}

/// Find inline tag pairs in `text`, left to right, without overlaps.
pub fn find_inline_html(text: &str) -> Vec<HtmlSpan<'_>> {
    let mut spans = Vec::new();
    let mut pos = 0;
    while let Some(offset) = text[pos..].find('<') {
        let start = pos + offset;
        match open_tag(text, start) {
            Some((tag, open_end)) => {
                let closing = format!("</{tag}>");
                match text[open_end..].find(&closing) {
                    Some(close) => {
                        let content_end = open_end + close;
                        let end = content_end + closing.len();
                        spans.push(HtmlSpan {
                            range: start..end,
                            tag,
                            content: &text[open_end..content_end],
                        });
                        pos = end;
                    }
                    None => pos = open_end,
                }
            }
            None => pos = start + 1,
        }
    }
    spans
}

/// `(tag, end of the opening tag)` when `text[start..]` opens an inline tag.
fn open_tag(text: &str, start: usize) -> Option<(&str, usize)> {
    let rest = text.get(start + 1..)?;
    let name_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    let name = &rest[..name_len];
    if !INLINE_TAGS.contains(&name) {
        return None;
    }
    let after = &rest[name_len..];
    if !(after.starts_with('>') || after.starts_with(char::is_whitespace)) {
        return None;
    }
    let close = after.find('>')?;
    if after[..close].ends_with('/') || after[..close].contains('\n') {
        return None;
    }
    Some((name, start + 1 + name_len + close + 1))
}

impl TextScanner for HtmlScanner {
    fn name(&self) -> &'static str {
        "html"
    }

    fn scan(&self, range: &Range<usize>, ctx: &HandlerContext<'_>, out: &mut HandlerOutput) {
        for line in ctx.doc.lines_in(range.clone()) {
            for span in find_inline_html(line.text) {
                let absolute = line.from + span.range.start..line.from + span.range.end;
                if ctx.inside_code(&absolute)
                    || ctx.in_literal(&absolute)
                    || ctx.reveals(&absolute)
                {
                    continue;
                }
                out.push(Decoration::replace(
                    absolute,
                    Widget::InlineHtml {
                        tag: span.tag.to_string(),
                        content: span.content.to_string(),
                    },
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::Fixture;
    use crate::syntax::{NodeKind, SyntaxNode};

    #[test]
    fn finds_tag_pairs() {
        let spans = find_inline_html(r#"a <b>bold</b> and <span class="x">y</span>"#);
        let found: Vec<_> = spans.iter().map(|s| (s.range.clone(), s.tag, s.content)).collect();
        assert_eq!(found, vec![(2..13, "b", "bold"), (18..42, "span", "y")]);
    }

    #[test]
    fn ignores_unknown_unclosed_and_void_tags() {
        assert!(find_inline_html("<div>x</div>").is_empty());
        assert!(find_inline_html("<b>never closed").is_empty());
        assert!(find_inline_html("<br/> a < b").is_empty());
        assert!(find_inline_html("<bold>x</bold>").is_empty());
    }

    #[test]
    fn skips_code_and_occluded_spans() {
        let text = "`<b>x</b>` <i>y</i> <u>z</u>";
        let fixture = Fixture::new(text, vec![SyntaxNode::new(NodeKind::InlineCode, 0, 10)])
            .with_caret(25);
        let out = fixture.scan(&HtmlScanner);
        let ranges: Vec<_> = out.decorations.iter().map(|d| d.range()).collect();
        assert_eq!(ranges, vec![11..19]);
    }

    #[test]
    fn pair_wrapping_inline_code_still_renders() {
        let text = "`<b>x</b>` <i>`y`</i>";
        let fixture = Fixture::new(
            text,
            vec![
                SyntaxNode::new(NodeKind::InlineCode, 0, 10),
                SyntaxNode::new(NodeKind::InlineCode, 14, 17),
            ],
        );
        let out = fixture.scan(&HtmlScanner);
        assert_eq!(
            out.decorations,
            vec![Decoration::replace(
                11..21,
                Widget::InlineHtml {
                    tag: "i".to_string(),
                    content: "`y`".to_string(),
                }
            )]
        );
    }

    #[test]
    fn html_inside_a_link_target_is_left_alone() {
        let text = "[a](<b>x</b>) <b>y</b>";
        let fixture = Fixture::new(text, vec![SyntaxNode::new(NodeKind::Link, 0, 13)]);
        let ranges: Vec<_> = fixture
            .scan(&HtmlScanner)
            .decorations
            .iter()
            .map(|d| d.range())
            .collect();
        assert_eq!(ranges, vec![14..22]);
    }
}
