//! Accepted `@name` mentions, annotated from the detail cache.

use std::ops::Range;

use super::{HandlerContext, HandlerOutput, TextScanner};
use crate::decoration::{Decoration, Widget};
use crate::mention::mention_spans;

pub struct MentionScanner;

impl TextScanner for MentionScanner {
    fn name(&self) -> &'static str {
        "mention"
    }

    fn scan(&self, range: &Range<usize>, ctx: &HandlerContext<'_>, out: &mut HandlerOutput) {
        if !ctx.settings.mentions.enabled {
            return;
        }
        for line in ctx.doc.lines_in(range.clone()) {
            for (span, name) in mention_spans(line.text) {
                let absolute = line.from + span.start..line.from + span.end;
                if ctx.in_code(&absolute) || ctx.in_literal(&absolute) {
                    continue;
                }
                match ctx.caches.mentions.detail(name) {
                    Some(detail) if !ctx.reveals(&absolute) => out.push(Decoration::replace(
                        absolute,
                        Widget::Mention {
                            name: name.to_string(),
                            detail: Some(detail),
                        },
                    )),
                    _ => out.push(Decoration::mark(absolute, "cm-mention")),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoration::DecorationKind;
    use crate::handlers::test_support::Fixture;
    use crate::mention::CompletionItem;
    use crate::syntax::{NodeKind, SyntaxNode};

    fn fixture(text: &str) -> Fixture {
        let fixture = Fixture::new(text, vec![]);
        fixture.caches.mentions.merge(&[CompletionItem {
            detail: Some("Engineer".to_string()),
            ..CompletionItem::new("ada")
        }]);
        fixture
    }

    #[test]
    fn cached_mention_gets_a_badge() {
        let out = fixture("ping @ada").scan(&MentionScanner);
        assert_eq!(
            out.decorations,
            vec![Decoration::replace(
                5..9,
                Widget::Mention {
                    name: "ada".to_string(),
                    detail: Some("Engineer".to_string()),
                }
            )]
        );
    }

    #[test]
    fn unknown_mention_is_only_styled() {
        let out = fixture("ping @bob").scan(&MentionScanner);
        assert!(matches!(
            &out.decorations[0].kind,
            DecorationKind::Mark { class } if class == "cm-mention"
        ));
    }

    #[test]
    fn caret_on_mention_keeps_text_styled() {
        let out = fixture("ping @ada").with_caret(9).scan(&MentionScanner);
        assert!(!out.decorations[0].is_occluding());
    }

    #[test]
    fn mentions_in_code_are_ignored() {
        let mut fixture = fixture("`@ada`");
        fixture.tree = crate::syntax::SyntaxTree::from_nodes(vec![SyntaxNode::new(
            NodeKind::InlineCode,
            0,
            6,
        )]);
        assert!(fixture.scan(&MentionScanner).decorations.is_empty());
    }

    #[test]
    fn disabled_mentions_emit_nothing() {
        let mut fixture = fixture("@ada");
        fixture.settings.mentions.enabled = false;
        assert!(fixture.scan(&MentionScanner).decorations.is_empty());
    }

    #[test]
    fn mentions_in_link_targets_are_ignored() {
        let mut fixture = fixture("[me](https://x.io/ @ada) @ada");
        fixture.tree = crate::syntax::SyntaxTree::from_nodes(vec![SyntaxNode::new(
            NodeKind::Link,
            0,
            24,
        )]);
        let ranges: Vec<_> = fixture
            .scan(&MentionScanner)
            .decorations
            .iter()
            .map(|d| d.range())
            .collect();
        assert_eq!(ranges, vec![25..29]);
    }
}
