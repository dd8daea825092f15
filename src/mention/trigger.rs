use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// An open mention query: the `@` position and the word typed after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionQuery {
    /// Offset of the `@`.
    pub from: usize,
    pub prefix: String,
}

impl MentionQuery {
    /// Just `@` typed, nothing after it yet.
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty()
    }

    /// Span the accepted completion replaces: `@` through the caret.
    pub fn range(&self) -> Range<usize> {
        self.from..self.from + 1 + self.prefix.len()
    }
}

static TRIGGER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?:^|\s)@(\w*)$").ok());
static MENTION: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?:^|\s)(@(\w+))").ok());

/// The mention query open at `caret`, if the text before it on the same line
/// ends in `@word` with the `@` at line start or after whitespace.
pub fn find_trigger(text: &str, caret: usize) -> Option<MentionQuery> {
    let before = text.get(..caret)?;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let line = &before[line_start..];
    let captures = TRIGGER.as_ref()?.captures(line)?;
    let word = captures.get(1)?;
    Some(MentionQuery {
        // the `@` sits right before the captured word
        from: line_start + word.start() - 1,
        prefix: word.as_str().to_string(),
    })
}

/// Every `@word` mention in `text`, as `(span of @word, word)` relative to `text`.
pub fn mention_spans(text: &str) -> Vec<(Range<usize>, &str)> {
    let Some(regex) = MENTION.as_ref() else {
        return Vec::new();
    };
    regex
        .captures_iter(text)
        .filter_map(|captures| {
            let whole = captures.get(1)?;
            let word = captures.get(2)?;
            Some((whole.range(), word.as_str()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::line_start("@", 1, Some((0, "")))]
    #[case::after_space("hi @al", 6, Some((3, "al")))]
    #[case::after_newline("x\n@bob", 6, Some((2, "bob")))]
    #[case::after_tab("a\t@", 3, Some((2, "")))]
    #[case::inside_word("mail@host", 9, None)]
    #[case::after_punctuation("(@x", 3, None)]
    #[case::word_ended("@bob ", 5, None)]
    #[case::earlier_line("@bob\nx", 6, None)]
    fn detects_trigger(
        #[case] text: &str,
        #[case] caret: usize,
        #[case] expected: Option<(usize, &str)>,
    ) {
        let query = find_trigger(text, caret);
        assert_eq!(
            query.as_ref().map(|q| (q.from, q.prefix.as_str())),
            expected
        );
    }

    #[test]
    fn caret_mid_word_uses_text_before_it() {
        let query = find_trigger("@alice", 3).unwrap();
        assert_eq!(query.prefix, "al");
        assert_eq!(query.range(), 0..3);
    }

    #[test]
    fn caret_off_char_boundary_is_ignored() {
        assert_eq!(find_trigger("é", 1), None);
    }

    #[test]
    fn finds_all_mentions() {
        let spans = mention_spans("@ada met @bob, not mail@host");
        assert_eq!(spans, vec![(0..4, "ada"), (9..13, "bob")]);
    }
}
