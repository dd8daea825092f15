//! `:code:` shortcodes already in the text, shown as glyphs.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::{HandlerContext, HandlerOutput, TextScanner};
use crate::decoration::{Decoration, Widget};

static SHORTCODE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r":([\w+-]+):").ok());

pub struct EmojiScanner;

impl TextScanner for EmojiScanner {
    fn name(&self) -> &'static str {
        "emoji"
    }

    fn scan(&self, range: &Range<usize>, ctx: &HandlerContext<'_>, out: &mut HandlerOutput) {
        let Some(shortcode) = SHORTCODE.as_ref() else {
            return;
        };
        if !ctx.settings.emoji.enabled {
            return;
        }
        for line in ctx.doc.lines_in(range.clone()) {
            for captures in shortcode.captures_iter(line.text) {
                let (Some(whole), Some(code)) = (captures.get(0), captures.get(1)) else {
                    continue;
                };
                let Some(glyph) = ctx.emoji.lookup(code.as_str()) else {
                    continue;
                };
                let absolute = line.from + whole.start()..line.from + whole.end();
                if ctx.in_code(&absolute)
                    || ctx.in_literal(&absolute)
                    || ctx.reveals(&absolute)
                {
                    continue;
                }
                out.push(Decoration::replace(
                    absolute,
                    Widget::Emoji {
                        glyph: glyph.to_string(),
                    },
                ));
            }
        }
    }
}
