//! Column alignment for delimiter-separated text.
//!
//! Column widths come from the whole document; padding is emitted only for
//! visible lines. Each separator that needs padding is replaced by a
//! `ColumnPad` widget drawing the spaces and the delimiter, so the buffer
//! itself never changes.

use std::ops::Range;

use unicode_width::UnicodeWidthStr;

use crate::config::ColumnSettings;
use crate::decoration::{Decoration, Widget};
use crate::occlusion::OcclusionPolicy;
use crate::selection::Selection;
use crate::text::Document;

/// Byte ranges of the fields of `line`, separators excluded.
///
/// A delimiter inside a quoted field, or preceded by the escape character,
/// does not split. Inside quotes a doubled quote character is a literal quote.
pub fn split_fields(line: &str, settings: &ColumnSettings) -> Vec<Range<usize>> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut chars = line.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c == settings.escape {
            chars.next();
        } else if c == settings.quote {
            if in_quotes && chars.peek().is_some_and(|(_, next)| *next == settings.quote) {
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if c == settings.delimiter && !in_quotes {
            fields.push(start..i);
            start = i + c.len_utf8();
        }
    }
    fields.push(start..line.len());
    fields
}

/// Terminal columns `text` occupies; wide glyphs count twice.
fn display_width(text: &str) -> usize {
    text.width()
}

/// Widest field per column over every line of `doc`, in display columns.
pub fn column_widths(doc: &Document, settings: &ColumnSettings) -> Vec<usize> {
    let mut widths: Vec<usize> = Vec::new();
    for line in doc.lines() {
        for (column, field) in split_fields(line.text, settings).into_iter().enumerate() {
            let width = display_width(&line.text[field]);
            match widths.get_mut(column) {
                Some(max) => *max = (*max).max(width),
                None => widths.push(width),
            }
        }
    }
    widths
}

/// Padding decorations for the lines intersecting `visible`.
///
/// The last field of a line has no separator after it and is never padded.
/// A separator the selection touches stays raw.
pub fn alignment_decorations(
    doc: &Document,
    widths: &[usize],
    visible: &Range<usize>,
    selection: &Selection,
    policy: &OcclusionPolicy,
    settings: &ColumnSettings,
) -> Vec<Decoration> {
    let delimiter_len = settings.delimiter.len_utf8();
    let mut decorations = Vec::new();

    for line in doc.lines_in(visible.clone()) {
        let fields = split_fields(line.text, settings);
        let separated = fields.len().saturating_sub(1);
        for (column, field) in fields.iter().take(separated).enumerate() {
            let width = display_width(&line.text[field.clone()]);
            let padding = widths.get(column).copied().unwrap_or(width).saturating_sub(width);
            if padding == 0 {
                continue;
            }
            let separator = line.from + field.end..line.from + field.end + delimiter_len;
            if policy.should_reveal(selection, &separator) {
                continue;
            }
            decorations.push(Decoration::replace(
                separator,
                Widget::ColumnPad {
                    delimiter: settings.delimiter,
                    padding,
                },
            ));
        }
    }
    decorations
}
