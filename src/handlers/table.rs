//! Pipe tables rendered as an HTML grid.

use super::{HandlerContext, HandlerOutput, NodeHandler};
use crate::decoration::{Decoration, Widget};
use crate::syntax::{NodeKind, SyntaxNode};

pub struct TableHandler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Default,
    Left,
    Center,
    Right,
}

impl Align {
    fn parse(cell: &str) -> Option<Align> {
        let dashes = cell.trim_start_matches(':').trim_end_matches(':');
        if dashes.is_empty() || !dashes.bytes().all(|b| b == b'-') {
            return None;
        }
        Some(match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) => Align::Center,
            (true, false) => Align::Left,
            (false, true) => Align::Right,
            (false, false) => Align::Default,
        })
    }

    fn attribute(self) -> &'static str {
        match self {
            Align::Default => "",
            Align::Left => r#" style="text-align: left""#,
            Align::Center => r#" style="text-align: center""#,
            Align::Right => r#" style="text-align: right""#,
        }
    }
}

/// Cells of one pipe row, trimmed. Escaped `\|` stays inside its cell.
fn split_row(row: &str) -> Vec<String> {
    let row = row.trim();
    let row = row.strip_prefix('|').unwrap_or(row);
    let row = match row.strip_suffix('|') {
        Some(inner) if !inner.ends_with('\\') => inner,
        _ => row,
    };

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = row.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Convert pipe-delimited table text into HTML table markup.
///
/// The first row is the header. An alignment row (`---`, `:--`, `:-:`, `--:`)
/// is dropped from the output and only sets each column's alignment. Cell
/// text is trimmed and escaped.
pub fn table_to_html(text: &str) -> String {
    let rows: Vec<Vec<String>> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(split_row)
        .collect();

    let mut aligns: Vec<Align> = Vec::new();
    let mut body_rows = Vec::new();
    for (index, row) in rows.iter().enumerate().skip(1) {
        let parsed: Option<Vec<Align>> = row.iter().map(|cell| Align::parse(cell)).collect();
        match parsed {
            Some(parsed) if index == 1 => aligns = parsed,
            _ => body_rows.push(row),
        }
    }
    let align = |column: usize| aligns.get(column).copied().unwrap_or(Align::Default);

    let mut html = String::from("<table>\n");
    if let Some(header) = rows.first() {
        html.push_str("<thead>\n<tr>");
        for (column, cell) in header.iter().enumerate() {
            html.push_str(&format!(
                "<th{}>{}</th>",
                align(column).attribute(),
                escape_html(cell)
            ));
        }
        html.push_str("</tr>\n</thead>\n");
    }
    if !body_rows.is_empty() {
        html.push_str("<tbody>\n");
        for row in body_rows {
            html.push_str("<tr>");
            for (column, cell) in row.iter().enumerate() {
                html.push_str(&format!(
                    "<td{}>{}</td>",
                    align(column).attribute(),
                    escape_html(cell)
                ));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n");
    }
    html.push_str("</table>");
    html
}

impl NodeHandler for TableHandler {
    fn name(&self) -> &'static str {
        "table"
    }

    fn accepts(&self, kind: &NodeKind) -> bool {
        *kind == NodeKind::Table
    }

    fn decorate(&self, node: &SyntaxNode, ctx: &HandlerContext<'_>, out: &mut HandlerOutput) {
        let span = ctx.block_span(node);
        if span.is_empty() || ctx.reveals(&span) {
            return;
        }
        let html = table_to_html(ctx.text(&span));
        out.push(Decoration::replace(span, Widget::Table { html }));
    }
}
