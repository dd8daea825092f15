//! Delimited-text column alignment as a scanner.

use std::ops::Range;

use super::{HandlerContext, HandlerOutput, TextScanner};
use crate::columns::alignment_decorations;

pub struct ColumnScanner;

impl TextScanner for ColumnScanner {
    fn name(&self) -> &'static str {
        "columns"
    }

    fn scan(&self, range: &Range<usize>, ctx: &HandlerContext<'_>, out: &mut HandlerOutput) {
        let settings = &ctx.settings.columns;
        let widths = ctx.column_widths();
        for decoration in
            alignment_decorations(ctx.doc, widths, range, ctx.selection, &ctx.policy, settings)
        {
            out.push(decoration);
        }
    }
}
