//! Viewport walker.
//!
//! Visits each syntax node intersecting the visible ranges exactly once and
//! dispatches it to the handlers registered for its kind, then runs the text
//! scanners over each visible range. Nodes outside the viewport are never
//! touched.
//!
//! A panicking handler is a bug. Debug builds let the panic through so tests
//! fail fast; release builds log it and drop that handler's output for the
//! node, keeping the rest of the rebuild.

use std::collections::BTreeSet;
use std::ops::Range;

use crate::decoration::Decoration;
use crate::diagram::DiagramRequest;
use crate::handlers::{HandlerContext, HandlerOutput, HandlerSet};
use crate::syntax::SyntaxTree;

const LOG_TARGET: &str = "livemark::walker";

/// Raw candidates from one walk, in dispatch order.
#[derive(Debug, Default)]
pub struct WalkOutput {
    pub decorations: Vec<Decoration>,
    pub requests: Vec<DiagramRequest>,
    /// Nodes dispatched to at least one handler lookup.
    pub visited: usize,
}

pub fn walk(
    tree: &SyntaxTree,
    viewport: &[Range<usize>],
    handlers: &HandlerSet,
    ctx: &HandlerContext<'_>,
) -> WalkOutput {
    let mut out = HandlerOutput::default();
    let mut visited = 0;

    if handlers.has_node_handlers() {
        let indices: BTreeSet<usize> = viewport
            .iter()
            .flat_map(|range| tree.intersecting(range.clone()))
            .collect();
        for index in indices {
            let Some(node) = tree.node(index) else {
                continue;
            };
            visited += 1;
            for handler in handlers.handlers_for(&node.kind) {
                log::trace!(
                    target: LOG_TARGET,
                    "{} on {:?} {}..{}",
                    handler.name(),
                    node.kind,
                    node.from,
                    node.to
                );
                guarded(handler.name(), &mut out, |local| {
                    handler.decorate(node, ctx, local)
                });
            }
        }
    }

    for range in viewport {
        for scanner in handlers.scanners() {
            guarded(scanner.name(), &mut out, |local| scanner.scan(range, ctx, local));
        }
    }

    log::debug!(
        target: LOG_TARGET,
        "Walked {} nodes over {} ranges: {} candidates, {} fetch requests",
        visited,
        viewport.len(),
        out.decorations.len(),
        out.requests.len()
    );

    WalkOutput {
        decorations: out.decorations,
        requests: out.requests,
        visited,
    }
}

#[cfg(debug_assertions)]
fn guarded<F>(_name: &str, out: &mut HandlerOutput, run: F)
where
    F: FnOnce(&mut HandlerOutput),
{
    run(out);
}

#[cfg(not(debug_assertions))]
fn guarded<F>(name: &str, out: &mut HandlerOutput, run: F)
where
    F: FnOnce(&mut HandlerOutput),
{
    use std::panic::{AssertUnwindSafe, catch_unwind};

    let mut local = HandlerOutput::default();
    match catch_unwind(AssertUnwindSafe(|| run(&mut local))) {
        Ok(()) => out.extend(local),
        Err(_) => log::error!(
            target: LOG_TARGET,
            "Handler {} panicked; its decorations were dropped",
            name
        ),
    }
}
