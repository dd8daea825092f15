use std::ops::Range;

use super::{NodeKind, SyntaxNode};
use crate::text::ChangeSet;

/// Flat, ordered view of a parse.
///
/// Nodes are sorted by `from` ascending, then `to` descending, so an
/// enclosing node always precedes the nodes it contains. A prefix maximum of
/// `to` lets range queries skip everything that ends before the range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    prefix_max_end: Vec<usize>,
}

impl SyntaxTree {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a tree from parser output in any order.
    ///
    /// Inverted spans are dropped: a malformed parse yields fewer
    /// decorations, never an error.
    pub fn from_nodes(nodes: impl IntoIterator<Item = SyntaxNode>) -> Self {
        let mut nodes: Vec<SyntaxNode> = nodes
            .into_iter()
            .filter(|node| {
                let valid = node.from <= node.to;
                if !valid {
                    log::debug!(
                        target: "livemark::syntax",
                        "Skipping inverted {:?} node {}..{}",
                        node.kind,
                        node.from,
                        node.to
                    );
                }
                valid
            })
            .collect();
        nodes.sort_by(|a, b| a.from.cmp(&b.from).then(b.to.cmp(&a.to)));

        let mut prefix_max_end = Vec::with_capacity(nodes.len());
        let mut max_end = 0;
        for node in &nodes {
            max_end = max_end.max(node.to);
            prefix_max_end.push(max_end);
        }

        Self {
            nodes,
            prefix_max_end,
        }
    }

    pub fn nodes(&self) -> &[SyntaxNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Indices of nodes intersecting `range`, in tree order.
    ///
    /// A node intersects when it overlaps the half-open range, or when it is
    /// zero-width and lies inside it.
    pub fn intersecting(&self, range: Range<usize>) -> impl Iterator<Item = usize> + '_ {
        let lower = self.prefix_max_end.partition_point(|&end| end < range.start);
        let upper = self.nodes.partition_point(|n| n.from <= range.end);
        (lower..upper.max(lower)).filter(move |&i| {
            let node = &self.nodes[i];
            if node.from == node.to {
                range.start <= node.from && node.from < range.end
            } else {
                node.from < range.end && node.to > range.start
            }
        })
    }

    pub fn node(&self, index: usize) -> Option<&SyntaxNode> {
        self.nodes.get(index)
    }

    /// Smallest node containing `range` whose kind satisfies `pred`.
    pub fn enclosing<F>(&self, range: &Range<usize>, pred: F) -> Option<&SyntaxNode>
    where
        F: Fn(&NodeKind) -> bool,
    {
        let upper = self.nodes.partition_point(|n| n.from <= range.start);
        self.nodes[..upper]
            .iter()
            .filter(|node| node.contains(range) && pred(&node.kind))
            .min_by_key(|node| node.len())
    }

    /// Spans of fenced blocks and inline code, sorted by start.
    pub fn code_regions(&self) -> Vec<Range<usize>> {
        self.nodes
            .iter()
            .filter(|n| n.kind.is_code())
            .map(SyntaxNode::range)
            .collect()
    }

    /// Carry the tree across an edit the parser has not seen yet.
    ///
    /// Untouched nodes shift with the text; nodes an edit touched are
    /// dropped until the host delivers a fresh parse.
    pub fn map(&self, changes: &ChangeSet) -> SyntaxTree {
        if changes.is_empty() {
            return self.clone();
        }
        let mapped = self.nodes.iter().filter_map(|node| {
            changes
                .map_range(&node.range())
                .map(|range| SyntaxNode::new(node.kind.clone(), range.start, range.end))
        });
        SyntaxTree::from_nodes(mapped)
    }
}

/// Whether `span` overlaps any of the sorted `regions`.
pub(crate) fn in_regions(regions: &[Range<usize>], span: &Range<usize>) -> bool {
    regions
        .iter()
        .take_while(|r| r.start < span.end)
        .any(|r| r.end > span.start)
}

/// Whether `span` lies entirely inside one of the sorted `regions`.
pub(crate) fn within_regions(regions: &[Range<usize>], span: &Range<usize>) -> bool {
    regions
        .iter()
        .take_while(|r| r.start <= span.start)
        .any(|r| span.end <= r.end)
}
