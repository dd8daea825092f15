//! Per-construct decoration handlers.
//!
//! Node handlers are looked up by node kind and see one syntax node at a
//! time; text scanners see a viewport range and find constructs the parser
//! does not tag (inline HTML, mentions, emoji codes, delimited columns).
//! Both are pure: they read the `HandlerContext` and push candidates into a
//! `HandlerOutput`, independent of invocation order.

pub mod checkbox;
pub mod columns;
pub mod diagram;
pub mod emoji;
pub mod html;
pub mod image;
pub mod lines;
pub mod link;
pub mod marks;
pub mod mention;
pub mod table;

use std::ops::Range;
use std::sync::OnceLock;

use crate::columns::column_widths;
use crate::config::{ContentFlavor, OverlaySettings};
use crate::decoration::Decoration;
use crate::diagram::DiagramRequest;
use crate::emoji::EmojiTable;
use crate::engine::OverlayCaches;
use crate::occlusion::OcclusionPolicy;
use crate::selection::Selection;
use crate::syntax::{NodeKind, SyntaxNode, SyntaxTree, in_regions, within_regions};
use crate::text::Document;

/// Everything a handler may read during one rebuild.
pub struct HandlerContext<'a> {
    pub doc: &'a Document,
    pub tree: &'a SyntaxTree,
    pub selection: &'a Selection,
    pub policy: OcclusionPolicy,
    pub settings: &'a OverlaySettings,
    pub caches: &'a OverlayCaches,
    pub emoji: &'a EmojiTable,
    code_regions: Vec<Range<usize>>,
    literal_regions: Vec<Range<usize>>,
    column_widths: OnceLock<Vec<usize>>,
}

impl<'a> HandlerContext<'a> {
    pub fn new(
        doc: &'a Document,
        tree: &'a SyntaxTree,
        selection: &'a Selection,
        policy: OcclusionPolicy,
        settings: &'a OverlaySettings,
        caches: &'a OverlayCaches,
        emoji: &'a EmojiTable,
    ) -> Self {
        Self {
            doc,
            tree,
            selection,
            policy,
            settings,
            caches,
            emoji,
            code_regions: tree.code_regions(),
            literal_regions: literal_regions(doc, tree),
            column_widths: OnceLock::new(),
        }
    }

    /// Source text of `range`; empty when the range is not valid for this version.
    pub fn text(&self, range: &Range<usize>) -> &'a str {
        self.doc.slice(range.clone()).unwrap_or_default()
    }

    /// Whether the selection occludes `span`.
    pub fn reveals(&self, span: &Range<usize>) -> bool {
        self.policy.should_reveal(self.selection, span)
    }

    /// Whether `span` overlaps a fenced block or inline code.
    pub fn in_code(&self, span: &Range<usize>) -> bool {
        in_regions(&self.code_regions, span)
    }

    /// Whether `span` lies entirely within a fenced block or inline code.
    pub fn inside_code(&self, span: &Range<usize>) -> bool {
        within_regions(&self.code_regions, span)
    }

    /// Whether `span` overlaps a URL or the `](target)` tail of a link.
    pub fn in_literal(&self, span: &Range<usize>) -> bool {
        in_regions(&self.literal_regions, span)
    }

    /// Column widths over the whole document, computed once per rebuild.
    pub fn column_widths(&self) -> &[usize] {
        self.column_widths
            .get_or_init(|| column_widths(self.doc, &self.settings.columns))
    }

    /// `node`'s span without trailing line breaks.
    ///
    /// Block nodes own the newline that ends them; a caret at the start of
    /// the following line must not count as inside the block.
    pub fn block_span(&self, node: &SyntaxNode) -> Range<usize> {
        let text = self.text(&node.range());
        node.from..node.from + text.trim_end_matches(['\n', '\r']).len()
    }
}

/// Text that scanners must leave alone: URLs and link targets, sorted by start.
fn literal_regions(doc: &Document, tree: &SyntaxTree) -> Vec<Range<usize>> {
    let mut regions: Vec<Range<usize>> = tree
        .nodes()
        .iter()
        .filter_map(|node| match node.kind {
            NodeKind::Url => Some(node.range()),
            NodeKind::Link => {
                let close = link::label_end(doc.slice(node.range())?)?;
                Some(node.from + close..node.to)
            }
            _ => None,
        })
        .collect();
    regions.sort_by_key(|r| r.start);
    regions
}

/// Candidates and fetch requests collected during a walk.
#[derive(Debug, Default)]
pub struct HandlerOutput {
    pub decorations: Vec<Decoration>,
    pub requests: Vec<DiagramRequest>,
}

impl HandlerOutput {
    pub fn push(&mut self, decoration: Decoration) {
        self.decorations.push(decoration);
    }

    pub fn request(&mut self, request: DiagramRequest) {
        self.requests.push(request);
    }

    pub fn extend(&mut self, other: HandlerOutput) {
        self.decorations.extend(other.decorations);
        self.requests.extend(other.requests);
    }
}

/// Decorates one syntax node kind.
pub trait NodeHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn accepts(&self, kind: &NodeKind) -> bool;

    fn decorate(&self, node: &SyntaxNode, ctx: &HandlerContext<'_>, out: &mut HandlerOutput);
}

/// Finds constructs in the raw text of a viewport range.
pub trait TextScanner: Send + Sync {
    fn name(&self) -> &'static str;

    fn scan(&self, range: &Range<usize>, ctx: &HandlerContext<'_>, out: &mut HandlerOutput);
}

/// The handlers a walk dispatches to.
#[derive(Default)]
pub struct HandlerSet {
    nodes: Vec<Box<dyn NodeHandler>>,
    scanners: Vec<Box<dyn TextScanner>>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_flavor(flavor: ContentFlavor) -> Self {
        match flavor {
            ContentFlavor::Markdown => Self::markdown(),
            ContentFlavor::Delimited => Self::delimited(),
        }
    }

    /// Every markdown handler and scanner.
    pub fn markdown() -> Self {
        Self::new()
            .with_node(lines::LineAttributeHandler)
            .with_node(marks::MarkHandler)
            .with_node(checkbox::CheckboxHandler)
            .with_node(image::ImageHandler)
            .with_node(table::TableHandler)
            .with_node(link::LinkHandler)
            .with_node(diagram::DiagramHandler)
            .with_scanner(html::HtmlScanner)
            .with_scanner(mention::MentionScanner)
            .with_scanner(emoji::EmojiScanner)
    }

    /// Column alignment only.
    pub fn delimited() -> Self {
        Self::new().with_scanner(columns::ColumnScanner)
    }

    pub fn with_node(mut self, handler: impl NodeHandler + 'static) -> Self {
        self.nodes.push(Box::new(handler));
        self
    }

    pub fn with_scanner(mut self, scanner: impl TextScanner + 'static) -> Self {
        self.scanners.push(Box::new(scanner));
        self
    }

    /// Handlers registered for `kind`, in registration order.
    pub fn handlers_for<'s>(
        &'s self,
        kind: &'s NodeKind,
    ) -> impl Iterator<Item = &'s dyn NodeHandler> + 's {
        self.nodes
            .iter()
            .filter(move |handler| handler.accepts(kind))
            .map(|handler| handler.as_ref())
    }

    pub fn scanners(&self) -> impl Iterator<Item = &dyn TextScanner> {
        self.scanners.iter().map(|scanner| scanner.as_ref())
    }

    pub fn has_node_handlers(&self) -> bool {
        !self.nodes.is_empty()
    }
}
