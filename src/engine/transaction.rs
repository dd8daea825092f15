use std::ops::Range;

use crate::diagram::DiagramDelivery;
use crate::selection::Selection;
use crate::syntax::SyntaxTree;
use crate::text::ChangeSet;

/// What caused a transaction, as far as the engine cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserEvent {
    Input,
    Delete,
    Paste,
    Drop,
    Undo,
    Redo,
    /// Caret or selection movement.
    Select,
    /// Rewrites issued by the engine itself (emoji substitution, toggles).
    Synthetic,
}

/// Out-of-band results carried into a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEffect {
    DiagramReady(DiagramDelivery),
    /// Rebuild with unchanged inputs, e.g. after a cache clear.
    Refresh,
}

/// One step from a state to the next.
///
/// Every field is optional: an empty transaction is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub changes: ChangeSet,
    /// Explicit selection after the change; mapped from the old one when absent.
    pub selection: Option<Selection>,
    /// Fresh parse of the new document; the old tree is remapped when absent.
    pub tree: Option<SyntaxTree>,
    pub viewport: Option<Vec<Range<usize>>>,
    pub effects: Vec<StateEffect>,
    pub user_event: Option<UserEvent>,
    /// Document version the transaction was computed against. A transaction
    /// arriving after the document moved on is discarded.
    pub base_version: Option<u64>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_changes(mut self, changes: ChangeSet) -> Self {
        self.changes = changes;
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_tree(mut self, tree: SyntaxTree) -> Self {
        self.tree = Some(tree);
        self
    }

    pub fn with_viewport(mut self, viewport: Vec<Range<usize>>) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn with_effect(mut self, effect: StateEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_user_event(mut self, event: UserEvent) -> Self {
        self.user_event = Some(event);
        self
    }

    pub fn based_on(mut self, version: u64) -> Self {
        self.base_version = Some(version);
        self
    }

    pub fn changes_document(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Whether applying this transaction can change the decorations.
    pub fn affects_decorations(&self) -> bool {
        self.changes_document()
            || self.selection.is_some()
            || self.tree.is_some()
            || self.viewport.is_some()
            || !self.effects.is_empty()
    }
}
