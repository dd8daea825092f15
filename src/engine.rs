//! The overlay engine as an explicit reducer.
//!
//! `OverlayEngine::apply` takes the current `EditorState` and a
//! `Transaction` and returns the next state plus the effects the host must
//! carry out: diagram fetches to start and follow-up transactions (emoji
//! substitution) to dispatch. The engine itself never performs I/O and never
//! edits the document behind the host's back.
//!
//! Rebuild order on every relevant transaction: apply changes, remap or
//! replace the tree, map selection and viewport, run the undo guard and
//! substitution check, walk the viewport, resolve candidates into a
//! `DecorationSet`, intern widgets.

mod commands;
mod state;
mod transaction;

pub use state::EditorState;
pub use transaction::{StateEffect, Transaction, UserEvent};

use std::ops::Range;
use std::sync::Arc;

use crate::config::{OverlaySettings, SettingsStore};
use crate::decoration::{DecorationSet, ReuseStats, WidgetRegistry};
use crate::diagram::{DiagramCache, DiagramRequest};
use crate::emoji::{EmojiTable, UndoGuard, detect_substitution};
use crate::error::OverlayResult;
use crate::handlers::{HandlerContext, HandlerSet};
use crate::mention::MentionDetailCache;
use crate::occlusion::OcclusionPolicy;
use crate::selection::Selection;
use crate::syntax::SyntaxTree;
use crate::text::{ChangeSet, Document};
use crate::walker;

const LOG_TARGET: &str = "livemark::engine";

/// Process-lifetime caches, owned by whoever creates the engine and shared
/// by clone with the diagram pipeline and mention completer.
#[derive(Debug, Clone, Default)]
pub struct OverlayCaches {
    pub diagrams: DiagramCache,
    pub mentions: MentionDetailCache,
}

/// Work the host must do after a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand to `DiagramPipeline::request`.
    FetchDiagram(DiagramRequest),
    /// Apply as a follow-up transaction.
    Dispatch(Transaction),
}

pub struct OverlayEngine {
    settings: SettingsStore,
    policy: OcclusionPolicy,
    handlers: HandlerSet,
    emoji: EmojiTable,
    caches: OverlayCaches,
    registry: WidgetRegistry,
}

impl OverlayEngine {
    pub fn new(settings: OverlaySettings, caches: OverlayCaches) -> Self {
        let handlers = HandlerSet::for_flavor(settings.flavor);
        let emoji = EmojiTable::new(&settings.emoji.custom);
        Self {
            settings: SettingsStore::new(settings),
            policy: OcclusionPolicy::default(),
            handlers,
            emoji,
            caches,
            registry: WidgetRegistry::new(),
        }
    }

    pub fn with_policy(mut self, policy: OcclusionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the handler set, e.g. to add host-specific handlers.
    pub fn with_handlers(mut self, handlers: HandlerSet) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn settings(&self) -> Arc<OverlaySettings> {
        self.settings.load()
    }

    pub fn caches(&self) -> &OverlayCaches {
        &self.caches
    }

    pub fn policy(&self) -> OcclusionPolicy {
        self.policy
    }

    /// Widget reuse counts of the last rebuild.
    pub fn reuse_stats(&self) -> ReuseStats {
        self.registry.last_stats()
    }

    /// Swap settings. The next rebuild uses them; dispatch a refresh to
    /// re-decorate right away.
    pub fn reconfigure(&mut self, settings: OverlaySettings) -> Transaction {
        self.handlers = HandlerSet::for_flavor(settings.flavor);
        self.emoji = EmojiTable::new(&settings.emoji.custom);
        self.settings.replace(settings);
        self.registry.clear();
        Transaction::new().with_effect(StateEffect::Refresh)
    }

    /// Initial state for a document, decorated.
    pub fn create_state(
        &mut self,
        doc: Document,
        tree: SyntaxTree,
        selection: Selection,
        viewport: Vec<Range<usize>>,
    ) -> (EditorState, Vec<Effect>) {
        let viewport = state::clamp_viewport(viewport, doc.len());
        let (decorations, requests) = self.rebuild(&doc, &tree, &selection, &viewport);
        let state = EditorState {
            doc,
            tree,
            selection,
            viewport,
            decorations,
            undo_guard: UndoGuard::new(),
        };
        (state, fetch_effects(requests))
    }

    /// The reducer: `(state, transaction) -> (state, effects)`.
    pub fn apply(
        &mut self,
        state: &EditorState,
        tx: Transaction,
    ) -> OverlayResult<(EditorState, Vec<Effect>)> {
        if let Some(base) = tx.base_version
            && base != state.doc.version()
        {
            log::warn!(
                target: LOG_TARGET,
                "Discarding transaction for version {} (document is at {})",
                base,
                state.doc.version()
            );
            return Ok((state.clone(), Vec::new()));
        }
        if !tx.affects_decorations() {
            return Ok((state.clone(), Vec::new()));
        }

        let doc_changed = tx.changes_document();
        let doc = if doc_changed {
            state.doc.apply(&tx.changes)?
        } else {
            state.doc.clone()
        };
        let tree = match tx.tree {
            Some(tree) => tree,
            None => state.tree.map(&tx.changes),
        };
        let selection = match tx.selection {
            Some(selection) => selection,
            None => state.selection.map(&tx.changes),
        };
        let viewport = match tx.viewport {
            Some(viewport) => state::clamp_viewport(viewport, doc.len()),
            None => state::map_viewport(&state.viewport, &tx.changes, doc.len()),
        };

        let mut effects = Vec::new();
        let mut undo_guard = state.undo_guard;
        if doc_changed
            && undo_guard.observe(tx.user_event)
            && self.settings.load().emoji.enabled
            && let Some(change) = detect_substitution(&doc, &tx.changes, &self.emoji)
        {
            effects.push(Effect::Dispatch(
                Transaction::new()
                    .with_changes(ChangeSet::single(change))
                    .with_user_event(UserEvent::Synthetic)
                    .based_on(doc.version()),
            ));
        }

        for effect in &tx.effects {
            if let StateEffect::DiagramReady(delivery) = effect {
                if delivery.version == doc.version() {
                    log::debug!(target: LOG_TARGET, "Diagram {} delivered", delivery.key);
                } else {
                    // Still a useful rebuild trigger: the result is in the cache
                    log::debug!(
                        target: LOG_TARGET,
                        "Diagram {} delivered for version {} (now {})",
                        delivery.key,
                        delivery.version,
                        doc.version()
                    );
                }
            }
        }

        let (decorations, requests) = self.rebuild(&doc, &tree, &selection, &viewport);
        effects.extend(fetch_effects(requests));

        let next = EditorState {
            doc,
            tree,
            selection,
            viewport,
            decorations,
            undo_guard,
        };
        Ok((next, effects))
    }

    /// Forget every cached diagram and mention detail. Returns the refresh
    /// transaction to dispatch so open documents re-decorate and re-fetch.
    pub fn clear_caches(&mut self) -> Transaction {
        self.caches.diagrams.clear();
        self.caches.mentions.clear();
        self.registry.clear();
        log::debug!(target: LOG_TARGET, "Cleared overlay caches");
        Transaction::new().with_effect(StateEffect::Refresh)
    }

    fn rebuild(
        &mut self,
        doc: &Document,
        tree: &SyntaxTree,
        selection: &Selection,
        viewport: &[Range<usize>],
    ) -> (DecorationSet, Vec<DiagramRequest>) {
        let settings = self.settings.load();
        let ctx = HandlerContext::new(
            doc,
            tree,
            selection,
            self.policy,
            &settings,
            &self.caches,
            &self.emoji,
        );
        let output = walker::walk(tree, viewport, &self.handlers, &ctx);

        let mut decorations = DecorationSet::build(output.decorations);
        let stats = decorations.intern(&mut self.registry);
        log::debug!(
            target: LOG_TARGET,
            "Rebuilt version {}: {} decorations, {} widgets reused, {} created",
            doc.version(),
            decorations.len(),
            stats.reused,
            stats.created
        );

        let mut requests = output.requests;
        let mut seen = std::collections::HashSet::new();
        requests.retain(|request| seen.insert(request.key));
        (decorations, requests)
    }
}

fn fetch_effects(requests: Vec<DiagramRequest>) -> Vec<Effect> {
    requests.into_iter().map(Effect::FetchDiagram).collect()
}
