//! Reducer-level behaviour of the overlay engine: rebuild determinism,
//! occlusion, conflict resolution, emoji substitution and stale transactions.

use livemark::decoration::Priority;
use livemark::{
    Change, ChangeSet, Decoration, Document, EditorState, Effect, NodeKind, OcclusionPolicy,
    OverlayCaches, OverlayEngine, OverlaySettings, Selection, StateEffect, SyntaxNode,
    SyntaxTree, Transaction, UserEvent,
};

/// "Some **bold** and *it* `code`"
const INLINE: &str = "Some **bold** and *it* `code`";

fn inline_nodes() -> Vec<SyntaxNode> {
    vec![
        SyntaxNode::new(NodeKind::StrongEmphasis, 5, 13),
        SyntaxNode::new(NodeKind::EmphasisMark, 5, 7),
        SyntaxNode::new(NodeKind::EmphasisMark, 11, 13),
        SyntaxNode::new(NodeKind::Emphasis, 18, 22),
        SyntaxNode::new(NodeKind::EmphasisMark, 18, 19),
        SyntaxNode::new(NodeKind::EmphasisMark, 21, 22),
        SyntaxNode::new(NodeKind::InlineCode, 23, 29),
        SyntaxNode::new(NodeKind::CodeMark, 23, 24),
        SyntaxNode::new(NodeKind::CodeMark, 28, 29),
    ]
}

fn engine() -> OverlayEngine {
    OverlayEngine::new(OverlaySettings::default(), OverlayCaches::default())
}

fn state(
    engine: &mut OverlayEngine,
    text: &str,
    nodes: Vec<SyntaxNode>,
    selection: Selection,
) -> EditorState {
    let doc = Document::new(text);
    let len = doc.len();
    engine
        .create_state(doc, SyntaxTree::from_nodes(nodes), selection, vec![0..len])
        .0
}

fn occluding(state: &EditorState) -> Vec<&Decoration> {
    state
        .decorations()
        .iter()
        .filter(|d| d.is_occluding())
        .collect()
}

fn dispatched(effects: &[Effect]) -> Vec<&Transaction> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Dispatch(tx) => Some(tx),
            Effect::FetchDiagram(_) => None,
        })
        .collect()
}

#[test]
fn rebuild_is_deterministic() {
    let mut first = engine();
    let mut second = engine();
    let a = state(&mut first, INLINE, inline_nodes(), Selection::cursor(0));
    let b = state(&mut second, INLINE, inline_nodes(), Selection::cursor(0));
    assert_eq!(a.decorations(), b.decorations());

    // Same inputs through a refresh rebuild
    let (refreshed, effects) = first
        .apply(&a, Transaction::new().with_effect(StateEffect::Refresh))
        .expect("refresh");
    assert_eq!(refreshed.decorations(), a.decorations());
    assert!(effects.is_empty());
}

#[test]
fn no_occluding_decoration_covers_any_caret() {
    let policy = OcclusionPolicy::default();
    let mut engine = engine();
    for caret in 0..=INLINE.len() {
        let state = state(&mut engine, INLINE, inline_nodes(), Selection::cursor(caret));
        for decoration in occluding(&state) {
            assert!(
                !policy.should_reveal(state.selection(), &decoration.range()),
                "caret {} sits inside {:?}",
                caret,
                decoration
            );
        }
    }
}

#[test]
fn caret_in_bold_reveals_only_that_construct() {
    let mut engine = engine();
    let state = state(&mut engine, INLINE, inline_nodes(), Selection::cursor(8));
    let hidden: Vec<_> = occluding(&state).iter().map(|d| d.range()).collect();
    assert_eq!(hidden, vec![18..19, 21..22, 23..24, 28..29]);
    assert_eq!(
        state.decorations().project(INLINE),
        "Some **bold** and it code"
    );
}

#[test]
fn occluding_decorations_never_overlap() {
    let mut engine = engine();
    let text = "- [ ] **see** ![cat](cat.png) :tada: <b>x</b>";
    let nodes = vec![
        SyntaxNode::new(NodeKind::ListItem, 0, text.len()),
        SyntaxNode::new(NodeKind::ListMark, 0, 1),
        SyntaxNode::new(NodeKind::TaskMarker, 2, 5),
        SyntaxNode::new(NodeKind::StrongEmphasis, 6, 13),
        SyntaxNode::new(NodeKind::EmphasisMark, 6, 8),
        SyntaxNode::new(NodeKind::EmphasisMark, 11, 13),
        SyntaxNode::new(NodeKind::Image, 14, 29),
    ];
    let state = state(&mut engine, text, nodes, Selection::none());
    let spans: Vec<_> = occluding(&state).iter().map(|d| d.range()).collect();
    assert!(spans.len() >= 7, "got {:?}", spans);
    for pair in spans.windows(2) {
        assert!(pair[0].end <= pair[1].start, "{:?} overlaps {:?}", pair[0], pair[1]);
    }
    assert!(
        state
            .decorations()
            .iter()
            .any(|d| d.priority() == Priority::BlockReplace),
        "image renders as a block widget"
    );
}

#[test]
fn typed_closing_colon_dispatches_a_synthetic_substitution() {
    let mut engine = engine();
    let state = state(&mut engine, "hi :smile", vec![], Selection::cursor(9));

    let typed = Transaction::new()
        .with_changes(ChangeSet::single(Change::insert(9, ":")))
        .with_user_event(UserEvent::Input);
    let (state, effects) = engine.apply(&state, typed).expect("apply");
    let follow_ups = dispatched(&effects);
    assert_eq!(follow_ups.len(), 1);
    let substitution = follow_ups[0].clone();
    assert_eq!(substitution.changes.changes(), &[Change::new(3, 10, "😄")]);
    assert_eq!(substitution.user_event, Some(UserEvent::Synthetic));
    assert_eq!(substitution.base_version, Some(state.doc().version()));

    let (state, effects) = engine.apply(&state, substitution).expect("apply");
    assert_eq!(state.doc().text(), "hi 😄");
    assert!(dispatched(&effects).is_empty(), "no substitution loop");
}

#[test]
fn undo_of_a_substitution_is_not_re_expanded() {
    let mut engine = engine();
    let state = state(&mut engine, "hi 😄", vec![], Selection::cursor(7));

    let undo = Transaction::new()
        .with_changes(ChangeSet::single(Change::new(3, 7, ":smile:")))
        .with_user_event(UserEvent::Undo);
    let (state, effects) = engine.apply(&state, undo).expect("apply");
    assert_eq!(state.doc().text(), "hi :smile:");
    assert!(dispatched(&effects).is_empty());
    assert!(!state.undo_guard().allows_substitution());

    // The first edit after the undo is exempt and clears the flag
    let space = Transaction::new()
        .with_changes(ChangeSet::single(Change::insert(10, " ")))
        .with_user_event(UserEvent::Input);
    let (state, effects) = engine.apply(&state, space).expect("apply");
    assert!(dispatched(&effects).is_empty());
    assert!(state.undo_guard().allows_substitution());

    let paste = Transaction::new()
        .with_changes(ChangeSet::single(Change::insert(11, ":tada:")))
        .with_user_event(UserEvent::Paste);
    let (_, effects) = engine.apply(&state, paste).expect("apply");
    let follow_ups = dispatched(&effects);
    assert_eq!(follow_ups.len(), 1);
    assert_eq!(follow_ups[0].changes.changes(), &[Change::new(11, 17, "🎉")]);
}

#[test]
fn substitution_for_an_outdated_version_is_discarded() {
    let mut engine = engine();
    let state = state(&mut engine, "hi :smile", vec![], Selection::cursor(9));
    let typed = Transaction::new()
        .with_changes(ChangeSet::single(Change::insert(9, ":")))
        .with_user_event(UserEvent::Input);
    let (state, effects) = engine.apply(&state, typed).expect("apply");
    let substitution = dispatched(&effects)[0].clone();

    // The user keeps typing before the follow-up lands
    let more = Transaction::new()
        .with_changes(ChangeSet::single(Change::insert(10, "!")))
        .with_user_event(UserEvent::Input);
    let (state, _) = engine.apply(&state, more).expect("apply");

    let (after, effects) = engine.apply(&state, substitution).expect("apply");
    assert_eq!(after.doc().text(), "hi :smile:!");
    assert_eq!(after.doc().version(), state.doc().version());
    assert!(effects.is_empty());
}

#[test]
fn disabled_emoji_setting_suppresses_substitution() {
    let mut settings = OverlaySettings::default();
    settings.emoji.enabled = false;
    let mut engine = OverlayEngine::new(settings, OverlayCaches::default());
    let state = state(&mut engine, "hi :smile", vec![], Selection::cursor(9));
    let typed = Transaction::new()
        .with_changes(ChangeSet::single(Change::insert(9, ":")))
        .with_user_event(UserEvent::Input);
    let (_, effects) = engine.apply(&state, typed).expect("apply");
    assert!(dispatched(&effects).is_empty());
}

#[test]
fn decorations_follow_an_edit_before_the_parser_catches_up() {
    let mut engine = engine();
    let state = state(
        &mut engine,
        "# Title",
        vec![
            SyntaxNode::new(NodeKind::Heading(1), 0, 7),
            SyntaxNode::new(NodeKind::HeaderMark, 0, 1),
        ],
        Selection::none(),
    );
    assert!(occluding(&state).iter().any(|d| d.range() == (0..2)));

    let insert = Transaction::new()
        .with_changes(ChangeSet::single(Change::insert(0, "intro\n")))
        .with_user_event(UserEvent::Input);
    let (state, _) = engine.apply(&state, insert).expect("apply");
    let hidden: Vec<_> = occluding(&state).iter().map(|d| d.range()).collect();
    assert_eq!(hidden, vec![6..8]);
    assert_eq!(state.decorations().project(state.doc().text()), "intro\nTitle");
}

#[test]
fn unchanged_widgets_keep_their_instance() {
    let mut engine = engine();
    let text = "- [ ] a\n- [x] b";
    let nodes = vec![
        SyntaxNode::new(NodeKind::TaskMarker, 2, 5),
        SyntaxNode::new(NodeKind::TaskMarker, 10, 13),
    ];
    let first = state(&mut engine, text, nodes, Selection::none());
    let (second, _) = engine
        .apply(&first, Transaction::new().with_selection(Selection::cursor(15)))
        .expect("apply");

    let widgets = |state: &EditorState| -> Vec<_> {
        state
            .decorations()
            .iter()
            .filter_map(|d| d.widget().cloned())
            .collect()
    };
    let (before, after) = (widgets(&first), widgets(&second));
    assert_eq!(before.len(), 2);
    assert_eq!(after.len(), 2);
    for (a, b) in before.iter().zip(&after) {
        assert!(std::sync::Arc::ptr_eq(a, b));
    }
    assert_eq!(engine.reuse_stats().reused, 2);
}

#[test]
fn empty_transaction_is_a_no_op() {
    let mut engine = engine();
    let state = state(&mut engine, INLINE, inline_nodes(), Selection::none());
    let (next, effects) = engine.apply(&state, Transaction::new()).expect("apply");
    assert_eq!(next.doc().version(), state.doc().version());
    assert_eq!(next.decorations(), state.decorations());
    assert!(effects.is_empty());
}

#[test]
fn link_target_with_a_shortcode_still_collapses() {
    let mut engine = engine();
    let text = "see [docs](https://x.io/a:fire:b) now";
    let nodes = vec![
        SyntaxNode::new(NodeKind::Link, 4, 33),
        SyntaxNode::new(NodeKind::Url, 11, 32),
    ];
    let state = state(&mut engine, text, nodes, Selection::none());
    assert_eq!(state.decorations().project(text), "see docs now");
}
