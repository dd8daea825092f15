pub mod columns;
pub mod config;
pub mod decoration;
pub mod diagram;
pub mod drop;
pub mod emoji;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod mention;
pub mod occlusion;
pub mod selection;
pub mod syntax;
pub mod tasks;
pub mod text;
pub mod walker;

// Re-export the types a host needs to drive the engine
pub use config::{OverlaySettings, SettingsStore};
pub use decoration::{Decoration, DecorationKind, DecorationSet, Priority, Widget};
pub use engine::{
    EditorState, Effect, OverlayCaches, OverlayEngine, StateEffect, Transaction, UserEvent,
};
pub use error::{OverlayError, OverlayResult};
pub use occlusion::{CaretBoundary, OcclusionPolicy};
pub use selection::{Selection, SelectionRange};
pub use syntax::{MarkdownParser, NodeKind, SyntaxNode, SyntaxTree};
pub use text::{Change, ChangeSet, Document};
