//! Emoji shortcodes.
//!
//! Typing a `:code:` rewrites it into its glyph through a follow-up
//! transaction (`detect_substitution`). Codes already in the text render as
//! glyph widgets through the emoji handler. `UndoGuard` stops the rewrite
//! from firing right after an undo, which would otherwise re-expand the code
//! the user just restored.

mod detect;
mod table;

pub use detect::{UndoGuard, detect_substitution};
pub use table::EmojiTable;

pub(crate) const LOG_TARGET: &str = "livemark::emoji";
