use std::sync::LazyLock;

use regex::Regex;

use super::{EmojiTable, LOG_TARGET};
use crate::engine::UserEvent;
use crate::text::{Change, ChangeSet, Document};

static WHOLE_CODE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^:(.*):$").ok());
static TRAILING_CODE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r":([\w+-]+):$").ok());

/// The rewrite turning a just-typed `:code:` into its glyph.
///
/// `doc` is the document after `changes`; the returned change is in its
/// coordinates. Two shapes are recognised: an inserted chunk that is itself
/// a whole `:code:` (paste, completion accept), and a single typed character
/// that closes a `:code:` together with the text before it on the line.
pub fn detect_substitution(
    doc: &Document,
    changes: &ChangeSet,
    table: &EmojiTable,
) -> Option<Change> {
    for (range, inserted) in changes.inserted() {
        if inserted.is_empty() {
            continue;
        }

        if let Some(captures) = WHOLE_CODE.as_ref().and_then(|re| re.captures(inserted))
            && let Some(glyph) = captures.get(1).and_then(|code| table.lookup(code.as_str()))
        {
            log::debug!(target: LOG_TARGET, "Substituting inserted {}", inserted);
            return Some(Change::new(range.start, range.end, glyph));
        }

        let mut chars = inserted.chars();
        let single = chars.next().is_some() && chars.next().is_none();
        if !single || inserted == "\n" {
            continue;
        }
        let line = doc.line_at(range.start);
        let Some(prefix) = doc.slice(line.from..range.end) else {
            continue;
        };
        let Some(captures) = TRAILING_CODE.as_ref().and_then(|re| re.captures(prefix)) else {
            continue;
        };
        let (Some(whole), Some(code)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        if let Some(glyph) = table.lookup(code.as_str()) {
            log::debug!(target: LOG_TARGET, "Substituting typed {}", whole.as_str());
            return Some(Change::new(line.from + whole.start(), range.end, glyph));
        }
    }
    None
}

/// One-shot "the last document change was an undo" flag.
///
/// An undo sets it. The next document-changing transaction that is not an
/// undo clears it and is itself exempt from substitution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UndoGuard {
    after_undo: bool,
}

impl UndoGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allows_substitution(&self) -> bool {
        !self.after_undo
    }

    /// Record a document-changing transaction; returns whether substitution
    /// may run for it.
    pub fn observe(&mut self, event: Option<UserEvent>) -> bool {
        match event {
            Some(UserEvent::Undo) => {
                self.after_undo = true;
                false
            }
            // History replays and our own rewrites never substitute
            Some(UserEvent::Redo) | Some(UserEvent::Synthetic) => {
                self.after_undo = false;
                false
            }
            _ => {
                let allowed = !self.after_undo;
                self.after_undo = false;
                allowed
            }
        }
    }
}
