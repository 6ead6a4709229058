//! Modal operations. Exactly one is active at a time; `Noop` is the idle
//! state that intercepts nothing.

pub mod abandon;
pub mod bookmark;
pub mod describe;
pub mod details;
pub mod git;
pub mod rebase;
pub mod squash;
pub mod undo;

use crossterm::event::KeyEvent;
use graph::{Commit, Line, Segment};
use jjui_core::CommandOutput;

use crate::event::{Effect, QueryKind};
use crate::keymap::Keys;
use crate::theme;

pub use abandon::Abandon;
pub use bookmark::BookmarkOperation;
pub use describe::Describe;
pub use details::Details;
pub use git::Git;
pub use rebase::Rebase;
pub use squash::Squash;
pub use undo::Undo;

/// Where an operation draws on the highlighted row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderPosition {
    None,
    /// Extra lines above the row
    Before,
    /// Extra lines below the row
    After,
    /// In place of the node glyph
    Glyph,
    /// In front of the bookmark names
    Bookmark,
    /// In place of the description
    Description,
    /// Above the graph, outside the viewport
    Top,
}

/// What the active operation made of a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Not for this operation; default bindings get a look
    Ignored,
    /// Consumed, nothing to run
    Handled,
    /// Back to `Noop` without running anything
    Cancel,
    /// Back to `Noop`, then perform the effect
    Apply(Effect),
    /// Stay active and perform the effects
    Continue(Vec<Effect>),
}

#[derive(Debug, Clone, Default)]
pub enum Operation {
    #[default]
    Noop,
    Rebase(Rebase),
    Squash(Squash),
    Bookmark(BookmarkOperation),
    Abandon(Abandon),
    Undo(Undo),
    Describe(Describe),
    Details(Details),
    Git(Git),
}

impl Operation {
    pub fn is_noop(&self) -> bool {
        matches!(self, Operation::Noop)
    }

    /// Shown in the status line
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Noop => "normal",
            Operation::Rebase(_) => "rebase",
            Operation::Squash(_) => "squash",
            Operation::Bookmark(op) => op.name(),
            Operation::Abandon(_) => "abandon",
            Operation::Undo(_) => "undo",
            Operation::Describe(_) => "describe",
            Operation::Details(_) => "details",
            Operation::Git(_) => "git",
        }
    }

    pub fn render_position(&self) -> RenderPosition {
        match self {
            Operation::Noop => RenderPosition::None,
            Operation::Rebase(op) => op.render_position(),
            Operation::Squash(_) => RenderPosition::After,
            Operation::Bookmark(op) => op.render_position(),
            Operation::Abandon(_) => RenderPosition::Glyph,
            Operation::Undo(_) | Operation::Git(_) => RenderPosition::Top,
            Operation::Describe(_) => RenderPosition::Description,
            Operation::Details(_) => RenderPosition::After,
        }
    }

    /// Lines to splice in at `position` on the highlighted row. Inline
    /// positions use the first line only.
    pub fn overlay(&self, position: RenderPosition) -> Vec<Line> {
        match self {
            Operation::Noop => Vec::new(),
            Operation::Rebase(op) => op.overlay(position),
            Operation::Squash(op) => op.overlay(position),
            Operation::Bookmark(op) => op.overlay(position),
            Operation::Abandon(op) => op.overlay(position),
            Operation::Undo(op) => op.overlay(position),
            Operation::Describe(op) => op.overlay(position),
            Operation::Details(op) => op.overlay(position),
            Operation::Git(op) => op.overlay(position),
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent, keys: &Keys) -> Outcome {
        match self {
            Operation::Noop => Outcome::Ignored,
            Operation::Rebase(op) => op.handle_key(key, keys),
            Operation::Squash(op) => op.handle_key(key, keys),
            Operation::Bookmark(op) => op.handle_key(key, keys),
            Operation::Abandon(op) => op.handle_key(key, keys),
            Operation::Undo(op) => op.handle_key(key, keys),
            Operation::Describe(op) => op.handle_key(key, keys),
            Operation::Details(op) => op.handle_key(key, keys),
            Operation::Git(op) => op.handle_key(key, keys),
        }
    }

    /// Follow the highlighted row. Only operations that retarget with the
    /// cursor react.
    pub fn set_selected(&mut self, commit: &Commit) -> Vec<Effect> {
        match self {
            Operation::Rebase(op) => {
                op.set_selected(commit);
                Vec::new()
            }
            Operation::Squash(op) => {
                op.set_selected(commit);
                Vec::new()
            }
            Operation::Bookmark(op) => op.set_selected(commit),
            _ => Vec::new(),
        }
    }

    /// Reply to a `Query` this operation issued. Replies for another
    /// operation or another revision are ignored.
    pub fn query_finished(&mut self, kind: &QueryKind, output: &CommandOutput) {
        match self {
            Operation::Bookmark(op) => op.query_finished(kind, output),
            Operation::Undo(op) => op.query_finished(kind, output),
            Operation::Describe(op) => op.query_finished(kind, output),
            Operation::Details(op) => op.query_finished(kind, output),
            _ => tracing::debug!(?kind, "query reply without a taker"),
        }
    }

    /// Whether typed characters belong to a text input
    pub fn is_editing(&self) -> bool {
        match self {
            Operation::Describe(_) => true,
            Operation::Bookmark(op) => op.is_editing(),
            _ => false,
        }
    }

    pub fn key_hints(&self, keys: &Keys) -> Vec<(String, String)> {
        match self {
            Operation::Noop => vec![
                keys.new.hint("new"),
                keys.edit.hint("edit"),
                keys.describe.mode.hint("describe"),
                keys.rebase.mode.hint("rebase"),
                keys.squash.hint("squash"),
                keys.bookmark.mode.hint("bookmark"),
                keys.abandon.hint("abandon"),
                keys.details.mode.hint("details"),
                keys.git.mode.hint("git"),
                keys.undo.hint("undo"),
                keys.preview.mode.hint("preview"),
                keys.revset.hint("revset"),
                keys.quit.hint("quit"),
            ],
            Operation::Rebase(op) => op.key_hints(keys),
            Operation::Squash(_) => vec![keys.apply.hint("squash"), keys.cancel.hint("cancel")],
            Operation::Bookmark(op) => op.key_hints(keys),
            Operation::Abandon(_) | Operation::Undo(_) => vec![
                keys.yes.hint("yes"),
                keys.no.hint("no"),
                keys.apply.hint("confirm"),
                keys.cancel.hint("cancel"),
            ],
            Operation::Describe(_) => vec![
                keys.apply.hint("save"),
                keys.describe.editor.hint("editor"),
                keys.cancel.hint("cancel"),
            ],
            Operation::Details(_) => vec![
                keys.details.toggle.hint("mark"),
                keys.details.split.hint("split"),
                keys.details.restore.hint("restore"),
                keys.details.diff.hint("diff"),
                keys.cancel.hint("close"),
            ],
            Operation::Git(_) => vec![
                keys.git.push.hint("push"),
                keys.git.fetch.hint("fetch"),
                keys.cancel.hint("cancel"),
            ],
        }
    }
}

/// `<< text >>` drop marker
pub(crate) fn marker(text: &str) -> Line {
    Line::new(vec![Segment::new(format!("<< {text} >>"), theme::DROP)])
}

/// Lines of a query reply with jj's own colours
pub(crate) fn output_lines(output: &str) -> Vec<Line> {
    graph::lines(output).collect()
}

#[cfg(test)]
pub(crate) fn commit(change_id: &str) -> Commit {
    Commit {
        change_id_short: change_id.chars().take(2).collect(),
        change_id: change_id.to_string(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{char_key, key};
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    #[test]
    fn noop_intercepts_nothing() {
        let keys = Keys::default();
        let mut op = Operation::Noop;

        assert_eq!(op.handle_key(&char_key('d'), &keys), Outcome::Ignored);
        assert_eq!(op.render_position(), RenderPosition::None);
        assert!(op.overlay(RenderPosition::After).is_empty());
        assert!(op.set_selected(&commit("kxrwqsyo")).is_empty());
    }

    #[test]
    fn dispatch_reaches_the_variant() {
        let keys = Keys::default();
        let mut op = Operation::Rebase(Rebase::new("kxrwqsyo"));
        op.set_selected(&commit("mzvwutvl"));

        assert_eq!(op.name(), "rebase");
        assert_eq!(op.handle_key(&char_key('b'), &keys), Outcome::Handled);
        assert_eq!(op.render_position(), RenderPosition::Before);
        assert!(matches!(op.handle_key(&key(KeyCode::Enter), &keys), Outcome::Apply(_)));
    }

    #[test]
    fn hints_follow_the_keymap() {
        let keys: Keys = toml::from_str("[git]\npush = [\"P\"]").unwrap();
        let hints = Operation::Git(Git::default()).key_hints(&keys);
        assert_eq!(hints[0], ("P".to_string(), "push".to_string()));
    }
}
