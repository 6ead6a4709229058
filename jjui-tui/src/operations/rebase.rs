use crossterm::event::KeyEvent;
use graph::{Commit, Line};
use jjui_core::{command, CommandArgs, RebaseSource, RebaseTarget};

use super::{marker, Outcome, RenderPosition};
use crate::event::Effect;
use crate::keymap::Keys;

/// Moves `from` (and what the source axis carries along) relative to the
/// highlighted revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rebase {
    from: String,
    to: Option<String>,
    source: RebaseSource,
    target: RebaseTarget,
}

impl Rebase {
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: None,
            source: RebaseSource::default(),
            target: RebaseTarget::default(),
        }
    }

    pub fn source(&self) -> RebaseSource {
        self.source
    }

    pub fn target(&self) -> RebaseTarget {
        self.target
    }

    /// The command Apply would run, if a destination is selected
    pub fn command(&self) -> Option<CommandArgs> {
        let to = self.to.as_deref()?;
        Some(command::rebase(&self.from, to, self.source, self.target))
    }

    pub fn set_selected(&mut self, commit: &Commit) {
        self.to = Some(commit.change_id.clone());
    }

    pub fn render_position(&self) -> RenderPosition {
        // Children are drawn below their parents
        match self.target {
            RebaseTarget::Before => RenderPosition::Before,
            RebaseTarget::Destination | RebaseTarget::After => RenderPosition::After,
        }
    }

    pub fn overlay(&self, position: RenderPosition) -> Vec<Line> {
        if position != self.render_position() {
            return Vec::new();
        }
        let text = match self.target {
            RebaseTarget::Destination => "onto",
            RebaseTarget::After => "after",
            RebaseTarget::Before => "before",
        };
        vec![marker(text)]
    }

    pub fn handle_key(&mut self, key: &KeyEvent, keys: &Keys) -> Outcome {
        let rebase = &keys.rebase;
        if rebase.revision.matches(key) {
            self.source = RebaseSource::Revision;
        } else if rebase.branch.matches(key) {
            self.source = RebaseSource::Branch;
        } else if rebase.descendants.matches(key) {
            self.source = RebaseSource::Descendants;
        } else if rebase.onto.matches(key) {
            self.target = RebaseTarget::Destination;
        } else if rebase.after.matches(key) {
            self.target = RebaseTarget::After;
        } else if rebase.before.matches(key) {
            self.target = RebaseTarget::Before;
        } else if keys.apply.matches(key) {
            return match self.command() {
                Some(args) => Outcome::Apply(Effect::run(args, Some(self.from.as_str()))),
                None => Outcome::Handled,
            };
        } else if keys.cancel.matches(key) {
            return Outcome::Cancel;
        } else {
            return Outcome::Ignored;
        }
        Outcome::Handled
    }

    pub fn key_hints(&self, keys: &Keys) -> Vec<(String, String)> {
        let rebase = &keys.rebase;
        vec![
            rebase.revision.hint("revision"),
            rebase.branch.hint("branch"),
            rebase.descendants.hint("descendants"),
            rebase.onto.hint("onto"),
            rebase.after.hint("after"),
            rebase.before.hint("before"),
            keys.apply.hint("apply"),
            keys.cancel.hint("cancel"),
        ]
    }
}
