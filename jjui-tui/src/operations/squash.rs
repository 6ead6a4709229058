use crossterm::event::KeyEvent;
use graph::{Commit, Line};
use jjui_core::command;

use super::{marker, Outcome, RenderPosition};
use crate::event::Effect;
use crate::keymap::Keys;

/// Folds `from` into the highlighted revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Squash {
    from: String,
    to: Option<String>,
}

impl Squash {
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: None,
        }
    }

    pub fn set_selected(&mut self, commit: &Commit) {
        self.to = Some(commit.change_id.clone());
    }

    pub fn overlay(&self, position: RenderPosition) -> Vec<Line> {
        match position {
            RenderPosition::After => vec![marker("into")],
            _ => Vec::new(),
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent, keys: &Keys) -> Outcome {
        if keys.apply.matches(key) {
            match &self.to {
                // `from` may be gone afterwards, the destination is not
                Some(to) => Outcome::Apply(Effect::run(command::squash(&self.from, to), Some(to.as_str()))),
                None => Outcome::Handled,
            }
        } else if keys.cancel.matches(key) {
            Outcome::Cancel
        } else {
            Outcome::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::commit;
    use crate::keymap::key;
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    #[test]
    fn squashes_into_the_selection() {
        let keys = Keys::default();
        let mut squash = Squash::new("kxrwqsyo");
        squash.set_selected(&commit("mzvwutvl"));

        assert_eq!(
            squash.handle_key(&key(KeyCode::Enter), &keys),
            Outcome::Apply(Effect::run(
                command::squash("kxrwqsyo", "mzvwutvl"),
                Some("mzvwutvl")
            ))
        );
    }

    #[test]
    fn overlay_goes_below_the_row() {
        let squash = Squash::new("kxrwqsyo");
        assert_eq!(squash.overlay(RenderPosition::After)[0].text(), "<< into >>");
        assert!(squash.overlay(RenderPosition::Before).is_empty());
    }
}
