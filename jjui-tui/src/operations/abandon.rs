use crossterm::event::KeyEvent;
use graph::{Commit, Line, Segment};
use jjui_core::command;

use super::{Outcome, RenderPosition};
use crate::event::Effect;
use crate::keymap::Keys;
use crate::theme;
use crate::widgets::{ChoiceList, ListEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abandon {
    revision: String,
    confirm: ChoiceList<bool>,
}

impl Abandon {
    pub fn new(commit: &Commit) -> Self {
        Self {
            revision: commit.change_id.clone(),
            confirm: ChoiceList::confirmation(format!("Abandon {}?", commit.change_id_short)),
        }
    }

    pub fn overlay(&self, position: RenderPosition) -> Vec<Line> {
        match position {
            RenderPosition::Glyph => vec![Line::new(vec![Segment::new("×", theme::DROP)])],
            RenderPosition::After => self.confirm.lines(),
            _ => Vec::new(),
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent, keys: &Keys) -> Outcome {
        let answer = if keys.yes.matches(key) {
            Some(true)
        } else if keys.no.matches(key) {
            Some(false)
        } else {
            match self.confirm.handle_key(key, keys) {
                ListEvent::Chosen(_) => Some(self.confirm.answer()),
                ListEvent::Cancel => Some(false),
                ListEvent::Moved | ListEvent::Ignored => None,
            }
        };
        match answer {
            // The abandoned row is gone after the refresh, relocation falls back
            Some(true) => Outcome::Apply(Effect::run(
                command::abandon(&[self.revision.as_str()]),
                Some(self.revision.as_str()),
            )),
            Some(false) => Outcome::Cancel,
            None => Outcome::Handled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{char_key, key};
    use crate::operations::commit;
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    #[test]
    fn confirming_abandons() {
        let keys = Keys::default();
        let mut abandon = Abandon::new(&commit("kxrwqsyo"));

        assert_eq!(
            abandon.handle_key(&key(KeyCode::Enter), &keys),
            Outcome::Apply(Effect::run(command::abandon(&["kxrwqsyo"]), Some("kxrwqsyo")))
        );
    }

    #[test]
    fn choosing_no_cancels() {
        let keys = Keys::default();
        let mut abandon = Abandon::new(&commit("kxrwqsyo"));

        assert_eq!(abandon.handle_key(&char_key('j'), &keys), Outcome::Handled);
        assert_eq!(abandon.handle_key(&key(KeyCode::Enter), &keys), Outcome::Cancel);
    }

    #[test]
    fn shortcuts_answer_directly() {
        let keys = Keys::default();
        let mut abandon = Abandon::new(&commit("kxrwqsyo"));
        assert_eq!(abandon.handle_key(&char_key('n'), &keys), Outcome::Cancel);
        assert!(matches!(abandon.handle_key(&char_key('y'), &keys), Outcome::Apply(_)));
    }

    #[test]
    fn answers_follow_the_keymap() {
        let keys: Keys = toml::from_str("yes = [\"j\"]\nno = [\"x\"]").unwrap();
        let mut abandon = Abandon::new(&commit("kxrwqsyo"));

        // `y` is no longer an answer, and `j` no longer moves the list
        assert_eq!(abandon.handle_key(&char_key('y'), &keys), Outcome::Handled);
        assert_eq!(
            abandon.handle_key(&char_key('j'), &keys),
            Outcome::Apply(Effect::run(command::abandon(&["kxrwqsyo"]), Some("kxrwqsyo")))
        );
        assert_eq!(abandon.handle_key(&char_key('x'), &keys), Outcome::Cancel);
    }

    #[test]
    fn marks_glyph_and_asks_below() {
        let abandon = Abandon::new(&commit("kxrwqsyo"));
        assert_eq!(abandon.overlay(RenderPosition::Glyph)[0].text(), "×");
        let texts: Vec<String> = abandon.overlay(RenderPosition::After).iter().map(Line::text).collect();
        assert_eq!(texts, vec!["Abandon kx?", "> Yes", "  No"]);
    }
}
