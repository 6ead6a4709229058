use crossterm::event::KeyEvent;
use graph::{Line, Segment};
use jjui_core::command;

use super::{Outcome, RenderPosition};
use crate::event::Effect;
use crate::keymap::Keys;
use crate::theme;

/// Push/fetch menu shown above the graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Git {
    /// Labels of the bound keys, captured when the menu opens
    labels: Option<(String, String)>,
}

impl Git {
    pub fn new(keys: &Keys) -> Self {
        Self {
            labels: Some((keys.git.push.label(), keys.git.fetch.label())),
        }
    }

    pub fn overlay(&self, position: RenderPosition) -> Vec<Line> {
        if position != RenderPosition::Top {
            return Vec::new();
        }
        let (push, fetch) = self
            .labels
            .clone()
            .unwrap_or_else(|| ("p".to_string(), "f".to_string()));
        let entry = |key: String, help: &str| {
            Line::new(vec![
                Segment::new(format!("  {key} "), theme::KEY),
                Segment::plain(help),
            ])
        };
        vec![
            Line::new(vec![Segment::new("Git", theme::TITLE)]),
            entry(push, "push"),
            entry(fetch, "fetch"),
        ]
    }

    pub fn handle_key(&mut self, key: &KeyEvent, keys: &Keys) -> Outcome {
        if keys.git.push.matches(key) {
            Outcome::Apply(Effect::run(command::git_push(&[]), None))
        } else if keys.git.fetch.matches(key) {
            Outcome::Apply(Effect::run(command::git_fetch(&[]), None))
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
    use crate::keymap::char_key;
    use pretty_assertions::assert_eq;

    #[test]
    fn push_and_fetch() {
        let keys = Keys::default();
        let mut git = Git::new(&keys);

        assert_eq!(
            git.handle_key(&char_key('p'), &keys),
            Outcome::Apply(Effect::run(command::git_push(&[]), None))
        );
        assert_eq!(
            git.handle_key(&char_key('f'), &keys),
            Outcome::Apply(Effect::run(command::git_fetch(&[]), None))
        );
        assert_eq!(git.handle_key(&char_key('j'), &keys), Outcome::Ignored);
    }

    #[test]
    fn menu_shows_bound_keys() {
        let keys: Keys = toml::from_str("[git]\nfetch = [\"F\"]").unwrap();
        let texts: Vec<String> = Git::new(&keys).overlay(RenderPosition::Top).iter().map(Line::text).collect();
        assert_eq!(texts, vec!["Git", "  p push", "  F fetch"]);
    }
}
