use crossterm::event::KeyEvent;
use graph::{Commit, Line, Segment};
use jjui_core::{command, CommandOutput};

use super::{Outcome, RenderPosition};
use crate::event::{Effect, QueryKind};
use crate::keymap::Keys;
use crate::theme;
use crate::widgets::{InputEvent, TextInput};

/// Everything after the subject line. The inline editor only shows the
/// subject, the rest is carried over unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Body {
    Loading,
    /// Empty for a one-line description, otherwise starts with a newline
    Loaded(String),
    /// The full text could not be read; saving goes through the editor
    Unavailable,
}

/// Inline editor for the subject line, with a hand-off to the real editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Describe {
    revision: String,
    input: TextInput,
    body: Body,
}

impl Describe {
    /// The graph only carries the first line of a description, so the whole
    /// text is queried before anything can be saved
    pub fn start(commit: &Commit) -> (Self, Effect) {
        let revision = commit.change_id.clone();
        let query = Effect::Query {
            args: command::description(&revision),
            kind: QueryKind::Description {
                revision: revision.clone(),
            },
        };
        let describe = Self {
            revision,
            input: TextInput::with_value("", commit.description.as_str()),
            body: Body::Loading,
        };
        (describe, query)
    }

    pub fn query_finished(&mut self, kind: &QueryKind, output: &CommandOutput) {
        match kind {
            QueryKind::Description { revision } if *revision == self.revision => {
                self.body = if output.success {
                    Body::Loaded(body(&output.output))
                } else {
                    tracing::warn!(%revision, output = %output.output.trim_end(), "description not readable");
                    Body::Unavailable
                };
            }
            _ => tracing::debug!(?kind, "reply for another describe"),
        }
    }

    pub fn overlay(&self, position: RenderPosition) -> Vec<Line> {
        if position != RenderPosition::Description {
            return Vec::new();
        }
        let mut line = self.input.line();
        if let Body::Loaded(body) = &self.body {
            let more = body.trim_start_matches('\n').lines().count();
            if more > 0 {
                let unit = if more == 1 { "line" } else { "lines" };
                line.push(Segment::new(format!(" (+{more} {unit})"), theme::HELP));
            }
        }
        vec![line]
    }

    pub fn handle_key(&mut self, key: &KeyEvent, keys: &Keys) -> Outcome {
        let revision = Some(self.revision.as_str());
        if keys.describe.editor.matches(key) {
            return Outcome::Apply(Effect::exec(
                command::describe_in_editor(&self.revision),
                revision,
            ));
        }
        match self.input.handle_key(key) {
            InputEvent::Submit(subject) => match &self.body {
                Body::Loaded(body) => Outcome::Apply(Effect::run(
                    command::describe(&self.revision, &format!("{subject}{body}")),
                    revision,
                )),
                Body::Loading => Outcome::Handled,
                Body::Unavailable => Outcome::Apply(Effect::exec(
                    command::describe_in_editor(&self.revision),
                    revision,
                )),
            },
            InputEvent::Cancel => Outcome::Cancel,
            InputEvent::Changed | InputEvent::Ignored => Outcome::Handled,
        }
    }
}

/// The part of `description` after its first line, without trailing
/// whitespace
fn body(description: &str) -> String {
    match description.split_once('\n') {
        Some((_, rest)) if !rest.trim().is_empty() => format!("\n{}", rest.trim_end()),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{char_key, key};
    use crate::operations::commit;
    use crossterm::event::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;

    fn described(description: &str) -> Commit {
        Commit {
            description: description.to_string(),
            ..commit("kxrwqsyo")
        }
    }

    /// Started on `subject` with `full` as jj's reply
    fn loaded(subject: &str, full: &str) -> Describe {
        let (mut describe, _) = Describe::start(&described(subject));
        describe.query_finished(
            &QueryKind::Description {
                revision: "kxrwqsyo".to_string(),
            },
            &CommandOutput::ok(full),
        );
        describe
    }

    #[test]
    fn queries_the_full_description() {
        let (_, query) = Describe::start(&described("fix"));
        assert_eq!(
            query,
            Effect::Query {
                args: command::description("kxrwqsyo"),
                kind: QueryKind::Description {
                    revision: "kxrwqsyo".to_string()
                },
            }
        );
    }

    #[test]
    fn prefilled_and_saved_inline() {
        let keys = Keys::default();
        let mut describe = loaded("fix", "fix\n");
        assert_eq!(describe.overlay(RenderPosition::Description)[0].text(), "fix ");

        for c in " parser".chars() {
            describe.handle_key(&char_key(c), &keys);
        }

        assert_eq!(
            describe.handle_key(&key(KeyCode::Enter), &keys),
            Outcome::Apply(Effect::run(
                command::describe("kxrwqsyo", "fix parser"),
                Some("kxrwqsyo")
            ))
        );
    }

    #[test]
    fn body_survives_an_unchanged_save() {
        let keys = Keys::default();
        let mut describe = loaded("subject", "subject\n\nlong body\n");
        assert_eq!(
            describe.overlay(RenderPosition::Description)[0].text(),
            "subject  (+1 line)"
        );

        assert_eq!(
            describe.handle_key(&key(KeyCode::Enter), &keys),
            Outcome::Apply(Effect::run(
                command::describe("kxrwqsyo", "subject\n\nlong body"),
                Some("kxrwqsyo")
            ))
        );
    }

    #[test]
    fn edited_subject_keeps_the_body() {
        let keys = Keys::default();
        let mut describe = loaded("subject", "subject\n\nlong body\n");
        for c in "!".chars() {
            describe.handle_key(&char_key(c), &keys);
        }

        assert_eq!(
            describe.handle_key(&key(KeyCode::Enter), &keys),
            Outcome::Apply(Effect::run(
                command::describe("kxrwqsyo", "subject!\n\nlong body"),
                Some("kxrwqsyo")
            ))
        );
    }

    #[test]
    fn nothing_is_saved_before_the_description_arrives() {
        let keys = Keys::default();
        let (mut describe, _) = Describe::start(&described("subject"));
        assert_eq!(describe.handle_key(&key(KeyCode::Enter), &keys), Outcome::Handled);

        // A reply for another revision changes nothing
        describe.query_finished(
            &QueryKind::Description {
                revision: "mzvwutvl".to_string(),
            },
            &CommandOutput::ok("other\n"),
        );
        assert_eq!(describe.handle_key(&key(KeyCode::Enter), &keys), Outcome::Handled);
    }

    #[test]
    fn unreadable_description_goes_to_the_editor() {
        let keys = Keys::default();
        let (mut describe, _) = Describe::start(&described("subject"));
        describe.query_finished(
            &QueryKind::Description {
                revision: "kxrwqsyo".to_string(),
            },
            &CommandOutput::failed("Error: no such revision\n"),
        );

        assert_eq!(
            describe.handle_key(&key(KeyCode::Enter), &keys),
            Outcome::Apply(Effect::exec(command::describe_in_editor("kxrwqsyo"), Some("kxrwqsyo")))
        );
    }

    #[test]
    fn editor_key_hands_off() {
        let keys = Keys::default();
        let (mut describe, _) = Describe::start(&described(""));
        let ctrl_e = KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL);

        assert_eq!(
            describe.handle_key(&ctrl_e, &keys),
            Outcome::Apply(Effect::exec(command::describe_in_editor("kxrwqsyo"), Some("kxrwqsyo")))
        );
    }

    #[test]
    fn typed_keys_never_reach_default_bindings() {
        let keys = Keys::default();
        let (mut describe, _) = Describe::start(&described(""));
        assert_eq!(describe.handle_key(&char_key('q'), &keys), Outcome::Handled);
        assert_eq!(describe.handle_key(&key(KeyCode::Down), &keys), Outcome::Handled);
        assert_eq!(describe.handle_key(&key(KeyCode::Esc), &keys), Outcome::Cancel);
    }
}
