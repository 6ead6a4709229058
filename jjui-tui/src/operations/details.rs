use crossterm::event::KeyEvent;
use graph::{Commit, Line, Segment};
use jjui_core::{command, parse_summary, ChangedFile, CommandOutput};

use super::{Outcome, RenderPosition};
use crate::event::{Effect, QueryKind};
use crate::keymap::Keys;
use crate::theme;
use crate::widgets::{ChoiceList, ListEvent};

/// Changed files of one revision, browsable below its row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Details {
    revision: String,
    files: Option<ChoiceList<ChangedFile>>,
    error: Option<String>,
}

impl Details {
    pub fn start(commit: &Commit) -> (Self, Effect) {
        let revision = commit.change_id.clone();
        let query = Effect::Query {
            args: command::summary(&revision),
            kind: QueryKind::ChangedFiles {
                revision: revision.clone(),
            },
        };
        let details = Self {
            revision,
            files: None,
            error: None,
        };
        (details, query)
    }

    pub fn query_finished(&mut self, kind: &QueryKind, output: &CommandOutput) {
        match kind {
            QueryKind::ChangedFiles { revision } if *revision == self.revision => {
                if output.success {
                    let files = parse_summary(&output.output);
                    self.files = Some(ChoiceList::new(files, |f| {
                        format!("{} {}", f.status.code(), f.path)
                    }));
                } else {
                    self.error = Some(output.output.trim().to_string());
                }
            }
            _ => tracing::debug!(?kind, "reply for other details"),
        }
    }

    pub fn overlay(&self, position: RenderPosition) -> Vec<Line> {
        if position != RenderPosition::After {
            return Vec::new();
        }
        let note = |text: &str, params: &str| vec![Line::new(vec![Segment::new(text, params)])];
        match (&self.files, &self.error) {
            (_, Some(error)) => note(error.as_str(), theme::FAILURE),
            (None, None) => note("loading files…", theme::HELP),
            (Some(files), None) if files.is_empty() => note("no changes", theme::HELP),
            (Some(files), None) => files.lines(),
        }
    }

    /// Marked files, or the file under the cursor when nothing is marked
    fn selection(&self) -> Vec<String> {
        let Some(files) = &self.files else {
            return Vec::new();
        };
        let marked: Vec<String> = files.marked().map(ChangedFile::target_path).collect();
        if !marked.is_empty() {
            return marked;
        }
        files
            .current()
            .map(|f| vec![f.target_path()])
            .unwrap_or_default()
    }

    pub fn handle_key(&mut self, key: &KeyEvent, keys: &Keys) -> Outcome {
        let details = &keys.details;
        let revision = Some(self.revision.as_str());

        if details.toggle.matches(key) {
            if let Some(files) = &mut self.files {
                files.toggle();
                files.move_down();
            }
            return Outcome::Handled;
        }
        if details.split.matches(key) {
            let files = self.selection();
            if files.is_empty() {
                return Outcome::Handled;
            }
            return Outcome::Apply(Effect::exec(command::split(&self.revision, &files), revision));
        }
        if details.restore.matches(key) {
            let files = self.selection();
            if files.is_empty() {
                return Outcome::Handled;
            }
            return Outcome::Apply(Effect::run(command::restore(&self.revision, &files), revision));
        }
        if details.diff.matches(key) {
            let Some(file) = self.files.as_ref().and_then(ChoiceList::current) else {
                return Outcome::Handled;
            };
            let path = file.target_path();
            let args = command::diff(&self.revision, Some(path.as_str()));
            return Outcome::Continue(vec![Effect::exec(args, revision)]);
        }

        match &mut self.files {
            Some(files) => match files.handle_key(key, keys) {
                ListEvent::Cancel => Outcome::Cancel,
                ListEvent::Moved | ListEvent::Chosen(_) | ListEvent::Ignored => Outcome::Handled,
            },
            None if keys.cancel.matches(key) => Outcome::Cancel,
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

    fn loaded() -> Details {
        let (mut details, _) = Details::start(&commit("kxrwqsyo"));
        details.query_finished(
            &QueryKind::ChangedFiles {
                revision: "kxrwqsyo".to_string(),
            },
            &CommandOutput::ok("M src/lib.rs\nA src/new.rs\nD old.rs\n"),
        );
        details
    }

    fn effect(outcome: Outcome) -> Effect {
        match outcome {
            Outcome::Apply(effect) => effect,
            Outcome::Continue(mut effects) if effects.len() == 1 => effects.remove(0),
            other => panic!("expected an effect, got {other:?}"),
        }
    }

    #[test]
    fn lists_files_once_loaded() {
        let (details, query) = Details::start(&commit("kxrwqsyo"));
        assert!(matches!(query, Effect::Query { kind: QueryKind::ChangedFiles { .. }, .. }));
        assert_eq!(details.overlay(RenderPosition::After)[0].text(), "loading files…");

        let texts: Vec<String> = loaded().overlay(RenderPosition::After).iter().map(Line::text).collect();
        assert_eq!(texts, vec!["> M src/lib.rs", "  A src/new.rs", "  D old.rs"]);
    }

    #[test]
    fn split_takes_marked_files() {
        let keys = Keys::default();
        let mut details = loaded();
        details.handle_key(&char_key(' '), &keys);
        details.handle_key(&char_key('j'), &keys);
        details.handle_key(&char_key('m'), &keys);

        assert_eq!(
            effect(details.handle_key(&char_key('s'), &keys)),
            Effect::exec(
                command::split("kxrwqsyo", &["src/lib.rs".to_string(), "old.rs".to_string()]),
                Some("kxrwqsyo")
            )
        );
    }

    #[test]
    fn restore_defaults_to_the_file_under_the_cursor() {
        let keys = Keys::default();
        let mut details = loaded();
        details.handle_key(&char_key('j'), &keys);

        assert_eq!(
            effect(details.handle_key(&char_key('r'), &keys)),
            Effect::run(command::restore("kxrwqsyo", &["src/new.rs".to_string()]), Some("kxrwqsyo"))
        );
    }

    #[test]
    fn diff_keeps_the_view_open() {
        let keys = Keys::default();
        let mut details = loaded();

        let outcome = details.handle_key(&char_key('d'), &keys);
        assert!(matches!(outcome, Outcome::Continue(_)));
        assert_eq!(
            effect(outcome),
            Effect::exec(command::diff("kxrwqsyo", Some("src/lib.rs")), Some("kxrwqsyo"))
        );
    }

    #[test]
    fn failure_is_shown_and_escape_closes() {
        let keys = Keys::default();
        let (mut details, _) = Details::start(&commit("kxrwqsyo"));
        details.query_finished(
            &QueryKind::ChangedFiles {
                revision: "kxrwqsyo".to_string(),
            },
            &CommandOutput::failed("Error: no such revision\n"),
        );

        assert_eq!(details.overlay(RenderPosition::After)[0].text(), "Error: no such revision");
        assert_eq!(details.handle_key(&key(KeyCode::Esc), &keys), Outcome::Cancel);
    }
}
