//! Top-level view state. `update` is a pure transition: it mutates the model
//! and returns the effects to perform, never touching a process or a timer.

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::KeyEvent;
use graph::{Background, Commit, Dag, Line, Segment, Viewport};
use jjui_core::command;

use crate::config::Config;
use crate::event::{Effect, Msg};
use crate::operations::{
    Abandon, BookmarkOperation, Describe, Details, Git, Operation, Outcome, Rebase, RenderPosition,
    Squash, Undo,
};
use crate::row_view::{row_height, row_lines, Highlight};
use crate::status::{hints_line, Status};
use crate::theme;
use crate::widgets::{InputEvent, TextInput};

/// Selection that relocates to whatever is the working copy after a refresh
pub const WORKING_COPY: &str = "@";

/// Failure output shown under the banner, at most
const MAX_FAILURE_LINES: usize = 10;

/// Text entry shown above the graph
#[derive(Debug, Clone)]
enum Prompt {
    Revset(TextInput),
    Search(TextInput),
}

#[derive(Debug, Clone, Default)]
struct Preview {
    visible: bool,
    /// Revision the preview is for, or waiting for
    revision: Option<String>,
    lines: Vec<Line>,
    scroll: usize,
}

pub struct Model {
    config: Arc<Config>,
    highlight: Background,
    dag: Dag,
    /// Owns the cursor
    viewport: Viewport,
    operation: Operation,
    status: Status,
    /// Number of the latest finished command's banner
    banner_serial: u64,
    /// Output of a failed refresh; the last good graph stays underneath
    error: Option<String>,
    revset: Option<String>,
    prompt: Option<Prompt>,
    search: Option<String>,
    preview: Preview,
    loading: bool,
    width: u16,
    height: u16,
}

impl Model {
    pub fn new(config: Arc<Config>, revset: Option<String>) -> Result<Self> {
        let highlight = config.highlight()?;
        let revset = revset.or_else(|| config.ui.revset.clone());
        let preview = Preview {
            visible: config.preview.show_at_start,
            ..Preview::default()
        };
        Ok(Self {
            config,
            highlight,
            dag: Dag::default(),
            viewport: Viewport::default(),
            operation: Operation::Noop,
            status: Status::Idle,
            banner_serial: 0,
            error: None,
            revset,
            prompt: None,
            search: None,
            preview,
            loading: true,
            width: 0,
            height: 0,
        })
    }

    /// First load of the graph
    pub fn init(&self) -> Vec<Effect> {
        vec![Effect::Refresh {
            revset: self.revset.clone(),
            select: None,
        }]
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        let effects = match msg {
            Msg::Key(key) => self.handle_key(&key),
            Msg::Resize(width, height) => {
                self.width = width;
                self.height = height;
                Vec::new()
            }
            Msg::Refresh { select } => vec![self.refresh(select)],
            Msg::Refreshed { rows, select } => {
                self.loading = false;
                self.error = None;
                self.dag = Dag::new(rows);
                self.viewport.cursor = self.dag.relocate(select.as_deref());
                let heights = self.heights();
                self.viewport
                    .reset(self.dag.len(), self.viewport.cursor, &heights);
                self.selection_changed()
            }
            Msg::RefreshFailed { message } => {
                tracing::warn!(%message, "refresh failed");
                self.loading = false;
                self.error = Some(message);
                Vec::new()
            }
            Msg::CommandFinished {
                args,
                output,
                select,
            } => {
                if !output.success {
                    tracing::warn!(command = %args, "command failed");
                }
                self.banner_serial += 1;
                let mut effects: Vec<Effect> = self
                    .status
                    .finish(&args, &output, self.banner_serial)
                    .into_iter()
                    .collect();
                effects.push(self.refresh(select));
                effects
            }
            Msg::QueryFinished { kind, output } => {
                self.operation.query_finished(&kind, &output);
                Vec::new()
            }
            Msg::PreviewLoaded {
                revision, output, ..
            } => {
                if self.preview.revision.as_deref() == Some(revision.as_str()) {
                    self.preview.lines = graph::lines(&output.output).collect();
                    self.preview.scroll = 0;
                } else {
                    tracing::debug!(%revision, "preview for another revision");
                }
                Vec::new()
            }
            Msg::ClearStatus { serial } => {
                self.status.clear(serial);
                Vec::new()
            }
        };
        self.sync_viewport();
        effects
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Effect> {
        let config = Arc::clone(&self.config);
        let keys = &config.keys;

        if self.error.is_some() {
            if keys.cancel.matches(key) {
                self.error = None;
            } else if keys.refresh.matches(key) {
                return vec![self.refresh(None)];
            } else if keys.quit.matches(key) {
                return vec![Effect::Quit];
            }
            return Vec::new();
        }

        if self.prompt.is_some() {
            return self.prompt_key(key);
        }

        if !self.operation.is_noop() {
            return match self.operation.handle_key(key, keys) {
                Outcome::Apply(effect) => {
                    self.operation = Operation::Noop;
                    self.launch(effect)
                }
                Outcome::Continue(effects) => effects.into_iter().flat_map(|e| self.launch(e)).collect(),
                Outcome::Cancel => {
                    self.operation = Operation::Noop;
                    Vec::new()
                }
                Outcome::Handled => Vec::new(),
                Outcome::Ignored if self.operation.is_editing() => Vec::new(),
                Outcome::Ignored => self.passthrough_key(key).unwrap_or_default(),
            };
        }

        if let Some(effects) = self.passthrough_key(key) {
            return effects;
        }
        self.default_key(key)
    }

    /// Bindings that stay live while an operation is active
    fn passthrough_key(&mut self, key: &KeyEvent) -> Option<Vec<Effect>> {
        let config = Arc::clone(&self.config);
        let keys = &config.keys;
        let effects = if keys.up.matches(key) {
            self.move_cursor(|viewport, heights| viewport.cursor_up(heights))
        } else if keys.down.matches(key) {
            self.move_cursor(|viewport, heights| viewport.cursor_down(heights))
        } else if keys.page_up.matches(key) {
            self.move_cursor(|viewport, heights| viewport.page_up(heights))
        } else if keys.page_down.matches(key) {
            self.move_cursor(|viewport, heights| viewport.page_down(heights))
        } else if keys.top.matches(key) {
            self.move_cursor(|viewport, _| viewport.jump_to_top())
        } else if keys.bottom.matches(key) {
            self.move_cursor(|viewport, heights| viewport.jump_to_bottom(heights))
        } else if keys.working_copy.matches(key) {
            match self.dag.working_copy() {
                Some(index) => self.move_cursor(|viewport, heights| viewport.jump_to(index, heights)),
                None => Vec::new(),
            }
        } else if keys.cancel.matches(key) {
            if !self.operation.is_noop() {
                self.operation = Operation::Noop;
            } else if !self.status.dismiss() {
                self.search = None;
            }
            Vec::new()
        } else if keys.preview.mode.matches(key) {
            self.preview.visible = !self.preview.visible;
            self.preview.revision = None;
            self.preview.lines.clear();
            self.schedule_preview().into_iter().collect()
        } else if keys.preview.scroll_up.matches(key) {
            self.preview.scroll = self.preview.scroll.saturating_sub(self.graph_height() / 2);
            Vec::new()
        } else if keys.preview.scroll_down.matches(key) {
            let max = self.preview.lines.len().saturating_sub(1);
            self.preview.scroll = (self.preview.scroll + self.graph_height() / 2).min(max);
            Vec::new()
        } else if keys.refresh.matches(key) {
            vec![self.refresh(None)]
        } else {
            return None;
        };
        Some(effects)
    }

    /// Bindings of the idle state
    fn default_key(&mut self, key: &KeyEvent) -> Vec<Effect> {
        let config = Arc::clone(&self.config);
        let keys = &config.keys;

        if keys.quit.matches(key) {
            return vec![Effect::Quit];
        }
        if keys.revset.matches(key) {
            let current = self.revset.clone().unwrap_or_default();
            self.prompt = Some(Prompt::Revset(TextInput::with_value("revset: ", current)));
            return Vec::new();
        }
        if keys.search.matches(key) {
            self.prompt = Some(Prompt::Search(TextInput::new("/")));
            return Vec::new();
        }
        if keys.search_next.matches(key) {
            return self.next_match();
        }

        let Some(commit) = self.selected().cloned() else {
            return Vec::new();
        };
        let revision = commit.change_id.as_str();

        if keys.new.matches(key) {
            self.launch(Effect::run(command::new(&[revision]), Some(WORKING_COPY)))
        } else if keys.edit.matches(key) {
            self.launch(Effect::run(command::edit(revision), Some(WORKING_COPY)))
        } else if keys.diffedit.matches(key) {
            self.launch(Effect::exec(command::diffedit(revision), None))
        } else if keys.split.matches(key) {
            self.launch(Effect::exec(command::split(revision, &[]), None))
        } else if keys.diff.matches(key) {
            self.launch(Effect::exec(command::diff(revision, None), None))
        } else if keys.describe.mode.matches(key) {
            let (describe, query) = Describe::start(&commit);
            self.operation = Operation::Describe(describe);
            vec![query]
        } else if keys.abandon.matches(key) {
            self.operation = Operation::Abandon(Abandon::new(&commit));
            Vec::new()
        } else if keys.undo.matches(key) {
            let (undo, query) = Undo::start();
            self.operation = Operation::Undo(undo);
            vec![query]
        } else if keys.rebase.mode.matches(key) {
            let mut rebase = Rebase::new(revision);
            rebase.set_selected(&commit);
            self.operation = Operation::Rebase(rebase);
            Vec::new()
        } else if keys.squash.matches(key) {
            self.operation = Operation::Squash(Squash::new(revision));
            // Parents are drawn above their children
            let heights = self.heights();
            self.viewport.cursor_up(&heights);
            self.selection_changed()
        } else if keys.bookmark.mode.matches(key) {
            self.operation = Operation::Bookmark(BookmarkOperation::new(&commit));
            Vec::new()
        } else if keys.details.mode.matches(key) {
            let (details, query) = Details::start(&commit);
            self.operation = Operation::Details(details);
            vec![query]
        } else if keys.git.mode.matches(key) {
            self.operation = Operation::Git(Git::new(keys));
            Vec::new()
        } else {
            Vec::new()
        }
    }

    fn prompt_key(&mut self, key: &KeyEvent) -> Vec<Effect> {
        let Some(prompt) = &mut self.prompt else {
            return Vec::new();
        };
        match prompt {
            Prompt::Revset(input) => match input.handle_key(key) {
                InputEvent::Submit(revset) => {
                    self.prompt = None;
                    let revset = revset.trim();
                    self.revset = (!revset.is_empty()).then(|| revset.to_string());
                    tracing::info!(revset = ?self.revset, "revset changed");
                    vec![self.refresh(None)]
                }
                InputEvent::Cancel => {
                    self.prompt = None;
                    Vec::new()
                }
                InputEvent::Changed | InputEvent::Ignored => Vec::new(),
            },
            Prompt::Search(input) => match input.handle_key(key) {
                InputEvent::Submit(query) => {
                    self.prompt = None;
                    if query.is_empty() {
                        self.search = None;
                        return Vec::new();
                    }
                    self.search = Some(query);
                    self.next_match()
                }
                InputEvent::Cancel => {
                    self.prompt = None;
                    self.search = None;
                    Vec::new()
                }
                InputEvent::Changed => {
                    let query = input.value().to_string();
                    self.search = (!query.is_empty()).then_some(query);
                    Vec::new()
                }
                InputEvent::Ignored => Vec::new(),
            },
        }
    }

    /// Move to the next row containing the search text, wrapping around
    fn next_match(&mut self) -> Vec<Effect> {
        let Some(query) = self.search.as_deref() else {
            return Vec::new();
        };
        let total = self.dag.len();
        let found = (1..=total)
            .map(|offset| (self.viewport.cursor + offset) % total.max(1))
            .find(|&index| {
                self.dag
                    .get(index)
                    .is_some_and(|row| row.text().contains(query))
            });
        match found {
            Some(index) => self.move_cursor(|viewport, heights| viewport.jump_to(index, heights)),
            None => Vec::new(),
        }
    }

    /// Fill in what an effect leaves open before it leaves the model
    fn launch(&mut self, effect: Effect) -> Vec<Effect> {
        let selected = self.selected().map(|c| c.change_id.clone());
        let effect = match effect {
            Effect::Run { args, select } => {
                tracing::debug!(command = %args, "running");
                self.status = Status::running(&args);
                Effect::Run {
                    args,
                    select: select.or(selected),
                }
            }
            Effect::Exec { args, select } => Effect::Exec {
                args,
                select: select.or(selected),
            },
            other => other,
        };
        vec![effect]
    }

    fn refresh(&self, select: Option<String>) -> Effect {
        Effect::Refresh {
            revset: self.revset.clone(),
            select: select.or_else(|| self.selected().map(|c| c.change_id.clone())),
        }
    }

    fn move_cursor(&mut self, step: impl FnOnce(&mut Viewport, &[usize])) -> Vec<Effect> {
        let before = self.viewport.cursor;
        let heights = self.heights();
        step(&mut self.viewport, &heights);
        if self.viewport.cursor == before {
            return Vec::new();
        }
        self.selection_changed()
    }

    /// Let the operation retarget and the preview follow
    fn selection_changed(&mut self) -> Vec<Effect> {
        let mut effects = match self.dag.commit(self.viewport.cursor) {
            Some(commit) => self.operation.set_selected(commit),
            None => Vec::new(),
        };
        effects.extend(self.schedule_preview());
        effects
    }

    fn schedule_preview(&mut self) -> Option<Effect> {
        if !self.preview.visible {
            return None;
        }
        let revision = self.selected()?.change_id.clone();
        if self.preview.revision.as_deref() == Some(revision.as_str()) {
            return None;
        }
        self.preview.revision = Some(revision.clone());
        Some(Effect::SchedulePreview { revision })
    }

    /// Keep the viewport height and scroll in step with what is drawn
    fn sync_viewport(&mut self) {
        let height = self.graph_height();
        let heights = self.heights();
        self.viewport.resize(height, &heights);
    }

    /// Terminal lines each row takes in the current rendering
    pub fn heights(&self) -> Vec<usize> {
        let highlight = self.highlight_style();
        self.dag
            .rows()
            .iter()
            .enumerate()
            .map(|(index, row)| row_height(row, (index == self.viewport.cursor).then_some(&highlight)))
            .collect()
    }

    fn highlight_style(&self) -> Highlight<'_> {
        Highlight {
            operation: &self.operation,
            background: &self.highlight,
        }
    }

    fn graph_height(&self) -> usize {
        let used = self.top_lines().len() + self.bottom_lines().len();
        usize::from(self.height).saturating_sub(used)
    }

    pub fn selected(&self) -> Option<&Commit> {
        self.dag.commit(self.viewport.cursor)
    }

    pub fn current_operation_name(&self) -> &'static str {
        match &self.prompt {
            Some(Prompt::Revset(_)) => "revset",
            Some(Prompt::Search(_)) => "search",
            None if self.error.is_some() => "error",
            None => self.operation.name(),
        }
    }

    pub fn key_hints(&self) -> Vec<(String, String)> {
        let keys = &self.config.keys;
        if self.prompt.is_some() {
            return vec![keys.apply.hint("apply"), keys.cancel.hint("cancel")];
        }
        if self.error.is_some() {
            return vec![
                keys.cancel.hint("back"),
                keys.refresh.hint("retry"),
                keys.quit.hint("quit"),
            ];
        }
        self.operation.key_hints(keys)
    }

    /// Prompt and top-of-viewport overlays
    pub fn top_lines(&self) -> Vec<Line> {
        let mut lines = Vec::new();
        match &self.prompt {
            Some(Prompt::Revset(input)) | Some(Prompt::Search(input)) => lines.push(input.line()),
            None => {}
        }
        lines.extend(self.operation.overlay(RenderPosition::Top));
        lines
    }

    /// Rows in the viewport, or the error that replaced them
    pub fn graph_lines(&self) -> Vec<Line> {
        if let Some(error) = &self.error {
            let mut lines = vec![Line::new(vec![Segment::new("refresh failed", theme::FAILURE)])];
            lines.extend(graph::lines(error));
            return lines;
        }
        if self.loading {
            return vec![Line::new(vec![Segment::new("loading…", theme::HELP)])];
        }

        let heights = self.heights();
        let highlight = self.highlight_style();
        let search = self.search.as_deref();
        let mut lines = Vec::with_capacity(self.viewport.height);
        for index in self.viewport.visible_range(&heights) {
            let Some(row) = self.dag.get(index) else {
                break;
            };
            let highlight = (index == self.viewport.cursor).then_some(&highlight);
            lines.extend(row_lines(row, highlight, search));
        }
        lines.truncate(self.viewport.height.max(1));
        lines
    }

    /// Status banner, failure output and key hints
    pub fn bottom_lines(&self) -> Vec<Line> {
        let mut lines: Vec<Line> = self.status.banner().into_iter().collect();
        lines.extend(
            self.status
                .failure_lines()
                .into_iter()
                .take(MAX_FAILURE_LINES),
        );
        lines.push(hints_line(self.current_operation_name(), &self.key_hints()));
        lines
    }

    pub fn preview_visible(&self) -> bool {
        self.preview.visible
    }

    /// Preview lines from the scroll offset on
    pub fn preview_lines(&self) -> &[Line] {
        let start = self.preview.scroll.min(self.preview.lines.len());
        &self.preview.lines[start..]
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cursor(&self) -> usize {
        self.viewport.cursor
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn width(&self) -> u16 {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::QueryKind;
    use crate::keymap::{char_key, key};
    use crossterm::event::KeyCode;
    use jjui_core::{CommandOutput, RebaseSource, RebaseTarget};
    use pretty_assertions::assert_eq;

    const LOG: &str = concat!(
        "◆  z;zzzzzzzz;;.;false;true;false;true;;;;0;00000000;false\n",
        "│\n",
        "○  m;mzvwutvl;zzzzzzzz;main;false;false;false;false;a@b.c;2 days ago;add parser;3;3c4d5e6f;false\n",
        "│\n",
        "○  y;yqosqzyt;mzvwutvl;.;false;false;false;false;a@b.c;1 hour ago;use parser;7;7a8b9c0d;false\n",
        "│\n",
        "@  k;kxrwqsyo;yqosqzyt;.;true;false;false;true;a@b.c;1 minute ago;;1;1a2b3c4d;false\n",
    );

    fn model() -> Model {
        let mut model = Model::new(Arc::new(Config::default()), None).unwrap();
        model.update(Msg::Resize(80, 40));
        model.update(Msg::Refreshed {
            rows: graph::build_rows(LOG).unwrap(),
            select: None,
        });
        model
    }

    fn press(model: &mut Model, event: KeyEvent) -> Vec<Effect> {
        model.update(Msg::Key(event))
    }

    fn selected(model: &Model) -> String {
        model.selected().map(|c| c.change_id.clone()).unwrap_or_default()
    }

    #[test]
    fn starts_on_the_working_copy() {
        let model = model();
        assert_eq!(selected(&model), "kxrwqsyo");
        assert_eq!(model.current_operation_name(), "normal");
    }

    #[test]
    fn refresh_relocates_by_change_id() {
        let mut model = model();
        model.update(Msg::Refreshed {
            rows: graph::build_rows(LOG).unwrap(),
            select: Some("mzvwutvl".to_string()),
        });
        assert_eq!(selected(&model), "mzvwutvl");

        // Abandoned in the meantime
        model.update(Msg::Refreshed {
            rows: graph::build_rows(LOG).unwrap(),
            select: Some("vanished".to_string()),
        });
        assert_eq!(selected(&model), "kxrwqsyo");
    }

    #[test]
    fn rebase_applies_once_and_resets() {
        let mut model = model();
        press(&mut model, char_key('k'));
        assert_eq!(selected(&model), "yqosqzyt");

        assert!(press(&mut model, char_key('r')).is_empty());
        press(&mut model, char_key('k'));
        assert!(press(&mut model, char_key('B')).is_empty());
        assert!(press(&mut model, char_key('a')).is_empty());

        let effects = press(&mut model, key(KeyCode::Enter));
        assert_eq!(
            effects,
            vec![Effect::run(
                command::rebase("yqosqzyt", "mzvwutvl", RebaseSource::Branch, RebaseTarget::After),
                Some("yqosqzyt")
            )]
        );
        assert!(model.operation().is_noop());
        assert!(matches!(model.status(), Status::Running { .. }));
    }

    #[test]
    fn squash_starts_on_the_parent() {
        let mut model = model();
        press(&mut model, char_key('S'));
        assert_eq!(selected(&model), "yqosqzyt");

        let effects = press(&mut model, key(KeyCode::Enter));
        assert_eq!(
            effects,
            vec![Effect::run(command::squash("kxrwqsyo", "yqosqzyt"), Some("yqosqzyt"))]
        );
    }

    #[test]
    fn new_relocates_to_the_working_copy() {
        let mut model = model();
        press(&mut model, char_key('k'));
        let effects = press(&mut model, char_key('n'));
        assert_eq!(
            effects,
            vec![Effect::run(command::new(&["yqosqzyt"]), Some(WORKING_COPY))]
        );
    }

    #[test]
    fn hand_off_keeps_the_selection() {
        let mut model = model();
        let effects = press(&mut model, char_key('E'));
        assert_eq!(
            effects,
            vec![Effect::exec(command::diffedit("kxrwqsyo"), Some("kxrwqsyo"))]
        );
    }

    #[test]
    fn undo_fills_in_the_selection() {
        let mut model = model();
        let effects = press(&mut model, char_key('u'));
        assert!(matches!(
            effects.as_slice(),
            [Effect::Query {
                kind: QueryKind::LatestOperation,
                ..
            }]
        ));
        model.update(Msg::QueryFinished {
            kind: QueryKind::LatestOperation,
            output: CommandOutput::ok("abc123 describe commit\n"),
        });
        assert_eq!(model.top_lines()[0].text(), "abc123 describe commit");

        let effects = press(&mut model, char_key('y'));
        assert_eq!(effects, vec![Effect::run(command::undo(), Some("kxrwqsyo"))]);
    }

    #[test]
    fn navigation_passes_through_an_operation() {
        let mut model = model();
        press(&mut model, char_key('a'));
        assert_eq!(model.current_operation_name(), "abandon");

        press(&mut model, char_key('k'));
        // The confirmation list takes up and down
        assert_eq!(selected(&model), "kxrwqsyo");

        press(&mut model, key(KeyCode::Esc));
        assert!(model.operation().is_noop());
    }

    #[test]
    fn editing_swallows_default_bindings() {
        let mut model = model();
        press(&mut model, char_key('D'));
        model.update(Msg::QueryFinished {
            kind: QueryKind::Description {
                revision: "kxrwqsyo".to_string(),
            },
            output: CommandOutput::ok(""),
        });
        assert!(press(&mut model, char_key('q')).is_empty());
        assert!(press(&mut model, char_key('k')).is_empty());
        assert_eq!(selected(&model), "kxrwqsyo");

        let effects = press(&mut model, key(KeyCode::Enter));
        assert_eq!(
            effects,
            vec![Effect::run(command::describe("kxrwqsyo", "qk"), Some("kxrwqsyo"))]
        );
    }

    #[test]
    fn describe_keeps_the_body_of_a_long_description() {
        let mut model = model();
        press(&mut model, char_key('k'));
        assert_eq!(selected(&model), "yqosqzyt");

        let effects = press(&mut model, char_key('D'));
        assert_eq!(
            effects,
            vec![Effect::Query {
                args: command::description("yqosqzyt"),
                kind: QueryKind::Description {
                    revision: "yqosqzyt".to_string()
                },
            }]
        );
        // Enter before the full text is known saves nothing
        assert!(press(&mut model, key(KeyCode::Enter)).is_empty());

        model.update(Msg::QueryFinished {
            kind: QueryKind::Description {
                revision: "yqosqzyt".to_string(),
            },
            output: CommandOutput::ok("use parser\n\nThe parser replaces the regex scan.\n"),
        });
        let effects = press(&mut model, key(KeyCode::Enter));
        assert_eq!(
            effects,
            vec![Effect::run(
                command::describe("yqosqzyt", "use parser\n\nThe parser replaces the regex scan."),
                Some("yqosqzyt")
            )]
        );
    }

    #[test]
    fn command_completion_refreshes() {
        let mut model = model();
        let effects = model.update(Msg::CommandFinished {
            args: command::undo(),
            output: CommandOutput::ok(""),
            select: Some("mzvwutvl".to_string()),
        });
        assert_eq!(
            effects,
            vec![
                Effect::ClearStatusAfter { serial: 1 },
                Effect::Refresh {
                    revset: None,
                    select: Some("mzvwutvl".to_string())
                },
            ]
        );
    }

    #[test]
    fn failed_refresh_keeps_the_last_graph() {
        let mut model = model();
        model.update(Msg::RefreshFailed {
            message: "Error: Revision \"nope\" doesn't exist\n".to_string(),
        });
        let lines = model.graph_lines();
        assert_eq!(lines[0].text(), "refresh failed");
        assert_eq!(lines[1].text(), "Error: Revision \"nope\" doesn't exist");
        assert_eq!(model.current_operation_name(), "error");

        assert!(press(&mut model, char_key('n')).is_empty());
        press(&mut model, key(KeyCode::Esc));
        assert!(model.graph_lines()[0].text().starts_with("◆  zzzzzzzz"));
        assert_eq!(selected(&model), "kxrwqsyo");
    }

    #[test]
    fn search_jumps_to_matches() {
        let mut model = model();
        press(&mut model, char_key('/'));
        for c in "parser".chars() {
            press(&mut model, char_key(c));
        }
        press(&mut model, key(KeyCode::Enter));
        assert_eq!(selected(&model), "mzvwutvl");

        let next = KeyEvent::new(KeyCode::Char('n'), crossterm::event::KeyModifiers::CONTROL);
        press(&mut model, next);
        assert_eq!(selected(&model), "yqosqzyt");
        press(&mut model, next);
        assert_eq!(selected(&model), "mzvwutvl");
    }

    #[test]
    fn revset_prompt_refreshes_with_the_new_revset() {
        let mut model = model();
        press(&mut model, char_key('L'));
        assert_eq!(model.top_lines()[0].text(), "revset:  ");
        for c in "::@".chars() {
            press(&mut model, char_key(c));
        }
        let effects = press(&mut model, key(KeyCode::Enter));
        assert_eq!(
            effects,
            vec![Effect::Refresh {
                revset: Some("::@".to_string()),
                select: Some("kxrwqsyo".to_string()),
            }]
        );
    }

    #[test]
    fn preview_follows_the_selection() {
        let mut model = model();
        let effects = press(&mut model, char_key('p'));
        assert_eq!(
            effects,
            vec![Effect::SchedulePreview {
                revision: "kxrwqsyo".to_string()
            }]
        );

        let effects = press(&mut model, char_key('k'));
        assert_eq!(
            effects,
            vec![Effect::SchedulePreview {
                revision: "yqosqzyt".to_string()
            }]
        );

        model.update(Msg::PreviewLoaded {
            generation: 1,
            revision: "kxrwqsyo".to_string(),
            output: CommandOutput::ok("stale\n"),
        });
        assert!(model.preview_lines().is_empty());

        model.update(Msg::PreviewLoaded {
            generation: 2,
            revision: "yqosqzyt".to_string(),
            output: CommandOutput::ok("Commit ID: 7a8b9c0d\n"),
        });
        assert_eq!(model.preview_lines()[0].text(), "Commit ID: 7a8b9c0d");
    }

    #[test]
    fn older_timer_leaves_a_repeated_command_banner() {
        let mut model = model();
        let finished = || Msg::CommandFinished {
            args: command::git_fetch(&[]),
            output: CommandOutput::ok(""),
            select: None,
        };
        let first = model.update(finished());
        let second = model.update(finished());
        assert_eq!(first[0], Effect::ClearStatusAfter { serial: 1 });
        assert_eq!(second[0], Effect::ClearStatusAfter { serial: 2 });

        model.update(Msg::ClearStatus { serial: 1 });
        assert!(matches!(model.status(), Status::Succeeded { serial: 2, .. }));

        model.update(Msg::ClearStatus { serial: 2 });
        assert_eq!(*model.status(), Status::Idle);
    }

    #[test]
    fn failure_banner_waits_for_escape() {
        let mut model = model();
        model.update(Msg::CommandFinished {
            args: command::git_push(&[]),
            output: CommandOutput::failed("Error: failed to push\n"),
            select: None,
        });
        let texts: Vec<String> = model.bottom_lines().iter().map(Line::text).collect();
        assert_eq!(texts[0], "✗ jj git push");
        assert_eq!(texts[1], "Error: failed to push");

        press(&mut model, key(KeyCode::Esc));
        assert_eq!(*model.status(), Status::Idle);
    }
}
