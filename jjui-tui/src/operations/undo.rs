use crossterm::event::KeyEvent;
use graph::{Line, Segment};
use jjui_core::{command, CommandOutput};

use super::{output_lines, Outcome, RenderPosition};
use crate::event::{Effect, QueryKind};
use crate::keymap::Keys;
use crate::theme;
use crate::widgets::{ChoiceList, ListEvent};

/// Shows the latest operation and asks before undoing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Undo {
    /// `jj op log` lines of the latest operation, once loaded
    latest: Option<Vec<Line>>,
    confirm: ChoiceList<bool>,
}

impl Default for Undo {
    fn default() -> Self {
        Self {
            latest: None,
            confirm: ChoiceList::confirmation("Undo the latest operation?"),
        }
    }
}

impl Undo {
    /// The operation and the query for what it would undo
    pub fn start() -> (Self, Effect) {
        let query = Effect::Query {
            args: command::op_log(Some(1)),
            kind: QueryKind::LatestOperation,
        };
        (Self::default(), query)
    }

    pub fn query_finished(&mut self, kind: &QueryKind, output: &CommandOutput) {
        if *kind == QueryKind::LatestOperation {
            self.latest = Some(output_lines(&output.output));
        }
    }

    pub fn overlay(&self, position: RenderPosition) -> Vec<Line> {
        if position != RenderPosition::Top {
            return Vec::new();
        }
        let mut lines = match &self.latest {
            Some(latest) => latest.clone(),
            None => vec![Line::new(vec![Segment::new("loading operation…", theme::HELP)])],
        };
        lines.extend(self.confirm.lines());
        lines
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
            Some(true) => Outcome::Apply(Effect::run(command::undo(), None)),
            Some(false) => Outcome::Cancel,
            None => Outcome::Handled,
        }
    }
}
