use graph::{Line, Segment};
use jjui_core::{CommandArgs, CommandOutput};

use crate::event::Effect;
use crate::theme;

/// State of the command banner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Running { command: String },
    /// `serial` tells this banner apart from an earlier one for the same
    /// command
    Succeeded { command: String, serial: u64 },
    /// Stays until dismissed
    Failed { command: String, output: String },
}

impl Status {
    pub fn running(args: &CommandArgs) -> Self {
        Status::Running {
            command: args.to_string(),
        }
    }

    /// Record the outcome. Success schedules its own clearing, keyed by
    /// `serial` so a newer banner survives an older timer.
    pub fn finish(&mut self, args: &CommandArgs, output: &CommandOutput, serial: u64) -> Option<Effect> {
        let command = args.to_string();
        if output.success {
            *self = Status::Succeeded { command, serial };
            Some(Effect::ClearStatusAfter { serial })
        } else {
            *self = Status::Failed {
                command,
                output: output.output.trim_end().to_string(),
            };
            None
        }
    }

    /// Timer-driven clear. Only the success banner numbered `serial` goes
    /// away.
    pub fn clear(&mut self, serial: u64) {
        if matches!(self, Status::Succeeded { serial: shown, .. } if *shown == serial) {
            *self = Status::Idle;
        }
    }

    /// Returns whether there was anything to dismiss
    pub fn dismiss(&mut self) -> bool {
        match self {
            Status::Succeeded { .. } | Status::Failed { .. } => {
                *self = Status::Idle;
                true
            }
            Status::Idle | Status::Running { .. } => false,
        }
    }

    /// Banner line, `None` when idle
    pub fn banner(&self) -> Option<Line> {
        let (mark, params, command) = match self {
            Status::Idle => return None,
            Status::Running { command } => ("…", theme::RUNNING, command),
            Status::Succeeded { command, .. } => ("✓", theme::SUCCESS, command),
            Status::Failed { command, .. } => ("✗", theme::FAILURE, command),
        };
        Some(Line::new(vec![
            Segment::new(format!("{mark} "), params),
            Segment::plain(command.as_str()),
        ]))
    }

    /// Output of a failed command, with jj's colours
    pub fn failure_lines(&self) -> Vec<Line> {
        match self {
            Status::Failed { output, .. } => graph::lines(output).collect(),
            _ => Vec::new(),
        }
    }
}

/// `key help` pairs joined into one line
pub fn hints_line(name: &str, hints: &[(String, String)]) -> Line {
    let mut line = Line::default();
    line.push(Segment::new(format!(" {name} "), theme::TITLE));
    for (key, help) in hints {
        line.push(Segment::new(format!(" {key}"), theme::KEY));
        line.push(Segment::new(format!(" {help}"), theme::HELP));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use jjui_core::command;
    use pretty_assertions::assert_eq;

    #[test]
    fn success_clears_only_its_own_banner() {
        let mut status = Status::running(&command::undo());
        let effect = status.finish(&command::undo(), &CommandOutput::ok(""), 1);
        assert_eq!(effect, Some(Effect::ClearStatusAfter { serial: 1 }));

        status = Status::running(&command::git_fetch(&[]));
        status.finish(&command::git_fetch(&[]), &CommandOutput::ok(""), 2);
        status.clear(1);
        assert_eq!(status.banner().map(|l| l.text()), Some("✓ jj git fetch".to_string()));

        status.clear(2);
        assert_eq!(status, Status::Idle);
    }

    #[test]
    fn repeated_command_keeps_the_newer_banner() {
        let mut status = Status::running(&command::git_fetch(&[]));
        status.finish(&command::git_fetch(&[]), &CommandOutput::ok(""), 1);
        status = Status::running(&command::git_fetch(&[]));
        status.finish(&command::git_fetch(&[]), &CommandOutput::ok(""), 2);

        // The first run's timer fires while the second banner is up
        status.clear(1);
        assert_eq!(status.banner().map(|l| l.text()), Some("✓ jj git fetch".to_string()));

        status.clear(2);
        assert_eq!(status, Status::Idle);
    }

    #[test]
    fn failure_persists_until_dismissed() {
        let mut status = Status::running(&command::undo());
        assert_eq!(status.finish(&command::undo(), &CommandOutput::failed("Error: nothing\n"), 1), None);

        status.clear(1);
        assert!(matches!(status, Status::Failed { .. }));
        assert_eq!(status.failure_lines()[0].text(), "Error: nothing");
        assert_eq!(status.banner().map(|l| l.text()), Some("✗ jj undo".to_string()));

        assert!(status.dismiss());
        assert!(!status.dismiss());
    }

    #[test]
    fn hints_render_in_order() {
        let line = hints_line("rebase", &[("enter".to_string(), "apply".to_string())]);
        assert_eq!(line.text(), " rebase  enter apply");
    }
}
