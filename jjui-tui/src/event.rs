use crossterm::event::KeyEvent;
use graph::Row;
use jjui_core::{CommandArgs, CommandOutput};

/// Everything the event loop reacts to. Background work reports back through
/// exactly one of these per unit of work.
#[derive(Debug, Clone)]
pub enum Msg {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Reload the graph, then put the cursor on `select`
    Refresh { select: Option<String> },
    /// A graph reload finished and parsed
    Refreshed { rows: Vec<Row>, select: Option<String> },
    /// The graph query failed or its output could not be parsed
    RefreshFailed { message: String },
    /// A `Run` effect finished
    CommandFinished {
        args: CommandArgs,
        output: CommandOutput,
        select: Option<String>,
    },
    /// A `Query` effect finished; routed to the active operation
    QueryFinished { kind: QueryKind, output: CommandOutput },
    /// Preview content for `revision`, tagged with the generation it was
    /// scheduled under
    PreviewLoaded {
        generation: u64,
        revision: String,
        output: CommandOutput,
    },
    /// Auto-clear of the success banner numbered `serial`
    ClearStatus { serial: u64 },
}

/// Which reply a `Query` is waiting for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    MovableBookmarks { revision: String },
    ChangedFiles { revision: String },
    Description { revision: String },
    LatestOperation,
}

/// Work requested by a state transition. The model never performs I/O; the
/// orchestrator turns each effect into a background task or a terminal
/// hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run to completion, report `CommandFinished`, then refresh
    Run {
        args: CommandArgs,
        select: Option<String>,
    },
    /// Hand the terminal to jj (editor, diff tool, pager), then refresh
    Exec {
        args: CommandArgs,
        select: Option<String>,
    },
    Refresh {
        revset: Option<String>,
        select: Option<String>,
    },
    Query { args: CommandArgs, kind: QueryKind },
    SchedulePreview { revision: String },
    ClearStatusAfter { serial: u64 },
    Quit,
}

impl Effect {
    pub fn run(args: CommandArgs, select: Option<&str>) -> Self {
        Effect::Run {
            args,
            select: select.map(str::to_string),
        }
    }

    pub fn exec(args: CommandArgs, select: Option<&str>) -> Self {
        Effect::Exec {
            args,
            select: select.map(str::to_string),
        }
    }
}
