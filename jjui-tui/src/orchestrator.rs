use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use jjui_core::{command, CommandArgs, CommandOutput, Runner};
use tokio::sync::mpsc::UnboundedSender;

use crate::event::{Effect, Msg};

/// Quiet period after a selection change before the preview is fetched
pub const PREVIEW_DELAY: Duration = Duration::from_millis(10);

/// How long a success banner stays up
pub const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(3);

/// Monotonic generation counter for debounced fetches. Clones share the
/// counter, so a spawned task can tell whether it has been superseded.
#[derive(Debug, Clone, Default)]
pub struct GenerationTracker {
    latest: Arc<AtomicU64>,
}

impl GenerationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding every earlier one
    pub fn next(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.latest() == generation
    }
}

/// Effects that need the terminal and so cannot run in the background
#[derive(Debug)]
pub enum Foreground {
    /// Suspend the UI, run `command` attached to the terminal, then refresh
    Exec {
        args: CommandArgs,
        command: std::process::Command,
        select: Option<String>,
    },
    Quit,
}

/// Turns effects into background tasks that each post exactly one message.
/// Holds no graph state, only the preview generation.
pub struct Orchestrator {
    runner: Arc<dyn Runner>,
    sender: UnboundedSender<Msg>,
    preview: GenerationTracker,
    preview_args: Vec<String>,
}

impl Orchestrator {
    pub fn new(runner: Arc<dyn Runner>, sender: UnboundedSender<Msg>, preview_args: Vec<String>) -> Self {
        Self {
            runner,
            sender,
            preview: GenerationTracker::new(),
            preview_args,
        }
    }

    /// Start `effect`. Effects that need the terminal come back to the caller.
    pub fn dispatch(&self, effect: Effect) -> Option<Foreground> {
        match effect {
            Effect::Run { args, select } => {
                self.spawn(move |runner| async move {
                    let output = run(runner.as_ref(), &args).await;
                    Msg::CommandFinished { args, output, select }
                });
            }
            Effect::Exec { args, select } => {
                tracing::debug!(command = %args, "handing over the terminal");
                return Some(Foreground::Exec {
                    command: self.runner.interactive(&args),
                    args,
                    select,
                });
            }
            Effect::Refresh { revset, select } => {
                self.spawn(move |runner| async move {
                    let args = command::log(revset.as_deref());
                    let output = match runner.run(&args).await {
                        Ok(output) => output,
                        Err(err) => return Msg::RefreshFailed { message: err.to_string() },
                    };
                    if !output.success {
                        return Msg::RefreshFailed {
                            message: output.output,
                        };
                    }
                    match graph::build_rows(&output.output) {
                        Ok(rows) => {
                            tracing::info!(rows = rows.len(), "graph refreshed");
                            Msg::Refreshed { rows, select }
                        }
                        Err(err) => {
                            tracing::warn!(%err, "graph output did not parse");
                            Msg::RefreshFailed { message: err.to_string() }
                        }
                    }
                });
            }
            Effect::Query { args, kind } => {
                self.spawn(move |runner| async move {
                    let output = run(runner.as_ref(), &args).await;
                    Msg::QueryFinished { kind, output }
                });
            }
            Effect::SchedulePreview { revision } => {
                let generation = self.preview.next();
                let tracker = self.preview.clone();
                let args = command::show(&revision, &self.preview_args);
                self.spawn(move |runner| async move {
                    tokio::time::sleep(PREVIEW_DELAY).await;
                    if !tracker.is_current(generation) {
                        // Superseded while waiting; the newer task reports
                        return None;
                    }
                    let output = run(runner.as_ref(), &args).await;
                    Some(Msg::PreviewLoaded {
                        generation,
                        revision,
                        output,
                    })
                });
            }
            Effect::ClearStatusAfter { serial } => {
                self.spawn(move |_| async move {
                    tokio::time::sleep(STATUS_CLEAR_DELAY).await;
                    Msg::ClearStatus { serial }
                });
            }
            Effect::Quit => return Some(Foreground::Quit),
        }
        None
    }

    /// Whether `msg` should reach the model. Preview content from a
    /// superseded generation is dropped silently.
    pub fn accept(&self, msg: &Msg) -> bool {
        match msg {
            Msg::PreviewLoaded { generation, revision, .. } if !self.preview.is_current(*generation) => {
                tracing::debug!(generation, latest = self.preview.latest(), %revision, "dropping stale preview");
                false
            }
            _ => true,
        }
    }

    fn spawn<F, Fut, M>(&self, task: F)
    where
        F: FnOnce(Arc<dyn Runner>) -> Fut,
        Fut: std::future::Future<Output = M> + Send + 'static,
        M: Into<Option<Msg>> + Send + 'static,
    {
        let sender = self.sender.clone();
        let future = task(Arc::clone(&self.runner));
        tokio::spawn(async move {
            if let Some(msg) = future.await.into() {
                // The loop is gone only when the app is shutting down
                let _ = sender.send(msg);
            }
        });
    }
}

/// Run to completion; a spawn failure becomes a failed output
async fn run(runner: &dyn Runner, args: &CommandArgs) -> CommandOutput {
    match runner.run(args).await {
        Ok(output) => output,
        Err(err) => {
            tracing::warn!(command = %args, %err, "could not run jj");
            CommandOutput::failed(err.to_string())
        }
    }
}
