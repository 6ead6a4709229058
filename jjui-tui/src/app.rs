use std::io;
use std::path::PathBuf;
use std::process::Command;
use std::sync::mpsc::{self as std_mpsc, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use jjui_core::{CommandArgs, CommandOutput, JjRunner, Runner};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::config::Config;
use crate::event::Msg;
use crate::model::Model;
use crate::orchestrator::{Foreground, Orchestrator};
use crate::render;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// How long the key reader waits for input before checking its flags
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What the TUI is started with
#[derive(Debug, Clone)]
pub struct Options {
    /// Repository to run jj in
    pub location: PathBuf,
    pub revset: Option<String>,
    pub config: Config,
}

/// Where the key reader gets terminal events from
trait EventSource: Send + 'static {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
}

/// The real terminal through crossterm
struct Crossterm;

impl EventSource for Crossterm {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        event::read()
    }
}

enum Control {
    /// Stop touching the terminal, then acknowledge
    Pause(std_mpsc::Sender<()>),
    Resume,
}

/// Forwards terminal events into the message channel from a thread of its
/// own, since crossterm only offers a blocking read. Dropping it stops the
/// thread.
struct KeyReader {
    control: std_mpsc::Sender<Control>,
}

impl KeyReader {
    fn spawn(source: impl EventSource, sender: UnboundedSender<Msg>) -> Self {
        let (control, requests) = std_mpsc::channel();
        thread::spawn(move || {
            read_events(source, &requests, &sender);
            tracing::debug!("key reader stopped");
        });
        Self { control }
    }

    /// Returns once the reader no longer polls, so nothing typed into a
    /// handed-off process is taken from it. Waits at most one poll interval.
    fn pause(&self) {
        let (parked, acknowledged) = std_mpsc::channel();
        if self.control.send(Control::Pause(parked)).is_ok() {
            // Fails only when the thread has already stopped
            let _ = acknowledged.recv();
        }
    }

    fn resume(&self) {
        let _ = self.control.send(Control::Resume);
    }
}

fn read_events(
    mut source: impl EventSource,
    requests: &std_mpsc::Receiver<Control>,
    sender: &UnboundedSender<Msg>,
) {
    loop {
        match requests.try_recv() {
            Ok(Control::Pause(parked)) => {
                let _ = parked.send(());
                if !wait_for_resume(requests) {
                    return;
                }
                continue;
            }
            Ok(Control::Resume) | Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => return,
        }

        match source.poll(POLL_INTERVAL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(err) => {
                tracing::warn!(%err, "terminal poll failed");
                return;
            }
        }
        let msg = match source.read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => Msg::Key(key),
            Ok(Event::Resize(width, height)) => Msg::Resize(width, height),
            Ok(_) => continue,
            Err(err) => {
                tracing::warn!(%err, "terminal read failed");
                return;
            }
        };
        if sender.send(msg).is_err() {
            return;
        }
    }
}

/// Block while paused. Returns false when the reader should stop.
fn wait_for_resume(requests: &std_mpsc::Receiver<Control>) -> bool {
    loop {
        match requests.recv() {
            Ok(Control::Resume) => return true,
            Ok(Control::Pause(parked)) => {
                let _ = parked.send(());
            }
            Err(_) => return false,
        }
    }
}

/// Setup terminal
pub fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

/// Restore terminal
pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI application
pub async fn run_tui(options: Options) -> Result<()> {
    let runner: Arc<dyn Runner> = Arc::new(JjRunner::new(&options.location));
    let config = Arc::new(options.config);
    let mut model = Model::new(Arc::clone(&config), options.revset)?;

    let mut terminal = setup_terminal()?;
    let res = event_loop(&mut terminal, &mut model, runner, &config).await;
    restore_terminal(&mut terminal)?;

    res
}

async fn event_loop(
    terminal: &mut Tui,
    model: &mut Model,
    runner: Arc<dyn Runner>,
    config: &Config,
) -> Result<()> {
    let (sender, mut receiver): (UnboundedSender<Msg>, UnboundedReceiver<Msg>) = mpsc::unbounded_channel();
    let orchestrator = Orchestrator::new(runner, sender.clone(), config.preview.extra_args.clone());
    let reader = KeyReader::spawn(Crossterm, sender.clone());

    let size = terminal.size()?;
    model.update(Msg::Resize(size.width, size.height));
    for effect in model.init() {
        orchestrator.dispatch(effect);
    }

    loop {
        terminal.draw(|frame| render::draw(frame, model))?;

        let Some(msg) = receiver.recv().await else {
            return Ok(());
        };
        if !orchestrator.accept(&msg) {
            continue;
        }

        for effect in model.update(msg) {
            match orchestrator.dispatch(effect) {
                None => {}
                Some(Foreground::Quit) => return Ok(()),
                Some(Foreground::Exec {
                    args,
                    command,
                    select,
                }) => {
                    let reply = hand_off(terminal, &reader, &args, command)?;
                    let msg = match reply {
                        None => Msg::Refresh { select },
                        Some(output) => Msg::CommandFinished {
                            args,
                            output,
                            select,
                        },
                    };
                    // The receiver lives in this loop
                    let _ = sender.send(msg);
                }
            }
        }
    }
}

/// Give the terminal to `command` until it exits. Returns the failure to
/// report, if any.
fn hand_off(
    terminal: &mut Tui,
    reader: &KeyReader,
    args: &CommandArgs,
    mut command: Command,
) -> Result<Option<CommandOutput>> {
    tracing::info!(command = %args, "suspending the UI");
    tokio::task::block_in_place(|| reader.pause());
    restore_terminal(terminal)?;

    let status = tokio::task::block_in_place(|| command.status());

    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.clear().context("failed to redraw after hand-off")?;
    reader.resume();

    Ok(match status {
        Ok(status) if status.success() => None,
        Ok(status) => Some(CommandOutput::failed(format!("{args} exited with {status}"))),
        Err(err) => Some(CommandOutput::failed(err.to_string())),
    })
}
