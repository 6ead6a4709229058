//! Terminal UI for jj
//!
//! Key presses go to the active operation first, then to the default
//! bindings; every transition yields effects that the orchestrator runs in
//! the background and reports back as messages.

pub mod app;
pub mod config;
pub mod event;
pub mod keymap;
pub mod model;
pub mod operations;
pub mod orchestrator;
pub mod render;
pub mod row_view;
pub mod status;
pub mod theme;
pub mod widgets;

pub use app::{run_tui, Options};
pub use config::Config;
pub use event::{Effect, Msg, QueryKind};
pub use keymap::{Binding, Keys};
pub use model::Model;
pub use operations::{Operation, Outcome, RenderPosition};
pub use orchestrator::{Foreground, GenerationTracker, Orchestrator};
