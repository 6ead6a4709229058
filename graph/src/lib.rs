//! Graph model for `jj log` output: ANSI tokenizing, row reconstruction and
//! viewport bookkeeping. Nothing here runs jj; callers hand in its output.

pub mod core;
pub mod error;
pub mod layout;
pub mod render;

pub use self::core::{Commit, Dag, DagStats, Edge, EdgeType, Row, ROOT_CHANGE_ID};
pub use error::{ParseError, StyleError};
pub use layout::{build_dag, build_rows, RowBuilder};
pub use render::{lines, Background, Line, Segment, Viewport};
