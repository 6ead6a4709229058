//! Everything jjui knows about talking to jj: argument templates, the
//! templates whose output gets parsed, and the runner capability.

pub mod bookmark;
pub mod command;
pub mod error;
pub mod files;
pub mod runner;
pub mod template;

pub use bookmark::{local_bookmarks, parse_bookmarks, Bookmark};
pub use command::{CommandArgs, RebaseSource, RebaseTarget};
pub use error::RunError;
pub use files::{parse_summary, ChangedFile, FileStatus};
pub use runner::{CommandOutput, JjRunner, Runner};
