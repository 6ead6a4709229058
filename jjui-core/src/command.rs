use std::fmt;

use serde::{Deserialize, Serialize};

use crate::template;

/// Arguments of one jj invocation, without the program name
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandArgs(Vec<String>);

impl CommandArgs {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(args.into_iter().map(Into::into).collect())
    }

    pub fn push(mut self, arg: impl Into<String>) -> Self {
        self.0.push(arg.into());
        self
    }

    pub fn extend<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for CommandArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("jj")?;
        for arg in &self.0 {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Which revisions a rebase carries along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RebaseSource {
    /// Only the revision itself (`-r`)
    #[default]
    Revision,
    /// The whole branch relative to the destination (`-b`)
    Branch,
    /// The revision and its descendants (`-s`)
    Descendants,
}

impl RebaseSource {
    pub fn flag(self) -> &'static str {
        match self {
            RebaseSource::Revision => "-r",
            RebaseSource::Branch => "-b",
            RebaseSource::Descendants => "-s",
        }
    }
}

/// Where a rebase puts the rebased revisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RebaseTarget {
    /// On top of the target (`-d`)
    #[default]
    Destination,
    /// Between the target and its children
    After,
    /// Between the target and its parents
    Before,
}

impl RebaseTarget {
    pub fn flag(self) -> &'static str {
        match self {
            RebaseTarget::Destination => "-d",
            RebaseTarget::After => "--insert-after",
            RebaseTarget::Before => "--insert-before",
        }
    }
}

/// The revision graph, oldest first, rendered with [`template::DISPLAY`]
pub fn log(revset: Option<&str>) -> CommandArgs {
    let args = CommandArgs::new(["log", "--reversed", "--color", "always", "--quiet"]);
    let args = match revset.filter(|r| !r.trim().is_empty()) {
        Some(revset) => args.extend(["-r", revset]),
        None => args,
    };
    args.extend(["--template", template::DISPLAY])
}

pub fn new(revisions: &[&str]) -> CommandArgs {
    revisions
        .iter()
        .fold(CommandArgs::new(["new"]), |args, r| args.extend(["-r", *r]))
}

pub fn edit(revision: &str) -> CommandArgs {
    CommandArgs::new(["edit", "-r", revision])
}

pub fn diffedit(revision: &str) -> CommandArgs {
    CommandArgs::new(["diffedit", "-r", revision])
}

pub fn split(revision: &str, files: &[String]) -> CommandArgs {
    CommandArgs::new(["split", "-r", revision]).extend(files.iter().cloned())
}

pub fn abandon(revisions: &[&str]) -> CommandArgs {
    revisions
        .iter()
        .fold(CommandArgs::new(["abandon"]), |args, r| args.extend(["-r", *r]))
}

/// Set the description inline
pub fn describe(revision: &str, message: &str) -> CommandArgs {
    CommandArgs::new(["describe", "-r", revision, "-m", message])
}

/// Open the configured editor on the description
pub fn describe_in_editor(revision: &str) -> CommandArgs {
    CommandArgs::new(["describe", "-r", revision, "--edit"])
}

pub fn rebase(from: &str, to: &str, source: RebaseSource, target: RebaseTarget) -> CommandArgs {
    CommandArgs::new(["rebase", source.flag(), from, target.flag(), to])
}

pub fn squash(from: &str, into: &str) -> CommandArgs {
    CommandArgs::new(["squash", "--from", from, "--into", into])
}

pub fn bookmark_set(revision: &str, name: &str) -> CommandArgs {
    CommandArgs::new(["bookmark", "set", "-r", revision, name])
}

pub fn bookmark_move(revision: &str, name: &str, allow_backwards: bool) -> CommandArgs {
    let args = CommandArgs::new(["bookmark", "move", name, "--to", revision]);
    if allow_backwards {
        args.push("--allow-backwards")
    } else {
        args
    }
}

pub fn bookmark_delete(name: &str) -> CommandArgs {
    CommandArgs::new(["bookmark", "delete", name])
}

/// Bookmarks pointing into `revset`, rendered with [`template::BOOKMARK_LIST`]
pub fn bookmark_list(revset: &str) -> CommandArgs {
    CommandArgs::new([
        "bookmark",
        "list",
        "-r",
        revset,
        "--template",
        template::BOOKMARK_LIST,
        "--color",
        "never",
    ])
}

/// Bookmarks that could be moved to `revision`: everything on its ancestors
/// or descendants
pub fn bookmark_list_movable(revision: &str) -> CommandArgs {
    let revset = format!("::{revision} | {revision}::");
    CommandArgs::new(["bookmark", "list", "-r", revset.as_str(), "--template"])
        .push(template::movable_bookmarks(revision))
        .extend(["--color", "never"])
}

pub fn undo() -> CommandArgs {
    CommandArgs::new(["undo"])
}

pub fn git_fetch(flags: &[&str]) -> CommandArgs {
    CommandArgs::new(["git", "fetch"]).extend(flags.iter().copied())
}

pub fn git_push(flags: &[&str]) -> CommandArgs {
    CommandArgs::new(["git", "push"]).extend(flags.iter().copied())
}

pub fn show(revision: &str, extra_args: &[String]) -> CommandArgs {
    CommandArgs::new(["show", "-r", revision, "--color", "always"])
        .extend(extra_args.iter().cloned())
}

pub fn diff(revision: &str, file: Option<&str>) -> CommandArgs {
    let args = CommandArgs::new(["diff", "-r", revision, "--color", "always"]);
    match file {
        Some(file) => args.push(file),
        None => args,
    }
}

pub fn restore(revision: &str, files: &[String]) -> CommandArgs {
    CommandArgs::new(["restore", "-c", revision]).extend(files.iter().cloned())
}

/// Changed files of `revision`, one `X path` line each
pub fn summary(revision: &str) -> CommandArgs {
    CommandArgs::new([
        "log",
        "-r",
        revision,
        "--summary",
        "--no-graph",
        "--color",
        "never",
        "--quiet",
        "--template",
        "",
    ])
}

/// The whole description of `revision`, body included
pub fn description(revision: &str) -> CommandArgs {
    CommandArgs::new([
        "log",
        "-r",
        revision,
        "--no-graph",
        "--color",
        "never",
        "--quiet",
        "--template",
        "description",
    ])
}

pub fn op_log(limit: Option<usize>) -> CommandArgs {
    let args = CommandArgs::new(["op", "log", "--color", "always", "--quiet"]);
    match limit {
        Some(limit) => args.extend(["--limit".to_string(), limit.to_string()]),
        None => args,
    }
}

pub fn op_show(operation_id: &str) -> CommandArgs {
    CommandArgs::new(["op", "show", operation_id, "--color", "always"])
}

pub fn op_restore(operation_id: &str) -> CommandArgs {
    CommandArgs::new(["op", "restore", operation_id])
}

pub fn config_get(key: &str) -> CommandArgs {
    CommandArgs::new(["config", "get", key])
}
