use crossterm::event::KeyEvent;
use graph::{Commit, Line, Segment};
use jjui_core::{command, local_bookmarks, parse_bookmarks, Bookmark, CommandOutput};

use super::{Outcome, RenderPosition};
use crate::event::{Effect, QueryKind};
use crate::keymap::Keys;
use crate::theme;
use crate::widgets::{ChoiceList, InputEvent, ListEvent, TextInput};

/// Bookmark mode: a chooser first, then one of set, move or delete
#[derive(Debug, Clone)]
pub enum BookmarkOperation {
    Choose {
        revision: String,
        bookmarks: Vec<String>,
    },
    Set {
        revision: String,
        input: TextInput,
    },
    /// `list` is `None` while the movable bookmarks are loading
    Move {
        revision: String,
        list: Option<ChoiceList<Bookmark>>,
    },
    Delete {
        revision: String,
        list: ChoiceList<String>,
    },
}

impl BookmarkOperation {
    pub fn new(commit: &Commit) -> Self {
        BookmarkOperation::Choose {
            revision: commit.change_id.clone(),
            bookmarks: commit.bookmarks.clone(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BookmarkOperation::Choose { .. } => "bookmark",
            BookmarkOperation::Set { .. } => "bookmark set",
            BookmarkOperation::Move { .. } => "bookmark move",
            BookmarkOperation::Delete { .. } => "bookmark delete",
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, BookmarkOperation::Set { .. })
    }

    pub fn render_position(&self) -> RenderPosition {
        match self {
            BookmarkOperation::Choose { .. } | BookmarkOperation::Set { .. } => {
                RenderPosition::Bookmark
            }
            BookmarkOperation::Move { .. } | BookmarkOperation::Delete { .. } => {
                RenderPosition::After
            }
        }
    }

    pub fn overlay(&self, position: RenderPosition) -> Vec<Line> {
        if position != self.render_position() {
            return Vec::new();
        }
        match self {
            BookmarkOperation::Choose { .. } => vec![Line::new(vec![Segment::new(
                "set / move / delete ",
                theme::PROMPT,
            )])],
            BookmarkOperation::Set { input, .. } => vec![input.line()],
            BookmarkOperation::Move { list: None, .. } => {
                vec![Line::new(vec![Segment::new("loading bookmarks…", theme::HELP)])]
            }
            BookmarkOperation::Move { list: Some(list), .. } => list.lines(),
            BookmarkOperation::Delete { list, .. } => list.lines(),
        }
    }

    /// Move retargets with the cursor and reloads what can be moved there
    pub fn set_selected(&mut self, commit: &Commit) -> Vec<Effect> {
        match self {
            BookmarkOperation::Choose {
                revision,
                bookmarks,
            } => {
                *revision = commit.change_id.clone();
                *bookmarks = commit.bookmarks.clone();
                Vec::new()
            }
            BookmarkOperation::Move { revision, list } if *revision != commit.change_id => {
                *revision = commit.change_id.clone();
                *list = None;
                vec![movable_query(revision)]
            }
            _ => Vec::new(),
        }
    }

    pub fn query_finished(&mut self, kind: &QueryKind, output: &CommandOutput) {
        let BookmarkOperation::Move { revision, list } = self else {
            return;
        };
        match kind {
            QueryKind::MovableBookmarks { revision: queried } if *queried == *revision => {
                *list = Some(movable_list(revision, output));
            }
            _ => tracing::debug!(?kind, "stale bookmark query reply"),
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent, keys: &Keys) -> Outcome {
        let bookmark = &keys.bookmark;
        match self {
            BookmarkOperation::Choose {
                revision,
                bookmarks,
            } => {
                if bookmark.set.matches(key) {
                    *self = BookmarkOperation::Set {
                        revision: revision.clone(),
                        input: TextInput::new("name: "),
                    };
                    Outcome::Handled
                } else if bookmark.move_.matches(key) {
                    let effect = movable_query(revision);
                    *self = BookmarkOperation::Move {
                        revision: revision.clone(),
                        list: None,
                    };
                    Outcome::Continue(vec![effect])
                } else if bookmark.delete.matches(key) {
                    let list = ChoiceList::new(bookmarks.clone(), Clone::clone)
                        .with_title(format!("Delete a bookmark of {revision}"));
                    *self = BookmarkOperation::Delete {
                        revision: revision.clone(),
                        list,
                    };
                    Outcome::Handled
                } else if keys.cancel.matches(key) {
                    Outcome::Cancel
                } else {
                    Outcome::Ignored
                }
            }
            BookmarkOperation::Set { revision, input } => match input.handle_key(key) {
                InputEvent::Submit(name) if name.trim().is_empty() => Outcome::Handled,
                InputEvent::Submit(name) => Outcome::Apply(Effect::run(
                    command::bookmark_set(revision, name.trim()),
                    Some(revision.as_str()),
                )),
                InputEvent::Cancel => Outcome::Cancel,
                InputEvent::Changed | InputEvent::Ignored => Outcome::Handled,
            },
            BookmarkOperation::Move { revision, list } => {
                if bookmark.next.matches(key) {
                    if let Some(list) = list {
                        list.cycle();
                    }
                    Outcome::Handled
                } else if keys.apply.matches(key) {
                    match list.as_ref().and_then(ChoiceList::current) {
                        Some(chosen) => Outcome::Apply(Effect::run(
                            command::bookmark_move(revision, &chosen.name, chosen.backwards),
                            Some(revision.as_str()),
                        )),
                        None => Outcome::Handled,
                    }
                } else if keys.cancel.matches(key) {
                    Outcome::Cancel
                } else {
                    Outcome::Ignored
                }
            }
            BookmarkOperation::Delete { revision, list } => match list.handle_key(key, keys) {
                ListEvent::Chosen(index) => {
                    let name = &list.items()[index];
                    Outcome::Apply(Effect::run(
                        command::bookmark_delete(name),
                        Some(revision.as_str()),
                    ))
                }
                ListEvent::Cancel => Outcome::Cancel,
                ListEvent::Moved | ListEvent::Ignored => Outcome::Handled,
            },
        }
    }

    pub fn key_hints(&self, keys: &Keys) -> Vec<(String, String)> {
        let bookmark = &keys.bookmark;
        match self {
            BookmarkOperation::Choose { .. } => vec![
                bookmark.set.hint("set"),
                bookmark.move_.hint("move"),
                bookmark.delete.hint("delete"),
                keys.cancel.hint("cancel"),
            ],
            BookmarkOperation::Set { .. } => {
                vec![keys.apply.hint("set"), keys.cancel.hint("cancel")]
            }
            BookmarkOperation::Move { .. } => vec![
                bookmark.next.hint("next bookmark"),
                keys.apply.hint("move here"),
                keys.cancel.hint("cancel"),
            ],
            BookmarkOperation::Delete { .. } => {
                vec![keys.apply.hint("delete"), keys.cancel.hint("cancel")]
            }
        }
    }
}

fn movable_query(revision: &str) -> Effect {
    Effect::Query {
        args: command::bookmark_list_movable(revision),
        kind: QueryKind::MovableBookmarks {
            revision: revision.to_string(),
        },
    }
}

/// Local bookmarks that are not already on `revision`
fn movable_list(revision: &str, output: &CommandOutput) -> ChoiceList<Bookmark> {
    if !output.success {
        tracing::warn!(revision, "could not list movable bookmarks");
        return ChoiceList::new(Vec::new(), |b: &Bookmark| b.name.clone())
            .with_title(output.output.trim().to_string());
    }
    let candidates: Vec<Bookmark> = local_bookmarks(parse_bookmarks(&output.output))
        .into_iter()
        .filter(|b| !b.conflict && b.target.as_deref() != Some(revision))
        .collect();
    let title = if candidates.is_empty() {
        "No bookmarks to move here"
    } else {
        "Move bookmark"
    };
    ChoiceList::new(candidates, |b| {
        if b.backwards {
            format!("{} (backwards)", b.name)
        } else {
            b.name.clone()
        }
    })
    .with_title(title)
}
