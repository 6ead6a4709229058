//! Terminal lines of one graph row, with the active operation's overlay
//! spliced in when the row is highlighted.

use graph::{Background, Commit, Line, Row, Segment};

use crate::operations::{Operation, RenderPosition};
use crate::theme;

/// How the highlighted row is decorated
pub struct Highlight<'a> {
    pub operation: &'a Operation,
    pub background: &'a Background,
}

/// Number of lines `row_lines` produces, without building them
pub fn row_height(row: &Row, highlight: Option<&Highlight<'_>>) -> usize {
    let overlay = highlight.map_or(0, |h| {
        h.operation.overlay(RenderPosition::Before).len()
            + h.operation.overlay(RenderPosition::After).len()
    });
    1 + row.continuations.len() + overlay
}

pub fn row_lines(row: &Row, highlight: Option<&Highlight<'_>>, search: Option<&str>) -> Vec<Line> {
    let operation = highlight.map(|h| h.operation);
    let overlay = |position| operation.map(|op| op.overlay(position)).unwrap_or_default();

    let mut lines = Vec::with_capacity(row_height(row, highlight));

    let above = row.gutter.extend(row.indent);
    for line in overlay(RenderPosition::Before) {
        lines.push(concat(&above, &line));
    }

    let glyph = overlay(RenderPosition::Glyph);
    let gutter = match glyph.first() {
        Some(marker) => replace_glyph(&row.gutter, row.column, marker),
        None => row.gutter.clone(),
    };
    let mut node = concat(&gutter, &payload(&row.commit, operation));
    if let Some(query) = search.filter(|q| !q.is_empty()) {
        node = node.reverse(query);
    }
    if let Some(highlight) = highlight {
        node = node.with_background(highlight.background);
    }
    lines.push(node);

    let below = row.extended_gutter();
    for line in overlay(RenderPosition::After) {
        lines.push(concat(&below, &line));
    }

    lines.extend(row.continuations.iter().cloned());
    lines
}

/// The fields of a revision laid out the way `jj log` does
fn payload(commit: &Commit, operation: Option<&Operation>) -> Line {
    let overlay = |position| {
        operation
            .and_then(|op| op.overlay(position).into_iter().next())
            .filter(|line| !line.is_empty())
    };
    let mut line = Line::default();

    line.push(Segment::new(commit.change_id_short.as_str(), theme::CHANGE_ID));
    line.push(Segment::new(rest(&commit.change_id, &commit.change_id_short), theme::ID_REST));
    if commit.hidden {
        word(&mut line, "hidden", theme::HIDDEN);
    }

    if commit.is_root() {
        word(&mut line, "root()", theme::EMPTY);
    } else {
        word(&mut line, &commit.author, theme::AUTHOR);
        word(&mut line, &commit.timestamp, theme::TIMESTAMP);
    }

    if let Some(marker) = overlay(RenderPosition::Bookmark) {
        line.push(Segment::plain(" "));
        marker.segments.into_iter().for_each(|s| line.push(s));
    }
    if !commit.bookmarks.is_empty() {
        word(&mut line, &commit.bookmarks.join(" "), theme::BOOKMARKS);
    }

    if !commit.is_root() {
        word(&mut line, &commit.commit_id_short, theme::COMMIT_ID);
        line.push(Segment::new(rest(&commit.commit_id, &commit.commit_id_short), theme::ID_REST));
    }
    if commit.conflict {
        word(&mut line, "conflict", theme::CONFLICT);
    }

    match overlay(RenderPosition::Description) {
        Some(editor) => {
            line.push(Segment::plain(" "));
            editor.segments.into_iter().for_each(|s| line.push(s));
        }
        None if commit.is_root() => {}
        None => {
            if commit.empty {
                word(&mut line, "(empty)", theme::EMPTY);
            }
            if commit.description.is_empty() {
                let params = if commit.empty { theme::EMPTY } else { theme::NO_DESCRIPTION };
                word(&mut line, "(no description set)", params);
            } else {
                word(&mut line, &commit.description, "");
            }
        }
    }
    line
}

/// Space-separated field, skipped when empty
fn word(line: &mut Line, text: &str, params: &str) {
    if text.is_empty() {
        return;
    }
    line.push(Segment::plain(" "));
    line.push(Segment::new(text, params));
}

/// `full` without its `short` prefix
fn rest<'a>(full: &'a str, short: &str) -> &'a str {
    full.strip_prefix(short).unwrap_or_default()
}

fn concat(left: &Line, right: &Line) -> Line {
    let mut line = left.clone();
    right.segments.iter().cloned().for_each(|s| line.push(s));
    line
}

/// Swap the node glyph at `column` for `marker`
fn replace_glyph(gutter: &Line, column: usize, marker: &Line) -> Line {
    let (left, rest) = gutter.split_at_column(column);
    let (_, right) = rest.split_at_column(1);
    concat(&concat(&left, marker), &right)
}
