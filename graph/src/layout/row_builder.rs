use std::collections::HashSet;

use unicode_width::UnicodeWidthChar;

use crate::core::{Commit, Dag, Edge, EdgeType, Row};
use crate::error::ParseError;
use crate::render::{lines, Line};

/// Glyphs jj draws for a revision node
pub const NODE_GLYPHS: &[char] = &['@', '○', '◆', '×', '◉', '●'];

/// Glyphs jj draws between nodes
pub const CONNECTOR_GLYPHS: &[char] = &[
    '│', '├', '┤', '─', '╮', '╯', '╭', '╰', '┬', '┴', '┼', '╷', '╵', '~', '|', '/', '\\', ' ',
];

const TERMINATOR: char = '~';

/// Position of the node glyph on a node line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Marker {
    /// Display column of the glyph
    column: usize,
    /// Display column where the payload starts
    indent: usize,
}

/// Depth frame: the row currently open at `column`. The bottom frame is a
/// sentinel with no column that sits below any real content.
#[derive(Debug, Clone, Copy)]
struct Frame {
    column: Option<usize>,
    row: Option<usize>,
}

/// Rebuilds rows and edges from `jj log` graph output in a single pass
pub struct RowBuilder {
    rows: Vec<Row>,
    stack: Vec<Frame>,
    /// Change ids (full and short) of every row opened so far
    seen: HashSet<String>,
    line_number: usize,
}

impl RowBuilder {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            stack: vec![Frame {
                column: None,
                row: None,
            }],
            seen: HashSet::new(),
            line_number: 0,
        }
    }

    /// Feed the next terminal line of the graph
    pub fn push_line(&mut self, line: Line) -> Result<(), ParseError> {
        self.line_number += 1;
        match locate_marker(&line) {
            Some(marker) => self.open_row(line, marker),
            None => {
                self.push_continuation(line);
                Ok(())
            }
        }
    }

    pub fn finish(self) -> Vec<Row> {
        self.rows
    }

    fn open_row(&mut self, line: Line, marker: Marker) -> Result<(), ParseError> {
        let (gutter, payload) = line.split_at_column(marker.indent);
        let mut commit = Commit::from_fields(self.line_number, payload.text().trim_end())?;

        let index = self.rows.len();
        commit.index = index;

        let edge_type = if commit.parents.iter().all(|p| self.seen.contains(p)) {
            EdgeType::Direct
        } else {
            EdgeType::Indirect
        };

        let previous = self.fold_stack(marker.column, index);
        let edges = previous
            .map(|from| vec![Edge::new(from, index, edge_type)])
            .unwrap_or_default();

        self.seen.insert(commit.change_id.clone());
        if !commit.change_id_short.is_empty() {
            self.seen.insert(commit.change_id_short.clone());
        }

        self.rows.push(Row {
            commit,
            gutter,
            continuations: Vec::new(),
            column: marker.column,
            indent: marker.indent,
            previous,
            edges,
        });
        Ok(())
    }

    /// Place the row opened at `column` on the stack and return the row the
    /// edge into it comes from
    fn fold_stack(&mut self, column: usize, index: usize) -> Option<usize> {
        while matches!(self.stack.last(), Some(Frame { column: Some(c), .. }) if *c > column) {
            self.stack.pop();
        }

        let same_depth = self
            .stack
            .last()
            .map_or(false, |top| top.column == Some(column));

        if same_depth {
            self.stack.last_mut().and_then(|top| top.row.replace(index))
        } else {
            let from = self.stack.last().and_then(|top| top.row);
            self.stack.push(Frame {
                column: Some(column),
                row: Some(index),
            });
            from
        }
    }

    fn push_continuation(&mut self, line: Line) {
        if let Some(column) = terminator_column(&line) {
            while matches!(self.stack.last(), Some(Frame { column: Some(c), .. }) if *c >= column) {
                self.stack.pop();
            }
        }

        match self.rows.last_mut() {
            Some(row) if !line.is_empty() => row.continuations.push(line),
            Some(_) => {}
            None => tracing::trace!(line = self.line_number, "skipping graph line before first node"),
        }
    }
}

impl Default for RowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse complete `jj log` output into rows
pub fn build_rows(output: &str) -> Result<Vec<Row>, ParseError> {
    let mut builder = RowBuilder::new();
    for line in lines(output) {
        builder.push_line(line)?;
    }
    Ok(builder.finish())
}

/// Parse complete `jj log` output into a snapshot
pub fn build_dag(output: &str) -> Result<Dag, ParseError> {
    build_rows(output).map(Dag::new)
}

fn locate_marker(line: &Line) -> Option<Marker> {
    let text = line.text();
    let mut column = 0;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if NODE_GLYPHS.contains(&c) {
            let glyph_column = column;
            column += c.width().unwrap_or(0);
            for c in chars.by_ref().take_while(|c| CONNECTOR_GLYPHS.contains(c)) {
                column += c.width().unwrap_or(0);
            }
            return Some(Marker {
                column: glyph_column,
                indent: column,
            });
        }
        if !CONNECTOR_GLYPHS.contains(&c) {
            return None;
        }
        column += c.width().unwrap_or(0);
    }
    None
}

fn terminator_column(line: &Line) -> Option<usize> {
    let mut column = 0;
    for c in line.text().chars() {
        if c == TERMINATOR {
            return Some(column);
        }
        if !CONNECTOR_GLYPHS.contains(&c) {
            return None;
        }
        column += c.width().unwrap_or(0);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Node line the way jj colours it with the display template
    fn node(gutter: &str, short: &str, full: &str, parents: &str) -> String {
        format!(
            "\x1b[1m\x1b[38;5;2m{gutter}\x1b[0m\x1b[1m\x1b[38;5;5m{short}\x1b[0m;{full};{parents};.;false;false;false;false;dev@example.com;2 days ago;message for {short};ab;abcdef12;false\n"
        )
    }

    fn ids(rows: &[Row]) -> Vec<(&str, &str)> {
        rows.iter()
            .map(|r| (r.commit.change_id_short.as_str(), r.commit.change_id.as_str()))
            .collect()
    }

    fn edges(rows: &[Row]) -> Vec<(usize, usize, EdgeType)> {
        rows.iter()
            .flat_map(|r| r.edges.iter())
            .map(|e| (e.from, e.to, e.edge_type))
            .collect()
    }

    #[test]
    fn one_row_per_node_line_with_verbatim_ids() {
        let output = [
            node("◆  ", "z", "zzzzzzzz", ""),
            node("○  ", "qp", "qpvuntsm", "zzzzzzzz"),
            "│  (extra line)\n".to_string(),
            node("@  ", "kx", "kxrwqsyo", "qpvuntsm"),
        ]
        .concat();

        let rows = build_rows(&output).unwrap();

        assert_eq!(
            ids(&rows),
            vec![("z", "zzzzzzzz"), ("qp", "qpvuntsm"), ("kx", "kxrwqsyo")]
        );
        assert_eq!(rows[2].gutter.text(), "@  ");
        assert_eq!(rows.iter().map(|r| r.commit.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn linear_history_has_direct_edges() {
        let output = [
            node("◆  ", "z", "zzzzzzzz", ""),
            node("○  ", "qp", "qpvuntsm", "zzzzzzzz"),
            node("@  ", "kx", "kxrwqsyo", "qpvuntsm"),
        ]
        .concat();

        let rows = build_rows(&output).unwrap();

        assert_eq!(
            edges(&rows),
            vec![(0, 1, EdgeType::Direct), (1, 2, EdgeType::Direct)]
        );
        assert_eq!(rows[2].previous, Some(1));
    }

    #[test]
    fn terminator_separates_unrelated_rows() {
        let output = [
            node("○  ", "aa", "aaaaaaaa", "xxxxxxxx"),
            "~\n".to_string(),
            node("○  ", "bb", "bbbbbbbb", "yyyyyyyy"),
            "~\n".to_string(),
        ]
        .concat();

        let rows = build_rows(&output).unwrap();

        assert_eq!(rows.len(), 2);
        assert!(edges(&rows).is_empty());
    }

    #[test]
    fn elided_revisions_end_the_edge_at_the_terminator() {
        let output = [
            node("○  ", "aa", "aaaaaaaa", ""),
            "~  (elided revisions)\n".to_string(),
            node("○  ", "bb", "bbbbbbbb", "xxxxxxxx"),
        ]
        .concat();

        let rows = build_rows(&output).unwrap();

        assert!(edges(&rows).is_empty());
        assert_eq!(rows[0].continuations[0].text(), "~  (elided revisions)");

        // Inside a branch only that branch closes; the next row there hangs
        // off the enclosing row, indirect because its parent was elided
        let output = [
            node("◆  ", "z", "zzzzzzzz", ""),
            node("○  ", "aa", "aaaaaaaa", "zzzzzzzz"),
            "├─╮\n".to_string(),
            node("│ ○  ", "bb", "bbbbbbbb", "aaaaaaaa"),
            "│ ~  (elided revisions)\n".to_string(),
            node("│ ○  ", "cc", "cccccccc", "xxxxxxxx"),
            node("○ │  ", "dd", "dddddddd", "aaaaaaaa"),
        ]
        .concat();

        let rows = build_rows(&output).unwrap();

        assert_eq!(
            edges(&rows),
            vec![
                (0, 1, EdgeType::Direct),
                (1, 2, EdgeType::Direct),
                (1, 3, EdgeType::Indirect),
                (1, 4, EdgeType::Direct),
            ]
        );
    }

    #[test]
    fn continuation_extends_to_single_segment() {
        let output = [
            node("○  ", "aa", "aaaaaaaa", ""),
            "\x1b[38;5;2m│\x1b[0m  some documentation\n".to_string(),
        ]
        .concat();

        let rows = build_rows(&output).unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.indent, 3);
        assert_eq!(row.continuations.len(), 1);
        let extended = row.continuations[0].extend(row.indent);
        assert_eq!(extended.segments.len(), 1);
        assert_eq!(extended.text(), "│  ");
    }

    #[test]
    fn unseen_parent_is_indirect_until_opened() {
        let output = [
            node("○  ", "aa", "aaaaaaaa", "pppppppp"),
            node("○  ", "pp", "pppppppp", "aaaaaaaa"),
            node("○  ", "cc", "cccccccc", "pppppppp"),
        ]
        .concat();

        let rows = build_rows(&output).unwrap();

        assert_eq!(
            edges(&rows),
            vec![(0, 1, EdgeType::Direct), (1, 2, EdgeType::Direct)]
        );

        let output = [
            node("○  ", "aa", "aaaaaaaa", ""),
            node("○  ", "cc", "cccccccc", "pppppppp"),
            node("○  ", "pp", "pppppppp", "aaaaaaaa"),
            node("○  ", "dd", "dddddddd", "pppppppp"),
        ]
        .concat();

        let rows = build_rows(&output).unwrap();

        assert_eq!(
            edges(&rows),
            vec![
                (0, 1, EdgeType::Indirect),
                (1, 2, EdgeType::Direct),
                (2, 3, EdgeType::Direct)
            ]
        );
    }

    #[test]
    fn short_ids_count_as_seen() {
        let output = [
            node("○  ", "aa", "aaaaaaaa", ""),
            node("○  ", "bb", "bbbbbbbb", "aa"),
        ]
        .concat();

        let rows = build_rows(&output).unwrap();
        assert_eq!(edges(&rows), vec![(0, 1, EdgeType::Direct)]);
    }

    #[test]
    fn branches_fold_back_to_their_column() {
        let output = [
            node("◆  ", "z", "zzzzzzzz", ""),
            node("○  ", "aa", "aaaaaaaa", "zzzzzzzz"),
            "├─╮\n".to_string(),
            node("│ ○  ", "bb", "bbbbbbbb", "aaaaaaaa"),
            node("│ ○  ", "cc", "cccccccc", "bbbbbbbb"),
            node("○ │  ", "dd", "dddddddd", "aaaaaaaa"),
        ]
        .concat();

        let rows = build_rows(&output).unwrap();

        assert_eq!(rows[2].column, 2);
        assert_eq!(rows[2].gutter.text(), "│ ○  ");
        assert_eq!(
            edges(&rows),
            vec![
                (0, 1, EdgeType::Direct),
                (1, 2, EdgeType::Direct),
                (2, 3, EdgeType::Direct),
                (1, 4, EdgeType::Direct),
            ]
        );
        assert_eq!(rows[4].previous, Some(1));
    }

    #[test]
    fn root_is_normalized_while_building() {
        let output = node("◆  ", "z", "zzzzzzzz", "aaaaaaaa,bbbbbbbb")
            .replace("false;false;false;false", "false;true;true;false");

        let rows = build_rows(&output).unwrap();
        let root = &rows[0].commit;

        assert!(root.parents.is_empty());
        assert!(!root.immutable);
        assert!(!root.conflict);
        assert_eq!(root.description, "");
    }

    #[test]
    fn missing_change_id_aborts() {
        let output = format!("{}○  broken\n", node("◆  ", "z", "zzzzzzzz", ""));

        let err = build_rows(&output).unwrap_err();

        assert_eq!(
            err,
            ParseError::MissingChangeId {
                line: 2,
                text: "broken".to_string()
            }
        );
    }

    #[test]
    fn lines_before_first_node_are_ignored() {
        let output = format!("~\n│\n{}", node("○  ", "aa", "aaaaaaaa", ""));

        let rows = build_rows(&output).unwrap();

        assert_eq!(rows.len(), 1);
        assert!(rows[0].continuations.is_empty());
    }

    #[test]
    fn build_dag_indexes_rows() {
        let output = [
            node("◆  ", "z", "zzzzzzzz", ""),
            node("@  ", "kx", "kxrwqsyo", "zzzzzzzz").replacen(";false;", ";true;", 1),
        ]
        .concat();

        let dag = build_dag(&output).unwrap();

        assert_eq!(dag.find("kxrwqsyo"), Some(1));
        assert_eq!(dag.working_copy(), Some(1));
    }
}
