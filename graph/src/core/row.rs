use crate::core::{Commit, Edge};
use crate::render::Line;

/// One node of the graph together with the terminal lines drawn for it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub commit: Commit,
    /// Graph glyphs in front of the node's payload
    pub gutter: Line,
    /// Lines following the node line up to the next node
    pub continuations: Vec<Line>,
    /// Display column of the node glyph
    pub column: usize,
    /// Display column where the payload starts
    pub indent: usize,
    /// Row that occupied this column before this one was opened
    pub previous: Option<usize>,
    /// Edges leading into this row
    pub edges: Vec<Edge>,
}

impl Row {
    pub fn change_id(&self) -> &str {
        &self.commit.change_id
    }

    /// Gutter to draw on an inserted line right below the node
    pub fn extended_gutter(&self) -> Line {
        match self.continuations.first() {
            Some(line) => line.extend(self.indent),
            None => self.gutter.extend(self.indent),
        }
    }

    /// All plain text of the row, for searching
    pub fn text(&self) -> String {
        let commit = &self.commit;
        let mut text = format!(
            "{} {} {} {} {}",
            commit.change_id,
            commit.commit_id,
            commit.author,
            commit.bookmarks.join(" "),
            commit.description
        );
        for line in &self.continuations {
            text.push(' ');
            text.push_str(&line.text());
        }
        text
    }
}
