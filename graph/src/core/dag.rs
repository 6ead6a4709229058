use std::collections::HashMap;

use super::{Commit, Edge};
use super::Row;

/// Snapshot of one refresh: the rows in stream order plus id lookups.
///
/// A snapshot is replaced wholesale on every refresh and never patched.
#[derive(Debug, Clone, Default)]
pub struct Dag {
    rows: Vec<Row>,
    /// change id -> row index
    index: HashMap<String, usize>,
    /// row index -> indices of rows with an edge leading out of it
    children: HashMap<usize, Vec<usize>>,
}

impl Dag {
    pub fn new(rows: Vec<Row>) -> Self {
        let mut index = HashMap::with_capacity(rows.len());
        let mut children: HashMap<usize, Vec<usize>> = HashMap::new();

        for (i, row) in rows.iter().enumerate() {
            if index.insert(row.commit.change_id.clone(), i).is_some() {
                tracing::warn!(change_id = %row.commit.change_id, "duplicate change id in snapshot");
            }
            for edge in &row.edges {
                children.entry(edge.from).or_default().push(edge.to);
            }
        }

        Self { rows, index, children }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn commit(&self, index: usize) -> Option<&Commit> {
        self.rows.get(index).map(|r| &r.commit)
    }

    /// Row index of a change id, accepting either the full or the short form
    pub fn find(&self, change_id: &str) -> Option<usize> {
        self.index.get(change_id).copied().or_else(|| {
            self.rows
                .iter()
                .position(|r| !change_id.is_empty() && r.commit.change_id_short == change_id)
        })
    }

    pub fn working_copy(&self) -> Option<usize> {
        self.rows.iter().position(|r| r.commit.is_working_copy)
    }

    /// Where the cursor goes after a refresh: the same change if it survived,
    /// else the working copy, else the first row
    pub fn relocate(&self, change_id: Option<&str>) -> usize {
        change_id
            .and_then(|id| self.find(id))
            .or_else(|| self.working_copy())
            .unwrap_or(0)
    }

    /// Rows drawn as descendants of `index`
    pub fn children(&self, index: usize) -> Vec<&Row> {
        self.children
            .get(&index)
            .map(|ids| ids.iter().filter_map(|i| self.rows.get(*i)).collect())
            .unwrap_or_default()
    }

    /// Rows drawn as ancestors of `index`
    pub fn parents(&self, index: usize) -> Vec<&Row> {
        self.rows
            .get(index)
            .map(|row| {
                row.edges
                    .iter()
                    .filter_map(|e| self.rows.get(e.from))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.rows.iter().flat_map(|r| r.edges.iter())
    }

    pub fn stats(&self) -> DagStats {
        let edges: Vec<&Edge> = self.edges().collect();
        DagStats {
            total_commits: self.rows.len(),
            total_edges: edges.len(),
            indirect_edges: edges.iter().filter(|e| !e.is_direct()).count(),
            merge_commits: self.rows.iter().filter(|r| r.commit.is_merge()).count(),
            immutable_commits: self.rows.iter().filter(|r| r.commit.immutable).count(),
            conflicted_commits: self.rows.iter().filter(|r| r.commit.conflict).count(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DagStats {
    pub total_commits: usize,
    pub total_edges: usize,
    pub indirect_edges: usize,
    pub merge_commits: usize,
    pub immutable_commits: usize,
    pub conflicted_commits: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EdgeType;
    use pretty_assertions::assert_eq;

    fn row(id: &str, working_copy: bool, edges: Vec<Edge>) -> Row {
        Row {
            commit: Commit {
                change_id_short: id[..2].to_string(),
                change_id: id.to_string(),
                is_working_copy: working_copy,
                ..Default::default()
            },
            edges,
            ..Default::default()
        }
    }

    fn sample() -> Dag {
        Dag::new(vec![
            row("zzzzzzzz", false, vec![]),
            row("aaaaaaaa", false, vec![Edge::new(0, 1, EdgeType::Direct)]),
            row("bbbbbbbb", true, vec![Edge::new(1, 2, EdgeType::Indirect)]),
        ])
    }

    #[test]
    fn relocate_prefers_same_change() {
        let dag = sample();
        assert_eq!(dag.relocate(Some("aaaaaaaa")), 1);
        assert_eq!(dag.relocate(Some("aa")), 1);
    }

    #[test]
    fn relocate_falls_back_to_working_copy_then_first() {
        let dag = sample();
        assert_eq!(dag.relocate(Some("gone0000")), 2);
        assert_eq!(dag.relocate(None), 2);

        let without_wc = Dag::new(vec![row("zzzzzzzz", false, vec![])]);
        assert_eq!(without_wc.relocate(Some("gone0000")), 0);
    }

    #[test]
    fn children_and_parents_follow_edges() {
        let dag = sample();
        let children: Vec<&str> = dag.children(1).iter().map(|r| r.change_id()).collect();
        assert_eq!(children, vec!["bbbbbbbb"]);
        let parents: Vec<&str> = dag.parents(1).iter().map(|r| r.change_id()).collect();
        assert_eq!(parents, vec!["zzzzzzzz"]);
    }

    #[test]
    fn stats_count_edges() {
        let stats = sample().stats();
        assert_eq!(stats.total_commits, 3);
        assert_eq!(stats.total_edges, 2);
        assert_eq!(stats.indirect_edges, 1);
    }
}
