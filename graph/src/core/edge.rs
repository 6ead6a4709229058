/// A connection between two rows of one snapshot, by row index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Older row (drawn closer to the root)
    pub from: usize,
    /// Newer row the connection leads into
    pub to: usize,
    pub edge_type: EdgeType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeType {
    /// Every parent of the newer row is shown
    Direct,
    /// The connection skips revisions the revset filtered out
    Indirect,
}

impl Edge {
    pub fn new(from: usize, to: usize, edge_type: EdgeType) -> Self {
        Self { from, to, edge_type }
    }

    pub fn is_direct(&self) -> bool {
        self.edge_type == EdgeType::Direct
    }
}
