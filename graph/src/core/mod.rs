pub mod commit;
pub mod dag;
pub mod edge;
pub mod row;

pub use commit::{Commit, ROOT_CHANGE_ID};
pub use dag::{Dag, DagStats};
pub use edge::{Edge, EdgeType};
pub use row::Row;
