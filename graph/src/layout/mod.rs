pub mod row_builder;

pub use row_builder::{build_dag, build_rows, RowBuilder, CONNECTOR_GLYPHS, NODE_GLYPHS};
