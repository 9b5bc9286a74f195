pub mod browser;
pub mod force_graph;
pub mod svg;
pub mod tree_graph;
