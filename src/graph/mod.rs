//! Core graph engine
//!
//! This module implements the weighted graph data model with:
//! - Nodes identified by label only, created implicitly by edges
//! - Directed, non-negatively weighted edges
//! - Multiple edges between the same nodes
//! - A load-then-freeze lifecycle: `GraphStore` builds, `FrozenGraph` serves

pub mod loader;
pub mod store;
pub mod types;

// Re-export main types
pub use loader::{load_edges, load_graph_file, parse_edge_line, LoadError, LoadResult};
pub use store::{FrozenGraph, GraphError, GraphResult, GraphStore, ShortestPath};
pub use types::NodeLabel;
