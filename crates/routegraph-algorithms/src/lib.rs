//! Shortest-path algorithms for routegraph
//!
//! Operates on [`GraphView`], a label-free CSR snapshot of a directed,
//! non-negatively weighted graph.

pub mod common;
pub mod pathfinding;

pub use common::{GraphView, NodeIndex, Weight};
pub use pathfinding::{dijkstra, PathResult};
