//! Routegraph
//!
//! A network service answering shortest-path queries over a static, weighted,
//! directed graph that is loaded once at startup.
//!
//! # Architecture
//!
//! - `graph`: label-addressed graph store, edge-list loader, frozen engine
//! - `algo`: adapter onto the `routegraph-algorithms` Dijkstra implementation
//! - `protocol`: RESP codec, command dispatch, TCP server and client
//! - `config`: environment-driven server configuration
//!
//! The graph goes through two phases. While loading it is a mutable
//! [`GraphStore`]; [`GraphStore::freeze`] turns it into a read-only
//! [`FrozenGraph`] which the [`PathServer`] shares between connections
//! without locking.
//!
//! ## Example Usage
//!
//! ```rust
//! use routegraph::graph::{GraphError, GraphStore};
//!
//! let mut store = GraphStore::new();
//! store.add_edge("A", "B", 1).unwrap();
//! store.add_edge("B", "C", 2).unwrap();
//! store.add_edge("A", "C", 4).unwrap();
//!
//! let graph = store.freeze();
//! let result = graph.shortest_path("A", "C").unwrap();
//! let labels: Vec<&str> = result.path.iter().map(|n| n.as_str()).collect();
//! assert_eq!(labels, vec!["A", "B", "C"]);
//! assert_eq!(result.weight, 3);
//!
//! // Edges are directed
//! assert!(matches!(
//!     graph.shortest_path("C", "A"),
//!     Err(GraphError::NoPathFound { .. })
//! ));
//! ```

#![warn(clippy::all)]

pub mod algo;
pub mod config;
pub mod graph;
pub mod protocol;

// Re-export main types for convenience
pub use config::{ConfigError, ServerConfig};

pub use graph::{
    load_graph_file, FrozenGraph, GraphError, GraphResult, GraphStore, LoadError, NodeLabel,
    ShortestPath,
};

pub use protocol::{
    ClientError, CommandHandler, PathClient, PathServer, RespValue, ShortestPathReply,
    ShortestPathRequest,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
