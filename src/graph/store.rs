//! In-memory graph storage
//!
//! Two phases, enforced by ownership:
//! - [`GraphStore`] is the append-only builder used while the edge list is loaded
//! - [`FrozenGraph`] is the read-only engine handed to the query service
//!
//! `GraphStore::freeze` consumes the builder, so once a graph is being served
//! nothing can write to it anymore.

use super::types::NodeLabel;
use indexmap::IndexSet;
use routegraph_algorithms::{GraphView, NodeIndex, Weight};
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label interner: the position of a label in the set is its dense node index
type LabelIndex = IndexSet<NodeLabel, FxBuildHasher>;

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("node '{0}' not found")]
    UnknownNode(NodeLabel),

    #[error("no path from '{origin}' to '{destination}'")]
    NoPathFound {
        origin: NodeLabel,
        destination: NodeLabel,
    },

    #[error("invalid weight {0}: edge weights must be non-negative")]
    InvalidWeight(i64),
}

impl GraphError {
    /// Stable tag identifying the error kind on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            GraphError::UnknownNode(_) => "UNKNOWNNODE",
            GraphError::NoPathFound { .. } => "NOPATH",
            GraphError::InvalidWeight(_) => "INVALIDWEIGHT",
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

/// A minimum-weight path between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPath {
    /// Nodes from origin to destination, both inclusive
    pub path: Vec<NodeLabel>,
    /// Total weight of the edges along `path`
    pub weight: Weight,
}

/// Append-only graph builder
///
/// - nodes: NodeLabel <-> dense index (insertion order)
/// - outgoing: per-node adjacency list of `(target, weight)` in insertion order
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: LabelIndex,
    outgoing: Vec<Vec<(NodeIndex, Weight)>>,
    edge_count: usize,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a directed edge `origin -> destination`.
    ///
    /// Unseen endpoints are created. Re-adding an identical edge creates a
    /// parallel edge; it does not overwrite. Negative weights are rejected
    /// before anything is inserted.
    pub fn add_edge(
        &mut self,
        origin: impl Into<NodeLabel>,
        destination: impl Into<NodeLabel>,
        weight: i64,
    ) -> GraphResult<()> {
        let weight = Weight::try_from(weight).map_err(|_| GraphError::InvalidWeight(weight))?;

        let from = self.intern(origin.into());
        let to = self.intern(destination.into());
        self.outgoing[from].push((to, weight));
        self.edge_count += 1;
        Ok(())
    }

    fn intern(&mut self, label: NodeLabel) -> NodeIndex {
        let (idx, inserted) = self.nodes.insert_full(label);
        if inserted {
            self.outgoing.push(Vec::new());
        }
        idx
    }

    pub fn contains(&self, label: &str) -> bool {
        self.nodes.contains(label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Finish loading: flatten adjacency into CSR and return the read-only engine
    pub fn freeze(self) -> FrozenGraph {
        FrozenGraph {
            view: GraphView::from_adjacency_list(self.outgoing),
            nodes: self.nodes,
        }
    }
}

/// Read-only graph engine
///
/// Only exposes `&self` methods and owns no interior mutability, so an
/// `Arc<FrozenGraph>` can serve any number of concurrent queries without a lock.
#[derive(Debug, Default)]
pub struct FrozenGraph {
    nodes: LabelIndex,
    view: GraphView,
}

impl FrozenGraph {
    /// Minimum total-weight path from `origin` to `destination`
    ///
    /// Fails with `UnknownNode` if either endpoint was never inserted and with
    /// `NoPathFound` if no directed walk connects them.
    pub fn shortest_path(&self, origin: &str, destination: &str) -> GraphResult<ShortestPath> {
        crate::algo::shortest_path(self, origin, destination)
    }

    /// Dense index of a label, if the node exists
    pub fn index_of(&self, label: &str) -> Option<NodeIndex> {
        self.nodes.get_index_of(label)
    }

    /// Label at a dense index
    pub fn label_at(&self, idx: NodeIndex) -> Option<&NodeLabel> {
        self.nodes.get_index(idx)
    }

    pub fn view(&self) -> &GraphView {
        &self.view
    }

    pub fn contains(&self, label: &str) -> bool {
        self.nodes.contains(label)
    }

    pub fn node_count(&self) -> usize {
        self.view.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.view.edge_count()
    }

    /// All node labels, in first-seen order
    pub fn labels(&self) -> impl Iterator<Item = &NodeLabel> {
        self.nodes.iter()
    }
}
