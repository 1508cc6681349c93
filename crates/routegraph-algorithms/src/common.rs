//! Shared graph representation for path algorithms
//!
//! Provides a read-only, dense view of the graph topology. Nodes are plain
//! indices `0..node_count`; mapping them back to labels is the caller's job.

/// Dense node index into a [`GraphView`]
pub type NodeIndex = usize;

/// Edge weight. Negative weights are rejected before they reach the view.
pub type Weight = u64;

/// A dense, integer-indexed view of a directed graph in Compressed Sparse Row (CSR) format.
///
/// Outgoing edges of every node keep the order in which they were inserted,
/// which is what makes tie-breaking in [`crate::dijkstra`] reproducible.
#[derive(Debug, Clone, Default)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,

    /// Offsets into `out_targets`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<NodeIndex>,
    /// Edge weights, aligned with `out_targets`
    pub weights: Vec<Weight>,
}

impl GraphView {
    /// Total number of edges (parallel edges counted individually)
    pub fn edge_count(&self) -> usize {
        self.out_targets.len()
    }

    /// Whether `idx` names a node of this view
    pub fn contains(&self, idx: NodeIndex) -> bool {
        idx < self.node_count
    }

    /// Get the out-degree of a node
    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.out_targets[self.out_offsets[idx]..self.out_offsets[idx + 1]]
    }

    /// Get weights for outgoing edges of a node, aligned with [`Self::successors`]
    pub fn weights(&self, idx: NodeIndex) -> &[Weight] {
        &self.weights[self.out_offsets[idx]..self.out_offsets[idx + 1]]
    }

    /// Iterate `(target, weight)` pairs of a node's outgoing edges in insertion order
    pub fn out_edges(&self, idx: NodeIndex) -> impl Iterator<Item = (NodeIndex, Weight)> + '_ {
        self.successors(idx)
            .iter()
            .copied()
            .zip(self.weights(idx).iter().copied())
    }

    /// Flatten per-node adjacency lists into CSR form.
    ///
    /// `outgoing[i]` holds the `(target, weight)` edges of node `i`; the
    /// number of lists fixes `node_count`.
    pub fn from_adjacency_list(outgoing: Vec<Vec<(NodeIndex, Weight)>>) -> Self {
        let node_count = outgoing.len();
        let edge_total: usize = outgoing.iter().map(Vec::len).sum();

        let mut out_offsets = Vec::with_capacity(node_count + 1);
        let mut out_targets = Vec::with_capacity(edge_total);
        let mut weights = Vec::with_capacity(edge_total);

        out_offsets.push(0);
        for edges in outgoing {
            for (target, weight) in edges {
                debug_assert!(target < node_count, "edge target {} out of range", target);
                out_targets.push(target);
                weights.push(weight);
            }
            out_offsets.push(out_targets.len());
        }

        GraphView {
            node_count,
            out_offsets,
            out_targets,
            weights,
        }
    }
}
