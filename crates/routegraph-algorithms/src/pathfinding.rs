//! Weighted shortest path (Dijkstra)

use super::common::{GraphView, NodeIndex, Weight};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Result of a pathfinding algorithm
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathResult {
    pub source: NodeIndex,
    pub target: NodeIndex,
    /// Nodes from `source` to `target`, both inclusive
    pub path: Vec<NodeIndex>,
    /// Sum of the edge weights along `path`
    pub cost: Weight,
}

/// Frontier entry for the Dijkstra priority queue
#[derive(Copy, Clone, PartialEq, Eq)]
struct State {
    cost: Weight,
    /// Push order, breaks cost ties first-in first-out
    seq: u64,
    node_idx: NodeIndex,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on both keys: BinaryHeap is a max-heap
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra's Algorithm (Weighted Shortest Path)
///
/// Returns `None` when either index is outside the view or when `target`
/// is unreachable from `source`. `source == target` yields a single-node
/// path of cost 0.
///
/// The result is deterministic for a fixed view: outgoing edges are
/// relaxed in insertion order, a predecessor is only replaced by a
/// strictly cheaper one, and equal-cost frontier entries pop in the order
/// they were pushed.
pub fn dijkstra(view: &GraphView, source: NodeIndex, target: NodeIndex) -> Option<PathResult> {
    if !view.contains(source) || !view.contains(target) {
        return None;
    }

    let n = view.node_count;
    let mut dist: Vec<Option<Weight>> = vec![None; n];
    let mut parent: Vec<Option<NodeIndex>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;

    dist[source] = Some(0);
    heap.push(State { cost: 0, seq, node_idx: source });

    while let Some(State { cost, node_idx, .. }) = heap.pop() {
        if settled[node_idx] {
            continue;
        }
        settled[node_idx] = true;

        if node_idx == target {
            return Some(PathResult {
                source,
                target,
                path: reconstruct(&parent, source, target),
                cost,
            });
        }

        for (next_idx, weight) in view.out_edges(node_idx) {
            if settled[next_idx] {
                continue;
            }

            let next_cost = cost.saturating_add(weight);
            let improves = match dist[next_idx] {
                Some(known) => next_cost < known,
                None => true,
            };

            if improves {
                dist[next_idx] = Some(next_cost);
                parent[next_idx] = Some(node_idx);
                seq += 1;
                heap.push(State { cost: next_cost, seq, node_idx: next_idx });
            }
        }
    }

    None
}

/// Walk predecessors from `target` back to `source`, then reverse.
fn reconstruct(parent: &[Option<NodeIndex>], source: NodeIndex, target: NodeIndex) -> Vec<NodeIndex> {
    let mut path = vec![target];
    let mut curr = target;
    while curr != source {
        match parent[curr] {
            Some(prev) => {
                path.push(prev);
                curr = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
