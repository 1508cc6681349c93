//! Graph algorithms module
//!
//! Algorithms are implemented in the `routegraph-algorithms` crate over dense
//! node indices. This module is the adapter layer: it resolves labels to
//! indices, runs the search, and maps the result back to labels and typed errors.

use crate::graph::{FrozenGraph, GraphError, GraphResult, NodeLabel, ShortestPath};

pub use routegraph_algorithms::{dijkstra, GraphView, NodeIndex, PathResult, Weight};

/// Run Dijkstra between two labelled nodes of a frozen graph
pub fn shortest_path(graph: &FrozenGraph, origin: &str, destination: &str) -> GraphResult<ShortestPath> {
    let source = graph
        .index_of(origin)
        .ok_or_else(|| GraphError::UnknownNode(NodeLabel::new(origin)))?;
    let target = graph
        .index_of(destination)
        .ok_or_else(|| GraphError::UnknownNode(NodeLabel::new(destination)))?;

    let result = dijkstra(graph.view(), source, target).ok_or_else(|| GraphError::NoPathFound {
        origin: NodeLabel::new(origin),
        destination: NodeLabel::new(destination),
    })?;

    let path = result
        .path
        .iter()
        .filter_map(|&idx| graph.label_at(idx).cloned())
        .collect();

    Ok(ShortestPath {
        path,
        weight: result.cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphStore;

    fn build(edges: &[(&str, &str, i64)]) -> FrozenGraph {
        let mut store = GraphStore::new();
        for &(u, v, w) in edges {
            store.add_edge(u, v, w).unwrap();
        }
        store.freeze()
    }

    fn labels(result: &ShortestPath) -> Vec<&str> {
        result.path.iter().map(NodeLabel::as_str).collect()
    }

    #[test]
    fn test_indirect_route_beats_direct_edge() {
        let graph = build(&[("A", "B", 1), ("B", "C", 2), ("A", "C", 4)]);
        let result = graph.shortest_path("A", "C").unwrap();
        assert_eq!(labels(&result), vec!["A", "B", "C"]);
        assert_eq!(result.weight, 3);
    }

    #[test]
    fn test_reverse_direction_has_no_path() {
        let graph = build(&[("A", "B", 5)]);
        let err = graph.shortest_path("B", "A").unwrap_err();
        assert_eq!(
            err,
            GraphError::NoPathFound { origin: "B".into(), destination: "A".into() }
        );
    }

    #[test]
    fn test_empty_graph_unknown_node() {
        let graph = GraphStore::new().freeze();
        let err = graph.shortest_path("A", "B").unwrap_err();
        assert_eq!(err, GraphError::UnknownNode("A".into()));
    }

    #[test]
    fn test_unknown_destination() {
        let graph = build(&[("A", "B", 1)]);
        let err = graph.shortest_path("A", "Z").unwrap_err();
        assert_eq!(err, GraphError::UnknownNode("Z".into()));
    }

    #[test]
    fn test_parallel_edges() {
        let graph = build(&[("A", "B", 1), ("A", "B", 3)]);
        let result = graph.shortest_path("A", "B").unwrap();
        assert_eq!(labels(&result), vec!["A", "B"]);
        assert_eq!(result.weight, 1);
    }

    #[test]
    fn test_self_path() {
        let graph = build(&[("A", "B", 1)]);
        for node in ["A", "B"] {
            let result = graph.shortest_path(node, node).unwrap();
            assert_eq!(labels(&result), vec![node]);
            assert_eq!(result.weight, 0);
        }
    }

    #[test]
    fn test_self_loop_is_ignored_for_self_path() {
        let graph = build(&[("A", "A", 9)]);
        let result = graph.shortest_path("A", "A").unwrap();
        assert_eq!(labels(&result), vec!["A"]);
        assert_eq!(result.weight, 0);
    }

    #[test]
    fn test_repeated_queries_are_identical() {
        let graph = build(&[
            ("A", "B", 1), ("A", "C", 1), ("B", "D", 1), ("C", "D", 1), ("D", "E", 2),
        ]);
        let first = graph.shortest_path("A", "E").unwrap();
        for _ in 0..10 {
            assert_eq!(graph.shortest_path("A", "E").unwrap(), first);
        }
        assert_eq!(labels(&first), vec!["A", "B", "D", "E"]);
    }
}
