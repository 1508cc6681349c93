//! Loading graphs from edge-list files

use routegraph::graph::{load_graph_file, LoadError};
use std::io::Write;
use tempfile::NamedTempFile;

fn graph_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_and_query() {
    let file = graph_file("A B 1\nB C 2\nA C 4\n");
    let graph = load_graph_file(file.path()).unwrap();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 3);

    let result = graph.shortest_path("A", "C").unwrap();
    assert_eq!(result.weight, 3);
    assert_eq!(result.path.len(), 3);
}

#[test]
fn test_file_without_trailing_newline() {
    let file = graph_file("A B 1\nB C 2");
    let graph = load_graph_file(file.path()).unwrap();
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn test_non_numeric_weight_aborts_load() {
    let file = graph_file("A B 1\nX Y notanumber\n");
    let err = load_graph_file(file.path()).unwrap_err();

    assert!(matches!(err, LoadError::InvalidWeight { line: 2, .. }));
    assert_eq!(err.to_string(), "line 2: invalid weight 'notanumber'");
}

#[test]
fn test_short_line_aborts_load() {
    let file = graph_file("A B 1\nC D\n");
    let err = load_graph_file(file.path()).unwrap_err();
    assert!(matches!(err, LoadError::MalformedInput { line: 2, tokens: 2 }));
}

#[test]
fn test_empty_file_gives_empty_graph() {
    let file = graph_file("");
    let graph = load_graph_file(file.path()).unwrap();
    assert_eq!(graph.node_count(), 0);
    assert!(graph.shortest_path("A", "B").is_err());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_graph_file(dir.path().join("graph.txt")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}
