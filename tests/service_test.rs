//! End-to-end tests: server and client over a real TCP socket
//!
//! Each test binds an ephemeral port, so tests can run in parallel.

use routegraph::graph::{FrozenGraph, GraphStore};
use routegraph::{ClientError, PathClient, PathServer, ServerConfig};
use std::net::SocketAddr;
use tokio::net::TcpListener;

fn sample_graph() -> FrozenGraph {
    let mut store = GraphStore::new();
    store.add_edge("A", "B", 1).unwrap();
    store.add_edge("B", "C", 2).unwrap();
    store.add_edge("A", "C", 4).unwrap();
    store.add_edge("C", "D", 1).unwrap();
    store.add_edge("X", "Y", 3).unwrap();
    store.freeze()
}

/// Ring of `n` nodes with a few weighted chords
fn ring_graph(n: usize) -> FrozenGraph {
    let mut store = GraphStore::new();
    for i in 0..n {
        store
            .add_edge(format!("r{}", i), format!("r{}", (i + 1) % n), 2)
            .unwrap();
        if i % 5 == 0 {
            store
                .add_edge(format!("r{}", i), format!("r{}", (i + 7) % n), 9)
                .unwrap();
        }
    }
    store.freeze()
}

async fn start(graph: FrozenGraph) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = PathServer::new(ServerConfig::default(), graph);
    tokio::spawn(async move {
        if let Err(e) = server.serve(listener).await {
            eprintln!("server failed: {}", e);
        }
    });
    addr
}

#[tokio::test]
async fn test_shortest_path_over_tcp() {
    let addr = start(sample_graph()).await;
    let mut client = PathClient::connect(addr).await.unwrap();

    assert_eq!(client.ping().await.unwrap(), "PONG");

    let path = client.shortest_path("A", "D").await.unwrap();
    assert_eq!(path, vec!["A", "B", "C", "D"]);

    let (path, weight) = client.shortest_path_weighted("A", "C").await.unwrap();
    assert_eq!(path, vec!["A", "B", "C"]);
    assert_eq!(weight, 3);

    let path = client.shortest_path("B", "B").await.unwrap();
    assert_eq!(path, vec!["B"]);

    assert_eq!(client.info().await.unwrap(), (6, 5));
}

#[tokio::test]
async fn test_errors_are_returned_and_connection_survives() {
    let addr = start(sample_graph()).await;
    let mut client = PathClient::connect(addr).await.unwrap();

    let err = client.shortest_path("D", "A").await.unwrap_err();
    assert_eq!(err.remote_kind(), Some("NOPATH"));

    let err = client.shortest_path("A", "Nowhere").await.unwrap_err();
    assert_eq!(err.remote_kind(), Some("UNKNOWNNODE"));
    assert!(matches!(err, ClientError::Remote { ref message, .. } if message.contains("Nowhere")));

    let err = client.shortest_path("A", "Y").await.unwrap_err();
    assert_eq!(err.remote_kind(), Some("NOPATH"));

    // Same connection still answers
    let path = client.shortest_path("X", "Y").await.unwrap();
    assert_eq!(path, vec!["X", "Y"]);
}

#[tokio::test]
async fn test_unknown_command_is_request_level_error() {
    let addr = start(sample_graph()).await;
    let mut client = PathClient::connect(addr).await.unwrap();

    let err = client
        .request(&routegraph::RespValue::command(["SET", "k", "v"]))
        .await
        .unwrap_err();
    assert_eq!(err.remote_kind(), Some("ERR"));

    assert_eq!(client.ping().await.unwrap(), "PONG");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_clients_match_local_results() {
    const NODES: usize = 40;
    let reference = ring_graph(NODES);
    let addr = start(ring_graph(NODES)).await;

    let mut tasks = Vec::new();
    for worker in 0..16 {
        tasks.push(tokio::spawn(async move {
            let mut client = PathClient::connect(addr).await.unwrap();
            let mut answers = Vec::new();
            for k in 0..NODES {
                let origin = format!("r{}", (worker * 3 + k) % NODES);
                let destination = format!("r{}", (worker * 7 + k * 5) % NODES);
                let (path, weight) = client
                    .shortest_path_weighted(&origin, &destination)
                    .await
                    .unwrap();
                answers.push((origin, destination, path, weight));
            }
            answers
        }));
    }

    for task in tasks {
        for (origin, destination, path, weight) in task.await.unwrap() {
            let expected = reference.shortest_path(&origin, &destination).unwrap();
            let expected_path: Vec<String> =
                expected.path.iter().map(|n| n.as_str().to_string()).collect();
            assert_eq!(path, expected_path);
            assert_eq!(weight, expected.weight);
        }
    }
}

#[tokio::test]
async fn test_client_disconnect_does_not_affect_others() {
    let addr = start(sample_graph()).await;

    {
        let mut short_lived = PathClient::connect(addr).await.unwrap();
        short_lived.ping().await.unwrap();
    }

    let mut client = PathClient::connect(addr).await.unwrap();
    assert_eq!(client.shortest_path("A", "B").await.unwrap(), vec!["A", "B"]);
}
