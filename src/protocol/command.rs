//! Command handler for shortest-path requests
//!
//! Supported commands:
//! - `SHORTESTPATH origin destination` -> array of node labels
//! - `SHORTESTPATH.WEIGHT origin destination` -> [array of node labels, total weight]
//! - `GRAPH.INFO` -> [node count, edge count]
//! - `PING [message]`, `ECHO message`
//!
//! Engine failures are returned as tagged RESP errors (`-UNKNOWNNODE ...`,
//! `-NOPATH ...`); they never close the connection.

use crate::graph::{FrozenGraph, GraphResult, NodeLabel, ShortestPath};
use crate::protocol::resp::RespValue;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

pub const CMD_SHORTEST_PATH: &str = "SHORTESTPATH";
pub const CMD_SHORTEST_PATH_WEIGHT: &str = "SHORTESTPATH.WEIGHT";
pub const CMD_GRAPH_INFO: &str = "GRAPH.INFO";

/// A shortest-path query as it arrives from a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPathRequest {
    pub origin: NodeLabel,
    pub destination: NodeLabel,
}

/// Successful reply to a [`ShortestPathRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPathReply {
    pub path: Vec<NodeLabel>,
    pub weight: u64,
}

impl From<ShortestPath> for ShortestPathReply {
    fn from(sp: ShortestPath) -> Self {
        Self {
            path: sp.path,
            weight: sp.weight,
        }
    }
}

impl ShortestPathReply {
    fn path_value(&self) -> RespValue {
        RespValue::Array(
            self.path
                .iter()
                .map(|n| RespValue::bulk(n.as_str().as_bytes()))
                .collect(),
        )
    }
}

/// Command handler wrapping the frozen graph engine
pub struct CommandHandler {
    graph: Arc<FrozenGraph>,
}

impl CommandHandler {
    /// Create a new command handler
    pub fn new(graph: Arc<FrozenGraph>) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &FrozenGraph {
        &self.graph
    }

    /// Run a shortest-path query against the engine
    pub fn handle_shortest_path(&self, request: &ShortestPathRequest) -> GraphResult<ShortestPathReply> {
        self.graph
            .shortest_path(request.origin.as_str(), request.destination.as_str())
            .map(ShortestPathReply::from)
    }

    /// Handle a RESP command
    pub fn handle_command(&self, value: &RespValue) -> RespValue {
        // Parse command from RESP array
        let args = match value.as_array() {
            Ok(arr) => arr,
            Err(e) => return RespValue::Error(format!("ERR {}", e)),
        };

        if args.is_empty() {
            return RespValue::Error("ERR empty command".to_string());
        }

        let cmd_name = match args[0].as_string() {
            Ok(Some(s)) => s.to_uppercase(),
            Ok(None) => return RespValue::Error("ERR null command".to_string()),
            Err(e) => return RespValue::Error(format!("ERR {}", e)),
        };

        debug!("Received command: {}", cmd_name);

        match cmd_name.as_str() {
            CMD_SHORTEST_PATH => self.shortest_path_command(&cmd_name, args, false),
            CMD_SHORTEST_PATH_WEIGHT => self.shortest_path_command(&cmd_name, args, true),
            CMD_GRAPH_INFO => self.handle_info(),
            "PING" => self.handle_ping(args),
            "ECHO" => self.handle_echo(args),
            _ => RespValue::Error(format!("ERR unknown command '{}'", cmd_name)),
        }
    }

    /// Format: SHORTESTPATH origin destination
    fn shortest_path_command(&self, cmd_name: &str, args: &[RespValue], with_weight: bool) -> RespValue {
        if args.len() != 3 {
            return wrong_arity(cmd_name);
        }

        let request = match (args[1].as_string(), args[2].as_string()) {
            (Ok(Some(origin)), Ok(Some(destination))) => ShortestPathRequest {
                origin: origin.into(),
                destination: destination.into(),
            },
            (Err(e), _) | (_, Err(e)) => return RespValue::Error(format!("ERR {}", e)),
            _ => return RespValue::Error("ERR null node label".to_string()),
        };

        match self.handle_shortest_path(&request) {
            Ok(reply) if with_weight => RespValue::Array(vec![
                reply.path_value(),
                RespValue::Integer(i64::try_from(reply.weight).unwrap_or(i64::MAX)),
            ]),
            Ok(reply) => reply.path_value(),
            Err(e) => {
                debug!("Query {} -> {} failed: {}", request.origin, request.destination, e);
                RespValue::error(e.kind(), e)
            }
        }
    }

    /// Handle GRAPH.INFO command
    fn handle_info(&self) -> RespValue {
        RespValue::Array(vec![
            RespValue::Integer(self.graph.node_count() as i64),
            RespValue::Integer(self.graph.edge_count() as i64),
        ])
    }

    /// Handle PING command
    fn handle_ping(&self, args: &[RespValue]) -> RespValue {
        match args.get(1) {
            // PING with message - echo it back
            Some(msg) => match msg.as_string() {
                Ok(Some(s)) => RespValue::bulk(s),
                Ok(None) => RespValue::BulkString(None),
                Err(e) => RespValue::Error(format!("ERR {}", e)),
            },
            None => RespValue::SimpleString("PONG".to_string()),
        }
    }

    /// Handle ECHO command
    fn handle_echo(&self, args: &[RespValue]) -> RespValue {
        if args.len() != 2 {
            return wrong_arity("ECHO");
        }
        match &args[1] {
            RespValue::BulkString(data) => RespValue::BulkString(data.clone()),
            other => RespValue::Error(format!("ERR expected bulk string, got {:?}", other)),
        }
    }
}

fn wrong_arity(cmd_name: &str) -> RespValue {
    RespValue::Error(format!(
        "ERR wrong number of arguments for '{}' command",
        cmd_name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphStore;

    fn handler(edges: &[(&str, &str, i64)]) -> CommandHandler {
        let mut store = GraphStore::new();
        for &(u, v, w) in edges {
            store.add_edge(u, v, w).unwrap();
        }
        CommandHandler::new(Arc::new(store.freeze()))
    }

    fn path(nodes: &[&str]) -> RespValue {
        RespValue::Array(nodes.iter().map(|n| RespValue::bulk(*n)).collect())
    }

    #[test]
    fn test_ping() {
        let handler = handler(&[]);
        let response = handler.handle_command(&RespValue::command(["PING"]));
        assert_eq!(response, RespValue::SimpleString("PONG".to_string()));

        let response = handler.handle_command(&RespValue::command(["ping", "hi"]));
        assert_eq!(response, RespValue::bulk("hi"));
    }

    #[test]
    fn test_echo() {
        let handler = handler(&[]);
        let response = handler.handle_command(&RespValue::command(["ECHO", "hello"]));
        assert_eq!(response, RespValue::bulk("hello"));
    }

    #[test]
    fn test_shortest_path() {
        let handler = handler(&[("A", "B", 1), ("B", "C", 2), ("A", "C", 4)]);
        let response = handler.handle_command(&RespValue::command(["SHORTESTPATH", "A", "C"]));
        assert_eq!(response, path(&["A", "B", "C"]));
    }

    #[test]
    fn test_shortest_path_with_weight() {
        let handler = handler(&[("A", "B", 1), ("B", "C", 2), ("A", "C", 4)]);
        let response = handler.handle_command(&RespValue::command(["SHORTESTPATH.WEIGHT", "A", "C"]));
        assert_eq!(
            response,
            RespValue::Array(vec![path(&["A", "B", "C"]), RespValue::Integer(3)])
        );
    }

    #[test]
    fn test_engine_errors_are_tagged() {
        let handler = handler(&[("A", "B", 5)]);

        let response = handler.handle_command(&RespValue::command(["SHORTESTPATH", "B", "A"]));
        assert_eq!(response, RespValue::Error("NOPATH no path from 'B' to 'A'".to_string()));

        let response = handler.handle_command(&RespValue::command(["SHORTESTPATH", "A", "Q"]));
        assert_eq!(response, RespValue::Error("UNKNOWNNODE node 'Q' not found".to_string()));
    }

    #[test]
    fn test_wrong_arity() {
        let handler = handler(&[("A", "B", 5)]);
        let response = handler.handle_command(&RespValue::command(["SHORTESTPATH", "A"]));
        assert_eq!(
            response,
            RespValue::Error("ERR wrong number of arguments for 'SHORTESTPATH' command".to_string())
        );
    }

    #[test]
    fn test_unknown_and_malformed_commands() {
        let handler = handler(&[]);
        let response = handler.handle_command(&RespValue::command(["FLUSHALL"]));
        assert_eq!(response, RespValue::Error("ERR unknown command 'FLUSHALL'".to_string()));

        let response = handler.handle_command(&RespValue::Integer(3));
        assert!(matches!(response, RespValue::Error(ref e) if e.starts_with("ERR")));

        let response = handler.handle_command(&RespValue::Array(vec![]));
        assert_eq!(response, RespValue::Error("ERR empty command".to_string()));
    }

    #[test]
    fn test_graph_info() {
        let handler = handler(&[("A", "B", 1), ("A", "B", 2), ("B", "C", 1)]);
        let response = handler.handle_command(&RespValue::command(["GRAPH.INFO"]));
        assert_eq!(
            response,
            RespValue::Array(vec![RespValue::Integer(3), RespValue::Integer(3)])
        );
    }

    #[test]
    fn test_typed_request() {
        let handler = handler(&[("A", "B", 1), ("A", "B", 3)]);
        let reply = handler
            .handle_shortest_path(&ShortestPathRequest { origin: "A".into(), destination: "B".into() })
            .unwrap();
        assert_eq!(reply.path, vec![NodeLabel::new("A"), NodeLabel::new("B")]);
        assert_eq!(reply.weight, 1);
    }
}
