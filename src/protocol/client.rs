//! Remote client for the shortest-path server
//!
//! Keeps one persistent connection and frames replies with the same RESP
//! codec the server uses, so several requests can share a socket.

use crate::protocol::command::{CMD_GRAPH_INFO, CMD_SHORTEST_PATH, CMD_SHORTEST_PATH_WEIGHT};
use crate::protocol::resp::{RespError, RespValue};
use bytes::BytesMut;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::debug;

/// Errors that can occur when talking to a server
#[derive(Error, Debug)]
pub enum ClientError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// RESP framing error
    #[error(transparent)]
    Resp(#[from] RespError),

    /// The server answered with an error reply
    #[error("{kind}: {message}")]
    Remote { kind: String, message: String },

    /// The reply had an unexpected shape
    #[error("unexpected reply: {0:?}")]
    UnexpectedReply(RespValue),

    /// The server closed the connection before replying
    #[error("connection closed by server")]
    ConnectionClosed,
}

impl ClientError {
    /// Error kind tag when the failure came from the server (`UNKNOWNNODE`, `NOPATH`, `ERR`, ...)
    pub fn remote_kind(&self) -> Option<&str> {
        match self {
            ClientError::Remote { kind, .. } => Some(kind.as_str()),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Client connection to a shortest-path server
pub struct PathClient {
    stream: TcpStream,
    buffer: BytesMut,
}

impl PathClient {
    /// Connect to a server
    pub async fn connect(addr: impl ToSocketAddrs) -> ClientResult<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
        })
    }

    /// Send one request and wait for its reply; error replies become `ClientError::Remote`
    pub async fn request(&mut self, request: &RespValue) -> ClientResult<RespValue> {
        self.stream.write_all(&request.to_bytes()).await?;

        loop {
            if let Some(reply) = RespValue::decode(&mut self.buffer)? {
                debug!("Received reply: {:?}", reply);
                return match reply {
                    RespValue::Error(e) => Err(split_error(&e)),
                    other => Ok(other),
                };
            }
            if self.stream.read_buf(&mut self.buffer).await? == 0 {
                return Err(ClientError::ConnectionClosed);
            }
        }
    }

    /// Shortest path from `origin` to `destination` as node labels
    pub async fn shortest_path(&mut self, origin: &str, destination: &str) -> ClientResult<Vec<String>> {
        let reply = self
            .request(&RespValue::command([CMD_SHORTEST_PATH, origin, destination]))
            .await?;
        string_list(reply)
    }

    /// Shortest path plus its total weight
    pub async fn shortest_path_weighted(
        &mut self,
        origin: &str,
        destination: &str,
    ) -> ClientResult<(Vec<String>, u64)> {
        let reply = self
            .request(&RespValue::command([CMD_SHORTEST_PATH_WEIGHT, origin, destination]))
            .await?;

        let (path, weight) = match &reply {
            RespValue::Array(items) if items.len() == 2 => (items[0].clone(), items[1].as_integer().ok()),
            _ => return Err(ClientError::UnexpectedReply(reply)),
        };
        match weight.and_then(|w| u64::try_from(w).ok()) {
            Some(weight) => Ok((string_list(path)?, weight)),
            None => Err(ClientError::UnexpectedReply(reply)),
        }
    }

    /// `(node_count, edge_count)` of the served graph
    pub async fn info(&mut self) -> ClientResult<(u64, u64)> {
        let reply = self.request(&RespValue::command([CMD_GRAPH_INFO])).await?;
        graph_info(reply)
    }

    /// Liveness check, returns the server's answer (`PONG`)
    pub async fn ping(&mut self) -> ClientResult<String> {
        let reply = self.request(&RespValue::command(["PING"])).await?;
        match reply.as_string() {
            Ok(Some(s)) => Ok(s),
            _ => Err(ClientError::UnexpectedReply(reply)),
        }
    }
}

/// `"KIND message"` -> `ClientError::Remote`
fn split_error(raw: &str) -> ClientError {
    let (kind, message) = raw.split_once(' ').unwrap_or((raw, ""));
    ClientError::Remote {
        kind: kind.to_string(),
        message: message.to_string(),
    }
}

fn graph_info(reply: RespValue) -> ClientResult<(u64, u64)> {
    let counts = match &reply {
        RespValue::Array(items) => match items.as_slice() {
            [RespValue::Integer(nodes), RespValue::Integer(edges)] => {
                u64::try_from(*nodes).ok().zip(u64::try_from(*edges).ok())
            }
            _ => None,
        },
        _ => None,
    };
    counts.ok_or(ClientError::UnexpectedReply(reply))
}

fn string_list(reply: RespValue) -> ClientResult<Vec<String>> {
    let items = match &reply {
        RespValue::Array(items) => items,
        _ => return Err(ClientError::UnexpectedReply(reply)),
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item.as_string()? {
            Some(s) => out.push(s),
            None => return Err(ClientError::UnexpectedReply(reply.clone())),
        }
    }
    Ok(out)
}
