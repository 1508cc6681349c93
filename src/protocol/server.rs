//! RESP protocol server
//!
//! One tokio task per accepted connection. The graph is shared between tasks
//! as an `Arc<FrozenGraph>` without any lock: it was fully built before the
//! first connection was accepted and nothing writes to it afterwards.

use crate::config::ServerConfig;
use crate::graph::FrozenGraph;
use crate::protocol::command::CommandHandler;
use crate::protocol::resp::{RespDecoder, RespError, RespResult, RespValue};
use bytes::BytesMut;
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

/// Shortest-path query server
pub struct PathServer {
    /// Server configuration
    config: ServerConfig,
    /// Command handler, owns the graph
    handler: Arc<CommandHandler>,
}

impl PathServer {
    /// Create a server that exclusively owns `graph` for the rest of its life
    pub fn new(config: ServerConfig, graph: FrozenGraph) -> Self {
        Self {
            config,
            handler: Arc::new(CommandHandler::new(Arc::new(graph))),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn graph(&self) -> &FrozenGraph {
        self.handler.graph()
    }

    /// Accept connections on `listener` indefinitely
    pub async fn serve(&self, listener: TcpListener) -> io::Result<()> {
        self.serve_until(listener, std::future::pending::<()>()).await
    }

    /// Accept connections on `listener` until `shutdown` resolves.
    ///
    /// Connections already accepted keep running on their own tasks.
    pub async fn serve_until<F>(&self, listener: TcpListener, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let accepted = tokio::select! {
                accepted = listener.accept() => accepted,
                _ = &mut shutdown => {
                    info!("Shutting down listener");
                    return Ok(());
                }
            };

            let (socket, peer_addr) = match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    // Typically out of file descriptors; back off instead of spinning
                    warn!("Failed to accept connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    continue;
                }
            };
            debug!("New connection from {}", peer_addr);

            let handler = Arc::clone(&self.handler);
            let max_frame_bytes = self.config.max_frame_bytes;

            // Spawn a new task for each connection
            tokio::spawn(async move {
                match handle_connection(socket, handler, max_frame_bytes).await {
                    Ok(()) => debug!("Connection from {} closed", peer_addr),
                    Err(e) => error!("Error handling connection from {}: {}", peer_addr, e),
                }
            });
        }
    }
}

/// Serve a single client connection until it closes or fails
async fn handle_connection(
    mut socket: TcpStream,
    handler: Arc<CommandHandler>,
    max_frame_bytes: usize,
) -> RespResult<()> {
    let mut buffer = BytesMut::with_capacity(4096);
    let mut out = BytesMut::with_capacity(4096);
    let mut decoder = RespDecoder::new();

    loop {
        let n = socket.read_buf(&mut buffer).await?;
        if n == 0 {
            if !buffer.is_empty() {
                debug!("Client closed with {} unparsed bytes", buffer.len());
            }
            return Ok(());
        }

        // Answer every complete request in the buffer, in arrival order
        loop {
            match decoder.decode(&mut buffer) {
                Ok(Some(request)) => handler.handle_command(&request).encode(&mut out),
                Ok(None) => break,
                Err(e) => {
                    // The stream cannot be re-framed after a protocol error
                    warn!("Protocol error: {}", e);
                    RespValue::Error(format!("ERR {}", e)).encode(&mut out);
                    socket.write_all(&out).await?;
                    return Err(e);
                }
            }
        }

        if !out.is_empty() {
            socket.write_all(&out).await?;
            out.clear();
        }

        if buffer.len() > max_frame_bytes {
            let e = RespError::Protocol(format!(
                "request exceeds {} bytes",
                max_frame_bytes
            ));
            RespValue::Error(format!("ERR {}", e)).encode(&mut out);
            socket.write_all(&out).await?;
            return Err(e);
        }
    }
}
