//! Network protocol module
//!
//! Serves shortest-path queries over RESP (Redis Serialization Protocol):
//! - `resp`: wire codec
//! - `command`: request dispatch to the graph engine
//! - `server`: TCP accept loop, one task per connection
//! - `client`: persistent-connection client

pub mod client;
pub mod command;
pub mod resp;
pub mod server;

// Re-export main types
pub use client::{ClientError, ClientResult, PathClient};
pub use command::{CommandHandler, ShortestPathReply, ShortestPathRequest};
pub use resp::{RespDecoder, RespError, RespResult, RespValue};
pub use server::PathServer;
