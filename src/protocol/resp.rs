//! RESP (Redis Serialization Protocol) codec
//!
//! Only the RESP2 types the query service needs: simple strings, errors,
//! integers, bulk strings and arrays.
//!
//! Decoding never consumes a partial frame: the buffer is only advanced once
//! a complete value has been parsed, so callers can keep appending socket
//! reads to the same buffer and retry. A [`RespDecoder`] kept across retries
//! remembers how far it got, so already-scanned bytes are not parsed again.

use bytes::{Buf, BufMut, BytesMut};
use std::io;
use thiserror::Error;

/// Upper bound for a single bulk string
const MAX_BULK_LEN: usize = 512 * 1024 * 1024;

/// Upper bound for the element count of a single array
const MAX_ARRAY_LEN: usize = 1024 * 1024;

/// Deepest array nesting accepted; requests are flat arrays
const MAX_DEPTH: usize = 8;

/// RESP protocol errors
#[derive(Error, Debug)]
pub enum RespError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Protocol parsing error
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Invalid encoding
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
}

pub type RespResult<T> = Result<T, RespError>;

/// RESP value types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespValue {
    /// Simple string: +OK\r\n
    SimpleString(String),
    /// Error: -KIND message\r\n
    Error(String),
    /// Integer: :1000\r\n
    Integer(i64),
    /// Bulk string: $6\r\nfoobar\r\n (or $-1\r\n for null)
    BulkString(Option<Vec<u8>>),
    /// Array: *2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n
    Array(Vec<RespValue>),
}

impl RespValue {
    /// Bulk string from anything byte-like
    pub fn bulk(data: impl Into<Vec<u8>>) -> Self {
        RespValue::BulkString(Some(data.into()))
    }

    /// Error reply tagged with a kind: `-KIND message`
    pub fn error(kind: &str, message: impl std::fmt::Display) -> Self {
        RespValue::Error(format!("{} {}", kind, message))
    }

    /// A request as clients send it: an array of bulk strings
    pub fn command<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        RespValue::Array(
            parts
                .into_iter()
                .map(|p| RespValue::bulk(p.as_ref().as_bytes()))
                .collect(),
        )
    }

    /// Append the wire form of this value to `buf`
    pub fn encode(&self, buf: &mut BytesMut) {
        match self {
            RespValue::SimpleString(s) => put_line(buf, b'+', s.as_bytes()),
            RespValue::Error(e) => put_line(buf, b'-', e.as_bytes()),
            RespValue::Integer(i) => put_line(buf, b':', i.to_string().as_bytes()),
            RespValue::BulkString(None) => buf.put_slice(b"$-1\r\n"),
            RespValue::BulkString(Some(data)) => {
                put_line(buf, b'$', data.len().to_string().as_bytes());
                buf.put_slice(data);
                buf.put_slice(b"\r\n");
            }
            RespValue::Array(items) => {
                put_line(buf, b'*', items.len().to_string().as_bytes());
                for item in items {
                    item.encode(buf);
                }
            }
        }
    }

    /// Wire form as an owned buffer
    pub fn to_bytes(&self) -> BytesMut {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf
    }

    /// Take one complete value off the front of `buf`.
    ///
    /// Returns `Ok(None)` and leaves `buf` untouched when more data is needed.
    pub fn decode(buf: &mut BytesMut) -> RespResult<Option<RespValue>> {
        RespDecoder::new().decode(buf)
    }

    /// Convert to array or error
    pub fn as_array(&self) -> RespResult<&[RespValue]> {
        match self {
            RespValue::Array(arr) => Ok(arr),
            _ => Err(RespError::Protocol("Expected array".to_string())),
        }
    }

    /// Convert a bulk or simple string to an owned UTF-8 string; null bulk is `None`
    pub fn as_string(&self) -> RespResult<Option<String>> {
        match self {
            RespValue::BulkString(Some(bytes)) => String::from_utf8(bytes.clone())
                .map(Some)
                .map_err(|e| RespError::InvalidEncoding(e.to_string())),
            RespValue::BulkString(None) => Ok(None),
            RespValue::SimpleString(s) => Ok(Some(s.clone())),
            _ => Err(RespError::Protocol("Expected bulk string".to_string())),
        }
    }

    /// Convert to integer or error
    pub fn as_integer(&self) -> RespResult<i64> {
        match self {
            RespValue::Integer(i) => Ok(*i),
            _ => Err(RespError::Protocol("Expected integer".to_string())),
        }
    }
}

fn put_line(buf: &mut BytesMut, prefix: u8, body: &[u8]) {
    buf.reserve(body.len() + 3);
    buf.put_u8(prefix);
    buf.put_slice(body);
    buf.put_slice(b"\r\n");
}

/// Resumable decoder for a stream of RESP values
///
/// Between calls the caller may only append to the buffer. Open arrays and
/// the scan position survive an incomplete read; the buffer is advanced only
/// when a whole top-level value is ready.
#[derive(Debug, Default)]
pub struct RespDecoder {
    pos: usize,
    open: Vec<OpenArray>,
}

#[derive(Debug)]
struct OpenArray {
    remaining: usize,
    elements: Vec<RespValue>,
}

impl RespDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take one complete value off the front of `buf`, or `Ok(None)` if more
    /// data is needed. After an error the decoder starts over.
    pub fn decode(&mut self, buf: &mut BytesMut) -> RespResult<Option<RespValue>> {
        let result = self.next_value(buf);
        if result.is_err() {
            self.pos = 0;
            self.open.clear();
        }
        result
    }

    fn next_value(&mut self, buf: &mut BytesMut) -> RespResult<Option<RespValue>> {
        loop {
            let Some((token, next)) = parse_token(&buf[..], self.pos)? else {
                return Ok(None);
            };
            self.pos = next;

            let mut value = match token {
                Token::Value(value) => value,
                Token::ArrayHeader(0) => RespValue::Array(Vec::new()),
                Token::ArrayHeader(len) => {
                    if self.open.len() >= MAX_DEPTH {
                        return Err(RespError::Protocol(format!(
                            "nesting deeper than {} arrays",
                            MAX_DEPTH
                        )));
                    }
                    self.open.push(OpenArray {
                        remaining: len,
                        elements: Vec::with_capacity(len.min(64)),
                    });
                    continue;
                }
            };

            // Fold the finished value into the arrays waiting for it
            loop {
                let Some(top) = self.open.last_mut() else {
                    buf.advance(self.pos);
                    self.pos = 0;
                    return Ok(Some(value));
                };
                top.elements.push(value);
                top.remaining -= 1;
                if top.remaining > 0 {
                    break;
                }
                let elements = std::mem::take(&mut top.elements);
                self.open.pop();
                value = RespValue::Array(elements);
            }
        }
    }
}

enum Token {
    Value(RespValue),
    ArrayHeader(usize),
}

/// Parse one scalar or array header at `pos`; returns it and the position after it.
fn parse_token(data: &[u8], pos: usize) -> RespResult<Option<(Token, usize)>> {
    let Some(&kind) = data.get(pos) else {
        return Ok(None);
    };
    let Some((line, next)) = read_line(data, pos + 1) else {
        return Ok(None);
    };

    let value = match kind {
        b'+' => RespValue::SimpleString(utf8(line)?),
        b'-' => RespValue::Error(utf8(line)?),
        b':' => RespValue::Integer(parse_int(line)?),
        b'$' => {
            let len = parse_int(line)?;
            if len == -1 {
                return Ok(Some((Token::Value(RespValue::BulkString(None)), next)));
            }
            let len = checked_len(len, MAX_BULK_LEN, "bulk string")?;

            // Data plus trailing \r\n
            let end = next + len;
            if data.len() < end + 2 {
                return Ok(None);
            }
            if &data[end..end + 2] != b"\r\n" {
                return Err(RespError::Protocol("Missing \\r\\n after bulk string".to_string()));
            }
            return Ok(Some((Token::Value(RespValue::bulk(&data[next..end])), end + 2)));
        }
        b'*' => {
            let len = checked_len(parse_int(line)?, MAX_ARRAY_LEN, "array")?;
            return Ok(Some((Token::ArrayHeader(len), next)));
        }
        other => {
            return Err(RespError::Protocol(format!(
                "Unknown RESP type: {}",
                other as char
            )))
        }
    };
    Ok(Some((Token::Value(value), next)))
}

/// Find the CRLF-terminated line starting at `start`
fn read_line(data: &[u8], start: usize) -> Option<(&[u8], usize)> {
    let rest = data.get(start..)?;
    let offset = rest.windows(2).position(|w| w == b"\r\n")?;
    Some((&rest[..offset], start + offset + 2))
}

fn utf8(bytes: &[u8]) -> RespResult<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| RespError::InvalidEncoding(e.to_string()))
}

fn parse_int(bytes: &[u8]) -> RespResult<i64> {
    let s = std::str::from_utf8(bytes).map_err(|e| RespError::InvalidEncoding(e.to_string()))?;
    s.parse::<i64>()
        .map_err(|e| RespError::Protocol(format!("Invalid integer '{}': {}", s, e)))
}

fn checked_len(len: i64, max: usize, what: &str) -> RespResult<usize> {
    usize::try_from(len)
        .ok()
        .filter(|&l| l <= max)
        .ok_or_else(|| RespError::Protocol(format!("Invalid {} length: {}", what, len)))
}
