//! Edge-list ingestion
//!
//! Reads a plain-text edge list, one `origin destination weight` triple per
//! line, into a [`GraphStore`]. Any bad line aborts the whole load: a graph
//! is either loaded completely or not served at all.

use super::store::{FrozenGraph, GraphError, GraphStore};
use super::types::NodeLabel;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that abort graph loading
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot open graph file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read error: {0}")]
    Read(#[from] io::Error),

    #[error("line {line}: expected 3 tokens (origin destination weight), found {tokens}")]
    MalformedInput { line: usize, tokens: usize },

    #[error("line {line}: invalid weight '{token}'")]
    InvalidWeight { line: usize, token: String },

    #[error("line {line}: {source}")]
    Graph {
        line: usize,
        #[source]
        source: GraphError,
    },
}

impl LoadError {
    /// Stable tag identifying the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::Io { .. } | LoadError::Read(_) => "IO",
            LoadError::MalformedInput { .. } => "MALFORMEDINPUT",
            LoadError::InvalidWeight { .. } => "INVALIDWEIGHT",
            LoadError::Graph { source, .. } => source.kind(),
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Parse a single line into an edge triple
///
/// `line_no` is 1-based and only used for error reporting.
pub fn parse_edge_line(line: &str, line_no: usize) -> LoadResult<(NodeLabel, NodeLabel, i64)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 3 {
        return Err(LoadError::MalformedInput {
            line: line_no,
            tokens: tokens.len(),
        });
    }

    let weight = tokens[2].parse::<i64>().map_err(|_| LoadError::InvalidWeight {
        line: line_no,
        token: tokens[2].to_string(),
    })?;

    Ok((NodeLabel::new(tokens[0]), NodeLabel::new(tokens[1]), weight))
}

/// Feed every edge of `reader` into `store`, returning the number of edges added
///
/// Every line must be an edge; a blank line is `MalformedInput` with zero
/// tokens. A negative weight is reported as `InvalidWeight` with its line
/// number, same as a non-numeric one.
pub fn load_edges<R: BufRead>(reader: R, store: &mut GraphStore) -> LoadResult<usize> {
    let mut loaded = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;

        let (origin, destination, weight) = parse_edge_line(&line, line_no)?;
        store
            .add_edge(origin, destination, weight)
            .map_err(|e| match e {
                GraphError::InvalidWeight(w) => LoadError::InvalidWeight {
                    line: line_no,
                    token: w.to_string(),
                },
                other => LoadError::Graph {
                    line: line_no,
                    source: other,
                },
            })?;
        loaded += 1;
    }

    debug!("Loaded {} edges", loaded);
    Ok(loaded)
}

/// Load an edge-list file and freeze it into a servable graph
pub fn load_graph_file(path: impl AsRef<Path>) -> LoadResult<FrozenGraph> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut store = GraphStore::new();
    let edges = load_edges(BufReader::new(file), &mut store)?;
    info!(
        "Graph loaded from {}: {} nodes, {} edges",
        path.display(),
        store.node_count(),
        edges
    );

    Ok(store.freeze())
}
