//! Core type definitions for the graph engine

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Node label (e.g., "A", "berlin", "router-7")
///
/// A node has no identity beyond its label: two nodes are the same node iff
/// their labels are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeLabel(String);

impl NodeLabel {
    pub fn new(label: impl Into<String>) -> Self {
        NodeLabel(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeLabel {
    fn from(s: String) -> Self {
        NodeLabel(s)
    }
}

impl From<&str> for NodeLabel {
    fn from(s: &str) -> Self {
        NodeLabel(s.to_string())
    }
}

/// Lets label-keyed maps be queried with a plain `&str`
impl Borrow<str> for NodeLabel {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
