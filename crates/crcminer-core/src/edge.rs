//! Regulatory edges.
//!
//! An [`Edge`] is an ordered (source, target) pair of identifiers: the gene
//! whose enhancer carries a motif, and the motif (or, once mapped, the gene
//! that owns the motif). Edges are the only input the graph is built from.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A directed regulatory edge `source -> target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    /// Gene whose regulatory region carries the motif.
    pub source: String,
    /// Motif identifier, or the gene owning the motif after mapping.
    pub target: String,
}

impl Edge {
    /// Creates a new edge.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Edge {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl<S: Into<String>, T: Into<String>> From<(S, T)> for Edge {
    fn from((source, target): (S, T)) -> Self {
        Edge::new(source, target)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Builds a vector of edges from `(source, target)` string pairs.
pub fn edges_from_pairs<'a, I>(pairs: I) -> Vec<Edge>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs.into_iter().map(Edge::from).collect()
}
