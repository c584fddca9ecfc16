//! Error types for crcminer-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering every
//! failure mode of the CRC pipeline: malformed input tables, lookup
//! failures that indicate a broken graph invariant, undefined enrichment
//! fractions, and tripped clique enumeration guards.

use thiserror::Error;

/// Errors produced by the crcminer-core crate.
#[derive(Debug, Error)]
pub enum MinerError {
    /// A required column is absent from the input table header.
    #[error("missing required column: '{column}'")]
    MissingColumn { column: String },

    /// A row or file could not be parsed.
    #[error("parse error{}: {reason}", line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    Parse { line: Option<u64>, reason: String },

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A node was not found in the regulatory graph.
    ///
    /// Raised when a clique or enrichment counter references a TF the graph
    /// never saw. Correct construction makes this unreachable.
    #[error("node not found in regulatory graph: '{name}'")]
    NodeNotFound { name: String },

    /// Enrichment fractions are undefined: self-regulatory TFs exist but no
    /// clique survived ranking.
    #[error(
        "cannot compute clique fractions: {self_loops} self-regulatory TF(s) but zero retained cliques"
    )]
    DivisionByZero { self_loops: usize },

    /// A clique enumeration guard was exceeded.
    #[error("clique enumeration limit exceeded: {limit} is {actual}, maximum {max}")]
    CliqueLimitExceeded {
        limit: &'static str,
        actual: usize,
        max: usize,
    },

    /// The miner configuration is not usable.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}
