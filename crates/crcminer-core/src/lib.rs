//! Core Regulatory Circuitry (CRC) discovery.
//!
//! Builds a directed TF regulatory graph from enhancer/motif annotations,
//! isolates the self-regulatory TFs, enumerates maximal cliques of mutually
//! regulating TFs, ranks them, and reports per-TF clique enrichment next to
//! degree statistics.
//!
//! # Modules
//!
//! - [`edgelist`]: annotation table -> [`Edge`] list
//! - [`motif_map`]: motif accession -> gene identifier rewriting
//! - [`graph`]: [`RegulatoryGraph`] and degree records
//! - [`subgraph`]: [`SelfRegulatorySubgraph`] extraction
//! - [`clique`]: maximal clique enumeration, scoring and ranking
//! - [`enrichment`]: clique fractions and the [`NetworkMetricsTable`]
//! - [`output`]: comma-delimited table writers and readers
//! - [`pipeline`]: [`CrcMiner`], running every stage end to end
//! - [`observer`]: progress reporting hooks
//! - [`config`]: [`MinerConfig`]
//! - [`error`]: [`MinerError`]

pub mod clique;
pub mod config;
pub mod edge;
pub mod edgelist;
pub mod enrichment;
pub mod error;
pub mod graph;
pub mod motif_map;
pub mod observer;
pub mod output;
pub mod pipeline;
pub mod subgraph;

// Re-export commonly used types
pub use clique::{Clique, CliqueLimits, CliqueRankingEntry};
pub use config::MinerConfig;
pub use edge::Edge;
pub use edgelist::EdgeListBuilder;
pub use enrichment::{EnrichmentRecord, MetricsRow, NetworkMetricsTable};
pub use error::MinerError;
pub use graph::{DegreeRecord, RegulatoryGraph};
pub use motif_map::{IdKind, MotifMap};
pub use observer::{PipelineObserver, SilentObserver, Stage, TracingObserver};
pub use pipeline::{CrcAnalysis, CrcMiner, RunSummary};
pub use subgraph::{PairingRule, SelfRegulatorySubgraph};
