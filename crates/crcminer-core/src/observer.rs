//! Pipeline observation.
//!
//! The pipeline reports progress through a [`PipelineObserver`] handed to it
//! by the caller instead of writing to a process-wide logger. [`TracingObserver`]
//! forwards events to `tracing`; [`SilentObserver`] drops them.

use std::fmt;

use crate::pipeline::RunSummary;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ReadEdges,
    MapMotifs,
    BuildGraph,
    SelfLoops,
    Subgraph,
    Cliques,
    Ranking,
    Enrichment,
    WriteOutputs,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ReadEdges => "read edges",
            Stage::MapMotifs => "map motifs",
            Stage::BuildGraph => "build graph",
            Stage::SelfLoops => "self loops",
            Stage::Subgraph => "self-regulatory subgraph",
            Stage::Cliques => "maximal cliques",
            Stage::Ranking => "rank cliques",
            Stage::Enrichment => "clique enrichment",
            Stage::WriteOutputs => "write outputs",
        };
        f.write_str(name)
    }
}

/// Receives progress events from a pipeline run.
pub trait PipelineObserver {
    /// A stage finished; `count` is the number of items it produced.
    fn stage_completed(&self, stage: Stage, count: usize);

    /// A non-fatal condition worth surfacing (e.g. unmapped motifs).
    fn note(&self, stage: Stage, message: &str) {
        let _ = (stage, message);
    }

    /// The run finished successfully.
    fn finished(&self, summary: &RunSummary) {
        let _ = summary;
    }
}

/// Emits events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn stage_completed(&self, stage: Stage, count: usize) {
        tracing::info!(%stage, count, "stage complete");
    }

    fn note(&self, stage: Stage, message: &str) {
        tracing::warn!(%stage, "{}", message);
    }

    fn finished(&self, summary: &RunSummary) {
        tracing::info!(
            nodes = summary.nodes,
            edges = summary.edges,
            self_loops = summary.self_loops,
            cliques = summary.maximal_cliques,
            retained = summary.retained_cliques,
            "CRC mining finished"
        );
        if let Some(top) = &summary.top_clique {
            tracing::debug!(clique = %top, "top ranked clique");
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl PipelineObserver for SilentObserver {
    fn stage_completed(&self, _stage: Stage, _count: usize) {}
}
