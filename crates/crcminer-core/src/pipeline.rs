//! End-to-end CRC mining.
//!
//! [`CrcMiner`] runs the stages in order:
//!
//! ```text
//! table -> edges -> (motif mapping) -> RegulatoryGraph -> self-loop set
//!       -> SelfRegulatorySubgraph -> maximal cliques -> ranking
//!       -> enrichment -> NetworkMetricsTable
//! ```
//!
//! Every stage is a pure function of the previous one. A run owns its graph,
//! so independent runs never share state. Progress goes to the injected
//! [`PipelineObserver`].

use std::io::Read;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::clique::{cliques_containing, maximal_cliques, rank_cliques, Clique, CliqueRankingEntry};
use crate::config::MinerConfig;
use crate::edge::Edge;
use crate::edgelist::EdgeListBuilder;
use crate::enrichment::{compute_enrichment, EnrichmentRecord, NetworkMetricsTable};
use crate::error::MinerError;
use crate::graph::RegulatoryGraph;
use crate::motif_map::{IdKind, MotifMap};
use crate::observer::{PipelineObserver, Stage};
use crate::output::{write_outputs, OutputPaths};
use crate::subgraph::SelfRegulatorySubgraph;

/// Counts describing one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Edges produced by the table reader, duplicates included.
    pub input_edges: usize,
    /// Motif accessions that had no mapping (0 when no map is configured).
    pub unmapped_motifs: usize,
    pub nodes: usize,
    /// Distinct directed edges in the regulatory graph.
    pub edges: usize,
    pub self_loops: usize,
    pub subgraph_edges: usize,
    pub maximal_cliques: usize,
    pub retained_cliques: usize,
    /// Highest ranked clique, formatted as `{A, B, C}`.
    pub top_clique: Option<String>,
    pub top_score: Option<f64>,
}

/// Every artifact of a run.
#[derive(Debug, Clone)]
pub struct CrcAnalysis {
    pub graph: RegulatoryGraph,
    pub self_loops: IndexSet<String>,
    pub subgraph: SelfRegulatorySubgraph,
    /// All maximal cliques of the subgraph, before scoring.
    pub cliques: Vec<Clique>,
    /// Retained cliques, best first.
    pub ranking: Vec<CliqueRankingEntry>,
    pub enrichment: Vec<EnrichmentRecord>,
    pub metrics: NetworkMetricsTable,
    pub summary: RunSummary,
}

impl CrcAnalysis {
    /// Maximal cliques (unfiltered) containing each self-regulatory TF.
    pub fn cliques_by_tf(&self) -> IndexMap<String, Vec<Clique>> {
        cliques_containing(&self.cliques, self.self_loops.iter().map(String::as_str))
    }
}

/// Runs the CRC pipeline with a fixed configuration.
pub struct CrcMiner<'a> {
    config: MinerConfig,
    observer: &'a dyn PipelineObserver,
    motif_map: Option<(MotifMap, IdKind)>,
}

impl<'a> CrcMiner<'a> {
    /// Creates a miner. Fails if `config` does not validate.
    pub fn new(
        config: MinerConfig,
        observer: &'a dyn PipelineObserver,
    ) -> Result<Self, MinerError> {
        config.validate()?;
        Ok(CrcMiner {
            config,
            observer,
            motif_map: None,
        })
    }

    /// Rewrites motif targets through `map` before building the graph.
    pub fn with_motif_map(mut self, map: MotifMap, kind: IdKind) -> Self {
        self.motif_map = Some((map, kind));
        self
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// Mines the tab-delimited table at `path`.
    pub fn mine_path(&self, path: impl AsRef<Path>) -> Result<CrcAnalysis, MinerError> {
        let edges = EdgeListBuilder::from_config(&self.config).read_path(path)?;
        self.observer.stage_completed(Stage::ReadEdges, edges.len());
        self.mine_edges(edges)
    }

    /// Mines a tab-delimited table read from `reader`.
    pub fn mine_reader<R: Read>(&self, reader: R) -> Result<CrcAnalysis, MinerError> {
        let edges = EdgeListBuilder::from_config(&self.config).read(reader)?;
        self.observer.stage_completed(Stage::ReadEdges, edges.len());
        self.mine_edges(edges)
    }

    /// Mines an in-memory edge list.
    pub fn mine_edges(&self, edges: Vec<Edge>) -> Result<CrcAnalysis, MinerError> {
        let input_edges = edges.len();

        let (edges, unmapped_motifs) = match &self.motif_map {
            Some((map, kind)) => {
                let mapped = map.apply(edges, *kind);
                if !mapped.unmapped.is_empty() {
                    self.observer.note(
                        Stage::MapMotifs,
                        &format!(
                            "{} motif(s) without a {kind} mapping kept as-is",
                            mapped.unmapped.len()
                        ),
                    );
                }
                self.observer.stage_completed(Stage::MapMotifs, mapped.edges.len());
                let unmapped = mapped.unmapped.len();
                (mapped.edges, unmapped)
            }
            None => (edges, 0),
        };

        let graph = RegulatoryGraph::from_edges(&edges);
        self.observer.stage_completed(Stage::BuildGraph, graph.edge_count());

        let self_loops = graph.nodes_with_self_loop();
        self.observer.stage_completed(Stage::SelfLoops, self_loops.len());

        let subgraph = SelfRegulatorySubgraph::extract(&graph, self.config.pairing);
        self.observer.stage_completed(Stage::Subgraph, subgraph.edge_count());

        let cliques = maximal_cliques(&subgraph, &self.config.limits)?;
        self.observer.stage_completed(Stage::Cliques, cliques.len());

        let ranking = rank_cliques(&cliques, &graph, self.config.min_clique_size)?;
        self.observer.stage_completed(Stage::Ranking, ranking.len());

        let enrichment = compute_enrichment(&self_loops, &ranking)?;
        self.observer.stage_completed(Stage::Enrichment, enrichment.len());

        let metrics = NetworkMetricsTable::join(&graph.degree_records(), &enrichment);

        let summary = RunSummary {
            input_edges,
            unmapped_motifs,
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            self_loops: self_loops.len(),
            subgraph_edges: subgraph.edge_count(),
            maximal_cliques: cliques.len(),
            retained_cliques: ranking.len(),
            top_clique: ranking.first().map(|e| e.clique.to_string()),
            top_score: ranking.first().map(|e| e.score),
        };
        self.observer.finished(&summary);

        Ok(CrcAnalysis {
            graph,
            self_loops,
            subgraph,
            cliques,
            ranking,
            enrichment,
            metrics,
            summary,
        })
    }

    /// Writes the metrics and clique tables of `analysis` into `dir`.
    pub fn write(
        &self,
        analysis: &CrcAnalysis,
        dir: impl AsRef<Path>,
    ) -> Result<OutputPaths, MinerError> {
        let paths = write_outputs(
            dir,
            &self.config.metrics_file,
            &self.config.cliques_file,
            &analysis.metrics,
            &analysis.ranking,
        )?;
        self.observer.stage_completed(
            Stage::WriteOutputs,
            analysis.metrics.len() + analysis.ranking.len(),
        );
        Ok(paths)
    }
}
