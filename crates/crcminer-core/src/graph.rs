//! RegulatoryGraph: the directed TF regulatory network.
//!
//! [`RegulatoryGraph`] is the single entry point for constructing and querying
//! the network. It wraps a petgraph `StableGraph` keyed by TF name through an
//! insertion-ordered [`IndexMap`], so iteration order (and everything derived
//! from it) is deterministic for a given input order.
//!
//! # Invariants
//!
//! - No parallel edges: [`add_edge`](RegulatoryGraph::add_edge) is idempotent.
//! - Self-loops are allowed and mark auto-regulation.
//! - Nodes only enter the graph as an edge endpoint, so there are no isolated
//!   nodes.
//!
//! The graph is read-only once built; every downstream stage borrows it
//! immutably.

use indexmap::{IndexMap, IndexSet};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};

use crate::edge::Edge;
use crate::error::MinerError;

/// In/out degree statistics for one TF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeRecord {
    /// TF identifier.
    pub tf: String,
    /// Count of distinct outgoing edges.
    pub out_degree: usize,
    /// Count of distinct incoming edges.
    pub in_degree: usize,
}

impl DegreeRecord {
    /// Total degree (`out + in`). A self-loop contributes to both.
    pub fn total(&self) -> usize {
        self.out_degree + self.in_degree
    }
}

/// Directed regulatory graph over TF identifiers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegulatoryGraph {
    graph: StableGraph<String, (), Directed, u32>,
    /// TF name -> node, in first-seen order.
    index: IndexMap<String, NodeIndex<u32>>,
}

impl RegulatoryGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph by inserting every edge in order.
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = &'a Edge>,
    {
        let mut graph = RegulatoryGraph::new();
        for edge in edges {
            graph.add_edge(&edge.source, &edge.target);
        }
        graph
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Adds the directed edge `source -> target`, creating missing endpoints.
    ///
    /// Returns `true` if the edge was new. Re-adding an existing edge is a
    /// no-op and returns `false`.
    pub fn add_edge(&mut self, source: &str, target: &str) -> bool {
        let from = self.ensure_node(source);
        let to = self.ensure_node(target);
        if self.graph.find_edge(from, to).is_some() {
            return false;
        }
        self.graph.add_edge(from, to, ());
        true
    }

    fn ensure_node(&mut self, name: &str) -> NodeIndex<u32> {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    fn index_of(&self, name: &str) -> Result<NodeIndex<u32>, MinerError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| MinerError::NodeNotFound {
                name: name.to_string(),
            })
    }

    /// Returns `true` if the directed edge `source -> target` exists.
    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        match (self.index.get(source), self.index.get(target)) {
            (Some(&from), Some(&to)) => self.graph.find_edge(from, to).is_some(),
            _ => false,
        }
    }

    /// Count of distinct outgoing edges of `name`.
    pub fn out_degree(&self, name: &str) -> Result<usize, MinerError> {
        self.degree(name, Direction::Outgoing)
    }

    /// Count of distinct incoming edges of `name`.
    pub fn in_degree(&self, name: &str) -> Result<usize, MinerError> {
        self.degree(name, Direction::Incoming)
    }

    fn degree(&self, name: &str, direction: Direction) -> Result<usize, MinerError> {
        let idx = self.index_of(name)?;
        Ok(self.graph.edges_directed(idx, direction).count())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// All TF names in first-seen order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.index.keys().map(String::as_str)
    }

    /// Nodes carrying an edge to themselves, in first-seen order.
    pub fn nodes_with_self_loop(&self) -> IndexSet<String> {
        self.index
            .iter()
            .filter(|(_, &idx)| self.graph.find_edge(idx, idx).is_some())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// One [`DegreeRecord`] per node, in first-seen order.
    pub fn degree_records(&self) -> Vec<DegreeRecord> {
        self.index
            .iter()
            .map(|(name, &idx)| DegreeRecord {
                tf: name.clone(),
                out_degree: self.graph.edges_directed(idx, Direction::Outgoing).count(),
                in_degree: self.graph.edges_directed(idx, Direction::Incoming).count(),
            })
            .collect()
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::edges_from_pairs;
    use proptest::prelude::*;

    fn sample_graph() -> RegulatoryGraph {
        let edges = edges_from_pairs([
            ("A", "B"),
            ("A", "D"),
            ("A", "E"),
            ("B", "C"),
            ("D", "A"),
            ("D", "H"),
            ("A", "A"),
            ("H", "H"),
            ("D", "D"),
            ("H", "A"),
            ("H", "D"),
        ]);
        RegulatoryGraph::from_edges(&edges)
    }

    #[test]
    fn basic_construction() {
        let graph = sample_graph();
        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count(), 11);
        assert!(graph.has_edge("A", "B"));
        assert!(!graph.has_edge("B", "A"));
        assert!(!graph.has_edge("A", "missing"));
    }

    #[test]
    fn add_edge_is_idempotent() {
        let mut graph = RegulatoryGraph::new();
        assert!(graph.add_edge("A", "B"));
        let out_before = graph.out_degree("A").unwrap();
        let in_before = graph.in_degree("B").unwrap();

        assert!(!graph.add_edge("A", "B"));
        assert_eq!(graph.out_degree("A").unwrap(), out_before);
        assert_eq!(graph.in_degree("B").unwrap(), in_before);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn degrees_count_self_loop_once_per_direction() {
        let graph = sample_graph();
        // A -> {B, D, E, A}; {D, A, H} -> A
        assert_eq!(graph.out_degree("A").unwrap(), 4);
        assert_eq!(graph.in_degree("A").unwrap(), 3);
        assert_eq!(graph.out_degree("E").unwrap(), 0);
        assert_eq!(graph.in_degree("E").unwrap(), 1);
    }

    #[test]
    fn unknown_node_degree_is_lookup_error() {
        let graph = sample_graph();
        match graph.out_degree("ZZZ") {
            Err(MinerError::NodeNotFound { name }) => assert_eq!(name, "ZZZ"),
            other => panic!("expected NodeNotFound, got {other:?}"),
        }
    }

    #[test]
    fn self_loops_in_first_seen_order() {
        let graph = sample_graph();
        let loops: Vec<_> = graph.nodes_with_self_loop().into_iter().collect();
        assert_eq!(loops, vec!["A", "D", "H"]);
    }

    #[test]
    fn degree_records_match_degree_queries() {
        let graph = sample_graph();
        for record in graph.degree_records() {
            assert_eq!(record.out_degree, graph.out_degree(&record.tf).unwrap());
            assert_eq!(record.in_degree, graph.in_degree(&record.tf).unwrap());
            assert_eq!(record.total(), record.out_degree + record.in_degree);
        }
    }

    #[test]
    fn nodes_iterate_first_seen_order() {
        let mut graph = RegulatoryGraph::new();
        graph.add_edge("X", "Y");
        graph.add_edge("Y", "Y");
        graph.add_edge("W", "X");
        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec!["X", "Y", "W"]);
    }

    #[test]
    fn serde_roundtrip_preserves_structure() {
        let graph = sample_graph();
        let json = serde_json::to_string(&graph).unwrap();
        let back: RegulatoryGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back.node_count(), graph.node_count());
        assert_eq!(back.edge_count(), graph.edge_count());
        assert_eq!(back.nodes_with_self_loop(), graph.nodes_with_self_loop());
        assert_eq!(back.out_degree("A").unwrap(), 4);
    }

    fn arb_edges() -> impl Strategy<Value = Vec<(u8, u8)>> {
        prop::collection::vec((0u8..8, 0u8..8), 0..40)
    }

    proptest! {
        #[test]
        fn degree_conservation(pairs in arb_edges()) {
            let mut graph = RegulatoryGraph::new();
            for (a, b) in &pairs {
                graph.add_edge(&format!("G{a}"), &format!("G{b}"));
            }
            let records = graph.degree_records();
            let out_sum: usize = records.iter().map(|r| r.out_degree).sum();
            let in_sum: usize = records.iter().map(|r| r.in_degree).sum();
            prop_assert_eq!(out_sum, graph.edge_count());
            prop_assert_eq!(in_sum, graph.edge_count());
        }

        #[test]
        fn repeated_insertion_changes_nothing(pairs in arb_edges()) {
            let mut once = RegulatoryGraph::new();
            let mut twice = RegulatoryGraph::new();
            for (a, b) in &pairs {
                once.add_edge(&format!("G{a}"), &format!("G{b}"));
                twice.add_edge(&format!("G{a}"), &format!("G{b}"));
                twice.add_edge(&format!("G{a}"), &format!("G{b}"));
            }
            prop_assert_eq!(once.degree_records(), twice.degree_records());
        }

        #[test]
        fn self_loop_nodes_have_both_degrees(pairs in arb_edges()) {
            let mut graph = RegulatoryGraph::new();
            for (a, b) in &pairs {
                graph.add_edge(&format!("G{a}"), &format!("G{b}"));
            }
            for tf in graph.nodes_with_self_loop() {
                prop_assert!(graph.has_edge(&tf, &tf));
                prop_assert!(graph.out_degree(&tf).unwrap() >= 1);
                prop_assert!(graph.in_degree(&tf).unwrap() >= 1);
            }
        }
    }
}
