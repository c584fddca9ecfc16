//! Self-regulatory subgraph extraction.
//!
//! The [`SelfRegulatorySubgraph`] is an undirected graph whose vertices are the
//! auto-regulatory TFs (nodes with a self-loop) of a [`RegulatoryGraph`]. Two
//! vertices are adjacent when the [`PairingRule`] admits the pair; under the
//! default rule that means both directed edges exist.
//!
//! The subgraph is held as an explicit adjacency mapping (vertex -> neighbour
//! set) because the clique enumerator works on neighbourhood intersections.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::graph::RegulatoryGraph;

/// How two distinct self-regulatory TFs become adjacent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingRule {
    /// Adjacent iff `A -> B` and `B -> A` both exist (mutual regulation).
    #[default]
    Mutual,
    /// Every two distinct self-regulatory TFs are adjacent, regardless of
    /// edges between them. Only useful to reproduce output of the early
    /// pipeline revision that paired TFs this way.
    AnySelfLoopPair,
}

/// Undirected graph over self-regulatory TFs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfRegulatorySubgraph {
    /// Vertex -> neighbours. Every self-loop TF is a key, even if isolated.
    adjacency: IndexMap<String, IndexSet<String>>,
}

impl SelfRegulatorySubgraph {
    /// Extracts the subgraph from `graph` under the given pairing rule.
    ///
    /// Each unordered pair is evaluated once. No vertex is adjacent to itself.
    pub fn extract(graph: &RegulatoryGraph, rule: PairingRule) -> Self {
        let self_loops: Vec<String> = graph.nodes_with_self_loop().into_iter().collect();
        let mut adjacency: IndexMap<String, IndexSet<String>> = self_loops
            .iter()
            .map(|tf| (tf.clone(), IndexSet::new()))
            .collect();

        for (i, a) in self_loops.iter().enumerate() {
            for b in &self_loops[i + 1..] {
                let linked = match rule {
                    PairingRule::Mutual => graph.has_edge(a, b) && graph.has_edge(b, a),
                    PairingRule::AnySelfLoopPair => true,
                };
                if linked {
                    if let Some(n) = adjacency.get_mut(a) {
                        n.insert(b.clone());
                    }
                    if let Some(n) = adjacency.get_mut(b) {
                        n.insert(a.clone());
                    }
                }
            }
        }

        SelfRegulatorySubgraph { adjacency }
    }

    /// Vertices in self-loop discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.adjacency.keys().map(String::as_str)
    }

    /// Neighbours of `tf`, or `None` if it is not a vertex.
    pub fn neighbors(&self, tf: &str) -> Option<&IndexSet<String>> {
        self.adjacency.get(tf)
    }

    /// Returns `true` if `{a, b}` is an edge.
    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.adjacency.get(a).is_some_and(|n| n.contains(b))
    }

    /// Returns the number of vertices.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(IndexSet::len).sum::<usize>() / 2
    }

    /// Returns `true` if there are no vertices.
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::edges_from_pairs;
    use proptest::prelude::*;

    fn graph_of(pairs: &[(&str, &str)]) -> RegulatoryGraph {
        RegulatoryGraph::from_edges(&edges_from_pairs(pairs.iter().copied()))
    }

    #[test]
    fn mutual_pair_forms_edge() {
        let graph = graph_of(&[("A", "B"), ("B", "A"), ("A", "A"), ("B", "B"), ("C", "D")]);
        let sub = SelfRegulatorySubgraph::extract(&graph, PairingRule::Mutual);
        assert_eq!(sub.nodes().collect::<Vec<_>>(), vec!["A", "B"]);
        assert!(sub.has_edge("A", "B"));
        assert!(sub.has_edge("B", "A"));
        assert_eq!(sub.edge_count(), 1);
        assert_eq!(
            sub.neighbors("A").unwrap().iter().collect::<Vec<_>>(),
            vec!["B"]
        );
    }

    #[test]
    fn one_way_regulation_is_not_enough() {
        let graph = graph_of(&[("A", "A"), ("B", "B"), ("A", "B")]);
        let sub = SelfRegulatorySubgraph::extract(&graph, PairingRule::Mutual);
        assert_eq!(sub.node_count(), 2);
        assert_eq!(sub.edge_count(), 0);
        assert!(sub.neighbors("A").unwrap().is_empty());
    }

    #[test]
    fn non_self_loop_nodes_excluded() {
        let graph = graph_of(&[("A", "A"), ("A", "B"), ("B", "A")]);
        let sub = SelfRegulatorySubgraph::extract(&graph, PairingRule::Mutual);
        assert_eq!(sub.node_count(), 1);
        assert!(sub.neighbors("B").is_none());
    }

    #[test]
    fn empty_when_no_self_loops() {
        let graph = graph_of(&[("A", "B"), ("B", "A")]);
        let sub = SelfRegulatorySubgraph::extract(&graph, PairingRule::Mutual);
        assert!(sub.is_empty());
        assert_eq!(sub.edge_count(), 0);
    }

    #[test]
    fn any_pair_rule_connects_all_self_loops() {
        let graph = graph_of(&[("A", "A"), ("B", "B"), ("C", "C")]);
        let sub = SelfRegulatorySubgraph::extract(&graph, PairingRule::AnySelfLoopPair);
        assert_eq!(sub.edge_count(), 3);
        assert!(!sub.has_edge("A", "A"));
    }

    #[test]
    fn pairing_rule_serde_names() {
        assert_eq!(
            serde_json::to_string(&PairingRule::AnySelfLoopPair).unwrap(),
            "\"any_self_loop_pair\""
        );
        let rule: PairingRule = serde_json::from_str("\"mutual\"").unwrap();
        assert_eq!(rule, PairingRule::Mutual);
    }

    proptest! {
        #[test]
        fn edges_are_exactly_mutual_pairs(pairs in prop::collection::vec((0u8..6, 0u8..6), 0..40)) {
            let mut graph = RegulatoryGraph::new();
            for (a, b) in &pairs {
                graph.add_edge(&format!("T{a}"), &format!("T{b}"));
            }
            let sub = SelfRegulatorySubgraph::extract(&graph, PairingRule::Mutual);
            let loops: Vec<String> = graph.nodes_with_self_loop().into_iter().collect();
            for a in &loops {
                prop_assert!(!sub.has_edge(a, a));
                for b in &loops {
                    if a == b {
                        continue;
                    }
                    let mutual = graph.has_edge(a, b) && graph.has_edge(b, a);
                    prop_assert_eq!(sub.has_edge(a, b), mutual);
                }
            }
        }
    }
}
