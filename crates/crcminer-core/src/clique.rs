//! Maximal clique enumeration and CRC scoring.
//!
//! Cliques are enumerated with Bron-Kerbosch using Tomita pivoting over the
//! [`SelfRegulatorySubgraph`]. Enumeration walks vertices in subgraph order,
//! so the output order is a pure function of the input edge order.
//!
//! Each maximal clique is scored by the mean out-degree of its members in the
//! full [`RegulatoryGraph`]; see [`rank_cliques`].

use std::cmp::Ordering;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::MinerError;
use crate::graph::RegulatoryGraph;
use crate::subgraph::SelfRegulatorySubgraph;

/// A set of TFs, stored sorted and without duplicates.
///
/// Serializes as a plain list of names; deserializing goes through
/// [`Clique::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Clique {
    members: SmallVec<[String; 8]>,
}

impl Clique {
    /// Builds a clique from any collection of names. Sorts and dedupes.
    pub fn new<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut members: SmallVec<[String; 8]> = members.into_iter().map(Into::into).collect();
        members.sort();
        members.dedup();
        Clique { members }
    }

    /// Members in lexicographic order.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, tf: &str) -> bool {
        self.members.binary_search_by(|m| m.as_str().cmp(tf)).is_ok()
    }
}

impl From<Vec<String>> for Clique {
    fn from(members: Vec<String>) -> Self {
        Clique::new(members)
    }
}

impl From<Clique> for Vec<String> {
    fn from(clique: Clique) -> Self {
        clique.members.into_vec()
    }
}

impl fmt::Display for Clique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.members.join(", "))
    }
}

/// Guards against runaway enumeration on dense subgraphs.
///
/// Maximal clique enumeration is exponential in the worst case. Both limits
/// are unset by default; when set, exceeding one aborts with
/// [`MinerError::CliqueLimitExceeded`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliqueLimits {
    /// Refuse to enumerate when the subgraph has more vertices than this.
    pub max_subgraph_nodes: Option<usize>,
    /// Stop once more maximal cliques than this have been found.
    pub max_cliques: Option<usize>,
}

/// Enumerates every maximal clique of `subgraph`.
///
/// Isolated vertices are reported as singleton cliques. An empty subgraph
/// yields no cliques and never trips `max_cliques`.
pub fn maximal_cliques(
    subgraph: &SelfRegulatorySubgraph,
    limits: &CliqueLimits,
) -> Result<Vec<Clique>, MinerError> {
    let n = subgraph.node_count();
    if let Some(max) = limits.max_subgraph_nodes {
        if n > max {
            return Err(MinerError::CliqueLimitExceeded {
                limit: "max_subgraph_nodes",
                actual: n,
                max,
            });
        }
    }

    if n == 0 {
        return Ok(Vec::new());
    }

    // Translate to dense indices so the recursion works on integer sets.
    let names: IndexSet<&str> = subgraph.nodes().collect();
    let neighbors: Vec<IndexSet<usize>> = names
        .iter()
        .map(|name| {
            subgraph
                .neighbors(name)
                .map(|set| {
                    set.iter()
                        .filter_map(|b| names.get_index_of(b.as_str()))
                        .collect()
                })
                .unwrap_or_default()
        })
        .collect();

    let mut search = BronKerbosch {
        neighbors: &neighbors,
        limits,
        found: Vec::new(),
    };
    let mut r = Vec::new();
    search.expand(&mut r, (0..n).collect(), IndexSet::new())?;

    Ok(search
        .found
        .into_iter()
        .map(|ids| Clique::new(ids.into_iter().filter_map(|i| names.get_index(i).copied())))
        .collect())
}

struct BronKerbosch<'a> {
    neighbors: &'a [IndexSet<usize>],
    limits: &'a CliqueLimits,
    found: Vec<Vec<usize>>,
}

impl BronKerbosch<'_> {
    fn expand(
        &mut self,
        r: &mut Vec<usize>,
        mut p: IndexSet<usize>,
        mut x: IndexSet<usize>,
    ) -> Result<(), MinerError> {
        if p.is_empty() {
            if x.is_empty() {
                self.found.push(r.clone());
                if let Some(max) = self.limits.max_cliques {
                    if self.found.len() > max {
                        return Err(MinerError::CliqueLimitExceeded {
                            limit: "max_cliques",
                            actual: self.found.len(),
                            max,
                        });
                    }
                }
            }
            return Ok(());
        }

        // Pivot: vertex of P ∪ X with the most neighbours in P; lowest index wins ties.
        let pivot = p
            .iter()
            .chain(x.iter())
            .copied()
            .max_by(|&a, &b| {
                let ca = self.count_in(a, &p);
                let cb = self.count_in(b, &p);
                ca.cmp(&cb).then(b.cmp(&a))
            })
            .unwrap_or_default();

        let candidates: Vec<usize> = p
            .iter()
            .copied()
            .filter(|v| !self.neighbors[pivot].contains(v))
            .collect();

        for v in candidates {
            let nv = &self.neighbors[v];
            let p_next: IndexSet<usize> = p.iter().copied().filter(|u| nv.contains(u)).collect();
            let x_next: IndexSet<usize> = x.iter().copied().filter(|u| nv.contains(u)).collect();
            r.push(v);
            self.expand(r, p_next, x_next)?;
            r.pop();
            p.shift_remove(&v);
            x.insert(v);
        }
        Ok(())
    }

    fn count_in(&self, v: usize, p: &IndexSet<usize>) -> usize {
        self.neighbors[v].iter().filter(|u| p.contains(*u)).count()
    }
}

/// A scored CRC candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliqueRankingEntry {
    pub clique: Clique,
    /// Mean out-degree of the members in the full regulatory graph.
    pub score: f64,
}

/// Mean out-degree of `clique`'s members in `graph`.
///
/// A member unknown to the graph is a [`MinerError::NodeNotFound`].
pub fn score_clique(clique: &Clique, graph: &RegulatoryGraph) -> Result<f64, MinerError> {
    if clique.is_empty() {
        return Ok(0.0);
    }
    let mut total = 0usize;
    for tf in clique.members() {
        total += graph.out_degree(tf)?;
    }
    Ok(total as f64 / clique.len() as f64)
}

/// Scores, filters and sorts maximal cliques.
///
/// A clique is retained when its score is positive and it has at least
/// `min_size` members. Entries are ordered by descending score; equal scores
/// fall back to the lexicographic order of their member lists.
pub fn rank_cliques(
    cliques: &[Clique],
    graph: &RegulatoryGraph,
    min_size: usize,
) -> Result<Vec<CliqueRankingEntry>, MinerError> {
    let mut ranking = Vec::new();
    for clique in cliques {
        let score = score_clique(clique, graph)?;
        if score > 0.0 && clique.len() >= min_size {
            ranking.push(CliqueRankingEntry {
                clique: clique.clone(),
                score,
            });
        }
    }
    ranking.sort_by(compare_entries);
    Ok(ranking)
}

fn compare_entries(a: &CliqueRankingEntry, b: &CliqueRankingEntry) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.clique.members().cmp(b.clique.members()))
}

/// Groups cliques by the self-regulatory TFs they contain.
///
/// Every TF in `tfs` gets an entry (possibly empty), in the order given.
pub fn cliques_containing<'a, I>(cliques: &[Clique], tfs: I) -> IndexMap<String, Vec<Clique>>
where
    I: IntoIterator<Item = &'a str>,
{
    tfs.into_iter()
        .map(|tf| {
            let containing = cliques.iter().filter(|c| c.contains(tf)).cloned().collect();
            (tf.to_string(), containing)
        })
        .collect()
}
