//! TF enrichment across ranked cliques and the merged network metrics table.
//!
//! A TF's clique fraction is the share of retained CRC cliques it belongs to.
//! Fractions are only defined for self-regulatory TFs, and only when at least
//! one clique was retained; otherwise [`compute_enrichment`] fails with
//! [`MinerError::DivisionByZero`] rather than reporting zeros.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::clique::CliqueRankingEntry;
use crate::error::MinerError;
use crate::graph::DegreeRecord;

/// Clique fraction for one self-regulatory TF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    pub tf: String,
    /// Retained cliques containing `tf` / all retained cliques; in `[0, 1]`.
    pub clique_fraction: f64,
}

/// Computes the clique fraction of every TF in `self_loops`.
///
/// Counters start at zero for each self-loop TF and are bumped once per
/// retained clique the TF belongs to. Records come back in `self_loops` order.
pub fn compute_enrichment(
    self_loops: &IndexSet<String>,
    ranking: &[CliqueRankingEntry],
) -> Result<Vec<EnrichmentRecord>, MinerError> {
    if self_loops.is_empty() {
        return Ok(Vec::new());
    }
    if ranking.is_empty() {
        return Err(MinerError::DivisionByZero {
            self_loops: self_loops.len(),
        });
    }

    let mut counts: IndexMap<&str, usize> =
        self_loops.iter().map(|tf| (tf.as_str(), 0)).collect();
    for entry in ranking {
        for tf in entry.clique.members() {
            let count = counts
                .get_mut(tf.as_str())
                .ok_or_else(|| MinerError::NodeNotFound { name: tf.clone() })?;
            *count += 1;
        }
    }

    let total = ranking.len() as f64;
    Ok(counts
        .into_iter()
        .map(|(tf, count)| EnrichmentRecord {
            tf: tf.to_string(),
            clique_fraction: count as f64 / total,
        })
        .collect())
}

/// One row of the network metrics table.
///
/// Degree columns are `None` for a TF only known from enrichment, and
/// `clique_fraction` is `None` for a TF without a self-loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRow {
    #[serde(rename = "TF")]
    pub tf: String,
    #[serde(rename = "Out")]
    pub out_degree: Option<usize>,
    #[serde(rename = "In")]
    pub in_degree: Option<usize>,
    #[serde(rename = "Total")]
    pub total: Option<usize>,
    #[serde(rename = "TF_CliqueFraction")]
    pub clique_fraction: Option<f64>,
}

/// Outer join of degree records and enrichment records on TF id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetricsTable {
    rows: Vec<MetricsRow>,
}

impl NetworkMetricsTable {
    /// Joins degree and enrichment records. Rows are sorted by TF id and no
    /// TF present on either side is dropped.
    pub fn join(degrees: &[DegreeRecord], enrichment: &[EnrichmentRecord]) -> Self {
        let mut rows: IndexMap<&str, MetricsRow> = IndexMap::new();
        for record in degrees {
            rows.insert(
                record.tf.as_str(),
                MetricsRow {
                    tf: record.tf.clone(),
                    out_degree: Some(record.out_degree),
                    in_degree: Some(record.in_degree),
                    total: Some(record.total()),
                    clique_fraction: None,
                },
            );
        }
        for record in enrichment {
            rows.entry(record.tf.as_str())
                .or_insert_with(|| MetricsRow {
                    tf: record.tf.clone(),
                    out_degree: None,
                    in_degree: None,
                    total: None,
                    clique_fraction: None,
                })
                .clique_fraction = Some(record.clique_fraction);
        }

        let mut rows: Vec<MetricsRow> = rows.into_values().collect();
        rows.sort_by(|a, b| a.tf.cmp(&b.tf));
        NetworkMetricsTable { rows }
    }

    pub(crate) fn from_rows(rows: Vec<MetricsRow>) -> Self {
        NetworkMetricsTable { rows }
    }

    pub fn rows(&self) -> &[MetricsRow] {
        &self.rows
    }

    /// Looks up the row for `tf`.
    pub fn get(&self, tf: &str) -> Option<&MetricsRow> {
        self.rows
            .binary_search_by(|row| row.tf.as_str().cmp(tf))
            .ok()
            .map(|i| &self.rows[i])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
