//! Miner configuration.
//!
//! [`MinerConfig`] collects every tunable of a pipeline run: input column
//! names, the subgraph pairing rule, the clique size threshold, enumeration
//! guards, and output file names. It deserializes from JSON with every field
//! optional, so a config file only needs to name what it changes.
//!
//! ```json
//! { "pairing": "mutual", "limits": { "max_subgraph_nodes": 200 } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clique::CliqueLimits;
use crate::error::MinerError;
use crate::subgraph::PairingRule;

/// Default name of the per-TF metrics table.
pub const DEFAULT_METRICS_FILE: &str = "TF_Degrees.csv";
/// Default name of the ranked clique table.
pub const DEFAULT_CLIQUES_FILE: &str = "Putative_CRC_Cliques.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Input column holding (comma-delimited) gene identifiers.
    pub gene_column: String,
    /// Input column holding (comma-delimited) motif identifiers.
    pub motif_column: String,
    /// How self-regulatory TFs are paired in the subgraph.
    pub pairing: PairingRule,
    /// Smallest clique kept in the ranking. The default of 3 excludes plain
    /// mutual pairs.
    pub min_clique_size: usize,
    /// Clique enumeration guards.
    pub limits: CliqueLimits,
    /// File name of the metrics table inside the output directory.
    pub metrics_file: String,
    /// File name of the clique table inside the output directory.
    pub cliques_file: String,
}

impl Default for MinerConfig {
    fn default() -> Self {
        MinerConfig {
            gene_column: "gene".to_string(),
            motif_column: "motif".to_string(),
            pairing: PairingRule::Mutual,
            min_clique_size: 3,
            limits: CliqueLimits::default(),
            metrics_file: DEFAULT_METRICS_FILE.to_string(),
            cliques_file: DEFAULT_CLIQUES_FILE.to_string(),
        }
    }
}

impl MinerConfig {
    /// Loads and validates a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MinerError> {
        let text = fs::read_to_string(path)?;
        let config: MinerConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), MinerError> {
        if self.gene_column.trim().is_empty() || self.motif_column.trim().is_empty() {
            return Err(MinerError::InvalidConfig {
                reason: "gene and motif column names must be non-empty".into(),
            });
        }
        if self.gene_column == self.motif_column {
            return Err(MinerError::InvalidConfig {
                reason: format!(
                    "gene and motif columns must differ (both '{}')",
                    self.gene_column
                ),
            });
        }
        if self.min_clique_size == 0 {
            return Err(MinerError::InvalidConfig {
                reason: "min_clique_size must be at least 1".into(),
            });
        }
        if self.metrics_file.is_empty() || self.cliques_file.is_empty() {
            return Err(MinerError::InvalidConfig {
                reason: "output file names must be non-empty".into(),
            });
        }
        Ok(())
    }
}
