//! Edge list construction from a tab-delimited annotation table.
//!
//! The table carries one row per enhancer/region, with a gene column and a
//! motif column. Either cell may hold a comma-delimited list; a row expands to
//! the cross product of its gene tokens and motif tokens:
//!
//! ```text
//! chr    st  en  gene   motif
//! chr1   10  20  A,B,C  BAR      -> (A,BAR) (B,BAR) (C,BAR)
//! chr1   11  21  FOO    X,Y      -> (FOO,X) (FOO,Y)
//! chr1   30  40         BAZ      -> dropped (null gene)
//! ```
//!
//! Rows with a null gene or motif are dropped before splitting. Everything else
//! is kept, in row order.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::config::MinerConfig;
use crate::edge::Edge;
use crate::error::MinerError;

/// Cell values read as missing, alongside the empty cell.
const NULL_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-NaN", "-nan", "<NA>", "N/A", "NA", "NULL", "NaN", "None",
    "n/a", "nan", "null",
];

/// Parses annotation tables into [`Edge`]s.
#[derive(Debug, Clone)]
pub struct EdgeListBuilder {
    gene_column: String,
    motif_column: String,
}

impl Default for EdgeListBuilder {
    fn default() -> Self {
        EdgeListBuilder::new("gene", "motif")
    }
}

impl EdgeListBuilder {
    /// Creates a builder reading the given column names.
    pub fn new(gene_column: impl Into<String>, motif_column: impl Into<String>) -> Self {
        EdgeListBuilder {
            gene_column: gene_column.into(),
            motif_column: motif_column.into(),
        }
    }

    /// Creates a builder using the column names from `config`.
    pub fn from_config(config: &MinerConfig) -> Self {
        EdgeListBuilder::new(&config.gene_column, &config.motif_column)
    }

    /// Reads the table at `path`.
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<Vec<Edge>, MinerError> {
        let file = File::open(path)?;
        self.read(file)
    }

    /// Reads a tab-delimited table with a header row from `reader`.
    pub fn read<R: Read>(&self, reader: R) -> Result<Vec<Edge>, MinerError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers().map_err(parse_error)?.clone();
        let gene_idx = column_index(&headers, &self.gene_column)?;
        let motif_idx = column_index(&headers, &self.motif_column)?;

        let mut edges = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(parse_error)?;
            let (Some(genes), Some(motifs)) = (
                non_null(record.get(gene_idx)),
                non_null(record.get(motif_idx)),
            ) else {
                continue;
            };
            expand_row(genes, motifs, &mut edges);
        }
        Ok(edges)
    }
}

/// Appends the cross product of the comma-separated tokens in `genes` and
/// `motifs`, gene-major.
fn expand_row(genes: &str, motifs: &str, out: &mut Vec<Edge>) {
    let motifs: Vec<&str> = split_tokens(motifs).collect();
    for gene in split_tokens(genes) {
        for motif in &motifs {
            out.push(Edge::new(gene, *motif));
        }
    }
}

fn split_tokens(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(',').map(str::trim).filter(|t| !t.is_empty())
}

fn non_null(cell: Option<&str>) -> Option<&str> {
    let cell = cell?;
    let trimmed = cell.trim();
    if trimmed.is_empty() || NULL_MARKERS.contains(&trimmed) {
        None
    } else {
        Some(cell)
    }
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize, MinerError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| MinerError::MissingColumn {
            column: name.to_string(),
        })
}

fn parse_error(err: csv::Error) -> MinerError {
    MinerError::Parse {
        line: err.position().map(|p| p.line()),
        reason: err.to_string(),
    }
}
