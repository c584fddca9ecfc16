//! Motif accession to gene identifier mapping.
//!
//! Motif scan output names motifs by accession (e.g. `M00234_2.00`). Before the
//! regulatory graph is built, motif endpoints are rewritten to the gene that
//! owns the motif so that the graph is homogeneous over gene identifiers and
//! self-loops become visible.
//!
//! Two sources are understood:
//!
//! - a headerless mapping CSV: `accession,symbol,<unused>,entrez,ensembl`
//! - a MEME motif file, using its `MOTIF <accession> <name>` lines. A name of
//!   the form `(GENE_suffix)` resolves to `GENE`.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use csv::ReaderBuilder;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::edge::Edge;
use crate::error::MinerError;

/// Placeholder written by annotation tools when an id could not be resolved.
const NOT_FOUND: &str = "notfound";

/// Which gene identifier a motif resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdKind {
    #[default]
    Symbol,
    Entrez,
    Ensembl,
}

impl FromStr for IdKind {
    type Err = MinerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "symbol" => Ok(IdKind::Symbol),
            "entrez" => Ok(IdKind::Entrez),
            "ensembl" | "ensemble" => Ok(IdKind::Ensembl),
            other => Err(MinerError::InvalidConfig {
                reason: format!("unknown id kind '{other}', expected symbol/entrez/ensembl"),
            }),
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdKind::Symbol => "symbol",
            IdKind::Entrez => "entrez",
            IdKind::Ensembl => "ensembl",
        };
        f.write_str(name)
    }
}

/// Gene identifiers attached to one motif accession.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotifAnnotation {
    pub symbol: String,
    pub entrez: Option<String>,
    pub ensembl: Option<String>,
}

impl MotifAnnotation {
    fn id(&self, kind: IdKind) -> Option<&str> {
        match kind {
            IdKind::Symbol => Some(self.symbol.as_str()),
            IdKind::Entrez => self.entrez.as_deref(),
            IdKind::Ensembl => self.ensembl.as_deref(),
        }
    }
}

/// Result of rewriting motif endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedEdges {
    pub edges: Vec<Edge>,
    /// Motif accessions left as-is because no identifier of the requested
    /// kind was known.
    pub unmapped: IndexSet<String>,
}

/// Accession -> annotation lookup table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotifMap {
    entries: IndexMap<String, MotifAnnotation>,
}

impl MotifMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the annotation for `accession`.
    pub fn insert(&mut self, accession: impl Into<String>, annotation: MotifAnnotation) {
        self.entries.insert(accession.into(), annotation);
    }

    /// Reads a headerless `accession,symbol,<unused>,entrez,ensembl` file.
    pub fn from_mapping_path(path: impl AsRef<Path>) -> Result<Self, MinerError> {
        Self::from_mapping_csv(File::open(path)?)
    }

    /// Reads a headerless `accession,symbol,<unused>,entrez,ensembl` table.
    pub fn from_mapping_csv<R: Read>(reader: R) -> Result<Self, MinerError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut map = MotifMap::new();
        for result in rdr.records() {
            let record = result.map_err(|e| MinerError::Parse {
                line: e.position().map(|p| p.line()),
                reason: e.to_string(),
            })?;
            if record.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            if record.len() < 5 {
                return Err(MinerError::Parse {
                    line: record.position().map(|p| p.line()),
                    reason: format!("expected at least 5 fields, found {}", record.len()),
                });
            }
            map.insert(
                record[0].trim(),
                MotifAnnotation {
                    symbol: record[1].trim().to_string(),
                    entrez: known_id(&record[3]),
                    ensembl: known_id(&record[4]),
                },
            );
        }
        Ok(map)
    }

    /// Reads `MOTIF` lines of a MEME motif file.
    pub fn from_meme_path(path: impl AsRef<Path>) -> Result<Self, MinerError> {
        Self::from_meme(BufReader::new(File::open(path)?))
    }

    /// Reads `MOTIF <accession> <name>` lines; other lines are ignored, as
    /// are MOTIF lines without a name.
    pub fn from_meme<R: BufRead>(reader: R) -> Result<Self, MinerError> {
        let mut map = MotifMap::new();
        for line in reader.lines() {
            let line = line?;
            if !line.starts_with("MOTIF") {
                continue;
            }
            let words: Vec<&str> = line.split_whitespace().collect();
            if words.len() < 3 {
                continue;
            }
            map.insert(
                words[1],
                MotifAnnotation {
                    symbol: gene_from_motif_name(words[2]).to_string(),
                    entrez: None,
                    ensembl: None,
                },
            );
        }
        Ok(map)
    }

    /// Looks up the annotation of `accession`.
    pub fn get(&self, accession: &str) -> Option<&MotifAnnotation> {
        self.entries.get(accession)
    }

    /// Resolves `accession` to an identifier of the given kind.
    pub fn resolve(&self, accession: &str, kind: IdKind) -> Option<&str> {
        self.entries.get(accession).and_then(|a| a.id(kind))
    }

    /// Rewrites every edge target through the map.
    ///
    /// Edge order is preserved. Targets without a mapping are kept verbatim
    /// and reported in [`MappedEdges::unmapped`].
    pub fn apply(&self, edges: Vec<Edge>, kind: IdKind) -> MappedEdges {
        let mut unmapped = IndexSet::new();
        let edges = edges
            .into_iter()
            .map(|edge| match self.resolve(&edge.target, kind) {
                Some(gene) => Edge::new(edge.source, gene),
                None => {
                    unmapped.insert(edge.target.clone());
                    edge
                }
            })
            .collect();
        MappedEdges { edges, unmapped }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `(OVOL2_HUMAN.H11MO)` -> `OVOL2`; plain names pass through unchanged.
fn gene_from_motif_name(name: &str) -> &str {
    if !name.starts_with('(') {
        return name;
    }
    match (name.find('('), name.find(')')) {
        (Some(start), Some(end)) if end > start => {
            let inner = &name[start + 1..end];
            inner.split('_').next().unwrap_or(inner)
        }
        _ => name,
    }
}

fn known_id(field: &str) -> Option<String> {
    let field = field.trim();
    if field.is_empty() || field.eq_ignore_ascii_case(NOT_FOUND) {
        None
    } else {
        Some(field.to_string())
    }
}
