//! Comma-delimited output tables.
//!
//! Two artifacts leave the pipeline:
//!
//! - the metrics table, with header `TF,Out,In,Total,TF_CliqueFraction` and an
//!   empty fraction cell for TFs without a self-loop;
//! - the clique table, headerless, one `members,score` row per retained
//!   clique where `members` is a single quoted field of comma-joined TF ids.
//!
//! Floats use the shortest representation that reads back to the same value,
//! always with a decimal point (`4.0`, `0.3333333333333333`).

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};

use crate::clique::{Clique, CliqueRankingEntry};
use crate::enrichment::{MetricsRow, NetworkMetricsTable};
use crate::error::MinerError;

const METRICS_HEADER: [&str; 5] = ["TF", "Out", "In", "Total", "TF_CliqueFraction"];

/// Writes the metrics table, header included.
pub fn write_metrics_table<W: Write>(
    writer: W,
    table: &NetworkMetricsTable,
) -> Result<(), MinerError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(METRICS_HEADER)?;
    for row in table.rows() {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the ranked clique table without a header.
pub fn write_clique_ranking<W: Write>(
    writer: W,
    ranking: &[CliqueRankingEntry],
) -> Result<(), MinerError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    for entry in ranking {
        let members = entry.clique.members().join(",");
        wtr.write_record([members, format!("{:?}", entry.score)])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads a metrics table written by [`write_metrics_table`].
pub fn read_metrics_table<R: Read>(reader: R) -> Result<NetworkMetricsTable, MinerError> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = rdr.headers().map_err(parse_error)?.clone();
    for column in METRICS_HEADER {
        if !headers.iter().any(|h| h == column) {
            return Err(MinerError::MissingColumn {
                column: column.to_string(),
            });
        }
    }

    let mut rows = Vec::new();
    for result in rdr.deserialize::<MetricsRow>() {
        rows.push(result.map_err(parse_error)?);
    }
    rows.sort_by(|a, b| a.tf.cmp(&b.tf));
    Ok(NetworkMetricsTable::from_rows(rows))
}

/// Reads a clique table written by [`write_clique_ranking`], preserving row
/// order.
pub fn read_clique_ranking<R: Read>(reader: R) -> Result<Vec<CliqueRankingEntry>, MinerError> {
    let mut rdr = ReaderBuilder::new().has_headers(false).from_reader(reader);
    let mut ranking = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(parse_error)?;
        let line = record.position().map(|p| p.line());
        if record.len() != 2 {
            return Err(MinerError::Parse {
                line,
                reason: format!("expected 2 fields, found {}", record.len()),
            });
        }
        let score: f64 = record[1].trim().parse().map_err(|e| MinerError::Parse {
            line,
            reason: format!("invalid score '{}': {e}", &record[1]),
        })?;
        let clique = Clique::new(
            record[0]
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty()),
        );
        ranking.push(CliqueRankingEntry { clique, score });
    }
    Ok(ranking)
}

/// Paths of the two tables written by [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub metrics: PathBuf,
    pub cliques: PathBuf,
}

/// Writes both tables into `dir`, creating it if needed.
///
/// Both tables are rendered and staged as `<name>.tmp` before either final
/// file is touched; a failure while staging leaves no output behind.
pub fn write_outputs(
    dir: impl AsRef<Path>,
    metrics_file: &str,
    cliques_file: &str,
    table: &NetworkMetricsTable,
    ranking: &[CliqueRankingEntry],
) -> Result<OutputPaths, MinerError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let paths = OutputPaths {
        metrics: dir.join(metrics_file),
        cliques: dir.join(cliques_file),
    };

    let mut metrics = Vec::new();
    write_metrics_table(&mut metrics, table)?;
    let mut cliques = Vec::new();
    write_clique_ranking(&mut cliques, ranking)?;

    let metrics_tmp = staging_path(&paths.metrics);
    let cliques_tmp = staging_path(&paths.cliques);
    fs::write(&metrics_tmp, &metrics)?;
    if let Err(e) = fs::write(&cliques_tmp, &cliques) {
        let _ = fs::remove_file(&metrics_tmp);
        return Err(e.into());
    }
    fs::rename(&metrics_tmp, &paths.metrics)?;
    fs::rename(&cliques_tmp, &paths.cliques)?;
    Ok(paths)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

fn parse_error(err: csv::Error) -> MinerError {
    MinerError::Parse {
        line: err.position().map(|p| p.line()),
        reason: err.to_string(),
    }
}
