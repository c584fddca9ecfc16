//! CRC miner CLI.
//!
//! Provides the `crcminer` binary. The `mine` subcommand reads an annotated
//! enhancer table, runs the full CRC pipeline, writes `TF_Degrees.csv` and
//! `Putative_CRC_Cliques.csv` into the output directory, and prints the run
//! summary as JSON to stdout. Progress is logged to stderr.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::Level;

use crcminer_core::{
    CrcMiner, IdKind, MinerConfig, MinerError, MotifMap, PairingRule, TracingObserver,
};

/// Core regulatory circuitry discovery.
#[derive(Parser)]
#[command(name = "crcminer", about = "Core regulatory circuitry discovery")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Mine CRC cliques from an annotated enhancer table.
    Mine {
        /// Tab-delimited table with gene and motif columns.
        table: PathBuf,

        /// Output directory (created if missing).
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// JSON miner configuration; flags below override it.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Motif mapping CSV: accession,symbol,<unused>,entrez,ensembl.
        #[arg(long, conflicts_with = "meme")]
        mapping: Option<PathBuf>,

        /// MEME motif file used to map motif accessions to genes.
        #[arg(long)]
        meme: Option<PathBuf>,

        /// Gene identifier to map motifs to: symbol, entrez, ensembl.
        #[arg(long, default_value = "symbol")]
        id_kind: String,

        /// Abort if the self-regulatory subgraph has more TFs than this.
        #[arg(long)]
        max_subgraph_nodes: Option<usize>,

        /// Abort after finding more maximal cliques than this.
        #[arg(long)]
        max_cliques: Option<usize>,

        /// Pair every two self-regulating TFs, without requiring mutual edges.
        #[arg(long)]
        legacy_pairing: bool,

        /// Log debug detail.
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Parsed `mine` arguments.
struct MineArgs {
    table: PathBuf,
    out_dir: PathBuf,
    config: Option<PathBuf>,
    mapping: Option<PathBuf>,
    meme: Option<PathBuf>,
    id_kind: String,
    max_subgraph_nodes: Option<usize>,
    max_cliques: Option<usize>,
    legacy_pairing: bool,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Mine {
            table,
            out_dir,
            config,
            mapping,
            meme,
            id_kind,
            max_subgraph_nodes,
            max_cliques,
            legacy_pairing,
            verbose,
        } => {
            init_logging(verbose);
            let exit_code = run_mine(MineArgs {
                table,
                out_dir,
                config,
                mapping,
                meme,
                id_kind,
                max_subgraph_nodes,
                max_cliques,
                legacy_pairing,
            });
            process::exit(exit_code);
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Execute the mine subcommand.
///
/// Returns exit code: 0 = success, 1 = pipeline error,
/// 2 = input parse error, 3 = I/O error.
fn run_mine(args: MineArgs) -> i32 {
    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => return report(&e),
    };

    let motif_map = match load_motif_map(&args) {
        Ok(m) => m,
        Err(e) => return report(&e),
    };

    let observer = TracingObserver;
    let mut miner = match CrcMiner::new(config, &observer) {
        Ok(m) => m,
        Err(e) => return report(&e),
    };
    if let Some((map, kind)) = motif_map {
        tracing::info!(motifs = map.len(), %kind, "loaded motif map");
        miner = miner.with_motif_map(map, kind);
    }

    tracing::info!(table = %args.table.display(), "mining");
    let analysis = match miner.mine_path(&args.table) {
        Ok(a) => a,
        Err(e) => return report(&e),
    };

    let paths = match miner.write(&analysis, &args.out_dir) {
        Ok(p) => p,
        Err(e) => return report(&e),
    };
    tracing::info!(
        metrics = %paths.metrics.display(),
        cliques = %paths.cliques.display(),
        "wrote outputs"
    );

    // Print RunSummary as JSON to stdout for machine-readable output
    let json = serde_json::to_string_pretty(&analysis.summary)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize summary: {}\"}}", e));
    println!("{}", json);
    0
}

/// Loads the config file (or defaults) and applies flag overrides.
fn load_config(args: &MineArgs) -> Result<MinerConfig, MinerError> {
    let mut config = match &args.config {
        Some(path) => MinerConfig::from_json_file(path)?,
        None => MinerConfig::default(),
    };
    if args.max_subgraph_nodes.is_some() {
        config.limits.max_subgraph_nodes = args.max_subgraph_nodes;
    }
    if args.max_cliques.is_some() {
        config.limits.max_cliques = args.max_cliques;
    }
    if args.legacy_pairing {
        config.pairing = PairingRule::AnySelfLoopPair;
    }
    Ok(config)
}

fn load_motif_map(args: &MineArgs) -> Result<Option<(MotifMap, IdKind)>, MinerError> {
    let kind: IdKind = args.id_kind.parse()?;
    let map = match (&args.mapping, &args.meme) {
        (Some(path), _) => MotifMap::from_mapping_path(path)?,
        (None, Some(path)) => {
            if kind != IdKind::Symbol {
                return Err(MinerError::InvalidConfig {
                    reason: format!("MEME files only carry gene symbols, not {kind} ids"),
                });
            }
            MotifMap::from_meme_path(path)?
        }
        (None, None) => return Ok(None),
    };
    Ok(Some((map, kind)))
}

/// Prints `err` to stderr and returns its exit code.
fn report(err: &MinerError) -> i32 {
    match err {
        MinerError::MissingColumn { .. } | MinerError::Parse { .. } => {
            eprintln!("Input error: {}", err);
            2
        }
        MinerError::Io(_) | MinerError::Csv(_) => {
            eprintln!("I/O error: {}", err);
            3
        }
        _ => {
            eprintln!("Error: {}", err);
            1
        }
    }
}
