//! End-to-end tests: annotation table on disk -> CrcMiner -> output tables on
//! disk -> tables read back.
//!
//! Each test writes its input into a fresh temp directory.

use std::fs;
use std::path::Path;

use crcminer_core::output::{read_clique_ranking, read_metrics_table};
use crcminer_core::{
    CliqueLimits, CrcMiner, IdKind, MinerConfig, MinerError, MotifMap, SilentObserver,
};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Two overlapping self-regulatory circuits plus some downstream targets.
///
/// - {MYB, RUNX1, TAL1} all mutually regulate and self-regulate.
/// - {TAL1, GATA1, LMO2} likewise; TAL1 sits in both.
/// - FLI1 self-regulates but only regulates MYB one way.
const TABLE: &str = "\
chr\tstart\tend\tgene\tmotif
chr1\t100\t200\tMYB,RUNX1,TAL1\tMYB
chr1\t300\t400\tMYB,RUNX1,TAL1\tRUNX1
chr1\t500\t600\tMYB,RUNX1,TAL1,GATA1,LMO2\tTAL1
chr2\t100\t200\tTAL1,GATA1,LMO2\tGATA1,LMO2
chr2\t300\t400\tFLI1\tFLI1,MYB
chr3\t100\t200\tCD34,KIT\tGATA1
chr3\t300\t400\t\tMYB
chr3\t500\t600\tKIT\tNA
chr4\t100\t200\tMYB\tCD34,KIT
";

fn write_table(dir: &Path, text: &str) -> std::path::PathBuf {
    let path = dir.join("annotated_enhancers.tsv");
    fs::write(&path, text).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn mines_overlapping_circuits() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_table(dir.path(), TABLE);

    let miner = CrcMiner::new(MinerConfig::default(), &SilentObserver).unwrap();
    let analysis = miner.mine_path(&input).unwrap();

    assert_eq!(
        analysis.self_loops.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["MYB", "RUNX1", "TAL1", "GATA1", "LMO2", "FLI1"]
    );
    assert!(!analysis.subgraph.has_edge("FLI1", "MYB"));

    let ranked: Vec<Vec<String>> = analysis
        .ranking
        .iter()
        .map(|e| e.clique.members().to_vec())
        .collect();
    assert_eq!(ranked.len(), 2);
    assert!(ranked.contains(&vec!["MYB".into(), "RUNX1".into(), "TAL1".into()]));
    assert!(ranked.contains(&vec!["GATA1".into(), "LMO2".into(), "TAL1".into()]));

    // MYB: MYB, RUNX1, TAL1, CD34, KIT = 5; RUNX1: 3; TAL1: 5 -> 13/3.
    // GATA1: TAL1, GATA1, LMO2 = 3; LMO2: 3; TAL1: 5 -> 11/3.
    assert_eq!(
        analysis.ranking[0].clique.members(),
        &["MYB", "RUNX1", "TAL1"]
    );
    assert!((analysis.ranking[0].score - 13.0 / 3.0).abs() < 1e-12);
    assert!((analysis.ranking[1].score - 11.0 / 3.0).abs() < 1e-12);

    let fraction = |tf: &str| analysis.metrics.get(tf).unwrap().clique_fraction;
    assert_eq!(fraction("TAL1"), Some(1.0));
    assert_eq!(fraction("MYB"), Some(0.5));
    assert_eq!(fraction("FLI1"), Some(0.0));
    assert_eq!(fraction("KIT"), None);

    for row in analysis.metrics.rows() {
        if let Some(f) = row.clique_fraction {
            assert!((0.0..=1.0).contains(&f));
        }
    }
}

#[test]
fn outputs_roundtrip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_table(dir.path(), TABLE);
    let out_dir = dir.path().join("out");

    let miner = CrcMiner::new(MinerConfig::default(), &SilentObserver).unwrap();
    let analysis = miner.mine_path(&input).unwrap();
    let paths = miner.write(&analysis, &out_dir).unwrap();

    assert_eq!(paths.metrics, out_dir.join("TF_Degrees.csv"));
    assert_eq!(paths.cliques, out_dir.join("Putative_CRC_Cliques.csv"));

    let metrics = read_metrics_table(fs::File::open(&paths.metrics).unwrap()).unwrap();
    assert_eq!(metrics.len(), analysis.metrics.len());
    for (a, b) in analysis.metrics.rows().iter().zip(metrics.rows()) {
        assert_eq!(
            (&a.tf, a.out_degree, a.in_degree, a.total),
            (&b.tf, b.out_degree, b.in_degree, b.total)
        );
        match (a.clique_fraction, b.clique_fraction) {
            (Some(x), Some(y)) => assert!((x - y).abs() < 1e-12),
            (None, None) => {}
            other => panic!("fraction mismatch for {}: {other:?}", a.tf),
        }
    }

    let ranking = read_clique_ranking(fs::File::open(&paths.cliques).unwrap()).unwrap();
    assert_eq!(ranking.len(), analysis.ranking.len());
    for (a, b) in analysis.ranking.iter().zip(&ranking) {
        assert_eq!(a.clique, b.clique);
        assert!((a.score - b.score).abs() < 1e-12);
    }

    let first_line = fs::read_to_string(&paths.metrics)
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .to_string();
    assert_eq!(first_line, "TF,Out,In,Total,TF_CliqueFraction");
}

#[test]
fn mapped_motif_accessions_join_the_graph() {
    let dir = tempfile::tempdir().unwrap();
    let table = "\
gene\tmotif
A,B,C\tMA0001.1,MA0002.1,MA0003.1
A\tMA0099.1
";
    let input = write_table(dir.path(), table);
    let mapping = dir.path().join("mapping.csv");
    fs::write(
        &mapping,
        "MA0001.1,A,A,1,ENSG1\nMA0002.1,B,B,2,ENSG2\nMA0003.1,C,C,3,ENSG3\n",
    )
    .unwrap();

    let map = MotifMap::from_mapping_path(&mapping).unwrap();
    let miner = CrcMiner::new(MinerConfig::default(), &SilentObserver)
        .unwrap()
        .with_motif_map(map, IdKind::Symbol);
    let analysis = miner.mine_path(&input).unwrap();

    assert_eq!(analysis.summary.unmapped_motifs, 1);
    assert_eq!(analysis.ranking.len(), 1);
    // A -> A, B, C, MA0099.1
    assert_eq!(analysis.graph.out_degree("A").unwrap(), 4);
}

#[test]
fn missing_motif_column_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_table(dir.path(), "chr\tgene\nchr1\tA\n");
    let miner = CrcMiner::new(MinerConfig::default(), &SilentObserver).unwrap();
    match miner.mine_path(&input) {
        Err(MinerError::MissingColumn { column }) => assert_eq!(column, "motif"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn missing_input_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let miner = CrcMiner::new(MinerConfig::default(), &SilentObserver).unwrap();
    assert!(matches!(
        miner.mine_path(dir.path().join("nope.tsv")),
        Err(MinerError::Io(_))
    ));
}

#[test]
fn node_guard_stops_dense_subgraphs() {
    let config = MinerConfig {
        limits: CliqueLimits {
            max_subgraph_nodes: Some(4),
            max_cliques: None,
        },
        ..Default::default()
    };
    let miner = CrcMiner::new(config, &SilentObserver).unwrap();
    assert!(matches!(
        miner.mine_reader(TABLE.as_bytes()),
        Err(MinerError::CliqueLimitExceeded { actual: 6, max: 4, .. })
    ));
}
