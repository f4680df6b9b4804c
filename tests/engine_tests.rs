//! End-to-end comparison scenarios through the public library API.

use std::collections::BTreeSet;
use std::io::Write;

use gene_remap::matching::filter::HitFilter;
use gene_remap::matching::reciprocal::find_bbh;
use gene_remap::matching::EngineConfig;
use gene_remap::parsing::blast::parse_blast_file;
use gene_remap::parsing::genes::parse_gene_file;
use gene_remap::{
    parse_clusters, AlignmentHit, Gene, GeneStructureEngine, GeneTable, IdMaps, RelationshipKind,
    Strand,
};

fn gene(id: &str, chrom: &str, start: u64, end: u64) -> Gene {
    Gene::new(id, chrom, start, end, Strand::Forward).unwrap()
}

fn hit(q: &str, s: &str, bitscore: f64) -> AlignmentHit {
    AlignmentHit::new(q, s)
        .with_identity(97.0)
        .with_alignment_length(950)
        .with_query_span(1, 950, 1000)
        .with_subject_span(1, 950, 1000)
        .with_evalue(1e-80)
        .with_bitscore(bitscore)
}

/// Forward and reverse hits for a set of mutual links
fn mutual(links: &[(&str, &str, f64)]) -> (Vec<AlignmentHit>, Vec<AlignmentHit>) {
    let forward = links.iter().map(|(r, t, b)| hit(r, t, *b)).collect();
    let reverse = links.iter().map(|(r, t, b)| hit(t, r, *b)).collect();
    (forward, reverse)
}

#[test]
fn test_adjacent_merge_has_full_confidence() {
    let ref_genes = GeneTable::from_genes(vec![
        gene("G1", "chr1", 100, 2000),
        gene("G2", "chr1", 2100, 4000),
    ])
    .unwrap();
    let new_genes = GeneTable::from_genes(vec![gene("U1", "chrU", 100, 4000)]).unwrap();
    let (forward, reverse) = mutual(&[("G1", "U1", 900.0), ("G2", "U1", 880.0)]);

    let engine = GeneStructureEngine::new(&ref_genes, &new_genes);
    let report = engine.run(&forward, &reverse, IdMaps::default()).unwrap();

    let rels = &report.classification.relationships;
    assert_eq!(rels.len(), 1);
    let merge = &rels[0];
    assert_eq!(merge.kind, RelationshipKind::Merge);
    assert_eq!(merge.anchor_id, "U1");
    assert_eq!(merge.partner_ids, vec!["G1", "G2"]);
    assert!(merge.evidence.reciprocal);
    assert!(merge.evidence.adjacent);
    assert!((merge.evidence.coverage - 1.0).abs() < 1e-9);
    assert!((merge.confidence - 1.0).abs() < 1e-9);
    assert_eq!(report.classification.skipped_candidates, 0);
}

#[test]
fn test_split_with_one_directional_partner_is_not_reported() {
    let ref_genes = GeneTable::from_genes(vec![gene("R1", "chr1", 1, 3000)]).unwrap();
    let new_genes = GeneTable::from_genes(vec![
        gene("T1", "chr1", 1, 1500),
        gene("T2", "chr1", 1600, 3000),
    ])
    .unwrap();

    let forward = vec![hit("R1", "T1", 900.0), hit("R1", "T2", 850.0)];
    // T2 never finds R1 in the reverse search
    let reverse = vec![hit("T1", "R1", 900.0)];

    let engine = GeneStructureEngine::new(&ref_genes, &new_genes);
    let report = engine.run(&forward, &reverse, IdMaps::default()).unwrap();

    assert_eq!(report.classification.splits().count(), 0);
    assert_eq!(report.classification.non_reciprocal_candidates, 1);
}

#[test]
fn test_split_detected_and_dispersed_split_filtered() {
    let ref_genes = GeneTable::from_genes(vec![
        gene("R1", "chr1", 1, 3000),
        gene("R2", "chr2", 1, 3000),
    ])
    .unwrap();
    let new_genes = GeneTable::from_genes(vec![
        gene("T1", "chr1", 1, 1500),
        gene("T2", "chr1", 1600, 3000),
        gene("T3", "chr2", 1, 1500),
        gene("T4", "chr5", 1, 1500),
    ])
    .unwrap();
    let (forward, reverse) = mutual(&[
        ("R1", "T1", 900.0),
        ("R1", "T2", 850.0),
        ("R2", "T3", 900.0),
        ("R2", "T4", 850.0),
    ]);

    let mut config = EngineConfig::default();
    config.require_adjacency = true;
    let engine = GeneStructureEngine::with_config(&ref_genes, &new_genes, config).unwrap();
    let report = engine.run(&forward, &reverse, IdMaps::default()).unwrap();

    let splits: Vec<_> = report.classification.splits().collect();
    assert_eq!(splits.len(), 1);
    assert_eq!(splits[0].anchor_id, "R1");
    assert_eq!(splits[0].partner_ids, vec!["T1", "T2"]);
}

#[test]
fn test_all_confidences_bounded() {
    let ref_genes = GeneTable::from_genes(vec![
        gene("A", "chr1", 1, 100),
        gene("B", "chr1", 200, 50_000),
        gene("C", "chr2", 1, 10),
    ])
    .unwrap();
    let new_genes = GeneTable::from_genes(vec![
        gene("X", "chr1", 1, 10),
        gene("Y", "chr9", 1, 90_000),
        gene("Z", "chr3", 1, 5),
    ])
    .unwrap();
    let (forward, reverse) = mutual(&[
        ("A", "X", 100.0),
        ("A", "Y", 90.0),
        ("B", "Y", 300.0),
        ("C", "Y", 50.0),
        ("C", "Z", 40.0),
        ("B", "Z", 20.0),
    ]);

    let mut config = EngineConfig::default();
    config.min_confidence = 0.0;
    let engine = GeneStructureEngine::with_config(&ref_genes, &new_genes, config).unwrap();
    let report = engine.run(&forward, &reverse, IdMaps::default()).unwrap();

    assert!(!report.classification.relationships.is_empty());
    for rel in &report.classification.relationships {
        assert!((0.0..=1.0).contains(&rel.confidence));
        assert!(rel.partner_ids.len() >= 2);
    }
}

#[test]
fn test_bbh_symmetric_under_direction_swap() {
    let forward = vec![
        hit("G1", "U1", 500.0),
        hit("G1", "U2", 300.0),
        hit("G2", "U2", 450.0),
        hit("G3", "U1", 200.0),
    ];
    let reverse = vec![
        hit("U1", "G1", 510.0),
        hit("U2", "G2", 440.0),
        hit("U2", "G1", 100.0),
    ];

    let pairs: BTreeSet<(String, String)> = find_bbh(&forward, &reverse)
        .into_iter()
        .map(|p| (p.ref_gene, p.target_gene))
        .collect();
    let swapped: BTreeSet<(String, String)> = find_bbh(&reverse, &forward)
        .into_iter()
        .map(|p| (p.target_gene, p.ref_gene))
        .collect();

    assert_eq!(pairs, swapped);
    assert_eq!(pairs.len(), 2);
}

#[test]
fn test_hit_filter_thresholds() {
    let filter = HitFilter::new(80.0, 70.0, 1e-10).unwrap();
    let low_identity = AlignmentHit::new("q", "s")
        .with_identity(75.0)
        .with_alignment_length(90)
        .with_query_span(1, 90, 100)
        .with_evalue(1e-50);
    let good = AlignmentHit::new("q", "s")
        .with_identity(85.0)
        .with_alignment_length(90)
        .with_query_span(1, 90, 100)
        .with_evalue(1e-50);

    let kept = filter.filter(&[low_identity, good.clone()]);
    assert_eq!(kept, vec![good]);
}

#[test]
fn test_cluster_stream_partition() {
    let set = parse_clusters([("A", "A"), ("A", "B"), ("A", "C"), ("D", "D")]);
    let stats = set.stats();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].size, 3);
    assert_eq!(stats[0].members, vec!["A", "B", "C"]);
    assert_eq!(stats[1].size, 1);
    assert_eq!(stats[1].members, vec!["D"]);
}

#[test]
fn test_degenerate_inputs_are_empty() {
    let empty = GeneTable::new();
    let engine = GeneStructureEngine::new(&empty, &empty);
    let report = engine.run(&[], &[], IdMaps::default()).unwrap();
    assert!(report.bbh.is_empty());
    assert!(report.orthologs.is_empty());
    assert!(report.classification.relationships.is_empty());

    assert!(parse_clusters(Vec::<(&str, &str)>::new()).is_empty());
}

#[test]
fn test_pipeline_from_files() {
    let dir = tempfile::tempdir().unwrap();

    let ref_bed = dir.path().join("ref.bed");
    std::fs::write(&ref_bed, "chr1\t99\t2000\tG1\t0\t+\nchr1\t2099\t4000\tG2\t0\t+\n").unwrap();
    let new_tsv = dir.path().join("new.tsv");
    std::fs::write(&new_tsv, "id\tchrom\tstart\tend\tstrand\nU1\tchrU\t100\t4000\t+\n").unwrap();

    let fwd = dir.path().join("fwd.tsv");
    let mut f = std::fs::File::create(&fwd).unwrap();
    writeln!(f, "G1\tU1\t98.0\t630\t10\t0\t1\t630\t1\t630\t1e-200\t1200\t633\t1300").unwrap();
    writeln!(f, "G2\tU1\t97.0\t630\t15\t0\t1\t630\t660\t1290\t1e-190\t1150\t633\t1300").unwrap();
    let rev = dir.path().join("rev.tsv");
    let mut r = std::fs::File::create(&rev).unwrap();
    writeln!(r, "U1\tG1\t98.0\t630\t10\t0\t1\t630\t1\t630\t1e-200\t1200\t1300\t633").unwrap();
    writeln!(r, "U1\tG2\t97.0\t630\t15\t0\t660\t1290\t1\t630\t1e-190\t1150\t1300\t633").unwrap();

    let ref_genes = parse_gene_file(&ref_bed).unwrap();
    let new_genes = parse_gene_file(&new_tsv).unwrap();
    let forward = parse_blast_file(&fwd).unwrap();
    let reverse = parse_blast_file(&rev).unwrap();

    let engine = GeneStructureEngine::new(&ref_genes, &new_genes);
    let report = engine.run(&forward, &reverse, IdMaps::default()).unwrap();

    assert_eq!(report.bbh.len(), 1);
    assert_eq!(report.bbh[0].ref_gene, "G1");
    assert_eq!(report.classification.merges().count(), 1);
}
