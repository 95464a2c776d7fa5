use std::collections::BTreeMap;

use kira_trajectory::archive::{
    DnaMoleculeArchive, MoleculeArchive, NOT_APPLICABLE, SingleMoleculeArchive, ValidationStatus,
    describe_archives,
};
use kira_trajectory::error::TrajectoryError;
use kira_trajectory::segments::{
    PauseParams, PauseThreshold, Segment, SegmentColumn, SegmentKey,
};
use kira_trajectory::source::{MemoryBackend, MetadataRecord, MoleculeEntry, MoleculeRecord};
use kira_trajectory::table::DataTable;

fn metadata(nucleotide: &str, count: f64) -> MetadataRecord {
    MetadataRecord::default()
        .with_string("nucleotide", nucleotide)
        .with_string("nacl", "150")
        .with_string("mcm", "wt")
        .with_param("DnaMoleculeCount", count)
}

fn rate_key() -> SegmentKey {
    SegmentKey::new("MCM_1_Time_(s)", "MCM_1_Position_on_DNA", "whole")
}

fn mol1() -> MoleculeEntry {
    let table = DataTable::from_columns(vec![
        ("MCM_1_Time_(s)", vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0]),
        ("MCM_1_Position_on_DNA", vec![0.0, 25.0, 50.0, 51.0, 52.0, 77.0, 102.0]),
        ("MCM_1_Intensity", vec![9.0; 7]),
    ])
    .unwrap();
    let record = MoleculeRecord::new("m1", table)
        .with_tag("accept")
        .with_tag("origin")
        .with_param("Number_MCM", 1.0)
        .with_region("pause_start", "MCM_1_Time_(s)", 0.0, 5.0);
    MoleculeEntry::from(record)
        .with_segments(
            rate_key(),
            vec![
                Segment::new(0.0, 10.0, 0.0, 50.0, 0.0, 0.1, 5.0, 0.1),
                Segment::new(10.0, 20.0, 50.0, 52.0, 48.0, 0.1, 0.1, 0.1),
                Segment::new(20.0, 30.0, 52.0, 102.0, -48.0, 0.1, 5.0, 9.0),
            ],
        )
        .with_segments(
            SegmentKey::new("MCM_1_Time_(s)", "MCM_1_Intensity", "whole"),
            vec![Segment::new(0.0, 30.0, 9.0, 9.0, 9.0, 0.1, 0.0, 0.1)],
        )
}

fn mol2(declared: f64) -> MoleculeRecord {
    let table = DataTable::from_columns(vec![
        ("MCM_1_Time_(s)", vec![0.0, 5.0]),
        ("MCM_1_Position_on_DNA", vec![0.0, 1.0]),
    ])
    .unwrap();
    MoleculeRecord::new("m2", table)
        .with_tag("accept")
        .with_param("Number_MCM", declared)
}

fn rejected() -> MoleculeRecord {
    MoleculeRecord::new("m2", DataTable::default()).with_tag("reject_dna")
}

fn backend() -> MemoryBackend {
    MemoryBackend::new("batch_A.json")
        .with_metadata("m1", metadata("dsDNA", 10.0))
        .with_metadata("m2", metadata("dsDNA", 5.0))
        .with_molecule("mol1", mol1())
        .with_molecule("mol2", mol2(1.0))
        .with_molecule("mol3", rejected())
}

fn load(backend: &MemoryBackend) -> DnaMoleculeArchive {
    DnaMoleculeArchive::load(backend, "accept", BTreeMap::new()).unwrap()
}

fn fixed(cutoff: f64) -> PauseParams {
    PauseParams {
        threshold: PauseThreshold::Fixed(cutoff),
        ..PauseParams::default()
    }
}

#[test]
fn load_collects_molecules_and_unions() {
    let archive = load(&backend());
    assert_eq!(archive.len(), 2);
    assert_eq!(archive.metadata_count(), 2);
    assert!(archive.proteins.contains("MCM"));
    assert_eq!(archive.proteins.len(), 1);
    assert!(archive.tags.contains("accept") && archive.tags.contains("origin"));
    assert!(!archive.tags.contains("reject_dna"));
    assert_eq!(archive.prefixes.iter().collect::<Vec<_>>(), vec!["MCM_1_"]);
    assert_eq!(archive.dna_molecule_count, Some(14));
    assert_eq!(archive.conditions.nucleotide, "dsDNA");
    assert!(archive.conditions.defaults_applied.is_empty());
}

#[test]
fn inconsistent_nucleotide_fails_load() {
    let backend = backend().with_metadata("m2", metadata("ssDNA", 5.0));
    let err = DnaMoleculeArchive::load(&backend, "accept", BTreeMap::new()).unwrap_err();
    match err {
        TrajectoryError::Consistency { condition, values } => {
            assert_eq!(condition, "nucleotide");
            assert_eq!(values, vec!["dsDNA".to_string(), "ssDNA".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unset_condition_defaults_to_not_applicable() {
    let meta = MetadataRecord::default()
        .with_string("nucleotide", "ATP")
        .with_string("nacl", "50");
    let backend = MemoryBackend::new("b")
        .with_metadata("m1", meta)
        .with_molecule("mol2", mol2(1.0));
    let archive = load(&backend);
    assert_eq!(archive.conditions.mcm, NOT_APPLICABLE);
    assert_eq!(archive.conditions.defaults_applied, vec!["mcm".to_string()]);
    assert_eq!(archive.dna_molecule_count, None);
}

#[test]
fn validate_params_passes_and_fails() {
    let archive = load(&backend());
    assert_eq!(archive.validate_params(), ValidationStatus::Passed);

    let backend = backend().with_molecule("mol2", mol2(2.0));
    let status = load(&backend).validate_params();
    assert_eq!(
        status,
        ValidationStatus::Failed(TrajectoryError::Validation {
            uid: "mol2".to_string(),
            protein: "MCM".to_string(),
            structural: 1,
            declared: 2.0,
        })
    );
    assert!(status.label().contains("mol2"));
}

#[test]
fn validate_params_reports_missing_declaration() {
    let table = DataTable::from_columns(vec![("MCM_1_Position_on_DNA", vec![0.0])]).unwrap();
    let bare = MoleculeRecord::new("m1", table).with_tag("accept");
    let backend = MemoryBackend::new("b").with_molecule("mol9", bare);
    let status = load(&backend).validate_params();
    assert!(matches!(
        status,
        ValidationStatus::Failed(TrajectoryError::MissingParameter { ref uid, .. }) if uid == "mol9"
    ));
}

#[test]
fn attach_filter_and_remove_idle() {
    let backend = backend();
    let mut archive = load(&backend);
    assert_eq!(archive.add_segments_tables(&backend).unwrap(), 2);

    let mol = archive.molecule_by_uid("mol1").unwrap();
    let rate = &mol.segment_tables[0];
    assert_eq!(rate.prefix(), "MCM_1_");
    assert_eq!(rate.x_column(), "Time_(s)");
    assert_eq!(rate.y_column(), "Position_on_DNA");

    assert_eq!(archive.filter_segments(5.0), 1);

    let outcome = archive.detect_pauses(&fixed(1.0));
    assert_eq!(outcome.flagged, 1);
    assert_eq!(outcome.paused, 1);

    let removed = archive.add_df_noidle(SegmentColumn::B).unwrap();
    assert_eq!(removed, 3);
    let mol = archive.molecule_by_uid("mol1").unwrap();
    let noidle = mol.df_noidle.as_ref().unwrap();
    assert_eq!(noidle.column("MCM_1_Time_(s)").unwrap(), &[0.0, 5.0, 25.0, 30.0]);
    assert_eq!(mol.molecule.table.n_rows(), 7);

    let untouched = archive.molecule_by_uid("mol2").unwrap();
    assert_eq!(untouched.df_noidle.as_ref().unwrap().n_rows(), 2);
}

#[test]
fn idle_removal_needs_pause_detection() {
    let backend = backend();
    let mut archive = load(&backend);
    archive.add_segments_tables(&backend).unwrap();
    let err = archive.add_df_noidle(SegmentColumn::B).unwrap_err();
    assert!(matches!(err, TrajectoryError::Sequencing { ref uid, .. } if uid == "mol1"));
}

#[test]
fn unassignable_segments_fail() {
    let entry = MoleculeEntry::from(mol2(1.0)).with_segments(
        SegmentKey::new("ORC_1_Time_(s)", "ORC_1_Position_on_DNA", "whole"),
        vec![],
    );
    let backend = backend().with_molecule("mol2", entry);
    let mut archive = load(&backend);
    let err = archive.add_segments_tables(&backend).unwrap_err();
    match err {
        TrajectoryError::Assignment { uid, subject, .. } => {
            assert_eq!(uid, "mol2");
            assert!(subject.contains("ORC_1_Time_(s)"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_y_column_fails_classification() {
    let entry = MoleculeEntry::from(mol2(1.0)).with_segments(
        SegmentKey::new("MCM_1_Time_(s)", "MCM_1_Speed", "whole"),
        vec![],
    );
    let backend = backend().with_molecule("mol2", entry);
    let mut archive = load(&backend);
    let err = archive.add_segments_tables(&backend).unwrap_err();
    assert!(matches!(err, TrajectoryError::TypeClassification { .. }));
}

#[test]
fn idle_removal_by_region() {
    let mut archive = load(&backend());
    let removed = archive.add_df_noidle_by_region("MCM_1_", "pause").unwrap();
    assert_eq!(removed, 2);
    let mol = archive.molecule_by_uid("mol1").unwrap();
    assert_eq!(
        mol.df_noidle.as_ref().unwrap().column("MCM_1_Time_(s)").unwrap(),
        &[10.0, 15.0, 20.0, 25.0, 30.0]
    );
}

#[test]
fn molecules_by_tags_requires_all_tags() {
    let archive = load(&backend());
    let uids: Vec<&str> = archive
        .molecules_by_tags(&["accept", "origin"])
        .map(|m| m.uid())
        .collect();
    assert_eq!(uids, vec!["mol1"]);
    assert_eq!(archive.molecules_by_tags(&["accept"]).count(), 2);
}

#[test]
fn describe_rows() {
    let mut labels = BTreeMap::new();
    labels.insert("MCM".to_string(), "JF646".to_string());
    let dna = DnaMoleculeArchive::load(&backend(), "accept", labels.clone()).unwrap();
    let single = SingleMoleculeArchive::load(&backend(), "accept", labels).unwrap();
    let archives: Vec<&dyn MoleculeArchive> = vec![&dna, &single];
    let rows = describe_archives(&archives);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "batch_A");
    assert_eq!(rows[0].datasets, 2);
    assert_eq!(rows[0].molecules, 2);
    assert_eq!(rows[0].labeled_proteins, "JF646-MCM");
    assert_eq!(rows[0].nacl, "150");
    assert_eq!(rows[0].validation, "passed");
}

#[test]
fn single_archive_needs_one_label() {
    let err = SingleMoleculeArchive::load(&backend(), "accept", BTreeMap::new()).unwrap_err();
    assert!(matches!(err, TrajectoryError::Configuration(_)));
}

fn without_time_column() -> MemoryBackend {
    let table =
        DataTable::from_columns(vec![("MCM_1_Position_on_DNA", vec![0.0, 1.0, 2.0])]).unwrap();
    let record = MoleculeRecord::new("m1", table)
        .with_tag("accept")
        .with_param("Number_MCM", 1.0)
        .with_region("pause_start", "MCM_1_Time_(s)", 0.0, 1.0);
    let entry = MoleculeEntry::from(record).with_segments(
        rate_key(),
        vec![Segment::new(0.0, 2.0, 0.0, 0.0, 0.0, 0.1, 0.1, 0.1)],
    );
    MemoryBackend::new("b").with_molecule("molX", entry)
}

#[test]
fn idle_removal_names_molecule_on_missing_column() {
    let backend = without_time_column();
    let mut archive = load(&backend);
    archive.add_segments_tables(&backend).unwrap();
    archive.detect_pauses(&fixed(1.0));

    let err = archive.add_df_noidle(SegmentColumn::B).unwrap_err();
    assert_eq!(err.uid(), Some("molX"));
    assert!(matches!(
        err,
        TrajectoryError::MissingColumn { ref column, .. } if column == "MCM_1_Time_(s)"
    ));
}

#[test]
fn region_idle_removal_names_molecule_on_missing_column() {
    let mut archive = load(&without_time_column());
    let err = archive
        .add_df_noidle_by_region("MCM_1_", "pause")
        .unwrap_err();
    assert_eq!(err.uid(), Some("molX"));
    assert_eq!(err.kind(), "table");
}
