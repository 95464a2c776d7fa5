use std::collections::BTreeSet;

use kira_trajectory::error::TrajectoryError;
use kira_trajectory::molecule::{DnaMolecule, RegionBinding, extract_prefixes};
use kira_trajectory::source::MoleculeRecord;
use kira_trajectory::table::DataTable;

fn proteins(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn record() -> MoleculeRecord {
    let table = DataTable::from_columns(vec![
        ("MCM_1_Time_(s)", vec![0.0, 1.0]),
        ("MCM_1_Position_on_DNA", vec![0.0, 1.0]),
        ("MCM_2_Time_(s)", vec![0.0, 1.0]),
        ("MCM_2_Position_on_DNA", vec![0.0, 1.0]),
        ("Cohesin_1_Time_(s)", vec![0.0, 1.0]),
        ("Cohesin_1_Position_on_DNA", vec![0.0, 1.0]),
        ("MCM_10_Intensity", vec![0.0, 1.0]),
    ])
    .unwrap();
    MoleculeRecord::new("meta1", table)
        .with_tag("accept")
        .with_param("Number_MCM", 3.0)
        .with_param("Dna_Top_X1", 0.0)
        .with_param("Dna_Top_Y1", 0.0)
        .with_param("Dna_Bottom_X2", 3.0)
        .with_param("Dna_Bottom_Y2", 4.0)
}

#[test]
fn prefixes_per_protein() {
    let columns: Vec<String> = record().table.column_names().to_vec();
    let found = extract_prefixes(&columns, "MCM").unwrap();
    let expected: BTreeSet<String> = ["MCM_1_", "MCM_10_", "MCM_2_"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn counts_and_prefix_union() {
    let m = DnaMolecule::new("mol1", record(), &proteins(&["MCM", "Cohesin", "ORC"])).unwrap();
    assert_eq!(m.protein_count("MCM"), 3);
    assert_eq!(m.protein_count("Cohesin"), 1);
    assert_eq!(m.protein_count("ORC"), 0);
    assert_eq!(m.prefixes.len(), 4);
    assert!(m.prefixes_of("ORC").unwrap().is_empty());
}

#[test]
fn region_binding_states() {
    let rec = record()
        .with_region("pause_1", "MCM_1_Time_(s)", 1.0, 2.0)
        .with_region("lost", "ORC_1_Time_(s)", 1.0, 2.0);
    let m = DnaMolecule::new("mol1", rec, &proteins(&["MCM", "Cohesin"])).unwrap();

    let bound = m.region("pause_1").unwrap();
    assert_eq!(
        bound.binding,
        RegionBinding::Bound {
            prefix: "MCM_1_".to_string(),
            column: "Time_(s)".to_string()
        }
    );
    assert_eq!(bound.require_binding().unwrap(), ("MCM_1_", "Time_(s)"));
    assert!(bound.contains(1.0) && bound.contains(2.0) && !bound.contains(2.5));

    let lost = m.region("lost").unwrap();
    assert!(!lost.is_bound());
    assert_eq!(lost.raw_column(), "ORC_1_Time_(s)");
    assert!(matches!(
        lost.require_binding(),
        Err(TrajectoryError::Assignment { .. })
    ));
    assert_eq!(m.unbound_regions().count(), 1);
}

#[test]
fn nested_prefixes_are_ambiguous() {
    let table = DataTable::from_columns(vec![("A_1_B_2_Time", vec![0.0])]).unwrap();
    let rec = MoleculeRecord::new("meta1", table).with_region("r", "A_1_B_2_Time", 0.0, 1.0);
    let m = DnaMolecule::new("mol1", rec, &proteins(&["A", "A_1_B"])).unwrap();

    let region = m.region("r").unwrap();
    match &region.binding {
        RegionBinding::Ambiguous { candidates, .. } => {
            assert_eq!(candidates, &vec!["A_1_".to_string(), "A_1_B_2_".to_string()]);
        }
        other => panic!("unexpected binding: {other:?}"),
    }
    assert!(region.require_binding().is_err());
}

#[test]
fn dna_length_from_end_points() {
    let m = DnaMolecule::new("mol1", record(), &proteins(&["MCM"])).unwrap();
    assert!((m.dna_length().unwrap() - 5.0).abs() < 1e-9);

    let bare = MoleculeRecord::new("meta1", DataTable::default());
    let m = DnaMolecule::new("mol2", bare, &proteins(&["MCM"])).unwrap();
    assert!(matches!(
        m.dna_length(),
        Err(TrajectoryError::MissingParameter { .. })
    ));
}
