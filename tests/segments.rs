use kira_trajectory::error::TrajectoryError;
use kira_trajectory::segments::{
    PauseParams, PauseThreshold, Segment, SegmentColumn, SegmentKind, SegmentsTable,
};

fn seg(x1: f64, x2: f64, y1: f64, y2: f64, a: f64, b: f64, sigma_b: f64) -> Segment {
    Segment::new(x1, x2, y1, y2, a, 0.1, b, sigma_b)
}

fn rate_table(rows: Vec<Segment>) -> SegmentsTable {
    SegmentsTable::new("mol1", "MCM_1_", "Time_(s)", "Position_on_DNA", "whole", rows).unwrap()
}

fn fixed(cutoff: f64) -> PauseParams {
    PauseParams {
        threshold: PauseThreshold::Fixed(cutoff),
        ..PauseParams::default()
    }
}

#[test]
fn kind_follows_y_column() {
    let rate = rate_table(vec![]);
    assert_eq!(rate.kind(), SegmentKind::Rate);

    let bleach =
        SegmentsTable::new("mol1", "MCM_1_", "Time_(s)", "Intensity", "whole", vec![]).unwrap();
    assert_eq!(bleach.kind(), SegmentKind::Bleaching);

    let err = SegmentsTable::new("mol1", "MCM_1_", "Time_(s)", "Speed", "whole", vec![])
        .unwrap_err();
    assert!(matches!(
        err,
        TrajectoryError::TypeClassification { ref y_column, .. } if y_column == "Speed"
    ));
}

#[test]
fn rows_sorted_by_x1() {
    let table = rate_table(vec![
        seg(10.0, 20.0, 0.0, 0.0, 0.0, 5.0, 0.1),
        seg(0.0, 10.0, 0.0, 0.0, 0.0, 5.0, 0.1),
    ]);
    assert_eq!(table.rows()[0].x1, 0.0);
    assert_eq!(table.rows()[1].x1, 10.0);
}

#[test]
fn filter_keeps_rows_below_sigma() {
    let mut table = rate_table(vec![
        seg(0.0, 1.0, 0.0, 0.0, 0.0, 5.0, 1.0),
        seg(1.0, 2.0, 0.0, 0.0, 0.0, 5.0, 6.0),
        seg(2.0, 3.0, 0.0, 0.0, 0.0, 5.0, 3.0),
        seg(3.0, 4.0, 0.0, 0.0, 0.0, 5.0, 10.0),
    ]);
    let removed = table.filter_segments(5.0);
    assert_eq!(removed, 2);
    assert!(table.is_filtered());
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[0].sigma_b, 1.0);
    assert_eq!(table.rows()[1].sigma_b, 3.0);
}

#[test]
fn filter_boundary_is_removed() {
    let mut table = rate_table(vec![seg(0.0, 1.0, 0.0, 0.0, 0.0, 5.0, 5.0)]);
    assert_eq!(table.filter_segments(5.0), 1);
    assert!(table.is_empty());
}

#[test]
fn bleaching_tables_untouched() {
    let rows = vec![
        seg(0.0, 5.0, 0.0, 0.0, 0.0, 0.0, 100.0),
        seg(5.0, 10.0, 0.0, 0.0, 0.0, 0.0, 100.0),
    ];
    let mut table =
        SegmentsTable::new("mol1", "MCM_1_", "Time_(s)", "Intensity", "whole", rows).unwrap();
    assert_eq!(table.filter_segments(1.0), 0);
    assert!(!table.is_filtered());

    let outcome = table.detect_pauses(&fixed(1.0));
    assert_eq!(outcome.flagged, 0);
    assert_eq!(table.len(), 2);
    assert!(!table.has_pause_column(SegmentColumn::B));
}

#[test]
fn adjacent_pauses_merge_with_weighted_values() {
    let mut table = rate_table(vec![
        seg(0.0, 5.0, 100.0, 100.0, 2.0, 1.0, 0.2),
        seg(5.0, 10.0, 100.0, 100.0, 4.0, 1.0, 0.4),
    ]);
    let outcome = table.detect_pauses(&fixed(2.0));
    assert_eq!(outcome.flagged, 2);
    assert_eq!(outcome.merged, 1);
    assert_eq!(outcome.paused, 1);

    assert_eq!(table.len(), 1);
    let merged = &table.rows()[0];
    assert_eq!(merged.x1, 0.0);
    assert_eq!(merged.x2, 10.0);
    assert!((merged.b - 1.0).abs() < 1e-9);
    assert!((merged.a - 3.0).abs() < 1e-9);
    assert!((merged.sigma_b - 0.3).abs() < 1e-9);
    assert_eq!(merged.pause(SegmentColumn::B), Some(true));
}

#[test]
fn unequal_lengths_weight_the_average() {
    let mut table = rate_table(vec![
        seg(0.0, 9.0, 0.0, 0.0, 0.0, 0.0, 0.1),
        seg(9.0, 10.0, 0.0, 0.0, 0.0, 0.9, 0.1),
    ]);
    table.detect_pauses(&fixed(1.0));
    assert_eq!(table.len(), 1);
    assert!((table.rows()[0].b - 0.09).abs() < 1e-9);
}

#[test]
fn chains_of_pauses_collapse_into_one() {
    let mut table = rate_table(vec![
        seg(0.0, 1.0, 0.0, 0.0, 0.0, 0.1, 0.1),
        seg(1.0, 2.0, 0.0, 0.0, 0.0, 0.1, 0.1),
        seg(2.0, 3.0, 0.0, 0.0, 0.0, 0.1, 0.1),
        seg(3.0, 4.0, 0.0, 50.0, 0.0, 12.0, 0.1),
    ]);
    let outcome = table.detect_pauses(&fixed(1.0));
    assert_eq!(outcome.merged, 2);
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[0].x1, 0.0);
    assert_eq!(table.rows()[0].x2, 3.0);
    assert!(!table.rows()[1].is_paused(SegmentColumn::B));
}

#[test]
fn gap_between_pauses_prevents_merge() {
    let mut table = rate_table(vec![
        seg(0.0, 5.0, 0.0, 0.0, 0.0, 0.1, 0.1),
        seg(6.0, 10.0, 0.0, 0.0, 0.0, 0.1, 0.1),
    ]);
    let outcome = table.detect_pauses(&fixed(1.0));
    assert_eq!(outcome.flagged, 2);
    assert_eq!(outcome.merged, 0);
    assert_eq!(table.len(), 2);
}

#[test]
fn y_jump_at_boundary_prevents_merge() {
    let mut table = rate_table(vec![
        seg(0.0, 5.0, 0.0, 0.0, 0.0, 0.1, 0.1),
        seg(5.0, 10.0, 1000.0, 1000.0, 0.0, 0.1, 0.1),
    ]);
    table.detect_pauses(&fixed(1.0));
    assert_eq!(table.len(), 2);

    let mut close = rate_table(vec![
        seg(0.0, 5.0, 0.0, 0.0, 0.0, 0.1, 0.1),
        seg(5.0, 10.0, 999.0, 999.0, 0.0, 0.1, 0.1),
    ]);
    close.detect_pauses(&fixed(1.0));
    assert_eq!(close.len(), 1);
    assert_eq!(close.rows()[0].y1, 0.0);
    assert_eq!(close.rows()[0].y2, 999.0);
}

#[test]
fn short_segments_are_not_pauses() {
    let mut table = rate_table(vec![
        seg(0.0, 1.0, 0.0, 0.0, 0.0, 0.1, 0.1),
        seg(1.0, 4.0, 0.0, 0.0, 0.0, 5.0, 0.1),
        seg(4.0, 10.0, 0.0, 0.0, 0.0, 0.1, 0.1),
    ]);
    let params = PauseParams {
        min_duration: 2.0,
        ..fixed(1.0)
    };
    let outcome = table.detect_pauses(&params);
    assert_eq!(outcome.flagged, 1);
    assert!(!table.rows()[0].is_paused(SegmentColumn::B));
    assert!(table.rows()[2].is_paused(SegmentColumn::B));
}

#[test]
fn negative_slopes_use_magnitude() {
    let mut table = rate_table(vec![
        seg(0.0, 1.0, 0.0, 0.0, 0.0, -0.5, 0.1),
        seg(2.0, 3.0, 0.0, 0.0, 0.0, -5.0, 0.1),
    ]);
    table.detect_pauses(&fixed(1.0));
    assert!(table.rows()[0].is_paused(SegmentColumn::B));
    assert!(!table.rows()[1].is_paused(SegmentColumn::B));
}

#[test]
fn adaptive_cutoff_uses_unpaused_rows() {
    // Row 0 sees mean(1, 10, 10, 1) / 4 = 1.375; later rows see 7 / 4 = 1.75.
    let mut table = rate_table(vec![
        seg(0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.1),
        seg(2.0, 3.0, 0.0, 0.0, 0.0, 10.0, 0.1),
        seg(4.0, 5.0, 0.0, 0.0, 0.0, 10.0, 0.1),
        seg(6.0, 7.0, 0.0, 0.0, 0.0, 1.0, 0.1),
    ]);
    let params = PauseParams {
        threshold: PauseThreshold::Adaptive(4.0),
        ..PauseParams::default()
    };
    let outcome = table.detect_pauses(&params);
    assert_eq!(outcome.flagged, 2);
    let flags: Vec<bool> = table
        .rows()
        .iter()
        .map(|s| s.is_paused(SegmentColumn::B))
        .collect();
    assert_eq!(flags, vec![true, false, false, true]);
}

#[test]
fn detection_on_another_column() {
    let mut table = rate_table(vec![
        seg(0.0, 1.0, 0.0, 0.0, 0.5, 5.0, 0.1),
        seg(2.0, 3.0, 0.0, 0.0, 5.0, 0.5, 0.1),
    ]);
    let params = PauseParams {
        column: SegmentColumn::A,
        ..fixed(1.0)
    };
    table.detect_pauses(&params);
    assert!(table.has_pause_column(SegmentColumn::A));
    assert!(!table.has_pause_column(SegmentColumn::B));
    assert!(table.rows()[0].is_paused(SegmentColumn::A));
    assert_eq!(table.rows()[1].pause(SegmentColumn::B), None);
}

#[test]
fn detection_is_idempotent() {
    let mut table = rate_table(vec![
        seg(0.0, 5.0, 0.0, 0.0, 0.0, 0.1, 0.1),
        seg(5.0, 10.0, 0.0, 0.0, 0.0, 0.3, 0.1),
        seg(10.0, 20.0, 0.0, 40.0, 0.0, 4.0, 0.1),
    ]);
    table.detect_pauses(&fixed(1.0));
    let first = table.rows().to_vec();
    let outcome = table.detect_pauses(&fixed(1.0));
    assert_eq!(outcome.merged, 0);
    assert_eq!(table.rows(), first.as_slice());
}

#[test]
fn empty_table_is_a_noop() {
    let mut table = rate_table(vec![]);
    let outcome = table.detect_pauses(&fixed(1.0));
    assert_eq!(outcome.flagged, 0);
    assert!(table.pause_windows(SegmentColumn::B).unwrap().is_empty());
}

#[test]
fn pause_windows_need_detection() {
    let table = rate_table(vec![seg(0.0, 5.0, 0.0, 0.0, 0.0, 0.1, 0.1)]);
    let err = table.pause_windows(SegmentColumn::B).unwrap_err();
    match err {
        TrajectoryError::Sequencing { uid, column, x_column, .. } => {
            assert_eq!(uid, "mol1");
            assert_eq!(column, "B");
            assert_eq!(x_column, "MCM_1_Time_(s)");
        }
        other => panic!("unexpected error: {other}"),
    }
}
