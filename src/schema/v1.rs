use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveKind {
    Dna,
    Single,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conditions {
    pub nucleotide: String,
    pub nacl: String,
    pub mcm: String,
    pub defaults_applied: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveMeta {
    pub name: String,
    pub kind: ArchiveKind,
    pub datasets: u64,
    pub molecules: u64,
    pub dna_molecule_count: Option<i64>,
    pub proteins: Vec<String>,
    pub prefixes: Vec<String>,
    pub tags: Vec<String>,
    pub labels: BTreeMap<String, String>,
    pub conditions: Conditions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Validation {
    pub status: String,
    pub kind: Option<String>,
    pub uid: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    Fixed,
    Adaptive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisParams {
    pub sigma: Option<f64>,
    pub threshold_mode: ThresholdMode,
    pub threshold: f64,
    pub min_duration: f64,
    pub column: String,
    pub merge_y_tolerance: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Totals {
    pub segment_tables: u64,
    pub rate_tables: u64,
    pub bleaching_tables: u64,
    pub segments: u64,
    pub filtered_segments: u64,
    pub flagged_segments: u64,
    pub merged_segments: u64,
    pub paused_segments: u64,
    pub noidle_rows_removed: u64,
    pub median_pause_duration: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSummary {
    pub prefix: String,
    pub x_column: String,
    pub y_column: String,
    pub region: String,
    pub kind: String,
    pub segments: u64,
    pub paused: u64,
    pub filtered: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoleculeSummary {
    pub uid: String,
    pub tags: Vec<String>,
    pub proteins: BTreeMap<String, u64>,
    pub rows: u64,
    pub noidle_rows: Option<u64>,
    pub unbound_regions: Vec<String>,
    pub tables: Vec<TableSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryReportV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub archive: ArchiveMeta,
    pub validation: Validation,
    pub analysis: AnalysisParams,
    pub totals: Totals,
    pub molecules: Vec<MoleculeSummary>,
    pub warnings: Vec<String>,
}
