use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::archive::{LoadedArchive, ValidationStatus};
use crate::schema::v1::ArchiveKind;
use crate::segments::{PauseOutcome, PauseParams};
use crate::source::ArchiveSource;

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub json_path: PathBuf,
    pub segments_path: PathBuf,
    pub noidle_dir: PathBuf,
}

/// Per-run state threaded through the pipeline stages.
#[derive(Debug)]
pub struct Ctx {
    pub location: String,
    pub kind: ArchiveKind,
    pub accept_tag: String,
    pub labels: BTreeMap<String, String>,
    pub sigma: Option<f64>,
    pub pause: PauseParams,
    pub write_json: bool,
    pub write_tsv: bool,
    pub threads: usize,
    pub source: Option<ArchiveSource>,
    pub archive: Option<LoadedArchive>,
    pub validation: Option<ValidationStatus>,
    pub segment_tables: usize,
    pub filtered_segments: usize,
    pub pause_outcome: Option<PauseOutcome>,
    pub noidle_rows_removed: Option<usize>,
    pub warnings: Vec<String>,
    pub output: OutputPaths,
    pub tool_version: String,
}

impl Ctx {
    pub fn new(
        location: String,
        out_dir: PathBuf,
        kind: ArchiveKind,
        accept_tag: String,
        labels: BTreeMap<String, String>,
        pause: PauseParams,
        write_json: bool,
        write_tsv: bool,
        tool_version: &str,
    ) -> Self {
        let json_path = out_dir.join("trajectory.json");
        let segments_path = out_dir.join("segments.tsv");
        let noidle_dir = out_dir.join("noidle");
        Self {
            location,
            kind,
            accept_tag,
            labels,
            sigma: None,
            pause,
            write_json,
            write_tsv,
            threads: 0,
            source: None,
            archive: None,
            validation: None,
            segment_tables: 0,
            filtered_segments: 0,
            pause_outcome: None,
            noidle_rows_removed: None,
            warnings: Vec::new(),
            output: OutputPaths {
                out_dir,
                json_path,
                segments_path,
                noidle_dir,
            },
            tool_version: tool_version.to_string(),
        }
    }

    pub fn source(&self) -> anyhow::Result<&ArchiveSource> {
        self.source
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("archive source not opened"))
    }

    pub fn archive(&self) -> anyhow::Result<&LoadedArchive> {
        self.archive
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("archive not loaded"))
    }
}
