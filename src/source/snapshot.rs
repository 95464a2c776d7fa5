use std::collections::BTreeSet;
use std::io::BufReader;
use std::path::Path;

use tracing::info;

use crate::error::{Result, TrajectoryError};
use crate::io::open_maybe_gz;
use crate::segments::{Segment, SegmentKey};
use crate::source::{ArchiveBackend, MemoryBackend, MetadataRecord, MoleculeRecord};

/// Archive loaded from a JSON export (optionally gzip-compressed).
#[derive(Debug)]
pub struct SnapshotBackend {
    name: String,
    inner: MemoryBackend,
}

impl SnapshotBackend {
    pub fn open(path: &Path) -> Result<Self> {
        let reader = open_maybe_gz(path).map_err(|e| {
            TrajectoryError::Source(format!("failed to open {}: {}", path.display(), e))
        })?;
        let inner: MemoryBackend = serde_json::from_reader(BufReader::new(reader))
            .map_err(|e| {
                TrajectoryError::Source(format!("failed to parse {}: {}", path.display(), e))
            })?;
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .map(|s| s.trim_end_matches(".gz").to_string())
            .unwrap_or_else(|| inner.name.clone());
        info!(
            path = %path.display(),
            metadata = inner.metadata.len(),
            molecules = inner.molecules.len(),
            "snapshot_loaded"
        );
        Ok(Self { name, inner })
    }
}

impl ArchiveBackend for SnapshotBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata_uids(&self) -> Result<Vec<String>> {
        self.inner.metadata_uids()
    }

    fn metadata(&self, uid: &str) -> Result<MetadataRecord> {
        self.inner.metadata(uid)
    }

    fn molecule_uids(&self) -> Result<Vec<String>> {
        self.inner.molecule_uids()
    }

    fn molecule(&self, uid: &str) -> Result<MoleculeRecord> {
        self.inner.molecule(uid)
    }

    fn has_tag(&self, uid: &str, tag: &str) -> Result<bool> {
        self.inner.has_tag(uid, tag)
    }

    fn column_set(&self) -> Result<BTreeSet<String>> {
        self.inner.column_set()
    }

    fn segment_keys(&self, uid: &str) -> Result<Vec<SegmentKey>> {
        self.inner.segment_keys(uid)
    }

    fn segments(&self, uid: &str, key: &SegmentKey) -> Result<Vec<Segment>> {
        self.inner.segments(uid, key)
    }
}
