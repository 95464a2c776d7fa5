use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrajectoryError};
use crate::segments::{Segment, SegmentKey};
use crate::source::{ArchiveBackend, MetadataRecord, MoleculeRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    #[serde(flatten)]
    pub key: SegmentKey,
    pub rows: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeEntry {
    #[serde(flatten)]
    pub record: MoleculeRecord,
    #[serde(default)]
    pub segments: Vec<SegmentRecord>,
}

impl MoleculeEntry {
    pub fn with_segments(mut self, key: SegmentKey, rows: Vec<Segment>) -> Self {
        self.segments.push(SegmentRecord { key, rows });
        self
    }
}

impl From<MoleculeRecord> for MoleculeEntry {
    fn from(record: MoleculeRecord) -> Self {
        Self {
            record,
            segments: Vec::new(),
        }
    }
}

/// Archive held entirely in memory. Also the serde shape of a snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryBackend {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, MetadataRecord>,
    #[serde(default)]
    pub molecules: BTreeMap<String, MoleculeEntry>,
}

impl MemoryBackend {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_metadata(mut self, uid: &str, record: MetadataRecord) -> Self {
        self.metadata.insert(uid.to_string(), record);
        self
    }

    pub fn with_molecule(mut self, uid: &str, entry: impl Into<MoleculeEntry>) -> Self {
        self.molecules.insert(uid.to_string(), entry.into());
        self
    }

    fn entry(&self, uid: &str) -> Result<&MoleculeEntry> {
        self.molecules
            .get(uid)
            .ok_or_else(|| TrajectoryError::UnknownMolecule(uid.to_string()))
    }
}

impl ArchiveBackend for MemoryBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata_uids(&self) -> Result<Vec<String>> {
        Ok(self.metadata.keys().cloned().collect())
    }

    fn metadata(&self, uid: &str) -> Result<MetadataRecord> {
        self.metadata
            .get(uid)
            .cloned()
            .ok_or_else(|| TrajectoryError::Source(format!("metadata {} not found", uid)))
    }

    fn molecule_uids(&self) -> Result<Vec<String>> {
        Ok(self.molecules.keys().cloned().collect())
    }

    fn molecule(&self, uid: &str) -> Result<MoleculeRecord> {
        Ok(self.entry(uid)?.record.clone())
    }

    fn has_tag(&self, uid: &str, tag: &str) -> Result<bool> {
        Ok(self.entry(uid)?.record.tags.iter().any(|t| t == tag))
    }

    fn column_set(&self) -> Result<BTreeSet<String>> {
        Ok(self
            .molecules
            .values()
            .flat_map(|e| e.record.table.column_names().iter().cloned())
            .collect())
    }

    fn segment_keys(&self, uid: &str) -> Result<Vec<SegmentKey>> {
        Ok(self
            .entry(uid)?
            .segments
            .iter()
            .map(|s| s.key.clone())
            .collect())
    }

    fn segments(&self, uid: &str, key: &SegmentKey) -> Result<Vec<Segment>> {
        self.entry(uid)?
            .segments
            .iter()
            .find(|s| &s.key == key)
            .map(|s| s.rows.clone())
            .ok_or_else(|| {
                TrajectoryError::Source(format!("molecule {}: no segments for {}", uid, key))
            })
    }
}
