//! Narrow access interface to a molecule archive store.
//!
//! The model never reads archive files itself; it asks an [`ArchiveBackend`]
//! for metadata, molecule records and fitted segments. [`ArchiveSource`] is the
//! closed set of backends the crate ships with.

mod memory;
#[cfg(feature = "remote")]
mod remote;
#[cfg(not(feature = "remote"))]
mod remote {
    use std::collections::BTreeSet;

    use crate::error::{Result, TrajectoryError};
    use crate::segments::{Segment, SegmentKey};
    use crate::source::{ArchiveBackend, MetadataRecord, MoleculeRecord};

    #[derive(Debug)]
    pub struct RemoteBackend {
        base_url: String,
    }

    impl RemoteBackend {
        pub fn connect(_base_url: &str) -> Result<Self> {
            Err(TrajectoryError::Configuration(
                "remote archives not enabled. Rebuild with --features remote".to_string(),
            ))
        }
    }

    impl ArchiveBackend for RemoteBackend {
        fn name(&self) -> &str {
            &self.base_url
        }

        fn metadata_uids(&self) -> Result<Vec<String>> {
            unreachable_backend()
        }

        fn metadata(&self, _uid: &str) -> Result<MetadataRecord> {
            unreachable_backend()
        }

        fn molecule_uids(&self) -> Result<Vec<String>> {
            unreachable_backend()
        }

        fn molecule(&self, _uid: &str) -> Result<MoleculeRecord> {
            unreachable_backend()
        }

        fn column_set(&self) -> Result<BTreeSet<String>> {
            unreachable_backend()
        }

        fn segment_keys(&self, _uid: &str) -> Result<Vec<SegmentKey>> {
            unreachable_backend()
        }

        fn segments(&self, _uid: &str, _key: &SegmentKey) -> Result<Vec<Segment>> {
            unreachable_backend()
        }
    }

    fn unreachable_backend<T>() -> Result<T> {
        Err(TrajectoryError::Configuration(
            "remote archives not enabled".to_string(),
        ))
    }
}
mod snapshot;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::segments::{Segment, SegmentKey};
use crate::table::DataTable;

pub use memory::{MemoryBackend, MoleculeEntry, SegmentRecord};
pub use remote::RemoteBackend;
pub use snapshot::SnapshotBackend;

/// Scalar values attached to one metadata record (one acquired dataset).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(default)]
    pub strings: BTreeMap<String, String>,
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

impl MetadataRecord {
    pub fn with_string(mut self, name: &str, value: &str) -> Self {
        self.strings.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_param(mut self, name: &str, value: f64) -> Self {
        self.params.insert(name.to_string(), value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub name: String,
    pub column: String,
    pub start: f64,
    pub end: f64,
}

/// Everything the store knows about one molecule apart from its segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeRecord {
    pub metadata_uid: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
    #[serde(default)]
    pub regions: Vec<RegionRecord>,
    pub table: DataTable,
}

impl MoleculeRecord {
    pub fn new(metadata_uid: &str, table: DataTable) -> Self {
        Self {
            metadata_uid: metadata_uid.to_string(),
            tags: Vec::new(),
            params: BTreeMap::new(),
            regions: Vec::new(),
            table,
        }
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    pub fn with_param(mut self, name: &str, value: f64) -> Self {
        self.params.insert(name.to_string(), value);
        self
    }

    pub fn with_region(mut self, name: &str, column: &str, start: f64, end: f64) -> Self {
        self.regions.push(RegionRecord {
            name: name.to_string(),
            column: column.to_string(),
            start,
            end,
        });
        self
    }
}

pub trait ArchiveBackend {
    /// Display name of the archive, usually its file name.
    fn name(&self) -> &str;

    fn metadata_uids(&self) -> Result<Vec<String>>;

    fn metadata(&self, uid: &str) -> Result<MetadataRecord>;

    /// Named string condition of a metadata record; empty when unset.
    fn metadata_string(&self, uid: &str, name: &str) -> Result<String> {
        Ok(self
            .metadata(uid)?
            .strings
            .get(name)
            .cloned()
            .unwrap_or_default())
    }

    fn molecule_uids(&self) -> Result<Vec<String>>;

    fn molecule(&self, uid: &str) -> Result<MoleculeRecord>;

    fn has_tag(&self, uid: &str, tag: &str) -> Result<bool> {
        Ok(self.molecule(uid)?.tags.iter().any(|t| t == tag))
    }

    /// Uids of all molecules carrying `tag`, in store order.
    fn accepted_uids(&self, tag: &str) -> Result<Vec<String>> {
        let mut out = Vec::new();
        for uid in self.molecule_uids()? {
            if self.has_tag(&uid, tag)? {
                out.push(uid);
            }
        }
        Ok(out)
    }

    /// Union of the raw-table column names of every molecule.
    fn column_set(&self) -> Result<BTreeSet<String>>;

    fn segment_keys(&self, uid: &str) -> Result<Vec<SegmentKey>>;

    fn segments(&self, uid: &str, key: &SegmentKey) -> Result<Vec<Segment>>;
}

#[derive(Debug)]
pub enum ArchiveSource {
    LocalFile(SnapshotBackend),
    Remote(RemoteBackend),
    InMemory(MemoryBackend),
}

impl ArchiveSource {
    /// Opens `location` as a remote archive when it is an http(s) URL, as a
    /// local snapshot file otherwise.
    pub fn open(location: &str) -> Result<Self> {
        if location.starts_with("http://") || location.starts_with("https://") {
            Ok(Self::Remote(RemoteBackend::connect(location)?))
        } else {
            Ok(Self::LocalFile(SnapshotBackend::open(std::path::Path::new(
                location,
            ))?))
        }
    }

    fn backend(&self) -> &dyn ArchiveBackend {
        match self {
            Self::LocalFile(b) => b,
            Self::Remote(b) => b,
            Self::InMemory(b) => b,
        }
    }
}

impl From<MemoryBackend> for ArchiveSource {
    fn from(backend: MemoryBackend) -> Self {
        Self::InMemory(backend)
    }
}

impl ArchiveBackend for ArchiveSource {
    fn name(&self) -> &str {
        self.backend().name()
    }

    fn metadata_uids(&self) -> Result<Vec<String>> {
        self.backend().metadata_uids()
    }

    fn metadata(&self, uid: &str) -> Result<MetadataRecord> {
        self.backend().metadata(uid)
    }

    fn metadata_string(&self, uid: &str, name: &str) -> Result<String> {
        self.backend().metadata_string(uid, name)
    }

    fn molecule_uids(&self) -> Result<Vec<String>> {
        self.backend().molecule_uids()
    }

    fn molecule(&self, uid: &str) -> Result<MoleculeRecord> {
        self.backend().molecule(uid)
    }

    fn has_tag(&self, uid: &str, tag: &str) -> Result<bool> {
        self.backend().has_tag(uid, tag)
    }

    fn accepted_uids(&self, tag: &str) -> Result<Vec<String>> {
        self.backend().accepted_uids(tag)
    }

    fn column_set(&self) -> Result<BTreeSet<String>> {
        self.backend().column_set()
    }

    fn segment_keys(&self, uid: &str) -> Result<Vec<SegmentKey>> {
        self.backend().segment_keys(uid)
    }

    fn segments(&self, uid: &str, key: &SegmentKey) -> Result<Vec<Segment>> {
        self.backend().segments(uid, key)
    }
}
