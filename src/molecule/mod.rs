//! Per-trajectory records.

mod dna;
mod region;
mod single;

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, TrajectoryError};
use crate::source::MoleculeRecord;
use crate::table::DataTable;

pub use dna::{DnaMolecule, extract_prefixes};
pub use region::{Region, RegionBinding};
pub use single::SingleMolecule;

/// One trajectory: raw table plus the tags and parameters attached to it.
#[derive(Debug, Clone)]
pub struct Molecule {
    pub uid: String,
    pub metadata_uid: String,
    pub params: BTreeMap<String, f64>,
    pub tags: BTreeSet<String>,
    pub region_names: Vec<String>,
    pub table: DataTable,
}

impl Molecule {
    pub fn from_record(uid: &str, record: MoleculeRecord) -> Self {
        Self {
            uid: uid.to_string(),
            metadata_uid: record.metadata_uid,
            params: record.params,
            tags: record.tags.into_iter().collect(),
            region_names: record.regions.into_iter().map(|r| r.name).collect(),
            table: record.table,
        }
    }

    /// Number of time points.
    pub fn len(&self) -> usize {
        self.table.n_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// True when every tag in `tags` is present.
    pub fn has_tags<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter().all(|t| self.tags.contains(t.as_ref()))
    }

    pub fn param(&self, name: &str) -> Option<f64> {
        self.params.get(name).copied()
    }

    pub fn require_param(&self, name: &str) -> Result<f64> {
        self.param(name)
            .ok_or_else(|| TrajectoryError::MissingParameter {
                uid: self.uid.clone(),
                name: name.to_string(),
            })
    }
}
