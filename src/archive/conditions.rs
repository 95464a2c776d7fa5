use std::collections::BTreeSet;

use tracing::warn;

use crate::error::{Result, TrajectoryError};
use crate::source::ArchiveBackend;

pub const NOT_APPLICABLE: &str = "n/a";

pub const NUCLEOTIDE: &str = "nucleotide";
pub const NACL: &str = "nacl";
pub const MCM: &str = "mcm";

/// Experimental conditions shared by every dataset in one archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveConditions {
    pub nucleotide: String,
    pub nacl: String,
    pub mcm: String,
    /// Conditions that were unset and replaced by [`NOT_APPLICABLE`].
    pub defaults_applied: Vec<String>,
}

impl ArchiveConditions {
    /// Reads the conditions from every metadata record. Fails when any of them
    /// differs between records.
    pub fn collect<B: ArchiveBackend + ?Sized>(
        backend: &B,
        metadata_uids: &[String],
    ) -> Result<Self> {
        let mut defaults_applied = Vec::new();
        let nucleotide = common_value(backend, metadata_uids, NUCLEOTIDE, &mut defaults_applied)?;
        let nacl = common_value(backend, metadata_uids, NACL, &mut defaults_applied)?;
        let mcm = common_value(backend, metadata_uids, MCM, &mut defaults_applied)?;
        Ok(Self {
            nucleotide,
            nacl,
            mcm,
            defaults_applied,
        })
    }
}

fn common_value<B: ArchiveBackend + ?Sized>(
    backend: &B,
    metadata_uids: &[String],
    condition: &str,
    defaults_applied: &mut Vec<String>,
) -> Result<String> {
    let mut values = BTreeSet::new();
    for uid in metadata_uids {
        values.insert(backend.metadata_string(uid, condition)?);
    }
    if values.len() > 1 {
        return Err(TrajectoryError::Consistency {
            condition: condition.to_string(),
            values: values.into_iter().collect(),
        });
    }
    match values.into_iter().next() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => {
            warn!(
                condition,
                default = NOT_APPLICABLE,
                "condition not set, using default"
            );
            defaults_applied.push(condition.to_string());
            Ok(NOT_APPLICABLE.to_string())
        }
    }
}
