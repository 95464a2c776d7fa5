//! Archives: validated collections of accepted molecules from one experiment
//! batch.

mod conditions;
mod describe;
mod dna;
mod single;

use std::collections::{BTreeMap, BTreeSet};

use crate::error::TrajectoryError;

pub use conditions::{ArchiveConditions, MCM, NACL, NOT_APPLICABLE, NUCLEOTIDE};
pub use describe::{ArchiveDescription, describe_archives};
pub use dna::DnaMoleculeArchive;
pub use single::SingleMoleculeArchive;

/// Tag marking a molecule whose DNA was rejected during acquisition.
pub const REJECT_DNA_TAG: &str = "reject_dna";

/// Behaviour shared by every archive kind.
pub trait MoleculeArchive {
    fn name(&self) -> &str;

    /// Number of metadata records (datasets) merged into the archive.
    fn metadata_count(&self) -> usize;

    /// Number of accepted molecules.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn conditions(&self) -> &ArchiveConditions;

    /// Protein name to fluorophore label.
    fn labels(&self) -> &BTreeMap<String, String>;

    /// Union of all molecule tags.
    fn tags(&self) -> &BTreeSet<String>;

    /// Cross-checks molecule parameters against the table structure.
    fn validate_params(&self) -> ValidationStatus;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationStatus {
    Passed,
    Failed(TrajectoryError),
}

impl ValidationStatus {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    pub fn label(&self) -> String {
        match self {
            Self::Passed => "passed".to_string(),
            Self::Failed(err) => err.to_string(),
        }
    }

    pub fn into_result(self) -> crate::error::Result<()> {
        match self {
            Self::Passed => Ok(()),
            Self::Failed(err) => Err(err),
        }
    }
}

/// An archive of either kind, as produced by the loader.
#[derive(Debug)]
pub enum LoadedArchive {
    Dna(DnaMoleculeArchive),
    Single(SingleMoleculeArchive),
}

impl LoadedArchive {
    pub fn as_archive(&self) -> &dyn MoleculeArchive {
        match self {
            Self::Dna(a) => a,
            Self::Single(a) => a,
        }
    }

    pub fn as_dna(&self) -> Option<&DnaMoleculeArchive> {
        match self {
            Self::Dna(a) => Some(a),
            Self::Single(_) => None,
        }
    }

    pub fn as_dna_mut(&mut self) -> Option<&mut DnaMoleculeArchive> {
        match self {
            Self::Dna(a) => Some(a),
            Self::Single(_) => None,
        }
    }
}
