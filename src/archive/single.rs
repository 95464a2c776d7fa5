use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::archive::{ArchiveConditions, MoleculeArchive, ValidationStatus};
use crate::error::{Result, TrajectoryError};
use crate::molecule::SingleMolecule;
use crate::source::ArchiveBackend;

/// Archive of trajectories that each follow one labelled protein.
#[derive(Debug)]
pub struct SingleMoleculeArchive {
    pub name: String,
    pub metadata_uids: Vec<String>,
    pub conditions: ArchiveConditions,
    pub labels: BTreeMap<String, String>,
    pub protein: String,
    pub molecules: Vec<SingleMolecule>,
    pub tags: BTreeSet<String>,
}

impl SingleMoleculeArchive {
    /// Loads every molecule tagged `accept_tag`; `labels` must name exactly
    /// one protein.
    pub fn load<B: ArchiveBackend + ?Sized>(
        backend: &B,
        accept_tag: &str,
        labels: BTreeMap<String, String>,
    ) -> Result<Self> {
        let metadata_uids = backend.metadata_uids()?;
        let conditions = ArchiveConditions::collect(backend, &metadata_uids)?;
        let protein = match labels.keys().collect::<Vec<_>>().as_slice() {
            [protein] => (*protein).clone(),
            other => {
                return Err(TrajectoryError::Configuration(format!(
                    "single molecule archive needs exactly one labelled protein, got {}",
                    other.len()
                )));
            }
        };

        let mut molecules = Vec::new();
        for uid in backend.accepted_uids(accept_tag)? {
            let record = backend.molecule(&uid)?;
            molecules.push(SingleMolecule::new(&uid, record, &protein));
        }
        let tags = molecules
            .iter()
            .flat_map(|m| m.molecule.tags.iter().cloned())
            .collect();

        info!(
            archive = backend.name(),
            molecules = molecules.len(),
            protein = %protein,
            "single_archive_loaded"
        );

        Ok(Self {
            name: backend.name().to_string(),
            metadata_uids,
            conditions,
            labels,
            protein,
            molecules,
            tags,
        })
    }

    pub fn molecule_by_uid(&self, uid: &str) -> Option<&SingleMolecule> {
        self.molecules.iter().find(|m| m.uid() == uid)
    }

    pub fn molecules_by_tags<'a, S: AsRef<str>>(
        &'a self,
        tags: &'a [S],
    ) -> impl Iterator<Item = &'a SingleMolecule> + 'a {
        self.molecules
            .iter()
            .filter(move |m| m.molecule.has_tags(tags))
    }
}

impl MoleculeArchive for SingleMoleculeArchive {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata_count(&self) -> usize {
        self.metadata_uids.len()
    }

    fn len(&self) -> usize {
        self.molecules.len()
    }

    fn conditions(&self) -> &ArchiveConditions {
        &self.conditions
    }

    fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    // Single-protein trajectories carry no per-copy column prefixes to
    // cross-check.
    fn validate_params(&self) -> ValidationStatus {
        ValidationStatus::Passed
    }
}
