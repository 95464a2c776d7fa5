use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "mt")]
use rayon::prelude::*;
use regex::Regex;
use tracing::{info, warn};

use crate::archive::{ArchiveConditions, MoleculeArchive, REJECT_DNA_TAG, ValidationStatus};
use crate::error::{Result, TrajectoryError};
use crate::molecule::{DnaMolecule, Region};
use crate::segments::{PauseOutcome, PauseParams, SegmentColumn};
use crate::source::ArchiveBackend;

const DNA_COUNT_PARAM: &str = "DnaMoleculeCount";

#[derive(Debug)]
pub struct DnaMoleculeArchive {
    pub name: String,
    pub metadata_uids: Vec<String>,
    pub conditions: ArchiveConditions,
    pub labels: BTreeMap<String, String>,
    /// Proteins found in `<protein>_..._Position_on_DNA` columns.
    pub proteins: BTreeSet<String>,
    pub molecules: Vec<DnaMolecule>,
    pub tags: BTreeSet<String>,
    pub prefixes: BTreeSet<String>,
    /// DNA molecules imaged across all datasets minus rejected ones; `None`
    /// when a metadata record lacks the count.
    pub dna_molecule_count: Option<i64>,
}

impl DnaMoleculeArchive {
    /// Loads every molecule tagged `accept_tag`. Condition consistency is
    /// checked before any molecule is read.
    pub fn load<B: ArchiveBackend + ?Sized>(
        backend: &B,
        accept_tag: &str,
        labels: BTreeMap<String, String>,
    ) -> Result<Self> {
        let metadata_uids = backend.metadata_uids()?;
        let conditions = ArchiveConditions::collect(backend, &metadata_uids)?;
        let dna_molecule_count = count_dna_molecules(backend, &metadata_uids)?;
        let proteins = discover_proteins(&backend.column_set()?)?;

        let mut molecules = Vec::new();
        for uid in backend.accepted_uids(accept_tag)? {
            let record = backend.molecule(&uid)?;
            molecules.push(DnaMolecule::new(&uid, record, &proteins)?);
        }

        let mut tags = BTreeSet::new();
        let mut prefixes = BTreeSet::new();
        for molecule in &molecules {
            tags.extend(molecule.molecule.tags.iter().cloned());
            prefixes.extend(molecule.prefixes.iter().cloned());
            for region in molecule.unbound_regions() {
                warn!(
                    uid = %molecule.uid(),
                    region = %region.name,
                    column = %region.raw_column(),
                    "region not bound to a unique prefix"
                );
            }
        }

        info!(
            archive = backend.name(),
            molecules = molecules.len(),
            proteins = proteins.len(),
            prefixes = prefixes.len(),
            "dna_archive_loaded"
        );

        Ok(Self {
            name: backend.name().to_string(),
            metadata_uids,
            conditions,
            labels,
            proteins,
            molecules,
            tags,
            prefixes,
            dna_molecule_count,
        })
    }

    pub fn molecule_by_uid(&self, uid: &str) -> Option<&DnaMolecule> {
        self.molecules.iter().find(|m| m.uid() == uid)
    }

    /// Molecules carrying every tag in `tags`.
    pub fn molecules_by_tags<'a, S: AsRef<str>>(
        &'a self,
        tags: &'a [S],
    ) -> impl Iterator<Item = &'a DnaMolecule> + 'a {
        self.molecules
            .iter()
            .filter(move |m| m.molecule.has_tags(tags))
    }

    /// Regions whose column could not be bound to exactly one prefix.
    pub fn unbound_regions(&self) -> Vec<&Region> {
        self.molecules
            .iter()
            .flat_map(|m| m.unbound_regions())
            .collect()
    }

    /// Fetches and attaches every segment table the store holds for each
    /// molecule. Returns the number of attached tables.
    pub fn add_segments_tables<B: ArchiveBackend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> Result<usize> {
        let mut attached = 0;
        for molecule in &mut self.molecules {
            let uid = molecule.uid().to_string();
            for key in backend.segment_keys(&uid)? {
                let rows = backend.segments(&uid, &key)?;
                molecule.attach_segments(&key, rows)?;
                attached += 1;
            }
        }
        info!(archive = %self.name, tables = attached, "segments_tables_attached");
        Ok(attached)
    }

    /// Removes rate segments with `Sigma_B >= sigma` across all molecules.
    pub fn filter_segments(&mut self, sigma: f64) -> usize {
        let filter = |m: &mut DnaMolecule| -> usize {
            m.segment_tables
                .iter_mut()
                .map(|t| t.filter_segments(sigma))
                .sum()
        };
        #[cfg(feature = "mt")]
        let removed = self.molecules.par_iter_mut().map(filter).sum();
        #[cfg(not(feature = "mt"))]
        let removed = self.molecules.iter_mut().map(filter).sum();
        removed
    }

    /// Runs pause detection on every attached table.
    pub fn detect_pauses(&mut self, params: &PauseParams) -> PauseOutcome {
        let detect = |m: &mut DnaMolecule| -> PauseOutcome {
            let mut outcome = PauseOutcome::default();
            for table in &mut m.segment_tables {
                outcome.add(table.detect_pauses(params));
            }
            outcome
        };
        #[cfg(feature = "mt")]
        let outcomes: Vec<PauseOutcome> = self.molecules.par_iter_mut().map(detect).collect();
        #[cfg(not(feature = "mt"))]
        let outcomes: Vec<PauseOutcome> = self.molecules.iter_mut().map(detect).collect();

        let mut total = PauseOutcome::default();
        for outcome in outcomes {
            total.add(outcome);
        }
        total
    }

    /// Adds an idle-free copy of every molecule's raw table. Pause detection
    /// on `column` must have run first.
    pub fn add_df_noidle(&mut self, column: SegmentColumn) -> Result<usize> {
        #[cfg(feature = "mt")]
        let removed: Vec<usize> = self
            .molecules
            .par_iter_mut()
            .map(|m| m.remove_idle(column))
            .collect::<Result<_>>()?;
        #[cfg(not(feature = "mt"))]
        let removed: Vec<usize> = self
            .molecules
            .iter_mut()
            .map(|m| m.remove_idle(column))
            .collect::<Result<_>>()?;
        Ok(removed.into_iter().sum())
    }

    /// Adds an idle-free copy of every molecule's raw table, dropping rows
    /// inside regions on `prefix` whose name contains `specifier`.
    pub fn add_df_noidle_by_region(&mut self, prefix: &str, specifier: &str) -> Result<usize> {
        #[cfg(feature = "mt")]
        let removed: Vec<usize> = self
            .molecules
            .par_iter_mut()
            .map(|m| m.remove_idle_by_region(prefix, specifier))
            .collect::<Result<_>>()?;
        #[cfg(not(feature = "mt"))]
        let removed: Vec<usize> = self
            .molecules
            .iter_mut()
            .map(|m| m.remove_idle_by_region(prefix, specifier))
            .collect::<Result<_>>()?;
        Ok(removed.into_iter().sum())
    }
}

impl MoleculeArchive for DnaMoleculeArchive {
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

    fn validate_params(&self) -> ValidationStatus {
        for molecule in &self.molecules {
            for protein in &self.proteins {
                let name = format!("Number_{}", protein);
                let declared = match molecule.molecule.require_param(&name) {
                    Ok(v) => v,
                    Err(err) => return ValidationStatus::Failed(err),
                };
                let structural = molecule.protein_count(protein);
                if structural as f64 != declared {
                    return ValidationStatus::Failed(TrajectoryError::Validation {
                        uid: molecule.uid().to_string(),
                        protein: protein.clone(),
                        structural,
                        declared,
                    });
                }
            }
        }
        ValidationStatus::Passed
    }
}

/// Proteins named by `<protein>_..._Position_on_DNA` columns.
pub(crate) fn discover_proteins(columns: &BTreeSet<String>) -> Result<BTreeSet<String>> {
    let pattern = Regex::new(r"^\w+_Position_on_DNA$")?;
    Ok(columns
        .iter()
        .filter(|c| pattern.is_match(c))
        .filter_map(|c| c.split('_').next())
        .filter(|p| !p.is_empty())
        .map(|p| p.to_string())
        .collect())
}

fn count_dna_molecules<B: ArchiveBackend + ?Sized>(
    backend: &B,
    metadata_uids: &[String],
) -> Result<Option<i64>> {
    let mut total = 0.0;
    for uid in metadata_uids {
        match backend.metadata(uid)?.params.get(DNA_COUNT_PARAM) {
            Some(count) => total += count,
            None => {
                warn!(metadata = %uid, "DnaMoleculeCount not set");
                return Ok(None);
            }
        }
    }
    let mut rejected = 0i64;
    for uid in backend.molecule_uids()? {
        if backend.has_tag(&uid, REJECT_DNA_TAG)? {
            rejected += 1;
        }
    }
    Ok(Some(total as i64 - rejected))
}
