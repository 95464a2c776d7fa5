use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use tracing::debug;

use crate::error::{Result, TrajectoryError};
use crate::math::stats::euclidean;
use crate::molecule::{Molecule, Region};
use crate::segments::{Segment, SegmentColumn, SegmentKey, SegmentsTable};
use crate::source::MoleculeRecord;
use crate::table::DataTable;

/// Distinct `<protein>_<n>_` prefixes that start any of `columns`.
pub fn extract_prefixes(columns: &[String], protein: &str) -> Result<BTreeSet<String>> {
    let pattern = Regex::new(&format!(r"^{}_\d+_", regex::escape(protein)))?;
    Ok(columns
        .iter()
        .filter_map(|c| pattern.find(c).map(|m| m.as_str().to_string()))
        .collect())
}

/// Trajectory on a DNA molecule that may carry several labelled proteins,
/// each copy namespaced by its own column prefix.
#[derive(Debug, Clone)]
pub struct DnaMolecule {
    pub molecule: Molecule,
    /// Protein name to number of copies found in the table columns.
    pub proteins: BTreeMap<String, usize>,
    pub protein_prefixes: BTreeMap<String, BTreeSet<String>>,
    /// Union of all protein prefixes.
    pub prefixes: BTreeSet<String>,
    pub regions: Vec<Region>,
    pub segment_tables: Vec<SegmentsTable>,
    /// Raw table with detected idle intervals removed.
    pub df_noidle: Option<DataTable>,
}

impl DnaMolecule {
    pub fn new(uid: &str, record: MoleculeRecord, proteins: &BTreeSet<String>) -> Result<Self> {
        let region_records = record.regions.clone();
        let molecule = Molecule::from_record(uid, record);

        let mut counts = BTreeMap::new();
        let mut protein_prefixes = BTreeMap::new();
        let mut prefixes = BTreeSet::new();
        for protein in proteins {
            let found = extract_prefixes(molecule.table.column_names(), protein)?;
            counts.insert(protein.clone(), found.len());
            prefixes.extend(found.iter().cloned());
            protein_prefixes.insert(protein.clone(), found);
        }

        let regions = region_records
            .iter()
            .map(|r| Region::resolve(uid, r, &prefixes))
            .collect();

        Ok(Self {
            molecule,
            proteins: counts,
            protein_prefixes,
            prefixes,
            regions,
            segment_tables: Vec::new(),
            df_noidle: None,
        })
    }

    pub fn uid(&self) -> &str {
        &self.molecule.uid
    }

    pub fn protein_count(&self, protein: &str) -> usize {
        self.proteins.get(protein).copied().unwrap_or(0)
    }

    pub fn prefixes_of(&self, protein: &str) -> Option<&BTreeSet<String>> {
        self.protein_prefixes.get(protein)
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn unbound_regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| !r.is_bound())
    }

    /// Length of the DNA in pixels from its fitted end points.
    pub fn dna_length(&self) -> Result<f64> {
        let m = &self.molecule;
        Ok(euclidean(
            m.require_param("Dna_Top_X1")?,
            m.require_param("Dna_Top_Y1")?,
            m.require_param("Dna_Bottom_X2")?,
            m.require_param("Dna_Bottom_Y2")?,
        ))
    }

    /// The single known prefix that starts both columns of `key`.
    pub fn assign_prefix(&self, key: &SegmentKey) -> Result<&str> {
        let candidates: Vec<&String> = self
            .prefixes
            .iter()
            .filter(|p| {
                key.x_column.starts_with(p.as_str()) && key.y_column.starts_with(p.as_str())
            })
            .collect();
        match candidates.as_slice() {
            [prefix] => Ok(prefix.as_str()),
            [] => Err(TrajectoryError::Assignment {
                uid: self.uid().to_string(),
                subject: format!("segments {}", key),
                reason: "no prefix matches both columns".to_string(),
            }),
            many => Err(TrajectoryError::Assignment {
                uid: self.uid().to_string(),
                subject: format!("segments {}", key),
                reason: format!(
                    "prefixes {} all match",
                    many.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(", ")
                ),
            }),
        }
    }

    pub fn attach_segments(&mut self, key: &SegmentKey, rows: Vec<Segment>) -> Result<()> {
        let prefix = self.assign_prefix(key)?.to_string();
        let table = SegmentsTable::new(
            self.uid(),
            &prefix,
            &key.x_column[prefix.len()..],
            &key.y_column[prefix.len()..],
            &key.region,
            rows,
        )?;
        debug!(
            uid = %self.uid(),
            prefix = %prefix,
            region = %key.region,
            kind = table.kind().as_str(),
            segments = table.len(),
            "segments attached"
        );
        self.segment_tables.push(table);
        Ok(())
    }

    /// Builds `df_noidle` by dropping raw rows inside any pause window of the
    /// rate tables. Returns the number of rows removed.
    pub fn remove_idle(&mut self, column: SegmentColumn) -> Result<usize> {
        let mut noidle = self.molecule.table.clone();
        for table in self.segment_tables.iter().filter(|t| t.is_rate()) {
            let windows = table.pause_windows(column)?;
            if windows.is_empty() {
                continue;
            }
            let x_column = table.prefixed_x_column();
            self.require_column(&x_column)?;
            noidle = noidle.drop_within(&x_column, &windows)?;
        }
        let removed = self.molecule.len() - noidle.n_rows();
        self.df_noidle = Some(noidle);
        Ok(removed)
    }

    /// Builds `df_noidle` by dropping raw rows that fall inside any region on
    /// `prefix` whose name contains `specifier`.
    pub fn remove_idle_by_region(&mut self, prefix: &str, specifier: &str) -> Result<usize> {
        let table = &self.molecule.table;
        let mut keep = vec![true; table.n_rows()];
        for region in &self.regions {
            if !region.name.contains(specifier) || region.prefix() != Some(prefix) {
                continue;
            }
            let raw_column = region.raw_column();
            let values = self.require_column(&raw_column)?;
            for (k, v) in keep.iter_mut().zip(values) {
                if region.contains(*v) {
                    *k = false;
                }
            }
        }

        let noidle = table.retain_rows(&keep)?;
        let removed = table.n_rows() - noidle.n_rows();
        self.df_noidle = Some(noidle);
        Ok(removed)
    }

    fn require_column(&self, column: &str) -> Result<&[f64]> {
        self.molecule
            .table
            .column(column)
            .ok_or_else(|| TrajectoryError::MissingColumn {
                uid: self.uid().to_string(),
                column: column.to_string(),
            })
    }
}
