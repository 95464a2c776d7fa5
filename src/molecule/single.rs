use crate::molecule::Molecule;
use crate::source::MoleculeRecord;

/// Trajectory of a single labelled protein without DNA context.
#[derive(Debug, Clone)]
pub struct SingleMolecule {
    pub molecule: Molecule,
    pub protein: String,
}

impl SingleMolecule {
    pub fn new(uid: &str, record: MoleculeRecord, protein: &str) -> Self {
        Self {
            molecule: Molecule::from_record(uid, record),
            protein: protein.to_string(),
        }
    }

    pub fn uid(&self) -> &str {
        &self.molecule.uid
    }
}
