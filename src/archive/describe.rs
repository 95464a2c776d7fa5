use crate::archive::MoleculeArchive;

/// One summary row per archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveDescription {
    pub name: String,
    pub datasets: usize,
    pub molecules: usize,
    /// `label-protein` pairs joined by `; `.
    pub labeled_proteins: String,
    pub nucleotide: String,
    pub nacl: String,
    pub mcm: String,
    pub validation: String,
}

/// Describes a caller-owned collection of archives.
pub fn describe_archives(archives: &[&dyn MoleculeArchive]) -> Vec<ArchiveDescription> {
    archives
        .iter()
        .map(|archive| {
            let conditions = archive.conditions();
            ArchiveDescription {
                name: archive
                    .name()
                    .split('.')
                    .next()
                    .unwrap_or_default()
                    .to_string(),
                datasets: archive.metadata_count(),
                molecules: archive.len(),
                labeled_proteins: archive
                    .labels()
                    .iter()
                    .map(|(protein, label)| format!("{}-{}", label, protein))
                    .collect::<Vec<_>>()
                    .join("; "),
                nucleotide: conditions.nucleotide.clone(),
                nacl: conditions.nacl.clone(),
                mcm: conditions.mcm.clone(),
                validation: archive.validate_params().label(),
            }
        })
        .collect()
}
