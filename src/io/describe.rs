use crate::archive::ArchiveDescription;

const HEADER: &str = "archive\t# of datasets\t# of molecules\tlabeled proteins\tnucleotide\tNaCl concentration\tMCM variant\tarchive validation";

pub fn format_describe(rows: &[ArchiveDescription]) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            row.name,
            row.datasets,
            row.molecules,
            row.labeled_proteins,
            row.nucleotide,
            row.nacl,
            row.mcm,
            row.validation
        ));
    }
    out
}
