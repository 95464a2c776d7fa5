use anyhow::Result;

use crate::ctx::Ctx;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let loaded = ctx.archive()?;
    let archive = loaded.as_archive();
    let conditions = archive.conditions();

    let mut out = String::new();
    out.push_str(&format!("kira-trajectory v{}\n", version));
    out.push_str(&format!(
        "Archive: {} ({} datasets, {} molecules)\n",
        archive.name(),
        archive.metadata_count(),
        archive.len()
    ));
    out.push_str(&format!(
        "Conditions: nucleotide={} nacl={} mcm={}\n",
        conditions.nucleotide, conditions.nacl, conditions.mcm
    ));
    if let Some(dna) = loaded.as_dna() {
        let proteins: Vec<&str> = dna.proteins.iter().map(|s| s.as_str()).collect();
        out.push_str(&format!("Proteins: {}\n", proteins.join(", ")));
    }
    if let Some(status) = &ctx.validation {
        out.push_str(&format!("Validation: {}\n", status.label()));
    }
    out.push_str(&format!("Segment tables: {}\n", ctx.segment_tables));
    if ctx.sigma.is_some() {
        out.push_str(&format!("Filtered segments: {}\n", ctx.filtered_segments));
    }
    if let Some(outcome) = &ctx.pause_outcome {
        out.push_str(&format!(
            "Pauses: {} ({} flagged, {} merged)\n",
            outcome.paused, outcome.flagged, outcome.merged
        ));
    }
    if let Some(removed) = ctx.noidle_rows_removed {
        out.push_str(&format!("Idle rows removed: {}\n", removed));
    }

    Ok(out)
}
