use std::path::Path;

use anyhow::Result;

use crate::archive::{LoadedArchive, ValidationStatus};
use crate::ctx::Ctx;
use crate::math::stats::median;
use crate::molecule::DnaMolecule;
use crate::schema::v1::{
    AnalysisParams, ArchiveKind, ArchiveMeta, Conditions, MoleculeSummary, TableSummary,
    ThresholdMode, Totals, TrajectoryReportV1, Validation,
};
use crate::segments::{MERGE_Y_TOLERANCE, PauseThreshold, SegmentKind};

pub fn build_report(ctx: &Ctx) -> Result<TrajectoryReportV1> {
    let loaded = ctx.archive()?;
    let archive = loaded.as_archive();
    let conditions = archive.conditions();

    let (kind, proteins, prefixes, dna_molecule_count) = match loaded {
        LoadedArchive::Dna(a) => (
            ArchiveKind::Dna,
            a.proteins.iter().cloned().collect(),
            a.prefixes.iter().cloned().collect(),
            a.dna_molecule_count,
        ),
        LoadedArchive::Single(a) => (
            ArchiveKind::Single,
            vec![a.protein.clone()],
            Vec::new(),
            None,
        ),
    };

    let archive_meta = ArchiveMeta {
        name: archive.name().to_string(),
        kind,
        datasets: archive.metadata_count() as u64,
        molecules: archive.len() as u64,
        dna_molecule_count,
        proteins,
        prefixes,
        tags: archive.tags().iter().cloned().collect(),
        labels: archive.labels().clone(),
        conditions: Conditions {
            nucleotide: conditions.nucleotide.clone(),
            nacl: conditions.nacl.clone(),
            mcm: conditions.mcm.clone(),
            defaults_applied: conditions.defaults_applied.clone(),
        },
    };

    let validation = match &ctx.validation {
        Some(ValidationStatus::Passed) => Validation {
            status: "passed".to_string(),
            kind: None,
            uid: None,
            message: None,
        },
        Some(ValidationStatus::Failed(err)) => Validation {
            status: "failed".to_string(),
            kind: Some(err.kind().to_string()),
            uid: err.uid().map(|s| s.to_string()),
            message: Some(err.to_string()),
        },
        None => Validation {
            status: "skipped".to_string(),
            kind: None,
            uid: None,
            message: None,
        },
    };

    let (threshold_mode, threshold) = match ctx.pause.threshold {
        PauseThreshold::Fixed(v) => (ThresholdMode::Fixed, v),
        PauseThreshold::Adaptive(v) => (ThresholdMode::Adaptive, v),
    };
    let analysis = AnalysisParams {
        sigma: ctx.sigma,
        threshold_mode,
        threshold,
        min_duration: ctx.pause.min_duration,
        column: ctx.pause.column.name().to_string(),
        merge_y_tolerance: MERGE_Y_TOLERANCE,
    };

    let mut totals = Totals {
        filtered_segments: ctx.filtered_segments as u64,
        noidle_rows_removed: ctx.noidle_rows_removed.unwrap_or(0) as u64,
        ..Totals::default()
    };
    if let Some(outcome) = &ctx.pause_outcome {
        totals.flagged_segments = outcome.flagged as u64;
        totals.merged_segments = outcome.merged as u64;
    }

    let mut molecules = Vec::new();
    let mut pause_durations = Vec::new();
    if let Some(dna) = loaded.as_dna() {
        for molecule in &dna.molecules {
            molecules.push(summarize_molecule(ctx, molecule, &mut totals, &mut pause_durations));
        }
    }
    totals.median_pause_duration = median(&mut pause_durations);

    Ok(TrajectoryReportV1 {
        tool: "kira-trajectory".to_string(),
        version: ctx.tool_version.clone(),
        schema_version: "v1".to_string(),
        archive: archive_meta,
        validation,
        analysis,
        totals,
        molecules,
        warnings: ctx.warnings.clone(),
    })
}

fn summarize_molecule(
    ctx: &Ctx,
    molecule: &DnaMolecule,
    totals: &mut Totals,
    pause_durations: &mut Vec<f64>,
) -> MoleculeSummary {
    let column = ctx.pause.column;
    let mut tables = Vec::with_capacity(molecule.segment_tables.len());
    for table in &molecule.segment_tables {
        totals.segment_tables += 1;
        match table.kind() {
            SegmentKind::Rate => totals.rate_tables += 1,
            SegmentKind::Bleaching => totals.bleaching_tables += 1,
        }
        totals.segments += table.len() as u64;
        let paused = table.paused_count(column);
        totals.paused_segments += paused as u64;
        pause_durations.extend(
            table
                .rows()
                .iter()
                .filter(|s| s.is_paused(column))
                .map(|s| s.duration()),
        );
        tables.push(TableSummary {
            prefix: table.prefix().to_string(),
            x_column: table.x_column().to_string(),
            y_column: table.y_column().to_string(),
            region: table.region().to_string(),
            kind: table.kind().as_str().to_string(),
            segments: table.len() as u64,
            paused: paused as u64,
            filtered: table.is_filtered(),
        });
    }

    MoleculeSummary {
        uid: molecule.uid().to_string(),
        tags: molecule.molecule.tags.iter().cloned().collect(),
        proteins: molecule
            .proteins
            .iter()
            .map(|(p, n)| (p.clone(), *n as u64))
            .collect(),
        rows: molecule.molecule.len() as u64,
        noidle_rows: molecule.df_noidle.as_ref().map(|t| t.n_rows() as u64),
        unbound_regions: molecule.unbound_regions().map(|r| r.name.clone()).collect(),
        tables,
    }
}

pub fn write_json(path: &Path, ctx: &Ctx) -> Result<()> {
    let report = build_report(ctx)?;
    crate::io::write_json(path, &report)
}
