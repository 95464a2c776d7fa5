use anyhow::{Context, Result};
use tracing::info;

use crate::archive::{DnaMoleculeArchive, LoadedArchive, SingleMoleculeArchive};
use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::schema::v1::ArchiveKind;
use crate::source::ArchiveSource;

pub struct Stage1Load;

impl Stage1Load {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Load {
    fn name(&self) -> &'static str {
        "stage1_load"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if ctx.source.is_none() {
            let source = ArchiveSource::open(&ctx.location)
                .with_context(|| format!("failed to open archive {}", ctx.location))?;
            ctx.source = Some(source);
        }
        let source = ctx.source()?;

        let loaded = match ctx.kind {
            ArchiveKind::Dna => LoadedArchive::Dna(DnaMoleculeArchive::load(
                source,
                &ctx.accept_tag,
                ctx.labels.clone(),
            )?),
            ArchiveKind::Single => LoadedArchive::Single(SingleMoleculeArchive::load(
                source,
                &ctx.accept_tag,
                ctx.labels.clone(),
            )?),
        };

        let mut warnings = Vec::new();
        let archive = loaded.as_archive();
        for name in &archive.conditions().defaults_applied {
            warnings.push(format!("condition '{}' not set; using n/a", name));
        }
        if let Some(dna) = loaded.as_dna() {
            for region in dna.unbound_regions() {
                warnings.push(format!(
                    "region '{}' of molecule {} not bound to a unique prefix (column {})",
                    region.name,
                    region.uid,
                    region.raw_column()
                ));
            }
            if dna.dna_molecule_count.is_none() {
                warnings.push("DnaMoleculeCount missing from at least one dataset".to_string());
            }
        }
        if archive.is_empty() {
            warnings.push(format!("no molecules tagged '{}'", ctx.accept_tag));
        }

        info!(
            archive = archive.name(),
            datasets = archive.metadata_count(),
            molecules = archive.len(),
            "archive_loaded"
        );

        ctx.warnings.extend(warnings);
        ctx.archive = Some(loaded);
        Ok(())
    }
}
