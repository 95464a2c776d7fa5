use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage3Segments;

impl Stage3Segments {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Segments {
    fn name(&self) -> &'static str {
        "stage3_segments"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let Some(source) = ctx.source.as_ref() else {
            anyhow::bail!("archive source not opened");
        };
        let Some(archive) = ctx.archive.as_mut().and_then(|a| a.as_dna_mut()) else {
            info!("segments_skipped_single_archive");
            return Ok(());
        };
        ctx.segment_tables = archive.add_segments_tables(source)?;
        Ok(())
    }
}
