use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage4Filter;

impl Stage4Filter {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Filter {
    fn name(&self) -> &'static str {
        "stage4_filter"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let Some(sigma) = ctx.sigma else {
            return Ok(());
        };
        if !sigma.is_finite() || sigma <= 0.0 {
            anyhow::bail!("sigma must be a positive number, got {}", sigma);
        }
        let Some(archive) = ctx.archive.as_mut().and_then(|a| a.as_dna_mut()) else {
            return Ok(());
        };
        let removed = archive.filter_segments(sigma);
        info!(sigma, removed, "segments_filtered");
        ctx.filtered_segments = removed;
        Ok(())
    }
}
