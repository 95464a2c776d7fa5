use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::segments::PauseThreshold;

pub struct Stage5Pauses;

impl Stage5Pauses {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Pauses {
    fn name(&self) -> &'static str {
        "stage5_pauses"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if let PauseThreshold::Adaptive(divisor) = ctx.pause.threshold {
            if divisor == 0.0 {
                anyhow::bail!("adaptive threshold divisor must be non-zero");
            }
        }
        let params = ctx.pause;
        let Some(archive) = ctx.archive.as_mut().and_then(|a| a.as_dna_mut()) else {
            return Ok(());
        };
        let outcome = archive.detect_pauses(&params);
        info!(
            column = %params.column,
            flagged = outcome.flagged,
            merged = outcome.merged,
            paused = outcome.paused,
            "pauses_detected"
        );
        ctx.pause_outcome = Some(outcome);
        Ok(())
    }
}
