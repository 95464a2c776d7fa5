use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage6Noidle;

impl Stage6Noidle {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage6Noidle {
    fn name(&self) -> &'static str {
        "stage6_noidle"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let column = ctx.pause.column;
        let Some(archive) = ctx.archive.as_mut().and_then(|a| a.as_dna_mut()) else {
            return Ok(());
        };
        let removed = archive.add_df_noidle(column)?;
        info!(column = %column, removed, "idle_rows_removed");
        ctx.noidle_rows_removed = Some(removed);
        Ok(())
    }
}
