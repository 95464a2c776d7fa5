use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::io::{json_writer, tsv_writer};
use crate::pipeline::Stage;

pub struct Stage7Output;

impl Stage7Output {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage7Output {
    fn name(&self) -> &'static str {
        "stage7_output"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if ctx.write_json {
            json_writer::write_json(&ctx.output.json_path, ctx)?;
        }
        if ctx.write_tsv {
            if let Some(archive) = ctx.archive()?.as_dna() {
                tsv_writer::write_segments_tsv(
                    &ctx.output.segments_path,
                    archive,
                    ctx.pause.column,
                )?;
                for molecule in &archive.molecules {
                    if let Some(table) = &molecule.df_noidle {
                        let path = ctx.output.noidle_dir.join(format!("{}.tsv", molecule.uid()));
                        tsv_writer::write_table_tsv(&path, table)?;
                    }
                }
            }
        }

        info!("stage7_output_ready");
        Ok(())
    }
}
