use anyhow::Result;
use std::time::Instant;
use tracing::{info, warn};

use crate::ctx::Ctx;

pub mod stage0_scaffold;
pub mod stage1_load;
pub mod stage2_validate;
pub mod stage3_segments;
pub mod stage4_filter;
pub mod stage5_pauses;
pub mod stage6_noidle;
pub mod stage7_output;

pub trait Stage {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut Ctx) -> Result<()>;
}

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Every stage of a full `run`, in order.
    pub fn full() -> Self {
        Self::new(vec![
            Box::new(stage0_scaffold::Stage0Scaffold::new()),
            Box::new(stage1_load::Stage1Load::new()),
            Box::new(stage2_validate::Stage2Validate::new()),
            Box::new(stage3_segments::Stage3Segments::new()),
            Box::new(stage4_filter::Stage4Filter::new()),
            Box::new(stage5_pauses::Stage5Pauses::new()),
            Box::new(stage6_noidle::Stage6Noidle::new()),
            Box::new(stage7_output::Stage7Output::new()),
        ])
    }

    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    pub fn run(&self, ctx: &mut Ctx) -> Result<()> {
        info!(archive = %ctx.location, stages = self.stages.len(), "pipeline started");
        for stage in &self.stages {
            let start = Instant::now();
            info!(stage = stage.name(), "stage started");
            if let Err(err) = stage.run(ctx) {
                let elapsed_ms = start.elapsed().as_millis();
                warn!(
                    stage = stage.name(),
                    elapsed_ms = elapsed_ms as u64,
                    "stage failed"
                );
                return Err(err);
            }
            let elapsed_ms = start.elapsed().as_millis();
            info!(
                stage = stage.name(),
                elapsed_ms = elapsed_ms as u64,
                "stage finished"
            );
        }
        Ok(())
    }
}
