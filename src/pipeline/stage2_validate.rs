use anyhow::Result;
use tracing::{info, warn};

use crate::archive::ValidationStatus;
use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage2Validate;

impl Stage2Validate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Validate {
    fn name(&self) -> &'static str {
        "stage2_validate"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let status = ctx.archive()?.as_archive().validate_params();
        match &status {
            ValidationStatus::Passed => info!("archive_validation_passed"),
            ValidationStatus::Failed(err) => {
                warn!(kind = err.kind(), error = %err, "archive_validation_failed");
                ctx.warnings.push(format!("validation failed: {}", err));
            }
        }
        ctx.validation = Some(status);
        Ok(())
    }
}
