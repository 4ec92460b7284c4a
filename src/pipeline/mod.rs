use anyhow::Result;
use std::time::Instant;
use tracing::{info, warn};

use crate::ctx::Ctx;

pub mod stage0_scaffold;
pub mod stage1_reference;
pub mod stage2_assemble;
pub mod stage3_signature;
pub mod stage4_score;
pub mod stage5_stratify;
pub mod stage6_survival;
pub mod stage7_export;

use stage0_scaffold::Stage0Scaffold;
use stage1_reference::Stage1Reference;
use stage2_assemble::Stage2Assemble;
use stage3_signature::Stage3Signature;
use stage4_score::Stage4Score;
use stage5_stratify::Stage5Stratify;
use stage6_survival::Stage6Survival;
use stage7_export::Stage7Export;

pub trait Stage {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut Ctx) -> Result<()>;
}

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Request validation through survival comparison. Produces every
    /// in-memory result; nothing is written to disk.
    pub fn analysis() -> Self {
        Self::new(vec![
            Box::new(Stage0Scaffold::new()),
            Box::new(Stage1Reference::new()),
            Box::new(Stage2Assemble::new()),
            Box::new(Stage3Signature::new()),
            Box::new(Stage4Score::new()),
            Box::new(Stage5Stratify::new()),
            Box::new(Stage6Survival::new()),
        ])
    }

    /// File export, run after a successful analysis. A no-op when
    /// `ctx.export` is false.
    pub fn export() -> Self {
        Self::new(vec![Box::new(Stage7Export::new())])
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn run(&self, ctx: &mut Ctx) -> Result<()> {
        for stage in &self.stages {
            let start = Instant::now();
            info!(stage = stage.name(), "stage started");
            if let Err(err) = stage.run(ctx) {
                let elapsed_ms = start.elapsed().as_millis();
                warn!(
                    stage = stage.name(),
                    elapsed_ms = elapsed_ms as u64,
                    kind = crate::error::kind_of(&err).map_or("Other", |e| e.kind()),
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
