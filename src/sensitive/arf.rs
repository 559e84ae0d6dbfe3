use crate::sensitive::{ArfStage, StageTarget};

/// Default ARF sensitive detector: records the stage it was last given.
#[derive(Debug, Clone)]
pub struct ArfSensitiveDetector {
    name: String,
    stage: ArfStage,
    stage_changes: u32,
}

impl ArfSensitiveDetector {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stage: ArfStage::Unset,
            stage_changes: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// How many times `set_stage` was called.
    pub fn stage_changes(&self) -> u32 {
        self.stage_changes
    }
}

impl StageTarget for ArfSensitiveDetector {
    fn stage(&self) -> ArfStage {
        self.stage
    }

    fn set_stage(&mut self, stage: ArfStage) {
        if !stage.is_valid() {
            tracing::warn!("ARF detector '{}' placed in stage {}", self.name, stage);
        }
        self.stage = stage;
        self.stage_changes += 1;
    }
}
