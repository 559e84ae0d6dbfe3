//! Projection-set maker registered by SPECT head systems.

use crate::output::{ModuleState, OutputKind, OutputModule};
use crate::types::DigiMode;

/// Builds per-head projection sets from digitized singles.
#[derive(Debug, Clone)]
pub struct ProjectionSetWriter {
    state: ModuleState,
}

impl ProjectionSetWriter {
    pub fn new(system: &str, digi_mode: DigiMode) -> Self {
        Self {
            state: ModuleState::new(system, digi_mode),
        }
    }
}

impl OutputModule for ProjectionSetWriter {
    fn name(&self) -> &str {
        OutputKind::ProjectionSet.tag()
    }

    fn kind(&self) -> OutputKind {
        OutputKind::ProjectionSet
    }

    fn owning_system(&self) -> &str {
        &self.state.system
    }

    fn digi_mode(&self) -> DigiMode {
        self.state.digi_mode
    }

    fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.state.enabled = enabled;
    }

    fn file_name(&self) -> Option<&str> {
        self.state.file_name.as_deref()
    }

    fn set_file_name(&mut self, file_name: String) {
        self.state.file_name = Some(file_name);
    }
}
