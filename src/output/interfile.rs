//! Interfile writer registered by SPECT head systems.

use crate::output::{ModuleState, OutputKind, OutputModule};
use crate::types::DigiMode;

/// Writes projection sets as Interfile header/data pairs.
#[derive(Debug, Clone)]
pub struct InterfileWriter {
    state: ModuleState,
}

impl InterfileWriter {
    pub fn new(system: &str, digi_mode: DigiMode) -> Self {
        Self {
            state: ModuleState::new(system, digi_mode),
        }
    }
}

impl OutputModule for InterfileWriter {
    fn name(&self) -> &str {
        OutputKind::Interfile.tag()
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Interfile
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
