//! Shared state every detector system registers into.

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::output::OutputPipeline;
use crate::sensitive::SensitiveDetectorRegistry;
use crate::types::DigiMode;

/// Registries and diagnostics shared by all systems of one setup.
pub struct SystemContext {
    pub registry: SensitiveDetectorRegistry,
    pub pipeline: OutputPipeline,
    pub diagnostics: Box<dyn DiagnosticSink>,
}

impl Default for SystemContext {
    fn default() -> Self {
        Self::new(DigiMode::default())
    }
}

impl SystemContext {
    pub fn new(digi_mode: DigiMode) -> Self {
        Self {
            registry: SensitiveDetectorRegistry::new(),
            pipeline: OutputPipeline::new(digi_mode),
            diagnostics: Box::new(TracingSink::default()),
        }
    }

    pub fn with_diagnostics(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.diagnostics = Box::new(sink);
        self
    }
}

impl std::fmt::Debug for SystemContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemContext")
            .field("registry", &self.registry)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}
