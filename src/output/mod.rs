//! Output modules and the pipeline that owns them.
//!
//! Each detector system contributes its writers to a shared [`OutputPipeline`]:
//!
//! ```text
//! [SPECThead] ──► projection (ProjectionSetWriter)
//!             ├──► interfile  (InterfileWriter)
//!             └──► spectGPU   (SpectGpuImageWriter)
//! ```
//!
//! Modules are registered disabled and record the pipeline's digitization
//! mode at registration time. Only the registration contract lives here; the
//! writers do not produce files.

pub mod gpu_image;
pub mod interfile;
pub mod pipeline;
pub mod projection;

pub use gpu_image::SpectGpuImageWriter;
pub use interfile::InterfileWriter;
pub use pipeline::OutputPipeline;
pub use projection::ProjectionSetWriter;

use crate::types::DigiMode;
use std::fmt;

/// Capability shared by every output module.
pub trait OutputModule {
    /// Tag the module is registered under (e.g. `"projection"`).
    fn name(&self) -> &str;

    fn kind(&self) -> OutputKind;

    /// Name of the system that registered this module.
    fn owning_system(&self) -> &str;

    /// Digitization mode read when the module was registered.
    fn digi_mode(&self) -> DigiMode;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    fn file_name(&self) -> Option<&str>;

    fn set_file_name(&mut self, file_name: String);

    /// One-line summary for logs.
    fn describe(&self) -> String {
        format!(
            "{} for '{}' ({}, {}{})",
            self.name(),
            self.owning_system(),
            self.digi_mode(),
            if self.is_enabled() { "enabled" } else { "disabled" },
            self.file_name()
                .map(|f| format!(", file '{}'", f))
                .unwrap_or_default()
        )
    }
}

/// The built-in output modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    ProjectionSet,
    Interfile,
    SpectGpuImage,
}

impl OutputKind {
    /// Modules every SPECT head system registers, in registration order.
    pub const SPECT_HEAD: [OutputKind; 3] = [
        OutputKind::ProjectionSet,
        OutputKind::Interfile,
        OutputKind::SpectGpuImage,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            OutputKind::ProjectionSet => "projection",
            OutputKind::Interfile => "interfile",
            OutputKind::SpectGpuImage => "spectGPU",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::SPECT_HEAD.into_iter().find(|k| k.tag() == tag)
    }

    /// Build a new, disabled module of this kind.
    pub fn build(self, system: &str, mode: DigiMode) -> Box<dyn OutputModule> {
        match self {
            OutputKind::ProjectionSet => Box::new(ProjectionSetWriter::new(system, mode)),
            OutputKind::Interfile => Box::new(InterfileWriter::new(system, mode)),
            OutputKind::SpectGpuImage => Box::new(SpectGpuImageWriter::new(system, mode)),
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Registration state shared by the built-in writers.
#[derive(Debug, Clone)]
pub(crate) struct ModuleState {
    pub system: String,
    pub digi_mode: DigiMode,
    pub enabled: bool,
    pub file_name: Option<String>,
}

impl ModuleState {
    pub fn new(system: &str, digi_mode: DigiMode) -> Self {
        Self {
            system: system.to_string(),
            digi_mode,
            enabled: false,
            file_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        let tags: Vec<_> = OutputKind::SPECT_HEAD.iter().map(|k| k.tag()).collect();
        assert_eq!(tags, vec!["projection", "interfile", "spectGPU"]);
        assert_eq!(OutputKind::from_tag("spectGPU"), Some(OutputKind::SpectGpuImage));
        assert_eq!(OutputKind::from_tag("spectgpu"), None);
    }

    #[test]
    fn test_build_matches_kind() {
        for kind in OutputKind::SPECT_HEAD {
            let module = kind.build("head", DigiMode::Offline);
            assert_eq!(module.kind(), kind);
            assert_eq!(module.name(), kind.tag());
            assert_eq!(module.owning_system(), "head");
            assert_eq!(module.digi_mode(), DigiMode::Offline);
            assert!(!module.is_enabled());
        }
    }

    #[test]
    fn test_describe() {
        let mut module = OutputKind::Interfile.build("head", DigiMode::Runtime);
        assert_eq!(module.describe(), "interfile for 'head' (runtime, disabled)");
        module.set_enabled(true);
        module.set_file_name("out/head".to_string());
        assert_eq!(
            module.describe(),
            "interfile for 'head' (runtime, enabled, file 'out/head')"
        );
    }
}
