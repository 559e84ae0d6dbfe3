//! Ordered registry of output modules.
//!
//! The pipeline owns every module added to it; systems keep only the
//! `ModuleId` handles. Modules outlive the systems that registered them.

use crate::error::{Result, SystemError};
use crate::id::ModuleId;
use crate::output::{OutputKind, OutputModule};
use crate::types::DigiMode;

/// Shared output pipeline.
#[derive(Default)]
pub struct OutputPipeline {
    modules: Vec<Box<dyn OutputModule>>,
    digi_mode: DigiMode,
}

impl std::fmt::Debug for OutputPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputPipeline")
            .field("digi_mode", &self.digi_mode)
            .field(
                "modules",
                &self.modules.iter().map(|m| m.describe()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl OutputPipeline {
    pub fn new(digi_mode: DigiMode) -> Self {
        Self {
            modules: Vec::new(),
            digi_mode,
        }
    }

    /// Current digitization mode, read by modules when they register.
    pub fn digi_mode(&self) -> DigiMode {
        self.digi_mode
    }

    /// Change the mode for modules registered from now on.
    pub fn set_digi_mode(&mut self, mode: DigiMode) {
        if mode != self.digi_mode {
            tracing::debug!("Output digitization mode {} -> {}", self.digi_mode, mode);
        }
        self.digi_mode = mode;
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Add a module. A system may register each tag only once.
    pub fn add_module(&mut self, module: Box<dyn OutputModule>) -> Result<ModuleId> {
        if self.find(module.name(), module.owning_system()).is_some() {
            return Err(SystemError::DuplicateOutputModule {
                tag: module.name().to_string(),
                system: module.owning_system().to_string(),
            });
        }

        let id = ModuleId(self.modules.len() as u32);
        tracing::debug!("Added output module {:?}: {}", id, module.describe());
        self.modules.push(module);
        Ok(id)
    }

    /// Build a module of `kind` for `system` in `mode` and add it.
    pub fn register_stage(
        &mut self,
        kind: OutputKind,
        system: &str,
        mode: DigiMode,
    ) -> Result<ModuleId> {
        self.add_module(kind.build(system, mode))
    }

    pub fn get(&self, id: ModuleId) -> Option<&dyn OutputModule> {
        self.modules.get(id.index()).map(|m| &**m)
    }

    pub fn get_mut(&mut self, id: ModuleId) -> Option<&mut (dyn OutputModule + 'static)> {
        self.modules.get_mut(id.index()).map(|m| &mut **m)
    }

    /// Find the module registered under `tag` by `system`.
    pub fn find(&self, tag: &str, system: &str) -> Option<ModuleId> {
        self.modules
            .iter()
            .position(|m| m.name() == tag && m.owning_system() == system)
            .map(|i| ModuleId(i as u32))
    }

    /// Modules registered by `system`, in registration order.
    pub fn modules_for_system<'a>(
        &'a self,
        system: &'a str,
    ) -> impl Iterator<Item = &'a dyn OutputModule> + 'a {
        self.iter().filter(move |m| m.owning_system() == system)
    }

    /// Enable or disable the module `tag` of `system`.
    pub fn enable(&mut self, tag: &str, system: &str, enabled: bool) -> Result<()> {
        let id = self
            .find(tag, system)
            .ok_or_else(|| SystemError::UnknownOutputModule(format!("{}/{}", system, tag)))?;
        self.modules[id.index()].set_enabled(enabled);
        tracing::debug!(
            "Output module {} of '{}' {}",
            tag,
            system,
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(())
    }

    pub fn enabled_modules(&self) -> impl Iterator<Item = &dyn OutputModule> {
        self.iter().filter(|m| m.is_enabled())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn OutputModule> {
        self.modules.iter().map(|m| &**m)
    }
}
