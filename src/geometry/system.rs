//! SPECT head detector system.
//!
//! Construction wires the system into its [`SystemContext`], in order:
//! 1. Register a pending sensitive detector under the system name (stage `Unset`).
//! 2. Create the messenger and install the ARF commands.
//! 3. Build the component hierarchy `base -> crystal -> pixel`.
//! 4. Register the projection, interfile and GPU image modules with the
//!    output pipeline, tagged with the pipeline's current digitization mode.
//! 5. Bind the output-ID names `headID`, `crystalID`, `pixelID`.
//!
//! Nothing is rolled back if a step fails. Dropping the system releases the
//! messenger and the component tree; the output modules stay in the pipeline.

use crate::context::SystemContext;
use crate::diagnostics::GEOMETRY;
use crate::error::{Result, SystemError};
use crate::geometry::component_tree::{ComponentNode, ComponentTree};
use crate::geometry::messenger::{SystemCommand, SystemMessenger};
use crate::id::{ComponentId, ModuleId};
use crate::output::OutputKind;
use crate::sensitive::{ArfStage, StageSelector};
use crate::types::{OutputVolumeId, VolumeStep};
use serde::{Deserialize, Serialize};

pub const BASE_COMPONENT: &str = "base";
pub const CRYSTAL_COMPONENT: &str = "crystal";
pub const PIXEL_COMPONENT: &str = "pixel";

/// Output-ID names, indexed by hierarchy depth.
pub const OUTPUT_ID_NAMES: [&str; 3] = ["headID", "crystalID", "pixelID"];

/// Verbosity of the stage-resolution trace.
const STAGE_TRACE_VERBOSITY: u8 = 2;

/// Hierarchy levels of a SPECT head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemLevel {
    Head,
    Crystal,
    Pixel,
}

impl SystemLevel {
    pub const ALL: [SystemLevel; 3] = [SystemLevel::Head, SystemLevel::Crystal, SystemLevel::Pixel];

    pub fn depth(self) -> usize {
        match self {
            SystemLevel::Head => 0,
            SystemLevel::Crystal => 1,
            SystemLevel::Pixel => 2,
        }
    }
}

/// A SPECT camera head.
#[derive(Debug)]
pub struct DetectorSystem {
    name: String,
    tree: ComponentTree,
    crystal: ComponentId,
    pixel: ComponentId,
    outputs: Vec<ModuleId>,
    output_id_names: Vec<Option<String>>,
    stage: StageSelector,
    messenger: SystemMessenger,
}

impl DetectorSystem {
    pub fn new(name: impl Into<String>, ctx: &mut SystemContext) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SystemError::InvalidName(name));
        }

        ctx.registry.register_pending(&name, ArfStage::Unset)?;

        let mut messenger = SystemMessenger::new(&name);
        messenger.set_directory_guidance(format!("Controls the system '{}'", name));
        messenger.set_arf_commands();

        let mut tree = ComponentTree::new(BASE_COMPONENT);
        let crystal = tree.add_child(tree.root(), CRYSTAL_COMPONENT)?;
        let pixel = tree.add_child(crystal, PIXEL_COMPONENT)?;

        let mode = ctx.pipeline.digi_mode();
        let outputs = OutputKind::SPECT_HEAD
            .iter()
            .map(|&kind| ctx.pipeline.register_stage(kind, &name, mode))
            .collect::<Result<Vec<_>>>()?;

        let mut system = Self {
            name,
            tree,
            crystal,
            pixel,
            outputs,
            output_id_names: vec![None; OUTPUT_ID_NAMES.len()],
            stage: StageSelector::new(),
            messenger,
        };
        for (depth, id_name) in OUTPUT_ID_NAMES.iter().enumerate() {
            system.set_output_id_name(id_name, depth);
        }

        tracing::debug!(
            "Constructed system '{}' with {} components and {} output modules ({})",
            system.name,
            system.tree.len(),
            system.outputs.len(),
            mode
        );
        Ok(system)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stage last requested through [`DetectorSystem::set_stage`].
    pub fn stage(&self) -> ArfStage {
        self.stage.current()
    }

    /// Request an ARF stage by name.
    ///
    /// The resolved stage is recorded in the registry and forwarded to the
    /// attached sensitive detector, if any, before the request is traced.
    /// An unrecognized name is forwarded as `Invalid` too, and only then
    /// reported as [`SystemError::Configuration`].
    pub fn set_stage(&mut self, stage_name: &str, ctx: &mut SystemContext) -> Result<ArfStage> {
        let stage = self.stage.select(stage_name);
        let propagated = ctx.registry.record_stage(&self.name, stage)?;

        ctx.diagnostics.message(
            GEOMETRY,
            STAGE_TRACE_VERBOSITY,
            &format!(
                "System '{}' ARF stage = {} {}",
                self.name,
                stage_name,
                stage.code()
            ),
        );

        if stage == ArfStage::Invalid {
            return Err(SystemError::Configuration {
                system: self.name.clone(),
                stage: stage_name.to_string(),
            });
        }

        if !propagated {
            tracing::debug!(
                "No sensitive detector attached to '{}' yet, stage {} recorded only",
                self.name,
                stage
            );
        }
        Ok(stage)
    }

    /// Dispatch a messenger command by path.
    pub fn apply_command(&mut self, path: &str, value: &str, ctx: &mut SystemContext) -> Result<()> {
        match self.messenger.resolve(path) {
            Some(SystemCommand::SetArfStage) => self.set_stage(value.trim(), ctx).map(|_| ()),
            None => Err(SystemError::UnknownCommand {
                system: self.name.clone(),
                command: path.to_string(),
            }),
        }
    }

    pub fn messenger(&self) -> &SystemMessenger {
        &self.messenger
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn component_id(&self, level: SystemLevel) -> ComponentId {
        match level {
            SystemLevel::Head => self.tree.root(),
            SystemLevel::Crystal => self.crystal,
            SystemLevel::Pixel => self.pixel,
        }
    }

    pub fn component(&self, level: SystemLevel) -> &ComponentNode {
        // Level components are created in `new` and never removed.
        &self.tree[self.component_id(level)]
    }

    pub fn base_component(&self) -> &ComponentNode {
        self.component(SystemLevel::Head)
    }

    pub fn crystal_component(&self) -> &ComponentNode {
        self.component(SystemLevel::Crystal)
    }

    pub fn pixel_component(&self) -> &ComponentNode {
        self.component(SystemLevel::Pixel)
    }

    /// Look up a component by dotted path, e.g. `"base.crystal"`.
    pub fn find_component(&self, path: &str) -> Option<&ComponentNode> {
        self.tree.find_by_path(path).and_then(|id| self.tree.get(id))
    }

    /// Attach a geometry volume to one level of the hierarchy.
    pub fn attach_volume(&mut self, level: SystemLevel, volume: impl Into<String>) -> Result<()> {
        let volume = volume.into();
        let id = self.component_id(level);
        self.tree.attach_volume(id, volume.clone())?;
        tracing::debug!("System '{}': attached volume '{}' to {:?}", self.name, volume, level);
        Ok(())
    }

    /// Hierarchy level whose component carries `volume`.
    pub fn level_for_volume(&self, volume: &str) -> Option<SystemLevel> {
        let id = self.tree.find_by_volume(volume)?;
        SystemLevel::ALL
            .into_iter()
            .find(|&level| self.component_id(level) == id)
    }

    fn set_output_id_name(&mut self, id_name: &str, depth: usize) {
        if depth >= self.output_id_names.len() {
            self.output_id_names.resize(depth + 1, None);
        }
        self.output_id_names[depth] = Some(id_name.to_string());
    }

    pub fn output_id_name(&self, depth: usize) -> Option<&str> {
        self.output_id_names.get(depth).and_then(|n| n.as_deref())
    }

    pub fn depth_of_output_id(&self, id_name: &str) -> Option<usize> {
        self.output_id_names
            .iter()
            .position(|n| n.as_deref() == Some(id_name))
    }

    /// Map a hit's volume path to per-level copy numbers.
    ///
    /// A level resolves when its component has an attached volume that
    /// appears in `path`; otherwise it stays at -1.
    pub fn output_volume_id(&self, path: &[VolumeStep]) -> OutputVolumeId {
        let mut id = OutputVolumeId::new(SystemLevel::ALL.len());
        for level in SystemLevel::ALL {
            let Some(volume) = self.component(level).volume.as_deref() else {
                continue;
            };
            if let Some(step) = path.iter().find(|s| s.volume == volume) {
                id.set(level.depth(), step.copy_number);
            }
        }
        id
    }

    /// Handles of the modules this system registered, in registration order.
    pub fn output_modules(&self) -> &[ModuleId] {
        &self.outputs
    }
}

impl Drop for DetectorSystem {
    fn drop(&mut self) {
        // Output modules belong to the pipeline and are left registered.
        tracing::debug!("Releasing system '{}' and its messenger", self.name);
    }
}
