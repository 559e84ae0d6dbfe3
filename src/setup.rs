//! Builds a [`SystemContext`] and its systems from a [`SetupConfig`].
//!
//! Each system is wired in the order a geometry macro would do it: construct,
//! attach volumes, attach the sensitive detector, configure outputs, and
//! finally request the ARF stage. The first error stops the build.

use crate::config::{SetupConfig, SystemConfig};
use crate::context::SystemContext;
use crate::diagnostics::TracingSink;
use crate::error::{Result, ResultExt, SystemError};
use crate::geometry::{DetectorSystem, SystemLevel};
use crate::sensitive::ArfSensitiveDetector;

/// Systems built from one setup, with the context they registered into.
#[derive(Debug)]
pub struct Setup {
    pub context: SystemContext,
    pub systems: Vec<DetectorSystem>,
}

impl Setup {
    /// Build with a fresh context configured from `config`.
    pub fn build(config: &SetupConfig) -> Result<Self> {
        let context = SystemContext::new(config.digi_mode)
            .with_diagnostics(TracingSink::new(config.diagnostics.verbosity()));
        Self::build_with_context(config, context)
    }

    /// Build into an existing context.
    pub fn build_with_context(config: &SetupConfig, mut context: SystemContext) -> Result<Self> {
        let mut systems = Vec::with_capacity(config.systems.len());
        for system_config in &config.systems {
            let system = build_system(system_config, &mut context)
                .with_context(|| format!("Failed to set up system '{}'", system_config.name))?;
            systems.push(system);
        }

        tracing::info!(
            "Setup complete: {} systems, {} output modules ({} enabled)",
            systems.len(),
            context.pipeline.len(),
            context.pipeline.enabled_modules().count()
        );
        Ok(Self { context, systems })
    }

    pub fn system(&self, name: &str) -> Option<&DetectorSystem> {
        self.systems.iter().find(|s| s.name() == name)
    }

    /// Request a stage for one system by name.
    pub fn set_stage(&mut self, system: &str, stage: &str) -> Result<()> {
        let target = self
            .systems
            .iter_mut()
            .find(|s| s.name() == system)
            .ok_or_else(|| SystemError::UnknownSystem(system.to_string()))?;
        target.set_stage(stage, &mut self.context).map(|_| ())
    }

    /// One line per system: name, stage and enabled outputs.
    pub fn summary(&self) -> Vec<String> {
        self.systems
            .iter()
            .map(|system| {
                let enabled: Vec<_> = self
                    .context
                    .pipeline
                    .modules_for_system(system.name())
                    .filter(|m| m.is_enabled())
                    .map(|m| m.name())
                    .collect();
                format!(
                    "{}: stage {} ({}), detector {}, outputs [{}]",
                    system.name(),
                    system.stage(),
                    system.stage().code(),
                    if self.context.registry.lookup(system.name()).is_some() {
                        "attached"
                    } else {
                        "pending"
                    },
                    enabled.join(", ")
                )
            })
            .collect()
    }
}

fn build_system(config: &SystemConfig, ctx: &mut SystemContext) -> Result<DetectorSystem> {
    let mut system = DetectorSystem::new(config.name.as_str(), ctx)?;

    let volumes = [
        (SystemLevel::Head, &config.volumes.head),
        (SystemLevel::Crystal, &config.volumes.crystal),
        (SystemLevel::Pixel, &config.volumes.pixel),
    ];
    for (level, volume) in volumes {
        if let Some(volume) = volume {
            system.attach_volume(level, volume.as_str())?;
        }
    }

    if config.attach_detector {
        ctx.registry
            .attach(system.name(), Box::new(ArfSensitiveDetector::new(system.name())))?;
    }

    for (tag, file) in &config.output_files {
        let id = ctx.pipeline.find(tag, system.name()).ok_or_else(|| {
            SystemError::UnknownOutputModule(format!("{}/{}", system.name(), tag))
        })?;
        if let Some(module) = ctx.pipeline.get_mut(id) {
            module.set_file_name(file.clone());
        }
    }
    for tag in &config.enable_outputs {
        ctx.pipeline.enable(tag, system.name(), true)?;
    }

    if let Some(stage) = &config.stage {
        system.set_stage(stage, ctx)?;
    }

    Ok(system)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensitive::{ArfStage, StageTarget};

    #[test]
    fn test_build_sample() {
        let setup = Setup::build(&SetupConfig::sample()).unwrap();
        let head = setup.system("SPECThead").unwrap();

        assert_eq!(head.stage(), ArfStage::Unset);
        assert!(setup.context.registry.lookup("SPECThead").is_some());
        assert_eq!(setup.context.pipeline.len(), 3);
        assert_eq!(
            setup.summary(),
            vec!["SPECThead: stage unset (-2), detector attached, outputs []".to_string()]
        );
    }

    #[test]
    fn test_bad_stage_stops_build() {
        let mut config = SetupConfig::sample();
        config.systems[0].stage = Some("usetables".to_string());
        config.systems.push(SystemConfig::new("second"));

        let err = Setup::build(&config).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("usetables"));
        assert!(err.to_string().contains("SPECThead"));
    }

    #[test]
    fn test_set_stage_by_system_name() {
        let mut setup = Setup::build(&SetupConfig::sample()).unwrap();
        setup.set_stage("SPECThead", "generateData").unwrap();
        assert_eq!(
            setup.context.registry.lookup("SPECThead").map(|t| t.stage()),
            Some(ArfStage::GenerateData)
        );
        assert!(setup.set_stage("nope", "generateData").is_err());
    }
}
