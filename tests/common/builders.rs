//! Test data builders for setup configurations

use spect_system::config::{SetupConfig, SystemConfig, VolumeConfig};
use spect_system::DigiMode;

/// Builder for creating test SystemConfigs
pub struct SystemConfigBuilder {
    config: SystemConfig,
}

impl SystemConfigBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            config: SystemConfig::new(name),
        }
    }

    pub fn with_detector(mut self) -> Self {
        self.config.attach_detector = true;
        self
    }

    pub fn stage(mut self, stage: &str) -> Self {
        self.config.stage = Some(stage.to_string());
        self
    }

    pub fn enable(mut self, tag: &str) -> Self {
        self.config.enable_outputs.push(tag.to_string());
        self
    }

    pub fn output_file(mut self, tag: &str, file: &str) -> Self {
        self.config
            .output_files
            .insert(tag.to_string(), file.to_string());
        self
    }

    pub fn volumes(mut self, head: &str, crystal: &str, pixel: &str) -> Self {
        self.config.volumes = VolumeConfig {
            head: Some(head.to_string()),
            crystal: Some(crystal.to_string()),
            pixel: Some(pixel.to_string()),
        };
        self
    }

    pub fn build(self) -> SystemConfig {
        self.config
    }
}

/// Setup holding the given systems
pub fn setup_with(mode: DigiMode, systems: Vec<SystemConfig>) -> SetupConfig {
    SetupConfig {
        digi_mode: mode,
        systems,
        ..Default::default()
    }
}
