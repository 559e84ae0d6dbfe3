//! Setup files for the `spect-setup` binary
//!
//! A setup file lists the SPECT head systems to build and how to wire them:
//! attached volumes, sensitive detectors, enabled output modules and the ARF
//! stage to request. Files ending in `.toml` are read as TOML, anything else
//! as JSON.
//!
//! # Example
//!
//! ```toml
//! digi_mode = "runtime"
//!
//! [logging]
//! filter = "info,spect_system=debug"
//!
//! [diagnostics]
//! default_verbosity = 1
//! categories = { Geometry = 2 }
//!
//! [[systems]]
//! name = "SPECThead"
//! attach_detector = true
//! stage = "useTables"
//! enable_outputs = ["projection"]
//! volumes = { head = "SPECThead", crystal = "crystal", pixel = "pixel" }
//! ```

use crate::diagnostics::Verbosity;
use crate::error::{Result, SystemError};
use crate::output::OutputKind;
use crate::types::DigiMode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Default verbosity for diagnostic categories without an explicit level
pub const DEFAULT_VERBOSITY: u8 = 1;

/// Default `tracing` filter
pub const DEFAULT_LOG_FILTER: &str = "info,spect_system=debug";

/// Complete setup description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetupConfig {
    /// Digitization mode of the output pipeline
    #[serde(default)]
    pub digi_mode: DigiMode,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    /// Systems to build, in order
    #[serde(default)]
    pub systems: Vec<SystemConfig>,
}

/// Logging settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive; `RUST_LOG` takes precedence
    #[serde(default)]
    pub filter: Option<String>,

    /// Also write logs to this file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn filter_or_default(&self) -> &str {
        self.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

/// Per-category diagnostic verbosity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    #[serde(default = "default_verbosity")]
    pub default_verbosity: u8,

    #[serde(default)]
    pub categories: BTreeMap<String, u8>,
}

fn default_verbosity() -> u8 {
    DEFAULT_VERBOSITY
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            default_verbosity: DEFAULT_VERBOSITY,
            categories: BTreeMap::new(),
        }
    }
}

impl DiagnosticsConfig {
    pub fn verbosity(&self) -> Verbosity {
        self.categories
            .iter()
            .fold(Verbosity::new(self.default_verbosity), |v, (category, level)| {
                v.with_category(category.clone(), *level)
            })
    }
}

/// One SPECT head system
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemConfig {
    pub name: String,

    /// Attach the default ARF sensitive detector
    #[serde(default)]
    pub attach_detector: bool,

    /// ARF stage to request once the system is wired
    #[serde(default)]
    pub stage: Option<String>,

    #[serde(default)]
    pub volumes: VolumeConfig,

    /// Output module tags to enable
    #[serde(default)]
    pub enable_outputs: Vec<String>,

    /// Output file names keyed by module tag
    #[serde(default)]
    pub output_files: BTreeMap<String, String>,
}

impl SystemConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Geometry volumes attached to each hierarchy level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VolumeConfig {
    #[serde(default)]
    pub head: Option<String>,
    #[serde(default)]
    pub crystal: Option<String>,
    #[serde(default)]
    pub pixel: Option<String>,
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

impl SetupConfig {
    /// Load a setup file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SystemError::Config(format!("Failed to read setup file {:?}: {}", path, e))
        })?;

        let config: Self = if is_toml(path) {
            toml::from_str(&content).map_err(|e| {
                SystemError::Config(format!("Failed to parse setup file {:?}: {}", path, e))
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| {
                SystemError::Config(format!("Failed to parse setup file {:?}: {}", path, e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Load a setup file, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load setup file, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save the setup to disk, as TOML or JSON depending on the extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SystemError::Config(format!("Failed to create setup directory: {}", e))
            })?;
        }

        let content = if is_toml(path) {
            toml::to_string_pretty(self)
                .map_err(|e| SystemError::Config(format!("Failed to serialize setup: {}", e)))?
        } else {
            serde_json::to_string_pretty(self)
                .map_err(|e| SystemError::Config(format!("Failed to serialize setup: {}", e)))?
        };

        std::fs::write(path, content).map_err(|e| {
            SystemError::Config(format!("Failed to write setup file {:?}: {}", path, e))
        })
    }

    /// Check names and output tags. Stage names are checked when requested.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for system in &self.systems {
            if system.name.is_empty() {
                return Err(SystemError::Config("System with empty name".to_string()));
            }
            if !seen.insert(system.name.as_str()) {
                return Err(SystemError::Config(format!(
                    "System '{}' is listed twice",
                    system.name
                )));
            }
            for tag in system.enable_outputs.iter().chain(system.output_files.keys()) {
                if OutputKind::from_tag(tag).is_none() {
                    return Err(SystemError::Config(format!(
                        "System '{}': unknown output module '{}'",
                        system.name, tag
                    )));
                }
            }
        }
        Ok(())
    }

    /// A single-head setup used by the binary when no file is given
    pub fn sample() -> Self {
        let mut head = SystemConfig::new("SPECThead");
        head.attach_detector = true;
        head.volumes = VolumeConfig {
            head: Some("SPECThead".to_string()),
            crystal: Some("crystal".to_string()),
            pixel: Some("pixel".to_string()),
        };
        Self {
            systems: vec![head],
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SetupConfig::default();
        assert_eq!(config.digi_mode, DigiMode::Runtime);
        assert_eq!(config.diagnostics.default_verbosity, DEFAULT_VERBOSITY);
        assert_eq!(config.logging.filter_or_default(), DEFAULT_LOG_FILTER);
        assert!(config.systems.is_empty());
    }

    #[test]
    fn test_parse_toml() {
        let text = r#"
            digi_mode = "offline"

            [diagnostics]
            categories = { Geometry = 2 }

            [[systems]]
            name = "SPECThead"
            stage = "computeTables"
            enable_outputs = ["projection", "spectGPU"]
            output_files = { projection = "out/proj" }
            volumes = { crystal = "crystal" }
        "#;
        let config: SetupConfig = toml::from_str(text).unwrap();
        config.validate().unwrap();

        assert_eq!(config.digi_mode, DigiMode::Offline);
        assert_eq!(config.diagnostics.verbosity().level("Geometry"), 2);
        assert_eq!(config.diagnostics.verbosity().level("Output"), DEFAULT_VERBOSITY);

        let head = &config.systems[0];
        assert_eq!(head.stage.as_deref(), Some("computeTables"));
        assert!(!head.attach_detector);
        assert_eq!(head.volumes.crystal.as_deref(), Some("crystal"));
        assert!(head.volumes.pixel.is_none());
        assert_eq!(head.output_files["projection"], "out/proj");
    }

    #[test]
    fn test_validate_rejects_bad_setups() {
        let mut config = SetupConfig::sample();
        config.systems.push(SystemConfig::new("SPECThead"));
        assert!(config.validate().is_err());

        let mut config = SetupConfig::sample();
        config.systems[0].enable_outputs.push("root".to_string());
        assert!(config.validate().is_err());

        let mut config = SetupConfig::sample();
        config.systems.push(SystemConfig::new(""));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_serialization() {
        let config = SetupConfig::sample();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: SetupConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.systems.len(), 1);
        assert_eq!(parsed.systems[0].name, "SPECThead");
        assert!(parsed.systems[0].attach_detector);
    }
}
