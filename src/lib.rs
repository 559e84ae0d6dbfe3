//! # spect-system: SPECT head detector registration and ARF staging
//!
//! A SPECT camera head is described as a small component hierarchy
//! (`base -> crystal -> pixel`). Building one wires it into shared state:
//!
//! - **Sensitive-detector registry**: the system name is registered with no
//!   behavior object and stage `Unset`; the geometry phase attaches the
//!   ARF sensitive detector later.
//! - **Output pipeline**: projection, interfile and GPU image modules are
//!   registered for the system with the current digitization mode.
//! - **ARF stage**: `generateData`, `computeTables` or `useTables` is requested
//!   by name and forwarded to the attached sensitive detector. Any other name is
//!   a configuration error.
//!
//! The shared state lives in an explicit [`SystemContext`] rather than global
//! singletons.
//!
//! ## Example
//!
//! ```
//! use spect_system::{ArfSensitiveDetector, DetectorSystem, StageTarget, SystemContext};
//!
//! # fn main() -> spect_system::Result<()> {
//! let mut ctx = SystemContext::default();
//! let mut head = DetectorSystem::new("SPECThead", &mut ctx)?;
//!
//! ctx.registry
//!     .attach("SPECThead", Box::new(ArfSensitiveDetector::new("SPECThead")))?;
//! head.set_stage("useTables", &mut ctx)?;
//!
//! assert_eq!(ctx.registry.lookup("SPECThead").unwrap().stage().code(), 2);
//! assert!(head.set_stage("UseTables", &mut ctx).is_err());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod id;
pub mod output;
pub mod sensitive;
pub mod setup;
pub mod types;

// Re-export commonly used types
pub use config::{SetupConfig, SystemConfig};
pub use context::SystemContext;
pub use error::{Result, SystemError};
pub use geometry::{DetectorSystem, SystemLevel};
pub use id::{ComponentId, ModuleId};
pub use output::{OutputKind, OutputModule, OutputPipeline};
pub use sensitive::{ArfSensitiveDetector, ArfStage, SensitiveDetectorRegistry, StageTarget};
pub use setup::Setup;
pub use types::{DigiMode, OutputVolumeId, VolumeStep};
