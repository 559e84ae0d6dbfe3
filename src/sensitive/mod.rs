//! Sensitive-detector side of the ARF staging.
//!
//! - [`StageTarget`] - capability of a behavior object that follows stage changes.
//! - [`ArfSensitiveDetector`] - the default behavior object.
//! - [`SensitiveDetectorRegistry`] - system name → (behavior object, current stage).
//! - [`ArfStage`] / [`StageSelector`] - the stage values and name resolution.

pub mod arf;
pub mod registry;
pub mod stage;

pub use arf::ArfSensitiveDetector;
pub use registry::SensitiveDetectorRegistry;
pub use stage::{ArfStage, StageSelector, SENTINEL_CODE};

/// A sensitive-detector behavior object that runs in a given stage.
#[cfg_attr(test, mockall::automock)]
pub trait StageTarget {
    /// Stage the object currently runs in.
    fn stage(&self) -> ArfStage;

    /// Switch to a new stage. `Invalid` is accepted and recorded as-is.
    fn set_stage(&mut self, stage: ArfStage);
}
