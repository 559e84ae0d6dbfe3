//! Detector systems and their component hierarchy.
//!
//! A [`DetectorSystem`] is a SPECT camera head:
//!
//! ```text
//! base (headID) ──► crystal (crystalID) ──► pixel (pixelID)
//! ```
//!
//! It owns its [`ComponentTree`] and [`SystemMessenger`], registers with the
//! sensitive-detector registry and output pipeline of a
//! [`SystemContext`](crate::context::SystemContext), and selects the ARF stage.

pub mod component_tree;
pub mod messenger;
pub mod system;

pub use component_tree::{ComponentNode, ComponentTree};
pub use messenger::{SystemCommand, SystemMessenger};
pub use system::{
    DetectorSystem, SystemLevel, BASE_COMPONENT, CRYSTAL_COMPONENT, OUTPUT_ID_NAMES,
    PIXEL_COMPONENT,
};
