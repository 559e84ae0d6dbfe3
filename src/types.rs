//! Core data types shared across the crate
//!
//! # Main Types
//!
//! - [`DigiMode`] - How raw hits are turned into output records
//! - [`VolumeStep`] - One step of a hit's volume path (volume name + copy number)
//! - [`OutputVolumeId`] - Per-level copy numbers addressing a hit to a crystal/pixel

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of hierarchy levels an [`OutputVolumeId`] can address
pub const MAX_OUTPUT_DEPTH: usize = 6;

/// Digitization mode of the output pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DigiMode {
    /// Digitize hits while the simulation runs
    #[default]
    Runtime,
    /// Digitize hits afterwards from stored hit files
    Offline,
}

impl DigiMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DigiMode::Runtime => "runtime",
            DigiMode::Offline => "offline",
        }
    }
}

impl fmt::Display for DigiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of the touchable history of a hit, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeStep {
    pub volume: String,
    pub copy_number: i32,
}

impl VolumeStep {
    pub fn new(volume: impl Into<String>, copy_number: i32) -> Self {
        Self {
            volume: volume.into(),
            copy_number,
        }
    }
}

/// Copy numbers for each hierarchy level of a system.
///
/// Levels that could not be resolved from the volume path hold `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputVolumeId {
    ids: [i32; MAX_OUTPUT_DEPTH],
    depth: usize,
}

impl OutputVolumeId {
    pub const UNRESOLVED: i32 = -1;

    /// Create an ID with `depth` unresolved levels.
    pub fn new(depth: usize) -> Self {
        debug_assert!(depth <= MAX_OUTPUT_DEPTH);
        Self {
            ids: [Self::UNRESOLVED; MAX_OUTPUT_DEPTH],
            depth: depth.min(MAX_OUTPUT_DEPTH),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn get(&self, level: usize) -> Option<i32> {
        (level < self.depth).then(|| self.ids[level])
    }

    pub fn set(&mut self, level: usize, copy_number: i32) {
        if level < self.depth {
            self.ids[level] = copy_number;
        }
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.ids[..self.depth]
    }

    /// True when every level was resolved.
    pub fn is_complete(&self) -> bool {
        self.as_slice().iter().all(|&id| id != Self::UNRESOLVED)
    }
}

impl fmt::Display for OutputVolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.as_slice().iter().map(|id| id.to_string()).collect();
        write!(f, "[{}]", parts.join(","))
    }
}
