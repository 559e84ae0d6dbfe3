//! ARF stage values and the name-based stage selector.
//!
//! ```text
//! Unset ──"generateData"──► GenerateData (0)
//!       ──"computeTables"─► ComputeTables (1)
//!       ──"useTables"─────► UseTables (2)
//!       ──anything else───► Invalid
//! ```
//!
//! A valid stage can be overwritten by another valid stage. Nothing returns
//! to `Unset`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric code shared by `Unset` and `Invalid`.
pub const SENTINEL_CODE: i32 = -2;

/// Processing stage of an ARF sensitive detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ArfStage {
    /// Never staged
    #[default]
    Unset,
    /// Generate training data for the response tables
    GenerateData,
    /// Compute the response tables
    ComputeTables,
    /// Apply precomputed tables
    UseTables,
    /// Last request named no known stage
    Invalid,
}

impl ArfStage {
    /// Resolve a stage name. Matching is exact and case-sensitive.
    pub fn resolve(name: &str) -> Self {
        match name {
            "generateData" => ArfStage::GenerateData,
            "computeTables" => ArfStage::ComputeTables,
            "useTables" => ArfStage::UseTables,
            _ => ArfStage::Invalid,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ArfStage::GenerateData => 0,
            ArfStage::ComputeTables => 1,
            ArfStage::UseTables => 2,
            ArfStage::Unset | ArfStage::Invalid => SENTINEL_CODE,
        }
    }

    pub fn is_valid(self) -> bool {
        matches!(
            self,
            ArfStage::GenerateData | ArfStage::ComputeTables | ArfStage::UseTables
        )
    }

    /// Stage name as accepted by [`ArfStage::resolve`], if any.
    pub fn as_name(self) -> Option<&'static str> {
        match self {
            ArfStage::GenerateData => Some("generateData"),
            ArfStage::ComputeTables => Some("computeTables"),
            ArfStage::UseTables => Some("useTables"),
            ArfStage::Unset | ArfStage::Invalid => None,
        }
    }

    pub fn valid_names() -> &'static [&'static str] {
        &["generateData", "computeTables", "useTables"]
    }
}

impl fmt::Display for ArfStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_name() {
            Some(name) => f.write_str(name),
            None if *self == ArfStage::Unset => f.write_str("unset"),
            None => f.write_str("invalid"),
        }
    }
}

/// Holds the stage a system last requested.
#[derive(Debug, Clone, Default)]
pub struct StageSelector {
    current: ArfStage,
    requests: u32,
}

impl StageSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ArfStage {
        self.current
    }

    /// Number of stage requests seen so far, valid or not.
    pub fn requests(&self) -> u32 {
        self.requests
    }

    /// Resolve `name` and store the result, including `Invalid`.
    pub fn select(&mut self, name: &str) -> ArfStage {
        self.current = ArfStage::resolve(name);
        self.requests += 1;
        self.current
    }
}
