//! Category/verbosity diagnostics on top of `tracing`.
//!
//! Messages carry a category (e.g. `"Geometry"`) and a verbosity level
//! (0 = always shown, higher = chattier). A [`TracingSink`] drops messages above
//! the configured level for their category and forwards the rest as `tracing`
//! events. [`MemorySink`] keeps them in memory for inspection.

use std::cell::RefCell;
use std::collections::HashMap;

/// Category used by the detector systems.
pub const GEOMETRY: &str = "Geometry";

/// Receiver of diagnostic messages.
pub trait DiagnosticSink {
    fn message(&self, category: &str, verbosity: u8, message: &str);
}

/// Per-category verbosity thresholds.
#[derive(Debug, Clone)]
pub struct Verbosity {
    default: u8,
    categories: HashMap<String, u8>,
}

impl Default for Verbosity {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Verbosity {
    pub fn new(default: u8) -> Self {
        Self {
            default,
            categories: HashMap::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>, level: u8) -> Self {
        self.categories.insert(category.into(), level);
        self
    }

    pub fn level(&self, category: &str) -> u8 {
        self.categories.get(category).copied().unwrap_or(self.default)
    }

    pub fn enabled(&self, category: &str, verbosity: u8) -> bool {
        verbosity <= self.level(category)
    }
}

/// Forwards messages to `tracing`.
///
/// Verbosity 0 maps to `info`, 1 to `debug`, anything above to `trace`.
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    verbosity: Verbosity,
}

impl TracingSink {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

impl DiagnosticSink for TracingSink {
    fn message(&self, category: &str, verbosity: u8, message: &str) {
        if !self.verbosity.enabled(category, verbosity) {
            return;
        }
        match verbosity {
            0 => tracing::info!(category, verbosity, "{}", message),
            1 => tracing::debug!(category, verbosity, "{}", message),
            _ => tracing::trace!(category, verbosity, "{}", message),
        }
    }
}

/// One recorded diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    pub category: String,
    pub verbosity: u8,
    pub message: String,
}

/// Keeps every message, regardless of verbosity.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: RefCell<Vec<DiagnosticRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn message(&self, category: &str, verbosity: u8, message: &str) {
        self.records.borrow_mut().push(DiagnosticRecord {
            category: category.to_string(),
            verbosity,
            message: message.to_string(),
        });
    }
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for std::rc::Rc<T> {
    fn message(&self, category: &str, verbosity: u8, message: &str) {
        (**self).message(category, verbosity, message)
    }
}
