//! Error handling for the SPECT system crate
//!
//! This module defines the error type shared by the registry, the output
//! pipeline and the detector systems, plus a Result alias.

use thiserror::Error;

/// Main error type for detector system operations
#[derive(Error, Debug)]
pub enum SystemError {
    /// A stage request named a stage that does not exist.
    ///
    /// Callers treat this as fatal: it is a setup defect, not a runtime condition.
    #[error("Configuration error in system '{system}': stage '{stage}' is not valid")]
    Configuration { system: String, stage: String },

    /// System names must be non-empty
    #[error("Invalid system name: {0:?}")]
    InvalidName(String),

    /// A system with this name is already registered
    #[error("System '{0}' is already registered")]
    DuplicateSystem(String),

    /// No system with this name is registered
    #[error("Unknown system '{0}'")]
    UnknownSystem(String),

    /// A component with the same name already exists under this parent
    #[error("Component '{name}' already exists under '{parent}'")]
    DuplicateComponent { parent: String, name: String },

    /// Component lookup failed
    #[error("Unknown component '{0}'")]
    UnknownComponent(String),

    /// A geometry volume may only be attached to one component
    #[error("Volume '{volume}' is already attached to component '{component}'")]
    VolumeAlreadyAttached { volume: String, component: String },

    /// An output module with the same tag is already registered for this system
    #[error("Output module '{tag}' is already registered for system '{system}'")]
    DuplicateOutputModule { tag: String, system: String },

    /// Output module lookup failed
    #[error("Unknown output module '{0}'")]
    UnknownOutputModule(String),

    /// The messenger has no command under this path
    #[error("System '{system}' has no command '{command}'")]
    UnknownCommand { system: String, command: String },

    /// Errors related to setup file loading/saving
    #[error("Configuration file error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SystemError>,
    },
}

impl SystemError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SystemError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// True if this error (or the error it wraps) is an invalid stage request
    pub fn is_configuration(&self) -> bool {
        match self {
            SystemError::Configuration { .. } => true,
            SystemError::WithContext { source, .. } => source.is_configuration(),
            _ => false,
        }
    }
}

/// Result type alias for detector system operations
pub type Result<T> = std::result::Result<T, SystemError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
