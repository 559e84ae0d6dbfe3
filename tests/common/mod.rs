//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use spect_system::diagnostics::MemorySink;
use spect_system::{DigiMode, SystemContext, SystemError};
use std::rc::Rc;

/// Fresh context whose diagnostics are kept in the returned sink
pub fn recording_context(mode: DigiMode) -> (SystemContext, Rc<MemorySink>) {
    let sink = Rc::new(MemorySink::new());
    let ctx = SystemContext::new(mode).with_diagnostics(sink.clone());
    (ctx, sink)
}

/// Assert that an error is a configuration error mentioning `needle`
pub fn assert_configuration_error(err: &SystemError, needle: &str) {
    assert!(
        err.is_configuration(),
        "Expected configuration error, got {:?}",
        err
    );
    assert!(
        err.to_string().contains(needle),
        "Expected {:?} in error message {:?}",
        needle,
        err.to_string()
    );
}
