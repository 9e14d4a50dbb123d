//! Shared test infrastructure
//!
//! Dependency traits, hand-written mocks and subjects used across the
//! integration tests.

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod mocks;
pub mod subjects;

use std::sync::Once;

// Re-export serial_test for use in test files
#[allow(unused_imports)]
pub use serial_test::serial;

static INIT: Once = Once::new();

/// Initialize logging once per test binary
pub fn init_test_env() {
    INIT.call_once(automocker::core::init_test_logging);
}
