//! Core module - type identity, errors and logging

mod error;
pub mod logging;
mod types;

pub use error::{FixtureError, Result, format_error_with_hint};
pub use logging::init_test_logging;
pub use types::{Signature, TypeKey, Visibility};
