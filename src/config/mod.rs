//! Fixture configuration

mod settings;

pub use settings::{CONFIG_ENV, DEFAULT_VALUE_ENV, FixtureSettings};
