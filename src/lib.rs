//! Automocker - auto-mocking test fixtures
//!
//! Builds a subject under test with every constructor dependency replaced by
//! a mock, and hands those mocks back to the test for configuration and
//! verification.
//!
//! ```ignore
//! use automocker::{Constructors, Fixture, Subject};
//!
//! impl Subject for Greeter {
//!     fn constructors(ctors: &mut Constructors<Self>) {
//!         ctors.public(Greeter::new);
//!     }
//! }
//!
//! let fixture = Fixture::<Greeter>::new()?;
//! fixture.test_object()?.greet("ferris");
//! assert_eq!(fixture.mock::<dyn Logger>()?.lines(), ["hello ferris"]);
//! ```

// Production-ready clippy configuration
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::suspicious)]
// Allow documentation lints - test tooling, errors are self-describing
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod core;
pub mod fixture;
pub mod mock;

pub use crate::config::FixtureSettings;
pub use crate::core::{FixtureError, Result, Signature, TypeKey, Visibility};
pub use crate::fixture::{Constructors, Fixture, FixtureState, Mock, Subject};
pub use crate::mock::{DefaultValue, MockHandle, Mockable, Placeholders, create_mock};

#[doc(hidden)]
pub use anyhow;
