//! Contract between the fixture and a mocking engine

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::Signature;

/// How a mock answers calls nobody configured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultValue {
    /// Return empty or default values
    #[default]
    Empty,
    /// Return further nested mocks where the engine can
    Mock,
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

impl FromStr for DefaultValue {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "empty" => Ok(Self::Empty),
            "mock" => Ok(Self::Mock),
            other => anyhow::bail!("Unknown default value policy '{other}' (expected empty or mock)"),
        }
    }
}

/// Empty argument slots handed to a mock's constructor.
///
/// Sized to the target's least-parameter constructor so engines that build a
/// stand-in from a concrete type know how many arguments to fill in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Placeholders {
    len: usize,
}

impl Placeholders {
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self { len }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Every slot, all empty
    pub fn slots<T>(&self) -> impl Iterator<Item = Option<T>> {
        (0..self.len).map(|_| None)
    }
}

/// A type the fixture can stand in with a mock.
///
/// Implemented for the *declared* dependency type, usually `dyn Trait`.
/// `object` must return a pointer into the same allocation as `mock` so that
/// what the subject receives is the very mock the test configures.
pub trait Mockable: 'static {
    /// Engine-generated mock type
    type Mock: 'static;

    /// Constructor shapes of the target, public and private.
    ///
    /// Traits have none, which is the default.
    fn signatures() -> Vec<Signature> {
        Vec::new()
    }

    /// Build a fresh mock
    fn create(placeholders: Placeholders) -> Result<Self::Mock>;

    /// Apply the policy for unconfigured calls
    fn set_default_value(_mock: &mut Self::Mock, _policy: DefaultValue) {}

    /// The live object injected into the subject
    fn object(mock: Arc<Self::Mock>) -> Arc<Self>;
}
