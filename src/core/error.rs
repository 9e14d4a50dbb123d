//! Error types for fixture construction with helpful hints

use thiserror::Error;

use crate::core::TypeKey;

/// Convenience Result type for fixture operations
pub type Result<T> = std::result::Result<T, FixtureError>;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error(
        "Expected the subject {subject} to have exactly one public constructor, but it has {count}"
    )]
    AmbiguousConstructor { subject: TypeKey, count: usize },

    #[error("Constructor for {subject} has duplicate dependency {dependency}")]
    DuplicateDependency {
        subject: TypeKey,
        dependency: TypeKey,
    },

    #[error("Encountered an error trying to initialize mock for type {dependency} (subject {subject})")]
    MockCreation {
        subject: TypeKey,
        dependency: TypeKey,
        #[source]
        source: anyhow::Error,
    },

    #[error("Construction of the subject {subject} failed")]
    Construction {
        subject: TypeKey,
        #[source]
        source: anyhow::Error,
    },

    #[error(
        "No mock of type {dependency} is available, because the constructor of {subject} did not request a dependency of type {dependency}"
    )]
    UnknownMock {
        subject: TypeKey,
        dependency: TypeKey,
    },

    #[error("Mock of type {dependency} is already shared with the subject {subject}")]
    MockShared {
        subject: TypeKey,
        dependency: TypeKey,
    },

    #[error("Mock of type {dependency} is still held as a live object (subject {subject})")]
    MockInUse {
        subject: TypeKey,
        dependency: TypeKey,
    },

    #[error("Failed to load fixture settings for {subject}")]
    Settings {
        subject: TypeKey,
        #[source]
        source: anyhow::Error,
    },
}

impl FixtureError {
    /// Get a helpful hint for how to fix this error
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::AmbiguousConstructor { count: 0, .. } => {
                Some("Register a public constructor in the subject's `Subject::constructors`")
            }
            Self::AmbiguousConstructor { .. } => Some(
                "Mark all but one constructor private, or construct the subject by hand",
            ),
            Self::DuplicateDependency { .. } => Some(
                "Wrap one of the dependencies in a distinct type so each parameter type is unique",
            ),
            Self::MockCreation { .. } => {
                Some("Check the dependency's `Mockable` implementation")
            }
            Self::UnknownMock { .. } => Some(
                "Request the mock by the exact type declared in the constructor (e.g. `dyn Trait`)",
            ),
            Self::MockShared { .. } => Some(
                "Configure mocks through `mock_mut` before the first `test_object` call",
            ),
            Self::MockInUse { .. } => {
                Some("Drop live objects returned by `object` before calling `mock_mut`")
            }
            Self::Settings { .. } => Some(
                "Check AUTOMOCKER_CONFIG and AUTOMOCKER_DEFAULT_VALUE (expected `empty` or `mock`)",
            ),
            Self::Construction { .. } => None,
        }
    }

    /// Subject type the error was raised for
    #[must_use]
    pub const fn subject(&self) -> TypeKey {
        match self {
            Self::AmbiguousConstructor { subject, .. }
            | Self::DuplicateDependency { subject, .. }
            | Self::MockCreation { subject, .. }
            | Self::Construction { subject, .. }
            | Self::UnknownMock { subject, .. }
            | Self::MockShared { subject, .. }
            | Self::MockInUse { subject, .. }
            | Self::Settings { subject, .. } => *subject,
        }
    }

    /// Dependency type involved, if any
    #[must_use]
    pub const fn dependency(&self) -> Option<TypeKey> {
        match self {
            Self::DuplicateDependency { dependency, .. }
            | Self::MockCreation { dependency, .. }
            | Self::UnknownMock { dependency, .. }
            | Self::MockShared { dependency, .. }
            | Self::MockInUse { dependency, .. } => Some(*dependency),
            Self::AmbiguousConstructor { .. }
            | Self::Construction { .. }
            | Self::Settings { .. } => None,
        }
    }
}

/// Format an error with its source chain and hint for display
pub fn format_error_with_hint(err: &FixtureError) -> String {
    let mut msg = format!("Error: {err}");
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        msg.push_str("\n  caused by: ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    if let Some(hint) = err.hint() {
        msg.push_str("\n\nhint: ");
        msg.push_str(hint);
    }
    msg
}
