//! Auto-mocking fixture for a subject under test
//!
//! A [`Fixture`] finds the subject's single public constructor, creates one
//! mock per parameter type and builds the subject lazily from the mocks' live
//! objects. One fixture per test case; there is no reset.
//!
//! Fixtures are single-threaded: the subject is cached in a
//! [`OnceCell`], which makes `Fixture` `!Sync`.

mod subject;

pub use subject::{
    Arguments, Constructor, Constructors, IntoConstructor, IntoFallibleConstructor, Parameter,
    Subject,
};

use std::cell::OnceCell;
use std::fmt;
use std::ops::Deref;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use ahash::AHashMap;

use crate::config::FixtureSettings;
use crate::core::{FixtureError, Result, TypeKey};
use crate::mock::{DefaultValue, MockHandle, Mockable};

/// Lifecycle of a fixture. Construction is synchronous, so a fixture is
/// never observed uninitialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureState {
    /// Every dependency has a mock; the subject has not been built
    MocksReady,
    /// The subject exists and is cached
    SubjectBuilt,
}

/// Builds a `T` whose dependencies are all mocks
pub struct Fixture<T: Subject> {
    subject: TypeKey,
    settings: FixtureSettings,
    constructor: Constructor<T>,
    /// Registry, in constructor parameter order
    mocks: Vec<MockHandle>,
    index: AHashMap<TypeKey, usize>,
    test_object: OnceCell<T>,
}

impl<T: Subject> Fixture<T> {
    /// Create a fixture with default settings (empty default values)
    pub fn new() -> Result<Self> {
        Self::with_settings(FixtureSettings::default())
    }

    /// Create a fixture using settings from the environment
    pub fn from_env() -> Result<Self> {
        let settings = FixtureSettings::load().map_err(|source| FixtureError::Settings {
            subject: TypeKey::of::<T>(),
            source,
        })?;
        Self::with_settings(settings)
    }

    pub fn with_settings(settings: FixtureSettings) -> Result<Self> {
        let subject = TypeKey::of::<T>();

        let mut public = Constructors::<T>::of().into_public();
        if public.len() != 1 {
            return Err(FixtureError::AmbiguousConstructor {
                subject,
                count: public.len(),
            });
        }
        let constructor = public.remove(0);

        let params = constructor.params();
        let mut mocks = Vec::with_capacity(params.len());
        let mut index = AHashMap::with_capacity(params.len());

        for param in params {
            let dependency = param.key();
            if index.contains_key(&dependency) {
                return Err(FixtureError::DuplicateDependency {
                    subject,
                    dependency,
                });
            }

            let outcome = if settings.catch_panics {
                panic::catch_unwind(AssertUnwindSafe(|| param.create_mock(settings.default_value)))
                    .unwrap_or_else(|payload| {
                        Err(anyhow::anyhow!(panic_message("mock engine", &*payload)))
                    })
            } else {
                param.create_mock(settings.default_value)
            };
            let mock = outcome.map_err(|source| FixtureError::MockCreation {
                subject,
                dependency,
                source,
            })?;
            index.insert(dependency, mocks.len());
            mocks.push(mock);
        }

        tracing::debug!(
            "Fixture for {} ready with {} mocks",
            subject.short_name(),
            mocks.len()
        );

        Ok(Self {
            subject,
            settings,
            constructor,
            mocks,
            index,
            test_object: OnceCell::new(),
        })
    }

    /// The subject under test, built on first access.
    ///
    /// Later calls return the cached instance without invoking the
    /// constructor again. A failed build leaves the fixture ready to retry.
    pub fn test_object(&self) -> Result<&T> {
        if let Some(object) = self.test_object.get() {
            tracing::trace!("Using cached {}", self.subject.short_name());
            return Ok(object);
        }

        let object = self.build()?;
        tracing::debug!("Constructed {}", self.subject.short_name());
        Ok(self.test_object.get_or_init(|| object))
    }

    fn build(&self) -> Result<T> {
        let subject = self.subject;
        let objects = self
            .mocks
            .iter()
            .map(MockHandle::live_object)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|source| FixtureError::Construction { subject, source })?;
        let args = Arguments::new(objects);

        let outcome = if self.settings.catch_panics {
            panic::catch_unwind(AssertUnwindSafe(|| self.constructor.invoke(args)))
                .unwrap_or_else(|payload| {
                    Err(anyhow::anyhow!(panic_message("constructor", &*payload)))
                })
        } else {
            self.constructor.invoke(args)
        };

        outcome.map_err(|source| FixtureError::Construction { subject, source })
    }

    /// The mock injected for dependency type `D`.
    ///
    /// Never builds the subject.
    pub fn mock<D: Mockable + ?Sized>(&self) -> Result<Mock<'_, D>> {
        let handle = self.handle(TypeKey::of::<D>())?;
        let mock = handle
            .downcast::<D>()
            .ok_or_else(|| self.unknown::<D>())?;
        Ok(Mock { handle, mock })
    }

    /// Exclusive access to a mock, for engines configured through `&mut`.
    ///
    /// Only possible while the subject has not been built yet and no live
    /// object obtained through [`Fixture::object`] is still held.
    pub fn mock_mut<D: Mockable + ?Sized>(&mut self) -> Result<&mut D::Mock> {
        let dependency = TypeKey::of::<D>();
        let subject = self.subject;
        let position = *self
            .index
            .get(&dependency)
            .ok_or_else(|| self.unknown::<D>())?;

        if self.is_built() {
            return Err(FixtureError::MockShared {
                subject,
                dependency,
            });
        }
        let handle = &mut self.mocks[position];
        if handle.is_shared() {
            return Err(FixtureError::MockInUse {
                subject,
                dependency,
            });
        }
        handle
            .downcast_mut::<D>()
            .ok_or(FixtureError::UnknownMock {
                subject,
                dependency,
            })
    }

    /// Live object the subject received (or will receive) for `D`
    pub fn object<D: Mockable + ?Sized>(&self) -> Result<Arc<D>> {
        Ok(self.mock::<D>()?.object())
    }

    fn handle(&self, dependency: TypeKey) -> Result<&MockHandle> {
        self.index
            .get(&dependency)
            .map(|&position| &self.mocks[position])
            .ok_or(FixtureError::UnknownMock {
                subject: self.subject,
                dependency,
            })
    }

    fn unknown<D: ?Sized + 'static>(&self) -> FixtureError {
        FixtureError::UnknownMock {
            subject: self.subject,
            dependency: TypeKey::of::<D>(),
        }
    }

    #[must_use]
    pub fn state(&self) -> FixtureState {
        if self.test_object.get().is_some() {
            FixtureState::SubjectBuilt
        } else {
            FixtureState::MocksReady
        }
    }

    #[must_use]
    pub fn is_built(&self) -> bool {
        self.state() == FixtureState::SubjectBuilt
    }

    /// Subject type
    #[must_use]
    pub const fn subject(&self) -> TypeKey {
        self.subject
    }

    /// Mocked dependency types, in constructor parameter order
    pub fn dependencies(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.mocks.iter().map(MockHandle::key)
    }

    #[must_use]
    pub const fn settings(&self) -> &FixtureSettings {
        &self.settings
    }
}

impl<T: Subject> fmt::Debug for Fixture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fixture")
            .field("subject", &self.subject)
            .field("state", &self.state())
            .field("mocks", &self.mocks)
            .finish_non_exhaustive()
    }
}

/// Typed view of a mock held by a fixture
pub struct Mock<'a, D: Mockable + ?Sized> {
    handle: &'a MockHandle,
    mock: &'a Arc<D::Mock>,
}

impl<D: Mockable + ?Sized> Mock<'_, D> {
    /// Live object sharing this mock's allocation
    #[must_use]
    pub fn object(&self) -> Arc<D> {
        D::object(Arc::clone(self.mock))
    }

    #[must_use]
    pub fn default_value(&self) -> DefaultValue {
        self.handle.default_value()
    }

    /// Shared pointer to the mock itself
    #[must_use]
    pub fn arc(&self) -> Arc<D::Mock> {
        Arc::clone(self.mock)
    }
}

impl<D: Mockable + ?Sized> Deref for Mock<'_, D> {
    type Target = D::Mock;

    fn deref(&self) -> &D::Mock {
        self.mock
    }
}

impl<D: Mockable + ?Sized> fmt::Debug for Mock<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Mock").field(self.handle).finish()
    }
}

fn panic_message(origin: &str, payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    format!("{origin} panicked: {detail}")
}
