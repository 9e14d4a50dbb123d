//! Mock factory: builds a type-erased mock handle for any `Mockable` type

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::core::{Signature, TypeKey};
use crate::mock::traits::{DefaultValue, Mockable, Placeholders};

/// Type-erased mock owned by a fixture's registry
pub struct MockHandle {
    key: TypeKey,
    default_value: DefaultValue,
    placeholders: Placeholders,
    /// `Arc<D::Mock>`
    mock: Box<dyn Any>,
    /// Produces a boxed `Arc<D>` from `mock`
    live: fn(&dyn Any) -> Option<Box<dyn Any>>,
    /// Strong count of `mock`
    shares: fn(&dyn Any) -> usize,
}

impl MockHandle {
    /// Declared type this mock stands in for
    #[must_use]
    pub const fn key(&self) -> TypeKey {
        self.key
    }

    #[must_use]
    pub const fn default_value(&self) -> DefaultValue {
        self.default_value
    }

    /// Number of placeholder arguments the mock was created with
    #[must_use]
    pub const fn placeholders(&self) -> Placeholders {
        self.placeholders
    }

    /// Live object as a boxed `Arc<D>`, ready to be passed to a constructor
    pub fn live_object(&self) -> Result<Box<dyn Any>> {
        (self.live)(self.mock.as_ref())
            .with_context(|| format!("Mock handle for {} holds a foreign mock type", self.key))
    }

    /// Shared mock reference, if `D` is the type this handle was created for
    pub fn downcast<D: Mockable + ?Sized>(&self) -> Option<&Arc<D::Mock>> {
        if !self.key.is::<D>() {
            return None;
        }
        self.mock.downcast_ref::<Arc<D::Mock>>()
    }

    /// Exclusive mock reference; `None` once a live object is out
    pub fn downcast_mut<D: Mockable + ?Sized>(&mut self) -> Option<&mut D::Mock> {
        if !self.key.is::<D>() {
            return None;
        }
        self.mock
            .downcast_mut::<Arc<D::Mock>>()
            .and_then(Arc::get_mut)
    }

    /// Whether a live object handed out earlier is still alive
    #[must_use]
    pub fn is_shared(&self) -> bool {
        (self.shares)(self.mock.as_ref()) > 1
    }
}

impl fmt::Debug for MockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockHandle")
            .field("key", &self.key)
            .field("default_value", &self.default_value)
            .field("placeholders", &self.placeholders.len())
            .field("shared", &self.is_shared())
            .finish_non_exhaustive()
    }
}

fn live_object<D: Mockable + ?Sized>(mock: &dyn Any) -> Option<Box<dyn Any>> {
    let mock = mock.downcast_ref::<Arc<D::Mock>>()?;
    let object: Arc<D> = D::object(Arc::clone(mock));
    Some(Box::new(object))
}

fn strong_count<D: Mockable + ?Sized>(mock: &dyn Any) -> usize {
    mock.downcast_ref::<Arc<D::Mock>>()
        .map_or(0, Arc::strong_count)
}

/// Parameter count of the least-parameter signature, first one wins on ties
pub fn placeholder_count(signatures: &[Signature]) -> usize {
    signatures
        .iter()
        .min_by_key(|sig| sig.arity())
        .map_or(0, Signature::arity)
}

/// Create a mock standing in for `D`.
///
/// Sizes placeholder arguments from `D`'s least-parameter constructor (public
/// and private alike), asks the engine for a mock, then applies `policy`.
/// Nothing is cached here.
pub fn create_mock<D: Mockable + ?Sized>(policy: DefaultValue) -> Result<MockHandle> {
    let key = TypeKey::of::<D>();
    let placeholders = Placeholders::new(placeholder_count(&D::signatures()));

    let mut mock = D::create(placeholders)
        .with_context(|| format!("Mock engine failed to create a mock of {key}"))?;
    D::set_default_value(&mut mock, policy);

    tracing::debug!(
        "Created mock for {} (default value: {policy}, placeholders: {})",
        key.short_name(),
        placeholders.len()
    );

    Ok(MockHandle {
        key,
        default_value: policy,
        placeholders,
        mock: Box::new(Arc::new(mock)),
        live: live_object::<D>,
        shares: strong_count::<D>,
    })
}
