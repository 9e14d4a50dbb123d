//! Mock creation on top of an external mocking engine
//!
//! The engine (mockall, a hand-written fake, ...) produces the mock types;
//! this module only knows the narrow [`Mockable`] contract.

mod factory;
mod traits;

pub use factory::{MockHandle, create_mock, placeholder_count};
pub use traits::{DefaultValue, Mockable, Placeholders};

/// Implement [`Mockable`] for a dependency type whose mock is `Default`.
///
/// ```ignore
/// #[mockall::automock]
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// automocker::impl_mockable!(dyn Clock => MockClock);
/// ```
#[macro_export]
macro_rules! impl_mockable {
    ($target:ty => $mock:ty) => {
        impl $crate::mock::Mockable for $target {
            type Mock = $mock;

            fn create(
                _placeholders: $crate::mock::Placeholders,
            ) -> $crate::anyhow::Result<Self::Mock> {
                ::std::result::Result::Ok(<$mock as ::std::default::Default>::default())
            }

            fn object(mock: ::std::sync::Arc<Self::Mock>) -> ::std::sync::Arc<Self> {
                mock
            }
        }
    };
}
