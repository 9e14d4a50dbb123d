//! Constructor registration for subjects under test
//!
//! Rust has no runtime reflection, so a subject describes its constructors
//! through [`Subject::constructors`]. Parameter types are read off the
//! constructor function's signature at compile time:
//!
//! ```ignore
//! impl Subject for Greeter {
//!     fn constructors(ctors: &mut Constructors<Self>) {
//!         ctors.public(Greeter::new);
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use anyhow::{Result, anyhow};

use crate::core::{Signature, TypeKey, Visibility};
use crate::mock::{DefaultValue, MockHandle, Mockable, create_mock};

/// A type the fixture can build with mocked dependencies
pub trait Subject: Sized + 'static {
    /// Register every constructor of the subject, public and private
    fn constructors(ctors: &mut Constructors<Self>);
}

/// One constructor parameter: its declared type and how to mock it
#[derive(Clone, Copy)]
pub struct Parameter {
    key: TypeKey,
    mock: fn(DefaultValue) -> Result<MockHandle>,
}

impl Parameter {
    #[must_use]
    pub fn of<D: Mockable + ?Sized>() -> Self {
        Self {
            key: TypeKey::of::<D>(),
            mock: create_mock::<D>,
        }
    }

    #[must_use]
    pub const fn key(&self) -> TypeKey {
        self.key
    }

    /// Ask the mock factory for a stand-in of this parameter's type
    pub fn create_mock(&self, policy: DefaultValue) -> Result<MockHandle> {
        (self.mock)(policy)
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Parameter").field(&self.key).finish()
    }
}

/// Ordered live objects handed to a constructor
pub struct Arguments {
    objects: std::vec::IntoIter<Box<dyn Any>>,
    position: usize,
}

impl Arguments {
    pub fn new(objects: Vec<Box<dyn Any>>) -> Self {
        Self {
            objects: objects.into_iter(),
            position: 0,
        }
    }

    /// Take the next argument as `Arc<D>`
    pub fn next<D: ?Sized + 'static>(&mut self) -> Result<Arc<D>> {
        let position = self.position;
        self.position += 1;
        let object = self.objects.next().ok_or_else(|| {
            anyhow!(
                "Missing argument {position} of type {}",
                TypeKey::of::<D>().short_name()
            )
        })?;
        object.downcast::<Arc<D>>().map(|object| *object).map_err(|_| {
            anyhow!(
                "Argument {position} is not of type {}",
                TypeKey::of::<D>().short_name()
            )
        })
    }

    /// Arguments not consumed yet
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.objects.len()
    }
}

type Invoker<T> = Box<dyn Fn(&mut Arguments) -> Result<T>>;

/// A registered constructor: its signature plus the function behind it
pub struct Constructor<T> {
    visibility: Visibility,
    params: Vec<Parameter>,
    invoke: Invoker<T>,
}

impl<T> Constructor<T> {
    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[must_use]
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    #[must_use]
    pub fn signature(&self) -> Signature {
        Signature::new(
            self.visibility,
            self.params.iter().map(Parameter::key).collect(),
        )
    }

    /// Call the constructor, consuming `args` in parameter order
    pub fn invoke(&self, mut args: Arguments) -> Result<T> {
        if args.remaining() != self.params.len() {
            anyhow::bail!(
                "Constructor takes {} arguments, got {}",
                self.params.len(),
                args.remaining()
            );
        }
        (self.invoke)(&mut args)
    }
}

impl<T> fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("signature", &self.signature().to_string())
            .finish_non_exhaustive()
    }
}

/// Builder collecting a subject's constructors in declaration order
pub struct Constructors<T> {
    entries: Vec<Constructor<T>>,
}

impl<T: Subject> Constructors<T> {
    /// Every constructor `T` registers
    #[must_use]
    pub fn of() -> Self {
        let mut ctors = Self {
            entries: Vec::new(),
        };
        T::constructors(&mut ctors);
        ctors
    }
}

impl<T: 'static> Constructors<T> {
    /// Register a public constructor
    pub fn public<F, Args>(&mut self, f: F) -> &mut Self
    where
        F: IntoConstructor<T, Args>,
    {
        self.entries.push(f.into_constructor(Visibility::Public));
        self
    }

    /// Register a private constructor (never picked by the fixture)
    pub fn private<F, Args>(&mut self, f: F) -> &mut Self
    where
        F: IntoConstructor<T, Args>,
    {
        self.entries.push(f.into_constructor(Visibility::Private));
        self
    }

    /// Register a public constructor returning `Result`
    pub fn try_public<F, Args>(&mut self, f: F) -> &mut Self
    where
        F: IntoFallibleConstructor<T, Args>,
    {
        self.entries.push(f.into_constructor(Visibility::Public));
        self
    }

    /// Register a private constructor returning `Result`
    pub fn try_private<F, Args>(&mut self, f: F) -> &mut Self
    where
        F: IntoFallibleConstructor<T, Args>,
    {
        self.entries.push(f.into_constructor(Visibility::Private));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constructor<T>> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Public constructors, in registration order
    pub fn into_public(self) -> Vec<Constructor<T>> {
        self.entries
            .into_iter()
            .filter(|ctor| ctor.visibility.is_public())
            .collect()
    }
}

/// Functions usable as an infallible constructor of `T`
pub trait IntoConstructor<T, Args> {
    fn into_constructor(self, visibility: Visibility) -> Constructor<T>;
}

/// Functions usable as a fallible constructor of `T`
pub trait IntoFallibleConstructor<T, Args> {
    fn into_constructor(self, visibility: Visibility) -> Constructor<T>;
}

macro_rules! impl_into_constructor {
    ($($dep:ident),*) => {
        impl<T, F, $($dep),*> IntoConstructor<T, fn($(Arc<$dep>),*)> for F
        where
            T: 'static,
            F: Fn($(Arc<$dep>),*) -> T + 'static,
            $($dep: Mockable + ?Sized,)*
        {
            #[allow(unused_variables)]
            fn into_constructor(self, visibility: Visibility) -> Constructor<T> {
                Constructor {
                    visibility,
                    params: vec![$(Parameter::of::<$dep>()),*],
                    invoke: Box::new(move |args: &mut Arguments| {
                        Ok((self)($(args.next::<$dep>()?),*))
                    }),
                }
            }
        }

        impl<T, E, F, $($dep),*> IntoFallibleConstructor<T, fn($(Arc<$dep>),*)> for F
        where
            T: 'static,
            E: Into<anyhow::Error>,
            F: Fn($(Arc<$dep>),*) -> std::result::Result<T, E> + 'static,
            $($dep: Mockable + ?Sized,)*
        {
            #[allow(unused_variables)]
            fn into_constructor(self, visibility: Visibility) -> Constructor<T> {
                Constructor {
                    visibility,
                    params: vec![$(Parameter::of::<$dep>()),*],
                    invoke: Box::new(move |args: &mut Arguments| {
                        (self)($(args.next::<$dep>()?),*).map_err(Into::into)
                    }),
                }
            }
        }
    };
}

impl_into_constructor!();
impl_into_constructor!(D1);
impl_into_constructor!(D1, D2);
impl_into_constructor!(D1, D2, D3);
impl_into_constructor!(D1, D2, D3, D4);
impl_into_constructor!(D1, D2, D3, D4, D5);
impl_into_constructor!(D1, D2, D3, D4, D5, D6);
impl_into_constructor!(D1, D2, D3, D4, D5, D6, D7);
impl_into_constructor!(D1, D2, D3, D4, D5, D6, D7, D8);
