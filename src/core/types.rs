//! Runtime type identity and constructor signatures

use std::any::{self, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Runtime identity of a type, usable as a registry key.
///
/// Equality and hashing use the [`TypeId`] only; the name is carried for
/// diagnostics. Works for unsized types such as `dyn Trait`.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Full type name, including the module path
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Type name with module paths stripped (`dyn app::Clock` -> `dyn Clock`)
    #[must_use]
    pub fn short_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut segment = String::new();
        for ch in self.name.chars() {
            if ch.is_alphanumeric() || ch == '_' || ch == ':' {
                segment.push(ch);
            } else {
                out.push_str(segment.rsplit("::").next().unwrap_or_default());
                segment.clear();
                out.push(ch);
            }
        }
        out.push_str(segment.rsplit("::").next().unwrap_or_default());
        out
    }

    /// Whether this key describes `T`
    #[must_use]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Declared visibility of a constructor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
        }
    }
}

/// Shape of a single constructor: its visibility and ordered parameter types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    visibility: Visibility,
    params: Vec<TypeKey>,
}

impl Signature {
    pub fn new(visibility: Visibility, params: Vec<TypeKey>) -> Self {
        Self { visibility, params }
    }

    /// Public signature with the given parameter types
    pub fn public(params: Vec<TypeKey>) -> Self {
        Self::new(Visibility::Public, params)
    }

    /// Private signature with the given parameter types
    pub fn private(params: Vec<TypeKey>) -> Self {
        Self::new(Visibility::Private, params)
    }

    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[must_use]
    pub fn params(&self) -> &[TypeKey] {
        &self.params
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} fn(", self.visibility)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&param.short_name())?;
        }
        f.write_str(")")
    }
}
