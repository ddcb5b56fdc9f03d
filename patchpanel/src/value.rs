//! Type keys and type-erased coerced values

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies a declared field type.
///
/// Keys compare by [`TypeId`], so any `'static` type, including host-defined
/// enums and newtypes, can index the parser registry. The type name is kept
/// only for messages.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key of `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Underlying [`TypeId`].
    pub fn id(&self) -> TypeId {
        self.id
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
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A coerced value whose concrete type is only known at runtime.
///
/// Parser functions return `Value`s; callers recover the concrete type with
/// [`downcast_ref`](Self::downcast_ref) or [`downcast`](Self::downcast).
pub struct Value {
    inner: Box<dyn Any + Send + Sync>,
    key: TypeKey,
}

impl Value {
    /// Wrap a concrete value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            key: TypeKey::of::<T>(),
        }
    }

    /// Key of the wrapped value's type.
    pub fn type_key(&self) -> TypeKey {
        self.key
    }

    /// Name of the wrapped value's type.
    pub fn type_name(&self) -> &'static str {
        self.key.name()
    }

    /// Whether the wrapped value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrow the wrapped value as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Take the wrapped value as a `T`, or get the `Value` back on mismatch.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let key = self.key;
        match self.inner.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(inner) => Err(Self { inner, key }),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value(<{}>)", self.key.name())
    }
}
