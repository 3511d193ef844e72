//! Members held by a stubbed instance's backing store.
//!
//! A member is either a test double produced by the caller's stub factory
//! (or installed as an override) or a plain, type-erased value.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// A plain member value.
///
/// Values are reference counted: cloning a `Value` hands out the same
/// allocation, so identity survives every read of the member.
#[derive(Clone)]
pub struct Value {
    inner: Rc<dyn Any>,
    type_name: &'static str,
}

impl Value {
    /// Wrap a value
    #[must_use]
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            inner: Rc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Borrow the value as `T`
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Clone the value out as `T`
    #[must_use]
    pub fn get<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    /// Check whether the value is a `T`
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Name of the wrapped type
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Identity comparison (same allocation)
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.type_name)
    }
}

/// Identity of a test double.
///
/// Test doubles are handles; two handles are the same stub when they point
/// at the same recorder.
pub trait StubIdentity {
    /// Whether `self` and `other` are the same double
    fn same_stub(&self, other: &Self) -> bool;
}

impl<T: ?Sized> StubIdentity for Rc<T> {
    fn same_stub(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

/// A member of a stubbed instance
#[derive(Clone)]
pub enum Member<S> {
    /// Test double (auto-created or supplied as an override)
    Stub(S),
    /// Plain data
    Value(Value),
}

impl<S> Member<S> {
    /// Create a plain value member
    #[must_use]
    pub fn value<T: Any>(value: T) -> Self {
        Self::Value(Value::new(value))
    }

    /// Check if this member is a test double
    #[must_use]
    pub const fn is_stub(&self) -> bool {
        matches!(self, Self::Stub(_))
    }

    /// Check if this member is a plain value
    #[must_use]
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Borrow the test double
    #[must_use]
    pub const fn as_stub(&self) -> Option<&S> {
        match self {
            Self::Stub(stub) => Some(stub),
            Self::Value(_) => None,
        }
    }

    /// Take the test double
    #[must_use]
    pub fn into_stub(self) -> Option<S> {
        match self {
            Self::Stub(stub) => Some(stub),
            Self::Value(_) => None,
        }
    }

    /// Borrow the plain value
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Stub(_) => None,
        }
    }

    /// Short kind label used in diagnostics
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Stub(_) => "stub",
            Self::Value(_) => "value",
        }
    }
}

impl<S: StubIdentity> Member<S> {
    /// Identity comparison: same double, or same value allocation
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Stub(a), Self::Stub(b)) => a.same_stub(b),
            (Self::Value(a), Self::Value(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl<S> From<Value> for Member<S> {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl<S: fmt::Debug> fmt::Debug for Member<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stub(stub) => f.debug_tuple("Stub").field(stub).finish(),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}
