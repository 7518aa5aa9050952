//! Raw payload data carried by values.
//!
//! `Data` is a tagged cell: built-in scalars are stored inline, strings and
//! user payloads are reference counted. Types decide which variants they
//! accept through their validator chain.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Payload data of a single value.
#[derive(Clone)]
pub enum Data {
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// Boolean.
    Bool(bool),
    /// Immutable string.
    Str(Arc<str>),
    /// User-defined payload.
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl Data {
    /// Wrap an arbitrary user payload.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Data::Opaque(Arc::new(value))
    }

    /// Create a string payload.
    pub fn string(value: impl Into<Arc<str>>) -> Self {
        Data::Str(value.into())
    }

    #[inline]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Data::Int32(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Data::Int64(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Data::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Data::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Shared handle to the string payload, if this is a string.
    pub fn as_shared_str(&self) -> Option<Arc<str>> {
        match self {
            Data::Str(v) => Some(Arc::clone(v)),
            _ => None,
        }
    }

    /// Borrow a user payload as `T`.
    ///
    /// Returns `None` for scalar variants and for opaque payloads of another
    /// concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Data::Opaque(v) => v.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Data::Int32(_) => "i32",
            Data::Int64(_) => "i64",
            Data::Bool(_) => "bool",
            Data::Str(_) => "string",
            Data::Opaque(_) => "opaque",
        }
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Data::Int32(v) => write!(f, "Int32({v})"),
            Data::Int64(v) => write!(f, "Int64({v})"),
            Data::Bool(v) => write!(f, "Bool({v})"),
            Data::Str(v) => write!(f, "Str({v:?})"),
            Data::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl From<i32> for Data {
    fn from(value: i32) -> Self {
        Data::Int32(value)
    }
}

impl From<i64> for Data {
    fn from(value: i64) -> Self {
        Data::Int64(value)
    }
}

impl From<bool> for Data {
    fn from(value: bool) -> Self {
        Data::Bool(value)
    }
}

impl From<&str> for Data {
    fn from(value: &str) -> Self {
        Data::Str(Arc::from(value))
    }
}

impl From<String> for Data {
    fn from(value: String) -> Self {
        Data::Str(Arc::from(value))
    }
}

impl From<Arc<str>> for Data {
    fn from(value: Arc<str>) -> Self {
        Data::Str(value)
    }
}
