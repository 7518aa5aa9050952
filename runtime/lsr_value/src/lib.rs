//! Values for the lsr runtime.
//!
//! A `Value` is an immutable `(type, payload)` pair plus a memo of the
//! payload coerced to other types. Values are reference counted: cloning is
//! a new reference, dropping the last reference releases the primary payload
//! and every memoized coercion through their own types' release hooks.
//!
//! # Memoization
//!
//! - the primary type always hits, no conversion is ever run for it
//! - a coercion is computed on first request and cached for the lifetime of
//!   the value; concurrent requests compute it once
//! - failed coercions are not cached, so the memo only ever holds payloads
//!   that passed their type's validators

use std::fmt;
use std::sync::Arc;

use lsr_types::{builtin, CoercionError, Data, Payload, Type};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

struct ValueInner {
    primary: Payload,
    memo: RwLock<FxHashMap<Type, Payload>>,
}

/// Reference-counted value handle.
#[derive(Clone)]
pub struct Value(Arc<ValueInner>);

impl Value {
    /// Create a value of type `ty`.
    ///
    /// Returns `None` if `data` fails the type's validators.
    pub fn new(ty: &Type, data: Data) -> Option<Value> {
        Payload::new(ty, data).map(Value::from_payload)
    }

    /// Create a value around an already validated payload.
    pub fn from_payload(primary: Payload) -> Value {
        Value(Arc::new(ValueInner {
            primary,
            memo: RwLock::new(FxHashMap::default()),
        }))
    }

    pub fn from_i32(value: i32) -> Option<Value> {
        Value::new(&builtin::int32(), Data::Int32(value))
    }

    pub fn from_i64(value: i64) -> Option<Value> {
        Value::new(&builtin::int64(), Data::Int64(value))
    }

    pub fn from_bool(value: bool) -> Option<Value> {
        Value::new(&builtin::boolean(), Data::Bool(value))
    }

    pub fn from_string(value: impl Into<Arc<str>>) -> Option<Value> {
        Value::new(&builtin::string(), Data::Str(value.into()))
    }

    /// The primary type.
    #[inline]
    pub fn ty(&self) -> &Type {
        self.0.primary.ty()
    }

    /// A new reference to the primary payload.
    pub fn primary(&self) -> Payload {
        self.0.primary.clone()
    }

    /// A new reference to this value's payload as type `ty`.
    ///
    /// Coerces and memoizes on first request. Returns `None` when no
    /// coercion path exists or the coercion fails.
    pub fn get(&self, ty: &Type) -> Option<Payload> {
        self.try_get(ty).ok()
    }

    /// Like [`Value::get`], reporting why the coercion failed.
    #[tracing::instrument(level = "trace", skip_all, fields(from = %self.ty(), to = %ty))]
    pub fn try_get(&self, ty: &Type) -> Result<Payload, CoercionError> {
        if ty == self.ty() {
            return Ok(self.0.primary.clone());
        }

        // Fast path: already coerced
        if let Some(hit) = self.0.memo.read().get(ty) {
            return Ok(hit.clone());
        }

        let mut memo = self.0.memo.write();

        // Double-check after acquiring write lock
        if let Some(hit) = memo.get(ty) {
            return Ok(hit.clone());
        }

        let coerced = self.ty().try_coerce(ty, self.0.primary.data())?;
        tracing::trace!("coercion memoized");
        let out = coerced.clone();
        memo.insert(ty.clone(), coerced);
        Ok(out)
    }

    /// Whether the payload as `ty` is already available without coercing.
    pub fn is_memoized(&self, ty: &Type) -> bool {
        ty == self.ty() || self.0.memo.read().contains_key(ty)
    }

    /// The value as a 32-bit integer, or `0`.
    pub fn get_i32(&self) -> i32 {
        self.get(&builtin::int32())
            .and_then(|payload| payload.as_i32())
            .unwrap_or(0)
    }

    /// The value as a 64-bit integer, or `0`.
    pub fn get_i64(&self) -> i64 {
        self.get(&builtin::int64())
            .and_then(|payload| payload.as_i64())
            .unwrap_or(0)
    }

    /// The value as a boolean, or `false`.
    pub fn get_bool(&self) -> bool {
        self.get(&builtin::boolean())
            .and_then(|payload| payload.as_bool())
            .unwrap_or(false)
    }

    /// The value as a string, or the empty string.
    pub fn get_string(&self) -> Arc<str> {
        self.get(&builtin::string())
            .and_then(|payload| payload.as_shared_str())
            .unwrap_or_else(|| Arc::from(""))
    }

    /// Identity comparison.
    #[inline]
    pub fn ptr_eq(a: &Value, b: &Value) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({}: {:?})", self.ty(), self.0.primary.data())
    }
}

#[cfg(test)]
mod tests;
