//! Symbol handles.
//!
//! A symbol is an interned name with an optional expected type. Once
//! interned, symbols compare by identity: two handles are equal only if they
//! come from the same interning.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use lsr_types::{CoercionError, Type};
use lsr_value::Value;

struct SymbolInner {
    name: Arc<str>,
    ty: Option<Type>,
}

#[derive(Clone)]
pub struct Symbol(Arc<SymbolInner>);

impl Symbol {
    pub(crate) fn new(name: Arc<str>, ty: Option<Type>) -> Self {
        Symbol(Arc::new(SymbolInner { name, ty }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The type values of this symbol must coerce to; `None` accepts any.
    pub fn expected_type(&self) -> Option<&Type> {
        self.0.ty.as_ref()
    }

    /// Whether `value` is acceptable for this symbol.
    ///
    /// A symbol without an expected type accepts every value. Otherwise the
    /// value must coerce to the expected type; the coerced payload is
    /// memoized in the value and the probe reference released.
    pub fn validate(&self, value: &Value) -> bool {
        self.try_validate(value).is_ok()
    }

    /// Like [`Symbol::validate`], reporting why the value was rejected.
    pub fn try_validate(&self, value: &Value) -> Result<(), CoercionError> {
        match &self.0.ty {
            None => Ok(()),
            Some(expected) => value.try_get(expected).map(drop),
        }
    }

    /// Identity comparison.
    #[inline]
    pub fn ptr_eq(a: &Symbol, b: &Symbol) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Symbol::ptr_eq(self, other)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.ty {
            Some(ty) => write!(f, "Symbol({}: {ty})", self.0.name),
            None => write!(f, "Symbol({})", self.0.name),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

#[cfg(test)]
mod tests;
