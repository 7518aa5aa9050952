//! Lazily registered type singletons.
//!
//! A `TypeCell` is declared as a `static` next to the code that owns a type
//! and registers the type the first time it is asked for:
//!
//! ```text
//! static POINT: TypeCell = TypeCell::new(|| TypeDef::new("point"));
//!
//! let ty = POINT.get();
//! ```
//!
//! After a teardown of the process-wide registry the cell registers its
//! definition again on the next `get`, so it never hands out a detached type.

use std::fmt;

use parking_lot::RwLock;

use crate::registry::revision;
use crate::{Type, TypeDef};

pub struct TypeCell {
    /// The registered type and the registry revision it belongs to.
    slot: RwLock<Option<(u64, Type)>>,
    define: fn() -> TypeDef,
}

impl TypeCell {
    pub const fn new(define: fn() -> TypeDef) -> Self {
        TypeCell {
            slot: parking_lot::const_rwlock(None),
            define,
        }
    }

    /// The registered type, registering it on first call in each registry
    /// revision.
    pub fn get(&self) -> Type {
        let current = revision();

        // Fast path: registered in this revision
        if let Some((seen, ty)) = &*self.slot.read() {
            if *seen == current {
                return ty.clone();
            }
        }

        let mut slot = self.slot.write();

        // Double-check after acquiring write lock
        if let Some((seen, ty)) = &*slot {
            if *seen == current {
                return ty.clone();
            }
        }

        let ty = (self.define)().register();
        *slot = Some((current, ty.clone()));
        ty
    }
}

impl fmt::Debug for TypeCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.slot.read() {
            Some((_, ty)) => write!(f, "TypeCell({ty})"),
            None => f.write_str("TypeCell(<unregistered>)"),
        }
    }
}
