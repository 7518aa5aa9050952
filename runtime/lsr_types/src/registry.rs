//! Name-keyed type registry.
//!
//! One `Type` object exists per registered name. Registration is
//! idempotent and first-writer-wins: registering a name again returns the
//! existing handle and ignores the new definition.
//!
//! The process-wide registry starts shared (internally locked) because type
//! handles are reachable from every thread. Separate `TypeRegistry`
//! instances can be created for isolated use.
//!
//! Every teardown of the process-wide registry starts a new revision.
//! [`TypeCell`](crate::TypeCell)s, the built-in types included, register
//! their type again the first time they are asked for in a new revision.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{Type, TypeDef};

#[derive(Default)]
pub struct TypeRegistry {
    types: RwLock<FxHashMap<Arc<str>, Type>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `def`, or return the type already registered under its name.
    pub fn register(&self, def: TypeDef) -> Type {
        // Fast path: already registered
        if let Some(existing) = self.lookup(&def.name) {
            tracing::debug!(name = %def.name, "type already registered, keeping first definition");
            return existing;
        }

        let mut types = self.types.write();

        // Double-check after acquiring write lock
        if let Some(existing) = types.get(&def.name) {
            return existing.clone();
        }

        let name = Arc::clone(&def.name);
        let ty = Type::from_def(def);
        types.insert(name, ty.clone());
        tracing::debug!(ty = %ty, "type registered");
        ty
    }

    /// Look up a type by name. Never creates one.
    pub fn lookup(&self, name: &str) -> Option<Type> {
        self.types.read().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// Remove every type and clear their validators and coercion edges.
    ///
    /// Handles held elsewhere stay valid but are detached: registering the
    /// same name again creates a new, distinct type.
    pub fn clear(&self) {
        let drained: Vec<Type> = self.types.write().drain().map(|(_, ty)| ty).collect();
        for ty in &drained {
            ty.clear();
        }
        tracing::debug!(count = drained.len(), "type registry cleared");
    }
}

static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();

/// Bumped by every teardown of the process-wide registry.
static REVISION: AtomicU64 = AtomicU64::new(0);

pub(crate) fn revision() -> u64 {
    REVISION.load(Ordering::Acquire)
}

/// The process-wide registry, initialised on first use.
pub fn registry() -> &'static TypeRegistry {
    GLOBAL.get_or_init(TypeRegistry::new)
}

/// Establish the process-wide type registry and its built-in types.
/// Idempotent.
pub fn type_system_init() {
    registry();
    crate::builtin::install();
}

/// Release every type of the process-wide registry. Idempotent.
///
/// Existing handles stay memory-safe, but the registry starts over: types
/// registered afterwards, built-ins included, are new identities.
pub fn type_system_teardown() {
    if let Some(registry) = GLOBAL.get() {
        registry.clear();
        let revision = REVISION.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(revision, "type system torn down");
    }
}

/// Register `def` in the process-wide registry.
pub fn register(def: TypeDef) -> Type {
    registry().register(def)
}

/// Look up a type in the process-wide registry.
pub fn lookup(name: &str) -> Option<Type> {
    GLOBAL.get().and_then(|registry| registry.lookup(name))
}

#[cfg(test)]
mod tests;
