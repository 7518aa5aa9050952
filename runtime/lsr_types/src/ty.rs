//! Type handles and type definitions.
//!
//! A `Type` is a process-wide identity: one object per registered name,
//! compared by address. It owns the validator chain, the ownership hooks
//! applied to payloads of the type, and the outgoing coercion edges.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::coerce::CoercionTable;
use crate::Data;

/// Validation predicate. All predicates of a type must accept a payload.
pub type ValidateFn = Arc<dyn Fn(&Data) -> bool + Send + Sync>;

/// Retain hook: produce a new owned reference to a payload.
pub type RetainFn = Arc<dyn Fn(&Data) -> Data + Send + Sync>;

/// Release hook: called once for every owned reference that is dropped.
pub type ReleaseFn = Arc<dyn Fn(&Data) + Send + Sync>;

/// Template describing a type to register.
///
/// Registration is first-writer-wins: once a name is registered, later
/// definitions under the same name are ignored.
pub struct TypeDef {
    pub(crate) name: Arc<str>,
    pub(crate) retain: Option<RetainFn>,
    pub(crate) release: Option<ReleaseFn>,
    pub(crate) validators: Vec<ValidateFn>,
}

impl TypeDef {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        TypeDef {
            name: name.into(),
            retain: None,
            release: None,
            validators: Vec::new(),
        }
    }

    /// Use `f` to create new references to payloads of this type.
    #[must_use]
    pub fn with_retain(mut self, f: impl Fn(&Data) -> Data + Send + Sync + 'static) -> Self {
        self.retain = Some(Arc::new(f));
        self
    }

    /// Call `f` whenever a reference to a payload of this type is released.
    #[must_use]
    pub fn with_release(mut self, f: impl Fn(&Data) + Send + Sync + 'static) -> Self {
        self.release = Some(Arc::new(f));
        self
    }

    /// Append a validation predicate.
    #[must_use]
    pub fn with_validator(mut self, f: impl Fn(&Data) -> bool + Send + Sync + 'static) -> Self {
        self.validators.push(Arc::new(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register this definition in the process-wide registry.
    pub fn register(self) -> Type {
        crate::registry().register(self)
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDef")
            .field("name", &self.name)
            .field("validators", &self.validators.len())
            .finish_non_exhaustive()
    }
}

pub(crate) struct TypeInner {
    pub(crate) name: Arc<str>,
    retain: Option<RetainFn>,
    release: Option<ReleaseFn>,
    validators: RwLock<Vec<ValidateFn>>,
    pub(crate) coercions: RwLock<CoercionTable>,
}

/// Handle to a registered type.
///
/// Cheap to clone. Equality and hashing use identity, never the name.
#[derive(Clone)]
pub struct Type(pub(crate) Arc<TypeInner>);

impl Type {
    pub(crate) fn from_def(def: TypeDef) -> Self {
        Type(Arc::new(TypeInner {
            name: def.name,
            retain: def.retain,
            release: def.release,
            validators: RwLock::new(def.validators),
            coercions: RwLock::new(CoercionTable::default()),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Run the validator chain in registration order.
    ///
    /// Stops at the first rejecting predicate. A type without validators
    /// accepts every payload.
    pub fn validate(&self, data: &Data) -> bool {
        // Snapshot so predicates may inspect the registry without holding our lock.
        let validators = self.0.validators.read().clone();
        validators.iter().all(|validate| validate(data))
    }

    /// Append a validation predicate to an already registered type.
    pub fn add_validator(&self, f: impl Fn(&Data) -> bool + Send + Sync + 'static) {
        self.0.validators.write().push(Arc::new(f));
    }

    /// Create a new owned reference to `data` using the retain hook.
    pub fn retain(&self, data: &Data) -> Data {
        match &self.0.retain {
            Some(retain) => retain(data),
            None => data.clone(),
        }
    }

    /// Release one owned reference to `data` using the release hook.
    pub fn release(&self, data: &Data) {
        if let Some(release) = &self.0.release {
            release(data);
        }
    }

    /// Identity comparison.
    #[inline]
    pub fn ptr_eq(a: &Type, b: &Type) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Drop validators and coercion edges. Used by registry teardown to
    /// break reference cycles between types.
    pub(crate) fn clear(&self) {
        self.0.validators.write().clear();
        self.0.coercions.write().clear();
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Type::ptr_eq(self, other)
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self.0.name)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}
