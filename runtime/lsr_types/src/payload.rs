//! Owned payload references.
//!
//! A `Payload` is one reference to a `Data` held under a type's ownership
//! rules: cloning runs the type's retain hook, dropping runs its release
//! hook. Every payload returned to a caller is released exactly once.

use std::fmt;
use std::ops::Deref;

use crate::{Data, Type};

pub struct Payload {
    ty: Type,
    data: Data,
}

impl Payload {
    /// Take ownership of `data` under `ty`, if it passes validation.
    ///
    /// On rejection `data` is dropped without running any hook: it was never
    /// adopted by the type.
    pub fn new(ty: &Type, data: Data) -> Option<Payload> {
        if ty.validate(&data) {
            Some(Payload::adopt(ty.clone(), data))
        } else {
            tracing::trace!(ty = %ty, kind = data.kind(), "payload rejected by validators");
            None
        }
    }

    /// Wrap already-owned data without validating it.
    pub(crate) fn adopt(ty: Type, data: Data) -> Payload {
        Payload { ty, data }
    }

    /// The type this reference is held under.
    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn data(&self) -> &Data {
        &self.data
    }
}

impl Clone for Payload {
    fn clone(&self) -> Self {
        Payload {
            ty: self.ty.clone(),
            data: self.ty.retain(&self.data),
        }
    }
}

impl Drop for Payload {
    fn drop(&mut self) {
        self.ty.release(&self.data);
    }
}

impl Deref for Payload {
    type Target = Data;

    fn deref(&self) -> &Data {
        &self.data
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload({}: {:?})", self.ty, self.data)
    }
}
