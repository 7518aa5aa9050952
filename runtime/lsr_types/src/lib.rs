//! Dynamic types for the lsr runtime.
//!
//! This crate contains the leaves of the runtime:
//! - `Data`: tagged payload data
//! - `Type`: registered type identities with validators and ownership hooks
//! - `Payload`: an owned reference to data held under a type
//! - the coercion graph and the coercion engine
//! - the process-wide `TypeRegistry` and the built-in scalar types
//!
//! # Design
//!
//! - **Identity, not names**: types compare by handle once registered
//! - **First writer wins**: re-registering a name returns the existing type
//! - **Bounded search**: coercion search is depth-bounded instead of
//!   cycle-checked, so it terminates on any graph

pub mod builtin;
mod cell;
mod coerce;
mod data;
mod error;
mod payload;
mod registry;
mod ty;

pub use cell::TypeCell;
pub use coerce::{CoercionPath, ConvertFn, Edge, DEFAULT_MAX_DEPTH};
pub use data::Data;
pub use error::CoercionError;
pub use payload::Payload;
pub use registry::{lookup, register, registry, type_system_init, type_system_teardown, TypeRegistry};
pub use ty::{ReleaseFn, RetainFn, Type, TypeDef, ValidateFn};
