//! Built-in resolve callbacks.

use std::sync::Arc;

use lsr_symbol::Symbol;
use lsr_value::Value;

use crate::{resolve_fn, ResolveFn};

/// Always resolve to `value`.
pub fn constant(value: Value) -> ResolveFn {
    resolve_fn(move |_, _| Some(value.clone()))
}

pub fn constant_i32(value: i32) -> ResolveFn {
    from_prebuilt(Value::from_i32(value))
}

pub fn constant_i64(value: i64) -> ResolveFn {
    from_prebuilt(Value::from_i64(value))
}

pub fn constant_bool(value: bool) -> ResolveFn {
    from_prebuilt(Value::from_bool(value))
}

pub fn constant_string(value: impl Into<Arc<str>>) -> ResolveFn {
    from_prebuilt(Value::from_string(value))
}

fn from_prebuilt(value: Option<Value>) -> ResolveFn {
    resolve_fn(move |_, _| value.clone())
}

/// Delegate to `then` only if `condition` resolves.
///
/// The condition's value is discarded; `then` is invoked for the symbol
/// originally queried. An unresolved condition is not remembered as a miss,
/// so it can still resolve through rules added later.
pub fn when(condition: Symbol, then: ResolveFn) -> ResolveFn {
    resolve_fn(move |resolver, symbol| {
        resolver.lookup_value_unremembered(&condition)?;
        then(resolver, symbol)
    })
}

/// Resolve as if `target` had been queried instead.
///
/// Declines immediately when asked to resolve `target` itself. Longer alias
/// chains looping back are caught by the resolver's cycle guard.
pub fn alias(target: Symbol) -> ResolveFn {
    resolve_fn(move |resolver, symbol| {
        if *symbol == target {
            tracing::trace!(%symbol, "self alias declined");
            return None;
        }
        resolver.lookup_value(&target)
    })
}
