#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::Data;
use pretty_assertions::assert_eq;

#[test]
fn test_register_is_idempotent() {
    let registry = TypeRegistry::new();
    let first = registry.register(TypeDef::new("widget"));
    let second = registry.register(TypeDef::new("widget").with_validator(|_| false));

    assert_eq!(first, second);
    assert!(Type::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
    // The second definition was ignored.
    assert!(second.validate(&Data::Int32(1)));
}

#[test]
fn test_shared_state_between_handles() {
    let registry = TypeRegistry::new();
    let first = registry.register(TypeDef::new("counter"));
    let second = registry.register(TypeDef::new("counter"));
    let other = registry.register(TypeDef::new("other"));

    first.add_validator(|d| d.as_i32().is_some());
    assert!(!second.validate(&Data::Bool(true)));

    first.add_coercion(&other, |d| Some(d.clone()));
    assert!(second.has_coercion(&other));
}

#[test]
fn test_lookup_never_creates() {
    let registry = TypeRegistry::new();
    assert!(registry.lookup("missing").is_none());
    assert!(registry.is_empty());

    let ty = registry.register(TypeDef::new("present"));
    assert_eq!(registry.lookup("present").unwrap(), ty);
}

#[test]
fn test_validators_short_circuit_in_order() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let registry = TypeRegistry::new();
    let later_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&later_calls);
    let ty = registry.register(
        TypeDef::new("even")
            .with_validator(|d| d.as_i32().is_some())
            .with_validator(move |d| {
                counter.fetch_add(1, Ordering::SeqCst);
                d.as_i32().is_some_and(|v| v % 2 == 0)
            }),
    );

    assert!(!ty.validate(&Data::Bool(false)));
    assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    assert!(!ty.validate(&Data::Int32(3)));
    assert!(ty.validate(&Data::Int32(4)));
    assert_eq!(later_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_type_without_validators_accepts_anything() {
    let registry = TypeRegistry::new();
    let ty = registry.register(TypeDef::new("any"));
    assert!(ty.validate(&Data::Int64(0)));
    assert!(ty.validate(&Data::opaque(vec![1u8])));
}

#[test]
fn test_concurrent_register_yields_one_type() {
    let registry = TypeRegistry::new();
    let types: Vec<Type> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| registry.register(TypeDef::new("racy"))))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(registry.len(), 1);
    assert!(types.windows(2).all(|w| Type::ptr_eq(&w[0], &w[1])));
}

#[test]
fn test_clear_detaches_types() {
    let registry = TypeRegistry::new();
    let a = registry.register(TypeDef::new("a").with_validator(|_| false));
    let b = registry.register(TypeDef::new("b"));
    a.add_coercion(&b, |d| Some(d.clone()));
    b.add_coercion(&a, |d| Some(d.clone()));

    registry.clear();

    assert!(registry.is_empty());
    assert!(!a.has_coercion(&b));
    assert!(a.validate(&Data::Int32(0)));

    let fresh = registry.register(TypeDef::new("a"));
    assert_ne!(fresh, a);
    assert_eq!(fresh.name(), a.name());
}
