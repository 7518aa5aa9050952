#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use lsr_types::{TypeDef, TypeRegistry};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Fixture {
    registry: TypeRegistry,
    conversions: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl Fixture {
    fn new() -> Self {
        Fixture {
            registry: TypeRegistry::new(),
            conversions: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A type accepting `i64` payloads that counts released references.
    fn counted(&self, name: &str) -> Type {
        let released = Arc::clone(&self.released);
        self.registry.register(
            TypeDef::new(name)
                .with_validator(|d| d.as_i64().is_some())
                .with_release(move |_| {
                    released.fetch_add(1, Ordering::SeqCst);
                }),
        )
    }

    /// Register `from -> to` doubling the payload, counting invocations.
    fn doubling(&self, from: &Type, to: &Type) {
        let conversions = Arc::clone(&self.conversions);
        from.add_coercion(to, move |d| {
            conversions.fetch_add(1, Ordering::SeqCst);
            d.as_i64().map(|v| Data::Int64(v * 2))
        });
    }

    fn conversions(&self) -> usize {
        self.conversions.load(Ordering::SeqCst)
    }

    fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[test]
fn test_new_rejects_invalid_payload() {
    let fx = Fixture::new();
    let ty = fx.counted("meters");

    assert!(Value::new(&ty, Data::Bool(true)).is_none());
    // Never adopted, never released.
    assert_eq!(fx.released(), 0);

    let value = Value::new(&ty, Data::Int64(3)).unwrap();
    assert_eq!(value.ty(), &ty);
    assert_eq!(value.primary().as_i64(), Some(3));
}

#[test]
fn test_primary_type_is_a_hit() {
    let fx = Fixture::new();
    let a = fx.counted("a");
    let b = fx.counted("b");
    fx.doubling(&a, &b);

    let value = Value::new(&a, Data::Int64(5)).unwrap();
    assert!(value.is_memoized(&a));
    assert_eq!(value.get(&a).unwrap().as_i64(), Some(5));
    assert_eq!(fx.conversions(), 0);
}

#[test]
fn test_coercion_is_memoized() {
    let fx = Fixture::new();
    let a = fx.counted("a");
    let b = fx.counted("b");
    fx.doubling(&a, &b);

    let value = Value::new(&a, Data::Int64(5)).unwrap();
    assert!(!value.is_memoized(&b));
    assert_eq!(value.get(&b).unwrap().as_i64(), Some(10));
    assert_eq!(value.get(&b).unwrap().as_i64(), Some(10));
    assert!(value.is_memoized(&b));
    assert_eq!(fx.conversions(), 1);
}

#[test]
fn test_failed_coercion_is_not_memoized() {
    let fx = Fixture::new();
    let a = fx.counted("a");
    let unreachable = fx.counted("unreachable");
    let picky = fx
        .registry
        .register(TypeDef::new("picky").with_validator(|d| d.as_i64() == Some(1)));
    fx.doubling(&a, &picky);

    let value = Value::new(&a, Data::Int64(5)).unwrap();
    assert!(value.get(&unreachable).is_none());
    assert!(matches!(
        value.try_get(&picky),
        Err(CoercionError::Rejected { .. })
    ));
    assert!(!value.is_memoized(&picky));
    assert!(value.get(&picky).is_none());
    assert_eq!(fx.conversions(), 2);
}

#[test]
fn test_every_reference_is_released() {
    let fx = Fixture::new();
    let a = fx.counted("a");
    let b = fx.counted("b");
    fx.doubling(&a, &b);

    let value = Value::new(&a, Data::Int64(1)).unwrap();
    let copy = value.clone();
    assert!(Value::ptr_eq(&value, &copy));

    drop(value.get(&b).unwrap());
    assert_eq!(fx.released(), 1);

    drop(value);
    assert_eq!(fx.released(), 1);

    // Last reference: primary and memoized `b` payloads are released.
    drop(copy);
    assert_eq!(fx.released(), 3);
}

#[test]
fn test_concurrent_get_converts_once() {
    let fx = Fixture::new();
    let a = fx.counted("a");
    let b = fx.counted("b");
    fx.doubling(&a, &b);
    let value = Value::new(&a, Data::Int64(21)).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                assert_eq!(value.get(&b).unwrap().as_i64(), Some(42));
            });
        }
    });

    assert_eq!(fx.conversions(), 1);
}

#[test]
fn test_typed_accessors() {
    let int = Value::from_i32(7).unwrap();
    assert_eq!(int.get_i32(), 7);
    assert_eq!(int.get_i64(), 7);
    assert!(int.get_bool());
    assert_eq!(&*int.get_string(), "7");

    let flag = Value::from_bool(true).unwrap();
    assert_eq!(flag.get_i32(), 1);
    assert_eq!(flag.get_i64(), 1);

    let text = Value::from_string("hello").unwrap();
    assert_eq!(&*text.get_string(), "hello");
    assert_eq!(text.get_i32(), 0);
    assert!(!text.get_bool());

    let big = Value::from_i64(i64::MAX).unwrap();
    assert_eq!(big.get_i32(), 0);
}

#[test]
fn test_typed_accessors_default_without_path() {
    let registry = TypeRegistry::new();
    let opaque = registry.register(TypeDef::new("blob"));
    let value = Value::new(&opaque, Data::opaque(vec![1u8, 2, 3])).unwrap();

    assert_eq!(value.get_i32(), 0);
    assert_eq!(value.get_i64(), 0);
    assert!(!value.get_bool());
    assert_eq!(&*value.get_string(), "");
    assert_eq!(
        value.primary().downcast_ref::<Vec<u8>>(),
        Some(&vec![1u8, 2, 3])
    );
}
