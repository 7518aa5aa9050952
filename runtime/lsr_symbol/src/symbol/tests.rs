#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::SymbolTable;
use lsr_types::{builtin, CoercionError, Data, TypeDef, TypeRegistry};
use pretty_assertions::assert_eq;

#[test]
fn test_untyped_symbol_accepts_anything() {
    let table = SymbolTable::new();
    let sym = table.intern("anything", None);
    let registry = TypeRegistry::new();
    let blob = registry.register(TypeDef::new("blob"));

    let value = Value::new(&blob, Data::opaque(0u8)).unwrap();
    assert!(sym.validate(&value));
}

#[test]
fn test_typed_symbol_requires_coercion() {
    let table = SymbolTable::new();
    let sym = table.intern("count", Some(&builtin::int64()));

    let int = Value::from_i32(3).unwrap();
    assert!(sym.validate(&int));
    // The coerced payload is memoized in the value.
    assert!(int.is_memoized(&builtin::int64()));

    let text = Value::from_string("not a number").unwrap();
    assert!(!sym.validate(&text));
    assert!(matches!(
        sym.try_validate(&text),
        Err(CoercionError::ConversionFailed { .. })
    ));
}

#[test]
fn test_typed_symbol_without_path() {
    let table = SymbolTable::new();
    let registry = TypeRegistry::new();
    let island = registry.register(TypeDef::new("island"));
    let sym = table.intern("isolated", Some(&island));

    let value = Value::from_bool(true).unwrap();
    assert!(matches!(
        sym.try_validate(&value),
        Err(CoercionError::NoPath { .. })
    ));
}

#[test]
fn test_display_and_debug() {
    let table = SymbolTable::new();
    let plain = table.intern("plain", None);
    let typed = table.intern("typed", Some(&builtin::string()));

    assert_eq!(plain.to_string(), "plain");
    assert_eq!(format!("{plain:?}"), "Symbol(plain)");
    assert_eq!(format!("{typed:?}"), "Symbol(typed: string)");
}
