#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use lsr_types::{TypeDef, TypeRegistry};
use pretty_assertions::assert_eq;

#[test]
fn test_intern_returns_same_symbol() {
    let table = SymbolTable::new();
    let first = table.intern("answer", None);
    let second = table.intern("answer", None);

    assert!(Symbol::ptr_eq(&first, &second));
    assert_eq!(first.name(), "answer");
    assert_eq!(table.len(), 1);
}

#[test]
fn test_first_type_wins() {
    let types = TypeRegistry::new();
    let meters = types.register(TypeDef::new("meters"));
    let feet = types.register(TypeDef::new("feet"));
    let table = SymbolTable::new();

    let first = table.intern("height", Some(&meters));
    let second = table.intern("height", Some(&feet));
    assert_eq!(first, second);
    assert_eq!(second.expected_type(), Some(&meters));

    // Untyped first registration stays untyped.
    let loose = table.intern("loose", None);
    assert!(table.intern("loose", Some(&feet)).expected_type().is_none());
    assert!(loose.expected_type().is_none());
}

#[test]
fn test_lookup_never_creates() {
    let table = SymbolTable::new();
    assert!(table.lookup("nothing").is_none());
    assert!(table.is_empty());

    let symbol = table.intern("something", None);
    assert_eq!(table.lookup("something").unwrap(), symbol);
}

#[test]
fn test_distinct_names_are_distinct_symbols() {
    let table = SymbolTable::new();
    // Same 8-byte prefix, so same shard.
    let a = table.intern("prefix__a", None);
    let b = table.intern("prefix__b", None);

    assert_ne!(a, b);
    assert_eq!(table.len(), 2);
    assert_eq!(table.lookup("prefix__b").unwrap(), b);
}

#[test]
fn test_concurrent_intern_yields_one_symbol() {
    let table = SymbolTable::new();
    let symbols: Vec<Symbol> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| table.intern("contended", None)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(symbols.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_clear_forgets_symbols() {
    let table = SymbolTable::new();
    let before = table.intern("transient", None);
    table.intern("other", None);
    table.clear();

    assert!(table.is_empty());
    assert!(table.lookup("transient").is_none());

    let after = table.intern("transient", None);
    assert_ne!(before, after);
    assert_eq!(before.name(), after.name());
}
