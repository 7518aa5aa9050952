use super::*;
use lsr_types::builtin;
use pretty_assertions::assert_eq;

#[test]
fn test_intern_cached_fills_once() {
    let cell = SymbolCell::new();
    assert!(cell.get().is_none());

    let first = intern_cached("cell_fill_once", None, &cell);
    assert_eq!(cell.get(), Some(first.clone()));

    // A filled slot wins over the requested name.
    let second = intern_cached("cell_other_name", None, &cell);
    assert_eq!(first, second);
    assert_eq!(second.name(), "cell_fill_once");
}

#[test]
fn test_intern_cached_agrees_with_table() {
    let cell = SymbolCell::new();
    let cached = intern_cached("cell_agrees", Some(&builtin::int32()), &cell);
    assert_eq!(crate::intern("cell_agrees", None), cached);
    assert_eq!(cached.expected_type(), Some(&builtin::int32()));
}

static DECLARED: SymbolDecl = SymbolDecl::new("cell_declared", Some(builtin::boolean));

#[test]
fn test_symbol_decl() {
    assert_eq!(DECLARED.name(), "cell_declared");
    let sym = DECLARED.get();
    assert_eq!(sym, DECLARED.get());
    assert_eq!(sym.expected_type(), Some(&builtin::boolean()));
    assert_eq!(crate::lookup("cell_declared"), Some(sym));
}
