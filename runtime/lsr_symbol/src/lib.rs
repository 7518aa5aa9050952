//! Symbols for the lsr runtime.
//!
//! Symbols are interned names used as resolver keys. Each symbol may carry
//! an expected type; values bound to the symbol must coerce to it.
//!
//! # Thread Safety
//!
//! The symbol table uses per-shard `RwLock`s, so interning from many threads
//! only contends when names hash to the same shard.

mod cell;
mod symbol;
mod table;

pub use cell::{intern_cached, SymbolCell, SymbolDecl};
pub use symbol::Symbol;
pub use table::{intern, lookup, symbol_system_init, symbol_system_teardown, table, SymbolTable};
