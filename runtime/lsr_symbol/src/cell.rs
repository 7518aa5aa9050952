//! Fill-once symbol slots for hot call sites.
//!
//! ```text
//! static WIDTH: SymbolDecl = SymbolDecl::new("width", Some(builtin::int32));
//!
//! let sym = WIDTH.get();
//! ```
//!
//! A slot filled before [`symbol_system_teardown`](crate::symbol_system_teardown)
//! counts as empty afterwards, so slots never hand out forgotten symbols.

use std::fmt;

use lsr_types::Type;
use parking_lot::RwLock;

use crate::table::revision;
use crate::{intern, Symbol};

/// Single-slot symbol cache.
pub struct SymbolCell(RwLock<Option<(u64, Symbol)>>);

impl SymbolCell {
    pub const fn new() -> Self {
        SymbolCell(parking_lot::const_rwlock(None))
    }

    /// The cached symbol, if the slot has been filled since the last
    /// teardown.
    pub fn get(&self) -> Option<Symbol> {
        match &*self.0.read() {
            Some((seen, symbol)) if *seen == revision() => Some(symbol.clone()),
            _ => None,
        }
    }
}

impl Default for SymbolCell {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SymbolCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(symbol) => write!(f, "SymbolCell({symbol:?})"),
            None => f.write_str("SymbolCell(<empty>)"),
        }
    }
}

/// Intern `name` through the process-wide table, consulting `cell` first.
///
/// The cell is only filled when empty; a filled cell is returned as is,
/// even if it was filled with a symbol of a different name.
pub fn intern_cached(name: &str, ty: Option<&Type>, cell: &SymbolCell) -> Symbol {
    if let Some(symbol) = cell.get() {
        return symbol;
    }

    let current = revision();
    let mut slot = cell.0.write();

    // Double-check after acquiring write lock
    if let Some((seen, symbol)) = &*slot {
        if *seen == current {
            return symbol.clone();
        }
    }

    let symbol = intern(name, ty);
    *slot = Some((current, symbol.clone()));
    symbol
}

/// A `static` symbol declaration: name, optional type function and slot.
pub struct SymbolDecl {
    name: &'static str,
    ty: Option<fn() -> Type>,
    cell: SymbolCell,
}

impl SymbolDecl {
    pub const fn new(name: &'static str, ty: Option<fn() -> Type>) -> Self {
        SymbolDecl {
            name,
            ty,
            cell: SymbolCell::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The interned symbol, interning it on first call after each teardown.
    pub fn get(&self) -> Symbol {
        if let Some(symbol) = self.cell.get() {
            return symbol;
        }
        let ty = self.ty.map(|define| define());
        intern_cached(self.name, ty.as_ref(), &self.cell)
    }
}

impl fmt::Debug for SymbolDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolDecl")
            .field("name", &self.name)
            .field("cell", &self.cell)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
