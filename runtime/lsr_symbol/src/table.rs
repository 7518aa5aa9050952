//! Sharded symbol table.
//!
//! Provides O(1) interning and lookup with thread-safe concurrent access
//! via per-shard locking. The process-wide table is shared from first use;
//! separate tables can be created for isolated use.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use lsr_types::Type;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Symbol;

/// Number of independently locked shards.
const NUM_SHARDS: usize = 16;

/// Per-shard storage: name to symbol.
type SymbolShard = FxHashMap<Arc<str>, Symbol>;

pub struct SymbolTable {
    shards: [RwLock<SymbolShard>; NUM_SHARDS],
    /// Total count of interned symbols across all shards (O(1) `len()`).
    total_count: AtomicUsize,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            shards: std::array::from_fn(|_| RwLock::new(FxHashMap::default())),
            total_count: AtomicUsize::new(0),
        }
    }

    /// Compute shard for a name based on a hash of its first bytes.
    #[inline]
    fn shard_for(name: &str) -> usize {
        let mut hash = 0u32;
        for byte in name.bytes().take(8) {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % NUM_SHARDS
    }

    /// Intern `name`, attaching `ty` if the symbol is new.
    ///
    /// A later call with a different type does not change the stored type.
    pub fn intern(&self, name: &str, ty: Option<&Type>) -> Symbol {
        let shard = &self.shards[Self::shard_for(name)];

        // Fast path: already interned
        if let Some(symbol) = shard.read().get(name) {
            warn_on_type_mismatch(symbol, ty);
            return symbol.clone();
        }

        // Slow path: need to insert
        let mut guard = shard.write();

        // Double-check after acquiring write lock
        if let Some(symbol) = guard.get(name) {
            warn_on_type_mismatch(symbol, ty);
            return symbol.clone();
        }

        let name: Arc<str> = Arc::from(name);
        let symbol = Symbol::new(Arc::clone(&name), ty.cloned());
        guard.insert(name, symbol.clone());
        self.total_count.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(symbol = ?symbol, "symbol interned");
        symbol
    }

    /// Look up an interned symbol. Never creates one.
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.shards[Self::shard_for(name)].read().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every symbol. Existing handles stay valid but interning the
    /// same name again creates a new, distinct symbol.
    pub fn clear(&self) {
        for shard in &self.shards {
            let mut guard = shard.write();
            self.total_count.fetch_sub(guard.len(), Ordering::Relaxed);
            guard.clear();
        }
        tracing::debug!("symbol table cleared");
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

fn warn_on_type_mismatch(existing: &Symbol, requested: Option<&Type>) {
    if let (Some(requested), Some(current)) = (requested, existing.expected_type()) {
        if requested != current {
            tracing::debug!(
                symbol = existing.name(),
                kept = %current,
                ignored = %requested,
                "symbol already interned with another type, keeping first"
            );
        }
    }
}

static GLOBAL: OnceLock<SymbolTable> = OnceLock::new();

/// Bumped by every teardown of the process-wide table.
static REVISION: AtomicU64 = AtomicU64::new(0);

pub(crate) fn revision() -> u64 {
    REVISION.load(Ordering::Acquire)
}

/// The process-wide symbol table, initialised on first use.
pub fn table() -> &'static SymbolTable {
    GLOBAL.get_or_init(SymbolTable::new)
}

/// Establish the process-wide symbol table. Idempotent.
pub fn symbol_system_init() {
    table();
}

/// Forget every process-wide symbol. Idempotent.
///
/// Symbols interned afterwards, including those of [`SymbolDecl`](crate::SymbolDecl)s,
/// are new identities.
pub fn symbol_system_teardown() {
    if let Some(table) = GLOBAL.get() {
        table.clear();
        let revision = REVISION.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(revision, "symbol system torn down");
    }
}

/// Intern `name` in the process-wide table.
pub fn intern(name: &str, ty: Option<&Type>) -> Symbol {
    table().intern(name, ty)
}

/// Look up `name` in the process-wide table.
pub fn lookup(name: &str) -> Option<Symbol> {
    GLOBAL.get().and_then(|table| table.lookup(name))
}

#[cfg(test)]
mod tests;
