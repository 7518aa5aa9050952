//! lsr - lazily resolved, coercible dynamic values.
//!
//! # Architecture
//!
//! ```text
//! lsr_types   types, payloads, coercion graph
//!     │
//!     ▼
//! lsr_value   values with memoized coercions
//!     │
//!     ▼
//! lsr_symbol  interned symbols with expected types
//!     │
//!     ▼
//! lsr_resolve resolver: cache + ordered rules
//! ```
//!
//! # Lifecycle
//!
//! The process-wide type registry and symbol table are created on first
//! use. [`init`] creates them eagerly together with the built-in types;
//! [`teardown`] clears both. Handles obtained before teardown stay valid but
//! are no longer reachable by name. Built-in types, `TypeCell`s and
//! `SymbolDecl`s register anew after a teardown.
//!
//! # Debugging
//!
//! - `RUST_LOG=lsr_resolve=debug`: rule registration, misses, cycles
//! - `RUST_LOG=lsr_types=trace`: coercion hops (very verbose)
//!
//! Call [`init_tracing`] once to install the subscriber.

use std::sync::Once;

pub use lsr_resolve::{
    resolve_fn, rules, MissPolicy, ResolveError, ResolveFn, Resolver, ResolverConfig, Rule,
    StaticRule, StaticTable, DEFAULT_MAX_NESTING,
};
pub use lsr_symbol::{
    intern, intern_cached, lookup as lookup_symbol, symbol_system_init, symbol_system_teardown,
    Symbol, SymbolCell, SymbolDecl, SymbolTable,
};
pub use lsr_types::{
    builtin, lookup as lookup_type, register as register_type, type_system_init,
    type_system_teardown, CoercionError, Data, Payload, Type, TypeCell, TypeDef, TypeRegistry,
    DEFAULT_MAX_DEPTH,
};
pub use lsr_value::Value;

/// Establish the process-wide registries and the built-in types. Idempotent.
pub fn init() {
    type_system_init();
    symbol_system_init();
}

/// Clear the process-wide registries, symbols first. Idempotent.
pub fn teardown() {
    symbol_system_teardown();
    type_system_teardown();
}

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set; safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
            tracing::debug!("tracing initialized");
        }
    });
}
