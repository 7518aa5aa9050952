//! Resolver failures.

use std::sync::Arc;

use lsr_types::CoercionError;

/// Why a resolver operation failed.
///
/// The `Option`/`bool` returning operations collapse all of these into
/// "absent"; the `try_` variants report them.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A rule needs a selector, a callback, or both.
    #[error("rule has neither a selector nor a callback")]
    EmptyRule,

    /// A value does not coerce to the symbol's expected type.
    #[error("value rejected for symbol `{symbol}`")]
    Rejected {
        symbol: Arc<str>,
        #[source]
        source: CoercionError,
    },

    /// No rule produced a value, now or in a remembered earlier lookup.
    #[error("symbol `{symbol}` could not be resolved")]
    NotFound { symbol: Arc<str> },

    /// The symbol is already being resolved further up the call chain.
    #[error("symbol `{symbol}` depends on itself")]
    Cycle { symbol: Arc<str> },

    /// Too many nested lookups.
    #[error("resolving `{symbol}` exceeds the nesting limit of {limit}")]
    NestingTooDeep { symbol: Arc<str>, limit: usize },
}
