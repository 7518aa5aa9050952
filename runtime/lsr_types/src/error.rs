//! Coercion failures.

use std::sync::Arc;

/// Why a coercion did not produce a payload.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CoercionError {
    /// The coercion graph has no path between the two types within the
    /// search depth.
    #[error("no coercion path from `{from}` to `{to}`")]
    NoPath { from: Arc<str>, to: Arc<str> },

    /// A conversion function declined its input.
    #[error("conversion from `{from}` to `{to}` produced no value")]
    ConversionFailed { from: Arc<str>, to: Arc<str> },

    /// The converted payload failed the target type's validators.
    #[error("value converted to `{to}` was rejected by its validators")]
    Rejected { to: Arc<str> },

    /// Nested `via` edges exceeded the depth budget.
    #[error("coercion from `{from}` to `{to}` exceeded the depth limit")]
    DepthExceeded { from: Arc<str>, to: Arc<str> },
}
