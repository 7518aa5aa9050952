//! Stack headroom for nested rule walks.
//!
//! A rule callback may look up another symbol, which walks that symbol's
//! rules on the same thread. Chains are bounded by
//! [`ResolverConfig::max_nesting`](crate::ResolverConfig::max_nesting), not by
//! the thread's stack size: every walk runs through [`with_walk_stack`].

/// Stack that must be left for one rule walk, callbacks included.
const WALK_HEADROOM: usize = 128 * 1024;

/// Size of each segment allocated once the headroom runs out.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `walk`, switching to a fresh stack segment first if the current one
/// is nearly exhausted.
#[inline]
pub(crate) fn with_walk_stack<R>(walk: impl FnOnce() -> R) -> R {
    #[cfg(not(target_arch = "wasm32"))]
    {
        stacker::maybe_grow(WALK_HEADROOM, SEGMENT_SIZE, walk)
    }
    // wasm manages its own stack
    #[cfg(target_arch = "wasm32")]
    {
        walk()
    }
}
