//! Resolver configuration.

/// What a resolver remembers when no rule resolves a symbol.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MissPolicy {
    /// Cache "not found". Later lookups fail without walking the rules,
    /// even if rules are added afterwards.
    #[default]
    Remember,
    /// Do not cache misses. Every lookup of an unresolved symbol walks the
    /// rules again.
    Retry,
}

/// Default bound on nested lookups (rule callbacks resolving other symbols).
pub const DEFAULT_MAX_NESTING: usize = 64;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    pub miss_policy: MissPolicy,
    /// Maximum number of symbols being resolved at once on one resolver.
    pub max_nesting: usize,
}

impl ResolverConfig {
    pub fn new() -> Self {
        ResolverConfig {
            miss_policy: MissPolicy::default(),
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }

    #[must_use]
    pub fn with_miss_policy(mut self, miss_policy: MissPolicy) -> Self {
        self.miss_policy = miss_policy;
        self
    }

    #[must_use]
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new()
    }
}
