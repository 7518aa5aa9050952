//! The resolver: a symbol to value cache filled on demand by rules.
//!
//! # Lookup
//!
//! A lookup first consults the cache. On a miss the rules are walked in
//! append order and the first matching rule producing a value ends the walk.
//! The value is cached if it validates against the symbol's expected type;
//! otherwise the lookup fails and the cache is left untouched. A stop rule
//! ends the walk with a miss. What a miss leaves behind is governed by
//! [`MissPolicy`].
//!
//! # Concurrency
//!
//! A resolver is private until [`Resolver::share`] is called. Shared
//! resolvers hold a reentrant lock for the whole lookup, rule walk
//! included, so concurrent first lookups of one symbol walk the rules once
//! and all observe the same cached value. Rule callbacks run on the locking
//! thread and may freely use the resolver again.
//!
//! # Cycles
//!
//! The resolver tracks which symbols are being resolved. A nested lookup of
//! a symbol already in progress fails, as does nesting deeper than
//! [`ResolverConfig::max_nesting`].

use std::fmt;
use std::sync::Arc;

use lsr_symbol::Symbol;
use lsr_types::{builtin, CoercionError, Data, Payload, Type};
use lsr_value::Value;
use rustc_hash::FxHashMap;

use crate::rule::Step;
use crate::shareable::Shareable;
use crate::stack::with_walk_stack;
use crate::{rules, MissPolicy, ResolveError, ResolveFn, ResolverConfig, Rule, StaticTable};

#[derive(Default)]
struct ResolverState {
    config: ResolverConfig,
    rules: Vec<Rule>,
    /// `None` records a remembered miss.
    cache: FxHashMap<Symbol, Option<Value>>,
    /// Symbols whose rule walk is in progress, innermost last.
    resolving: Vec<Symbol>,
    /// Bumped whenever the cycle or nesting guard rejects a lookup.
    guard_trips: u64,
}

/// Outcome of one rule walk.
enum Walk {
    Found(Value),
    Missing,
    /// The first rule to produce a value produced one the symbol rejects.
    Rejected(CoercionError),
}

impl fmt::Debug for ResolverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .field("rules", &self.rules)
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

pub struct Resolver(Shareable<ResolverState>);

impl Resolver {
    /// Create a resolver, optionally seeded with a static rule table.
    pub fn new(table: Option<StaticTable>) -> Self {
        let resolver = Resolver::with_config(ResolverConfig::default());
        if let Some(table) = table {
            resolver.add_rule_from_static_table(table);
        }
        resolver
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Resolver(Shareable::new(ResolverState {
            config,
            ..ResolverState::default()
        }))
    }

    pub fn config(&self) -> ResolverConfig {
        self.0.read(|state| state.config)
    }

    /// Switch to shared mode and return another handle to this resolver.
    ///
    /// The switch is permanent. Handles can be sent to other threads and
    /// all operations through any handle are synchronized.
    pub fn share(&mut self) -> Resolver {
        Resolver(self.0.share())
    }

    /// Another handle, available once the resolver is shared.
    pub fn try_clone(&self) -> Option<Resolver> {
        self.0.try_clone().map(Resolver)
    }

    pub fn is_shared(&self) -> bool {
        self.0.is_shared()
    }

    // Rules

    /// Append a rule resolving `selector` (every symbol if `None`).
    pub fn add_rule(
        &self,
        selector: Option<&Symbol>,
        callback: impl Fn(&Resolver, &Symbol) -> Option<Value> + Send + Sync + 'static,
    ) -> &Self {
        self.push_rule(Rule::resolving(selector.cloned(), Arc::new(callback)))
    }

    /// Like [`Resolver::add_rule`] with an already wrapped callback.
    pub fn add_rule_fn(&self, selector: Option<&Symbol>, callback: ResolveFn) -> &Self {
        self.push_rule(Rule::resolving(selector.cloned(), callback))
    }

    /// Append a rule from its parts. A selector without a callback is a stop
    /// rule; neither is rejected.
    pub fn try_add_rule(
        &self,
        selector: Option<Symbol>,
        callback: Option<ResolveFn>,
    ) -> Result<&Self, ResolveError> {
        let rule = Rule::new(selector, callback)?;
        Ok(self.push_rule(rule))
    }

    /// Append a stop rule: `selector` is never resolved by later rules.
    pub fn add_stop_rule(&self, selector: &Symbol) -> &Self {
        self.push_rule(Rule::stop(selector.clone()))
    }

    /// Append one rule scanning `table`.
    pub fn add_rule_from_static_table(&self, table: StaticTable) -> &Self {
        self.push_rule(Rule::from_static_table(table))
    }

    pub fn add_rule_i32(&self, symbol: &Symbol, value: i32) -> &Self {
        self.push_rule(Rule::resolving(Some(symbol.clone()), rules::constant_i32(value)))
    }

    pub fn add_rule_i64(&self, symbol: &Symbol, value: i64) -> &Self {
        self.push_rule(Rule::resolving(Some(symbol.clone()), rules::constant_i64(value)))
    }

    pub fn add_rule_bool(&self, symbol: &Symbol, value: bool) -> &Self {
        self.push_rule(Rule::resolving(Some(symbol.clone()), rules::constant_bool(value)))
    }

    pub fn add_rule_string(&self, symbol: &Symbol, value: impl Into<Arc<str>>) -> &Self {
        self.push_rule(Rule::resolving(
            Some(symbol.clone()),
            rules::constant_string(value),
        ))
    }

    /// Resolve `symbol` as whatever `target` resolves to.
    pub fn add_rule_alias(&self, symbol: &Symbol, target: &Symbol) -> &Self {
        self.push_rule(Rule::resolving(
            Some(symbol.clone()),
            rules::alias(target.clone()),
        ))
    }

    /// Resolve `selector` with `then`, but only if `condition` resolves.
    pub fn add_rule_if(
        &self,
        selector: Option<&Symbol>,
        condition: &Symbol,
        then: ResolveFn,
    ) -> &Self {
        self.push_rule(Rule::resolving(
            selector.cloned(),
            rules::when(condition.clone(), then),
        ))
    }

    fn push_rule(&self, rule: Rule) -> &Self {
        tracing::debug!(?rule, "rule added");
        self.0.write(|state| state.rules.push(rule));
        self
    }

    pub fn rule_count(&self) -> usize {
        self.0.read(|state| state.rules.len())
    }

    // Setting values

    /// Bind `symbol` to `value`, replacing any cached entry.
    ///
    /// Fails, leaving the cache untouched, if `value` does not coerce to the
    /// symbol's expected type.
    pub fn set_value(&self, symbol: &Symbol, value: Value) -> bool {
        self.try_set_value(symbol, value).is_ok()
    }

    pub fn try_set_value(&self, symbol: &Symbol, value: Value) -> Result<(), ResolveError> {
        symbol
            .try_validate(&value)
            .map_err(|source| ResolveError::Rejected {
                symbol: symbol.name().into(),
                source,
            })?;
        tracing::trace!(%symbol, ?value, "value set");
        self.0.write(|state| state.cache.insert(symbol.clone(), Some(value)));
        Ok(())
    }

    /// Bind `symbol` to a new value of type `ty`.
    pub fn set(&self, symbol: &Symbol, ty: &Type, data: Data) -> bool {
        Value::new(ty, data).is_some_and(|value| self.set_value(symbol, value))
    }

    pub fn set_i32(&self, symbol: &Symbol, value: i32) -> bool {
        Value::from_i32(value).is_some_and(|value| self.set_value(symbol, value))
    }

    pub fn set_i64(&self, symbol: &Symbol, value: i64) -> bool {
        Value::from_i64(value).is_some_and(|value| self.set_value(symbol, value))
    }

    pub fn set_bool(&self, symbol: &Symbol, value: bool) -> bool {
        Value::from_bool(value).is_some_and(|value| self.set_value(symbol, value))
    }

    pub fn set_string(&self, symbol: &Symbol, value: impl Into<Arc<str>>) -> bool {
        Value::from_string(value).is_some_and(|value| self.set_value(symbol, value))
    }

    // Lookup

    /// The value of `symbol`, resolving it on first request.
    pub fn lookup_value(&self, symbol: &Symbol) -> Option<Value> {
        self.try_lookup_value(symbol).ok()
    }

    #[tracing::instrument(level = "trace", skip_all, fields(%symbol))]
    pub fn try_lookup_value(&self, symbol: &Symbol) -> Result<Value, ResolveError> {
        self.resolve(symbol, true)
    }

    /// Like [`lookup_value`](Self::lookup_value), but a miss is never
    /// remembered, whatever the [`MissPolicy`].
    pub(crate) fn lookup_value_unremembered(&self, symbol: &Symbol) -> Option<Value> {
        self.resolve(symbol, false).ok()
    }

    fn resolve(&self, symbol: &Symbol, may_remember: bool) -> Result<Value, ResolveError> {
        self.0.synchronize(|cell| {
            let trips_before = {
                let mut state = cell.borrow_mut();
                if let Some(entry) = state.cache.get(symbol) {
                    tracing::trace!(hit = entry.is_some(), "cache");
                    return entry.clone().ok_or_else(|| not_found(symbol));
                }
                if state.resolving.contains(symbol) {
                    state.guard_trips += 1;
                    tracing::debug!(%symbol, "resolution cycle");
                    return Err(ResolveError::Cycle {
                        symbol: symbol.name().into(),
                    });
                }
                if state.resolving.len() >= state.config.max_nesting {
                    state.guard_trips += 1;
                    return Err(ResolveError::NestingTooDeep {
                        symbol: symbol.name().into(),
                        limit: state.config.max_nesting,
                    });
                }
                state.resolving.push(symbol.clone());
                state.guard_trips
            };

            let outcome = with_walk_stack(|| self.walk(symbol));

            let mut state = cell.borrow_mut();
            state.resolving.pop();

            // A value set while the rules ran wins over the walk's result.
            if let Some(Some(existing)) = state.cache.get(symbol) {
                return Ok(existing.clone());
            }

            match outcome {
                Walk::Found(value) => {
                    state.cache.insert(symbol.clone(), Some(value.clone()));
                    Ok(value)
                }
                // Same as a failed `set_value`: the cache is left alone.
                Walk::Rejected(source) => Err(ResolveError::Rejected {
                    symbol: symbol.name().into(),
                    source,
                }),
                Walk::Missing => {
                    // A miss caused by a cycle further up depends on the
                    // caller, so it is never remembered.
                    let remember = may_remember
                        && state.config.miss_policy == MissPolicy::Remember
                        && state.guard_trips == trips_before;
                    if remember {
                        state.cache.insert(symbol.clone(), None);
                    }
                    tracing::debug!(%symbol, remember, "symbol not resolved");
                    Err(not_found(symbol))
                }
            }
        })
    }

    /// Walk the rules for `symbol` until one produces a value. Rules
    /// appended by callbacks during the walk are consulted too.
    fn walk(&self, symbol: &Symbol) -> Walk {
        let mut index = 0;
        while let Some(rule) = self.0.read(|state| state.rules.get(index).cloned()) {
            index += 1;
            if !rule.matches(symbol) {
                continue;
            }
            tracing::trace!(?rule, "applying rule");
            match rule.apply(self, symbol) {
                Step::Found(value) => {
                    return match symbol.try_validate(&value) {
                        Ok(()) => Walk::Found(value),
                        Err(error) => {
                            tracing::warn!(%symbol, ?rule, %error, "rule result rejected");
                            Walk::Rejected(error)
                        }
                    };
                }
                Step::Next => {}
                Step::Stop => {
                    tracing::trace!(?rule, "stop rule");
                    return Walk::Missing;
                }
            }
        }
        Walk::Missing
    }

    /// The value of `symbol` as type `ty`.
    pub fn lookup(&self, symbol: &Symbol, ty: &Type) -> Option<Payload> {
        self.lookup_value(symbol)?.get(ty)
    }

    /// The value of `symbol` as a 32-bit integer, or `0`.
    pub fn lookup_i32(&self, symbol: &Symbol) -> i32 {
        self.lookup_value(symbol).map_or(0, |value| value.get_i32())
    }

    pub fn lookup_i64(&self, symbol: &Symbol) -> i64 {
        self.lookup_value(symbol).map_or(0, |value| value.get_i64())
    }

    pub fn lookup_bool(&self, symbol: &Symbol) -> bool {
        self.lookup_value(symbol).is_some_and(|value| value.get_bool())
    }

    /// The value of `symbol` as a string, or the empty string.
    pub fn lookup_string(&self, symbol: &Symbol) -> Arc<str> {
        self.lookup(symbol, &builtin::string())
            .and_then(|payload| payload.as_shared_str())
            .unwrap_or_else(|| Arc::from(""))
    }

    /// Whether `symbol` has a cached value.
    pub fn is_cached(&self, symbol: &Symbol) -> bool {
        self.0.read(|state| matches!(state.cache.get(symbol), Some(Some(_))))
    }

    /// Whether a miss for `symbol` is remembered.
    pub fn is_known_missing(&self, symbol: &Symbol) -> bool {
        self.0.read(|state| matches!(state.cache.get(symbol), Some(None)))
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Resolver::new(None)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

fn not_found(symbol: &Symbol) -> ResolveError {
    ResolveError::NotFound {
        symbol: symbol.name().into(),
    }
}
