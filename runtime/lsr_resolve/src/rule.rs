//! Resolution rules and static rule tables.
//!
//! A rule pairs an optional selector (the symbol it applies to, `None` for
//! every symbol) with an optional callback. A rule without a callback is a
//! stop rule: when its selector matches, resolution ends as "not found"
//! without consulting later rules.

use std::fmt;
use std::sync::Arc;

use lsr_symbol::Symbol;
use lsr_value::Value;

use crate::{ResolveError, Resolver};

/// Resolve callback: produce a value for the queried symbol, or decline.
///
/// Any data the callback needs is captured by the closure.
pub type ResolveFn = Arc<dyn Fn(&Resolver, &Symbol) -> Option<Value> + Send + Sync>;

/// Wrap a closure as a [`ResolveFn`].
pub fn resolve_fn(
    f: impl Fn(&Resolver, &Symbol) -> Option<Value> + Send + Sync + 'static,
) -> ResolveFn {
    Arc::new(f)
}

/// Outcome of applying one rule.
pub(crate) enum Step {
    /// The rule produced a value.
    Found(Value),
    /// The rule declined; try the next one.
    Next,
    /// A stop rule matched.
    Stop,
}

#[derive(Clone)]
pub struct Rule {
    selector: Option<Symbol>,
    action: Action,
}

#[derive(Clone)]
enum Action {
    Resolve(ResolveFn),
    Stop,
    Table(Arc<[StaticRule]>),
}

impl Rule {
    /// Build a rule. Fails if both `selector` and `callback` are absent.
    pub fn new(selector: Option<Symbol>, callback: Option<ResolveFn>) -> Result<Rule, ResolveError> {
        let action = match (&selector, callback) {
            (_, Some(callback)) => Action::Resolve(callback),
            (Some(_), None) => Action::Stop,
            (None, None) => return Err(ResolveError::EmptyRule),
        };
        Ok(Rule { selector, action })
    }

    /// Rule resolving `selector` (every symbol if `None`) with `callback`.
    pub fn resolving(selector: Option<Symbol>, callback: ResolveFn) -> Rule {
        Rule {
            selector,
            action: Action::Resolve(callback),
        }
    }

    /// Stop rule for `selector`.
    pub fn stop(selector: Symbol) -> Rule {
        Rule {
            selector: Some(selector),
            action: Action::Stop,
        }
    }

    /// One compound rule scanning `table` in order.
    pub fn from_static_table(table: StaticTable) -> Rule {
        Rule {
            selector: None,
            action: Action::Table(table.into()),
        }
    }

    pub fn selector(&self) -> Option<&Symbol> {
        self.selector.as_ref()
    }

    pub fn is_stop(&self) -> bool {
        matches!(self.action, Action::Stop)
    }

    pub fn matches(&self, symbol: &Symbol) -> bool {
        match &self.selector {
            Some(selector) => selector == symbol,
            None => true,
        }
    }

    /// Apply the rule to `symbol`. The selector must already match.
    pub(crate) fn apply(&self, resolver: &Resolver, symbol: &Symbol) -> Step {
        match &self.action {
            Action::Resolve(callback) => callback(resolver, symbol).map_or(Step::Next, Step::Found),
            Action::Stop => Step::Stop,
            Action::Table(entries) => scan_table(entries, resolver, symbol),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match &self.action {
            Action::Resolve(_) => "resolve".to_owned(),
            Action::Stop => "stop".to_owned(),
            Action::Table(entries) => format!("table[{}]", entries.len()),
        };
        match &self.selector {
            Some(symbol) => write!(f, "Rule({symbol} => {action})"),
            None => write!(f, "Rule(* => {action})"),
        }
    }
}

/// One entry of a static rule table.
///
/// The selector is a function returning the symbol, so tables can name
/// symbols declared as `static` [`lsr_symbol::SymbolDecl`]s. An entry with
/// neither selector nor callback is the end-of-table sentinel.
#[derive(Clone)]
pub struct StaticRule {
    pub selector: Option<fn() -> Symbol>,
    pub callback: Option<ResolveFn>,
}

impl StaticRule {
    /// End-of-table marker. Entries after it are never scanned.
    pub const SENTINEL: StaticRule = StaticRule {
        selector: None,
        callback: None,
    };

    /// Entry resolving `selector` with `callback`.
    pub fn new(selector: fn() -> Symbol, callback: ResolveFn) -> Self {
        StaticRule {
            selector: Some(selector),
            callback: Some(callback),
        }
    }

    /// Entry resolving every symbol with `callback`.
    pub fn any(callback: ResolveFn) -> Self {
        StaticRule {
            selector: None,
            callback: Some(callback),
        }
    }

    /// Entry ending resolution of `selector` as "not found".
    pub fn stop(selector: fn() -> Symbol) -> Self {
        StaticRule {
            selector: Some(selector),
            callback: None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.selector.is_none() && self.callback.is_none()
    }

    fn matches(&self, symbol: &Symbol) -> bool {
        match self.selector {
            Some(select) => select() == *symbol,
            None => true,
        }
    }
}

impl fmt::Debug for StaticRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticRule")
            .field("selector", &self.selector.is_some())
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Ordered static rule entries.
pub type StaticTable = Vec<StaticRule>;

fn scan_table(entries: &[StaticRule], resolver: &Resolver, symbol: &Symbol) -> Step {
    for entry in entries {
        if entry.is_sentinel() {
            break;
        }
        if !entry.matches(symbol) {
            continue;
        }
        match &entry.callback {
            None => return Step::Stop,
            Some(callback) => {
                if let Some(value) = callback(resolver, symbol) {
                    return Step::Found(value);
                }
            }
        }
    }
    Step::Next
}
