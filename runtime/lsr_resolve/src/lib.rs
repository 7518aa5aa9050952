//! Lazy symbol resolution for the lsr runtime.
//!
//! A [`Resolver`] maps symbols to values. Values are either set directly or
//! computed on first lookup by walking an ordered list of rules, then
//! cached.
//!
//! # Architecture
//!
//! - `rule`: rule and static table representation
//! - `rules`: built-in callbacks (constants, aliases, conditionals)
//! - `resolver`: cache, rule walk, cycle guard
//! - `shareable`: private-or-locked state wrapper behind the resolver

mod config;
mod error;
mod resolver;
mod rule;
pub mod rules;
mod shareable;
mod stack;

pub use config::{MissPolicy, ResolverConfig, DEFAULT_MAX_NESTING};
pub use error::ResolveError;
pub use resolver::Resolver;
pub use rule::{resolve_fn, ResolveFn, Rule, StaticRule, StaticTable};
pub use shareable::Shareable;
