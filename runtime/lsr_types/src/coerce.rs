//! Coercion graph and coercion engine.
//!
//! Each type owns its outgoing edges. An edge either converts directly or
//! routes through an intermediate type. Path search is breadth-first over
//! the directed graph:
//!
//! - a direct edge has distance 0, every extra hop adds 1
//! - neighbours are visited in edge registration order, so the first
//!   registered edge wins ties at equal distance
//! - the search never goes deeper than `max_depth`, which bounds it even
//!   when the graph has cycles
//!
//! Searching never creates payloads. Coercing follows the shortest path hop
//! by hop and releases every intermediate payload.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::{CoercionError, Data, Payload, Type};

/// Default bound on coercion search depth.
pub const DEFAULT_MAX_DEPTH: u32 = 1024;

/// Conversion function of a direct edge.
pub type ConvertFn = Arc<dyn Fn(&Data) -> Option<Data> + Send + Sync>;

/// Hop targets from the source type to the destination, in order.
pub type CoercionPath = SmallVec<[Type; 4]>;

/// A directed coercion edge.
#[derive(Clone)]
pub enum Edge {
    /// Convert directly.
    Convert(ConvertFn),
    /// Coerce to the intermediate type first, then from there to the target.
    Via(Type),
}

/// Outgoing edges of one type, kept in registration order.
#[derive(Default)]
pub(crate) struct CoercionTable {
    edges: Vec<(Type, Edge)>,
    index: FxHashMap<Type, usize>,
}

impl CoercionTable {
    /// Insert an edge unless one to `to` already exists.
    fn insert(&mut self, to: Type, edge: Edge) -> bool {
        if self.index.contains_key(&to) {
            return false;
        }
        self.index.insert(to.clone(), self.edges.len());
        self.edges.push((to, edge));
        true
    }

    fn edge(&self, to: &Type) -> Option<&Edge> {
        self.index.get(to).map(|&i| &self.edges[i].1)
    }

    fn targets(&self) -> SmallVec<[Type; 8]> {
        self.edges.iter().map(|(to, _)| to.clone()).collect()
    }

    pub(crate) fn clear(&mut self) {
        self.edges.clear();
        self.index.clear();
    }
}

impl Type {
    /// Register a direct conversion `self -> to`.
    ///
    /// Returns `false` (and changes nothing) if an edge to `to` already exists.
    pub fn add_coercion(
        &self,
        to: &Type,
        convert: impl Fn(&Data) -> Option<Data> + Send + Sync + 'static,
    ) -> bool {
        self.insert_edge(to, Edge::Convert(Arc::new(convert)))
    }

    /// Register an indirect edge `self -> to` that routes through `via`.
    pub fn add_coercion_via(&self, to: &Type, via: &Type) -> bool {
        self.insert_edge(to, Edge::Via(via.clone()))
    }

    fn insert_edge(&self, to: &Type, edge: Edge) -> bool {
        let inserted = self.0.coercions.write().insert(to.clone(), edge);
        if inserted {
            tracing::debug!(from = %self, to = %to, "coercion registered");
        } else {
            tracing::debug!(from = %self, to = %to, "coercion already registered, keeping first");
        }
        inserted
    }

    /// Whether a direct edge `self -> to` is registered.
    pub fn has_coercion(&self, to: &Type) -> bool {
        self.0.coercions.read().index.contains_key(to)
    }

    /// Whether any path `self -> to` exists within [`DEFAULT_MAX_DEPTH`].
    pub fn coercion_exists(&self, to: &Type) -> bool {
        self.coercion_path(to, DEFAULT_MAX_DEPTH).is_some()
    }

    /// Length of the shortest path `self -> to`, where a direct edge is 0.
    pub fn shortest_distance(&self, to: &Type, max_depth: u32) -> Option<u32> {
        let path = self.coercion_path(to, max_depth)?;
        u32::try_from(path.len() - 1).ok()
    }

    /// Shortest path `self -> to` as the list of hop targets.
    ///
    /// The last element is always `to`. Returns `None` when no path exists
    /// within `max_depth` extra hops.
    pub fn coercion_path(&self, to: &Type, max_depth: u32) -> Option<CoercionPath> {
        let mut parents: FxHashMap<Type, Type> = FxHashMap::default();
        let mut visited: FxHashSet<Type> = FxHashSet::default();
        visited.insert(self.clone());

        let mut frontier = vec![self.clone()];
        let mut distance = 0u32;

        loop {
            let mut next = Vec::new();
            for node in &frontier {
                let targets = node.0.coercions.read().targets();
                for target in targets {
                    if target == *to {
                        let mut path = CoercionPath::new();
                        path.push(target);
                        let mut cursor = node;
                        while let Some(parent) = parents.get(cursor) {
                            path.push(cursor.clone());
                            cursor = parent;
                        }
                        path.reverse();
                        return Some(path);
                    }
                    if visited.insert(target.clone()) {
                        parents.insert(target.clone(), node.clone());
                        next.push(target);
                    }
                }
            }

            if next.is_empty() || distance >= max_depth {
                return None;
            }
            distance += 1;
            frontier = next;
        }
    }

    /// Coerce `data` (held as `self`) into a new payload of type `to`.
    pub fn coerce(&self, to: &Type, data: &Data) -> Option<Payload> {
        self.try_coerce(to, data).ok()
    }

    /// Like [`Type::coerce`], reporting why a coercion failed.
    pub fn try_coerce(&self, to: &Type, data: &Data) -> Result<Payload, CoercionError> {
        self.try_coerce_within(to, data, DEFAULT_MAX_DEPTH)
    }

    /// Coerce with an explicit depth bound for both the path search and the
    /// expansion of `via` edges.
    pub fn try_coerce_within(
        &self,
        to: &Type,
        data: &Data,
        max_depth: u32,
    ) -> Result<Payload, CoercionError> {
        let mut fuel = max_depth;
        self.coerce_with_fuel(to, data, max_depth, &mut fuel)
    }

    fn coerce_with_fuel(
        &self,
        to: &Type,
        data: &Data,
        max_depth: u32,
        fuel: &mut u32,
    ) -> Result<Payload, CoercionError> {
        let path = self
            .coercion_path(to, max_depth)
            .ok_or_else(|| no_path(self, to))?;

        let mut source = self.clone();
        let mut current: Option<Payload> = None;
        for hop in path {
            let input = current.as_ref().map_or(data, Payload::data);
            let produced = source.apply_edge(&hop, input, max_depth, fuel)?;
            // Replacing the previous intermediate releases it.
            current = Some(produced);
            source = hop;
        }

        current.ok_or_else(|| no_path(self, to))
    }

    fn apply_edge(
        &self,
        to: &Type,
        input: &Data,
        max_depth: u32,
        fuel: &mut u32,
    ) -> Result<Payload, CoercionError> {
        let edge = self.0.coercions.read().edge(to).cloned();
        match edge {
            None => Err(no_path(self, to)),
            Some(Edge::Convert(convert)) => {
                tracing::trace!(from = %self, to = %to, "applying conversion");
                let converted = convert(input).ok_or_else(|| CoercionError::ConversionFailed {
                    from: Arc::clone(&self.0.name),
                    to: Arc::clone(&to.0.name),
                })?;
                let candidate = Payload::adopt(to.clone(), converted);
                if to.validate(candidate.data()) {
                    Ok(candidate)
                } else {
                    Err(CoercionError::Rejected {
                        to: Arc::clone(&to.0.name),
                    })
                }
            }
            Some(Edge::Via(via)) => {
                if *fuel == 0 {
                    return Err(CoercionError::DepthExceeded {
                        from: Arc::clone(&self.0.name),
                        to: Arc::clone(&to.0.name),
                    });
                }
                *fuel -= 1;
                tracing::trace!(from = %self, to = %to, via = %via, "routing coercion");
                let intermediate = self.coerce_with_fuel(&via, input, max_depth, fuel)?;
                via.coerce_with_fuel(to, intermediate.data(), max_depth, fuel)
            }
        }
    }
}

fn no_path(from: &Type, to: &Type) -> CoercionError {
    CoercionError::NoPath {
        from: Arc::clone(&from.0.name),
        to: Arc::clone(&to.0.name),
    }
}
