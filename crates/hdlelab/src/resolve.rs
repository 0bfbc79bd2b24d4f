//! The hierarchical-name resolver (§4.4).
//!
//! Grounded on `net_design.cc`'s two `find_scope` overloads: one that
//! walks down from a root by exact component match (Absolute), one
//! that climbs the ancestor chain looking for either a plain child or
//! a module-type up-reference before falling back to Absolute
//! (Relative).

#[cfg(test)]
mod tests;

use hdlelab_core::{HierName, Symbol};

use crate::eval::{ConstValue, Evaluator, ParamValue};
use crate::scope::{ScopeArena, ScopeId, ScopeKind};

/// An optional filter on the resolved node's kind, used by callers that
/// only want e.g. a MODULE result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFilter {
    Any,
    Only(ScopeKind),
}

impl KindFilter {
    fn accepts(self, kind: ScopeKind) -> bool {
        match self {
            KindFilter::Any => true,
            KindFilter::Only(k) => k == kind,
        }
    }
}

/// Stateless lookup algorithm over a `ScopeArena`. Holds no data of its
/// own; every method takes the arena and scope explicitly; this mirrors
/// the original's free functions operating on `NetScope*`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Resolver;

impl Resolver {
    pub fn new() -> Self {
        Self
    }

    /// Absolute lookup: the root scope whose `name == p.front()`, then
    /// descend via `child` for each remaining component.
    pub fn find_absolute<E: Evaluator>(
        &self,
        arena: &ScopeArena<E>,
        path: &HierName,
    ) -> Option<ScopeId> {
        self.find_absolute_filtered(arena, path, KindFilter::Any)
    }

    pub fn find_absolute_filtered<E: Evaluator>(
        &self,
        arena: &ScopeArena<E>,
        path: &HierName,
        filter: KindFilter,
    ) -> Option<ScopeId> {
        let head = path.front()?;
        let mut cur = arena
            .roots()
            .iter()
            .copied()
            .find(|&r| arena.get(r).name == *head)?;
        for component in &path.components()[1..] {
            cur = arena.child(cur, *component)?;
        }
        if filter.accepts(arena.get(cur).kind) {
            Some(cur)
        } else {
            None
        }
    }

    /// Relative lookup starting at `scope`: climb `scope, parent(scope),
    /// parent²(scope), …`. At each ancestor, either interpret `path`'s
    /// head as a module-type up-reference (if the ancestor is a MODULE
    /// whose `module_type_name` matches and either the filter demands a
    /// MODULE result or the path has more than one component) or
    /// descend via `child`. Falls back to Absolute if no ancestor
    /// yields a match.
    pub fn find_relative<E: Evaluator>(
        &self,
        arena: &ScopeArena<E>,
        scope: ScopeId,
        path: &HierName,
    ) -> Option<ScopeId> {
        self.find_relative_filtered(arena, scope, path, KindFilter::Any)
    }

    pub fn find_relative_filtered<E: Evaluator>(
        &self,
        arena: &ScopeArena<E>,
        scope: ScopeId,
        path: &HierName,
        filter: KindFilter,
    ) -> Option<ScopeId> {
        let head = path.front()?;
        let mut cursor = Some(scope);
        while let Some(anc) = cursor {
            let data = arena.get(anc);
            let is_module_up_reference = data.kind.is_module()
                && data.module_type_name == Some(head.peek_name())
                && (matches!(filter, KindFilter::Only(ScopeKind::Module)) || path.len() > 1);

            let descended = if is_module_up_reference {
                self.descend(arena, anc, &path.tail())
            } else {
                self.descend(arena, anc, path)
            };

            if let Some(found) = descended {
                if filter.accepts(arena.get(found).kind) {
                    return Some(found);
                }
            }
            cursor = arena.parent(anc);
        }
        self.find_absolute_filtered(arena, path, filter)
    }

    /// Descend from `start` through `path`'s components via `child`.
    /// `path` may be empty, in which case `start` itself is returned.
    fn descend<E: Evaluator>(
        &self,
        arena: &ScopeArena<E>,
        start: ScopeId,
        path: &HierName,
    ) -> Option<ScopeId> {
        let mut cur = start;
        for component in path.components() {
            cur = arena.child(cur, *component)?;
        }
        Some(cur)
    }
}

/// A read-only facade over one scope, handed to `Evaluator::elaborate_pexpr`
/// so the external evaluator can resolve identifiers without taking a
/// dependency on `ScopeArena`'s full mutable API.
#[derive(Clone, Copy)]
pub struct ScopeCursor<'a, E: Evaluator> {
    arena: &'a ScopeArena<E>,
    scope: ScopeId,
}

impl<'a, E: Evaluator> ScopeCursor<'a, E> {
    pub fn new(arena: &'a ScopeArena<E>, scope: ScopeId) -> Self {
        Self { arena, scope }
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn arena(&self) -> &'a ScopeArena<E> {
        self.arena
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new()
    }

    /// Resolve a hierarchical path against this scope using the
    /// Relative algorithm (§4.4).
    pub fn resolve(&self, path: &HierName) -> Option<ScopeId> {
        Resolver::new().find_relative(self.arena, self.scope, path)
    }

    /// Look up `name` as a parameter or localparam of this scope, or of
    /// an ancestor scope if not found locally, returning its value if
    /// it has already reached the constant state. Used by test
    /// fixtures standing in for a front-end's own identifier binding;
    /// a real evaluator is free to implement richer rules.
    pub fn lookup_local_constant(&self, name: Symbol) -> Option<E::Value> {
        let mut cursor = Some(self.scope);
        while let Some(id) = cursor {
            let data = self.arena.get(id);
            if data.genvar_tmp == Some(name) {
                if let Some(v) = &data.genvar_tmp_val {
                    return Some(v.clone());
                }
            }
            if let Some(slot) = data.parameters.get(&name).or_else(|| data.localparams.get(&name)) {
                if let ParamValue::Constant(v) = &slot.value {
                    return Some(v.clone());
                }
            }
            cursor = data.parent;
        }
        None
    }
}

/// `find_scope(path(s)) == s` for every scope `s` reachable from a
/// root (§8: name-resolution round-trip). Exposed as a free function
/// since it is a property of the whole arena, not of one resolver
/// call.
pub fn path_of<E: Evaluator>(arena: &ScopeArena<E>, scope: ScopeId) -> HierName {
    arena.path(scope)
}
