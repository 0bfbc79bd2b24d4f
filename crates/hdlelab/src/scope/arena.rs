use indexmap::IndexMap;

use hdlelab_core::{HierName, Interner, NameComponent, Symbol};

use super::{DefparamEntry, ParamSlot, ScopeKind};
use crate::decl::DefaultNetType;
use crate::eval::{Evaluator, ParamValue};
use crate::loc::SourceLoc;

/// Stable handle into a `ScopeArena`. Cheap to copy, never reused after
/// being freed because scopes are never freed individually (§5:
/// "destroying a parent destroys the subtree" happens only by dropping
/// the whole arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// A signal or named event recorded in a scope. Signal/net elaboration
/// itself is out of scope; this only carries enough to make
/// `find_signal` and `add_event` meaningful.
#[derive(Debug, Clone)]
pub struct Entity {
    pub name: Symbol,
    pub loc: SourceLoc,
}

/// One node of the design tree (§3's `Scope`).
#[derive(Debug, Clone)]
pub struct ScopeData<E: Evaluator> {
    pub name: NameComponent,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: IndexMap<NameComponent, ScopeId>,
    pub module_type_name: Option<Symbol>,
    pub time_unit: i32,
    pub time_precision: i32,
    pub parameters: IndexMap<Symbol, ParamSlot<E>>,
    pub localparams: IndexMap<Symbol, ParamSlot<E>>,
    pub defparam_inbox: Vec<DefparamEntry<E>>,
    pub signals: IndexMap<Symbol, Entity>,
    pub events: IndexMap<Symbol, Entity>,
    pub instance_arrays: IndexMap<Symbol, Vec<ScopeId>>,
    pub genvar_tmp: Option<Symbol>,
    pub genvar_tmp_val: Option<E::Value>,
    pub default_nettype: DefaultNetType,
    pub attributes: IndexMap<Symbol, Vec<E::Parsed>>,
}

impl<E: Evaluator> ScopeData<E> {
    fn new(name: NameComponent, kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            name,
            kind,
            parent,
            children: IndexMap::new(),
            module_type_name: None,
            time_unit: 0,
            time_precision: 0,
            parameters: IndexMap::new(),
            localparams: IndexMap::new(),
            defparam_inbox: Vec::new(),
            signals: IndexMap::new(),
            events: IndexMap::new(),
            instance_arrays: IndexMap::new(),
            genvar_tmp: None,
            genvar_tmp_val: None,
            default_nettype: DefaultNetType::default(),
            attributes: IndexMap::new(),
        }
    }

    pub fn child(&self, name: NameComponent) -> Option<ScopeId> {
        self.children.get(&name).copied()
    }

    pub fn find_signal(&self, name: Symbol) -> Option<&Entity> {
        self.signals.get(&name)
    }
}

/// Raised by `new_child` when `name` already names a child of `parent`
/// (§3 invariant: child keys within a scope are unique).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateScope;

/// Owns every scope ever created during one elaboration run.
///
/// Scopes are created by `ScopeElaborator` and never individually
/// destroyed (§3 Lifecycle); the arena itself is dropped as a unit at
/// the end of a run, which is what makes the non-owning `parent`
/// index safe without any liveness bookkeeping.
#[derive(Debug)]
pub struct ScopeArena<E: Evaluator> {
    scopes: Vec<ScopeData<E>>,
    roots: Vec<ScopeId>,
}

impl<E: Evaluator> Default for ScopeArena<E> {
    fn default() -> Self {
        Self {
            scopes: Vec::new(),
            roots: Vec::new(),
        }
    }
}

impl<E: Evaluator> ScopeArena<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &[ScopeId] {
        &self.roots
    }

    pub fn get(&self, id: ScopeId) -> &ScopeData<E> {
        &self.scopes[id.0]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut ScopeData<E> {
        &mut self.scopes[id.0]
    }

    /// `new_root(name, type_name) → Scope`.
    pub fn new_root(&mut self, name: NameComponent, type_name: Symbol) -> ScopeId {
        let mut data = ScopeData::new(name, ScopeKind::Module, None);
        data.module_type_name = Some(type_name);
        let id = ScopeId(self.scopes.len());
        self.scopes.push(data);
        self.roots.push(id);
        id
    }

    /// `new_child(parent, name, kind) → Scope`, failing with
    /// `DuplicateScope` if `name` is already a child of `parent`.
    pub fn new_child(
        &mut self,
        parent: ScopeId,
        name: NameComponent,
        kind: ScopeKind,
    ) -> Result<ScopeId, DuplicateScope> {
        if self.get(parent).children.contains_key(&name) {
            return Err(DuplicateScope);
        }
        let data = ScopeData::new(name, kind, Some(parent));
        let id = ScopeId(self.scopes.len());
        self.scopes.push(data);
        self.get_mut(parent).children.insert(name, id);
        Ok(id)
    }

    /// `set_parameter(scope, symbol, value, msb, lsb, signed)`; returns
    /// the slot previously at `symbol`, if any. Idempotent with respect
    /// to elaboration order: called first with a placeholder, later
    /// with the lexically-elaborated form.
    pub fn set_parameter(
        &mut self,
        scope: ScopeId,
        symbol: Symbol,
        value: ParamValue<E>,
        msb: Option<ParamValue<E>>,
        lsb: Option<ParamValue<E>>,
        signed: bool,
        origin: SourceLoc,
    ) -> Option<ParamSlot<E>> {
        let slot = ParamSlot {
            value,
            msb,
            lsb,
            signed,
            origin,
        };
        self.get_mut(scope).parameters.insert(symbol, slot)
    }

    /// `replace_parameter(scope, symbol, new_value) → bool`: only
    /// succeeds if `symbol` already names a parameter of `scope`.
    pub fn replace_parameter(
        &mut self,
        scope: ScopeId,
        symbol: Symbol,
        new_value: ParamValue<E>,
    ) -> bool {
        match self.get_mut(scope).parameters.get_mut(&symbol) {
            Some(slot) => {
                slot.value = new_value;
                true
            }
            None => false,
        }
    }

    pub fn set_localparam(
        &mut self,
        scope: ScopeId,
        symbol: Symbol,
        value: ParamValue<E>,
        msb: Option<ParamValue<E>>,
        lsb: Option<ParamValue<E>>,
        signed: bool,
        origin: SourceLoc,
    ) -> Option<ParamSlot<E>> {
        let slot = ParamSlot {
            value,
            msb,
            lsb,
            signed,
            origin,
        };
        self.get_mut(scope).localparams.insert(symbol, slot)
    }

    pub fn add_event(&mut self, scope: ScopeId, name: Symbol, loc: SourceLoc) {
        self.get_mut(scope).events.insert(name, Entity { name, loc });
    }

    pub fn add_signal(&mut self, scope: ScopeId, name: Symbol, loc: SourceLoc) {
        self.get_mut(scope).signals.insert(name, Entity { name, loc });
    }

    pub fn child(&self, scope: ScopeId, name: NameComponent) -> Option<ScopeId> {
        self.get(scope).child(name)
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.get(scope).parent
    }

    /// The sequence of `name` components from the root to `scope`,
    /// inclusive (§6: "Scope-path rendering").
    pub fn path(&self, scope: ScopeId) -> HierName {
        let mut components = Vec::new();
        let mut cur = Some(scope);
        while let Some(id) = cur {
            let data = self.get(id);
            components.push(data.name);
            cur = data.parent;
        }
        components.reverse();
        HierName::from_components(components)
    }

    pub fn render_path(&self, scope: ScopeId, interner: &Interner) -> String {
        self.path(scope).render(interner)
    }

    /// Whether any MODULE ancestor of `scope` (inclusive) shares
    /// `module_type`. Used by the recursive-instantiation check (§4.5.2
    /// step 3) before a scope for `module_type` is created, so `scope`
    /// here is the *prospective parent*, not the new instance itself.
    pub fn has_module_ancestor_of_type(&self, scope: ScopeId, module_type: Symbol) -> bool {
        let mut cur = Some(scope);
        while let Some(id) = cur {
            let data = self.get(id);
            if data.kind.is_module() && data.module_type_name == Some(module_type) {
                return true;
            }
            cur = data.parent;
        }
        false
    }
}
