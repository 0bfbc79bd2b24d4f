//! `Design` (§6): the facade that ties scope generation and parameter
//! resolution into one run, owning the long-lived state (`ScopeArena`,
//! `Interner`, `Diagnostics`, `ElabConfig`) while the external
//! collaborators (`Evaluator`, `ModuleLookup`, `Tracer`) are supplied
//! per call, the way `plotnik_lib::Query` owns its `SourceMap` but
//! takes a grammar/language by reference.

use indexmap::IndexMap;

use hdlelab_core::{Interner, NameComponent};

use crate::config::ElabConfig;
use crate::decl::ModuleDecl;
use crate::diagnostics::Diagnostics;
use crate::elaborate::{ModuleLookup, ScopeElaborator};
use crate::eval::Evaluator;
use crate::params::ParameterResolver;
use crate::scope::{ScopeArena, ScopeId};
use crate::trace::Tracer;
use crate::Error;


/// One elaboration run's worth of state: the scope tree under
/// construction, the interner its symbols belong to, and every
/// diagnostic raised so far.
pub struct Design<E: Evaluator> {
    arena: ScopeArena<E>,
    interner: Interner,
    diagnostics: Diagnostics,
    config: ElabConfig,
}

impl<E: Evaluator> Design<E> {
    pub fn new(interner: Interner, config: ElabConfig) -> Self {
        Self {
            arena: ScopeArena::new(),
            interner,
            diagnostics: Diagnostics::new(),
            config,
        }
    }

    pub fn arena(&self) -> &ScopeArena<E> {
        &self.arena
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// `des->errors`: the running error count spec.md's failure
    /// semantics (§4.7) are defined against.
    pub fn errors(&self) -> usize {
        self.diagnostics.error_count()
    }

    pub fn root_scopes(&self) -> &[ScopeId] {
        self.arena.roots()
    }

    /// Elaborate `decl` as a new root module, then resolve its
    /// parameters to completion. Returns the new root's `ScopeId`;
    /// check `errors()` afterward for failure, since scope generation
    /// and parameter resolution both accumulate into the same
    /// diagnostics sink rather than aborting on non-fatal findings.
    pub fn elaborate_root<T: Tracer, L: ModuleLookup<E>>(
        &mut self,
        decl: &ModuleDecl<E>,
        evaluator: &E,
        lookup: &L,
        tracer: &mut T,
    ) -> Result<ScopeId, Error> {
        let root = self.arena.new_root(NameComponent::new(decl.type_name), decl.type_name);
        {
            let mut elaborator = ScopeElaborator::new(
                &mut self.arena,
                &self.interner,
                evaluator,
                tracer,
                &mut self.diagnostics,
                lookup,
                self.config,
            );
            elaborator.elaborate_module(decl, root, &IndexMap::new())?;
        }
        let mut resolver = ParameterResolver::new(
            &mut self.arena,
            &self.interner,
            evaluator,
            tracer,
            &mut self.diagnostics,
            self.config.trace,
        );
        resolver.resolve();
        Ok(root)
    }
}
