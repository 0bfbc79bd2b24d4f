//! The scope-generation pass (§4.5): walks a module body and
//! materializes the scope tree, recording placeholder parameters and
//! deferring defparam application and final constant-folding to the
//! `ParameterResolver` pass that follows.
//!
//! Grounded on `elab_scope.cc`'s `NetScope::elaborate_scope`, which
//! performs the same ten ordered steps against a mutable `NetScope`
//! tree; this version threads an explicit fuel/recursion budget
//! instead of the original's unit-less loop guards.

mod generate;
mod instantiate;
#[cfg(test)]
mod tests;

use indexmap::IndexMap;

use hdlelab_core::{Interner, NameComponent, Symbol};

use crate::config::ElabConfig;
use crate::decl::ModuleDecl;
use crate::decl::Statement;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::eval::{ConstValue, Evaluator, ParamValue};
use crate::loc::SourceLoc;
use crate::resolve::ScopeCursor;
use crate::scope::{ScopeArena, ScopeId, ScopeKind};
use crate::trace::Tracer;
use crate::Error;

pub use instantiate::{normalize_overrides, ModuleLookup};

/// Drives one elaboration run, owning the fuel/recursion counters and
/// the diagnostics sink shared across every module elaborated in it.
/// `L` resolves a module-type symbol to its declaration — the
/// front-end's module registry, kept outside this core per §9.
pub struct ScopeElaborator<'a, E: Evaluator, T: Tracer, L: ModuleLookup<E>> {
    pub(crate) arena: &'a mut ScopeArena<E>,
    pub(crate) interner: &'a Interner,
    pub(crate) evaluator: &'a E,
    pub(crate) tracer: &'a mut T,
    pub(crate) diagnostics: &'a mut Diagnostics,
    pub(crate) lookup: &'a L,
    config: ElabConfig,
    generate_fuel_used: u32,
    recursion_depth: u32,
}

impl<'a, E: Evaluator, T: Tracer, L: ModuleLookup<E>> ScopeElaborator<'a, E, T, L> {
    pub fn new(
        arena: &'a mut ScopeArena<E>,
        interner: &'a Interner,
        evaluator: &'a E,
        tracer: &'a mut T,
        diagnostics: &'a mut Diagnostics,
        lookup: &'a L,
        config: ElabConfig,
    ) -> Self {
        Self {
            arena,
            interner,
            evaluator,
            tracer,
            diagnostics,
            lookup,
            config,
            generate_fuel_used: 0,
            recursion_depth: 0,
        }
    }

    pub(crate) fn path_str(&self, scope: ScopeId) -> String {
        self.arena.render_path(scope, self.interner)
    }

    pub(crate) fn config_trace(&self) -> bool {
        self.config.trace
    }

    fn enter_recursion(&mut self) -> Result<(), Error> {
        self.recursion_depth += 1;
        if self.recursion_depth > self.config.recursion_limit {
            return Err(Error::RecursionLimitExceeded(self.config.recursion_limit));
        }
        Ok(())
    }

    fn exit_recursion(&mut self) {
        self.recursion_depth -= 1;
    }

    pub(crate) fn consume_generate_fuel(&mut self) -> Result<(), Error> {
        self.generate_fuel_used += 1;
        if self.generate_fuel_used > self.config.generate_fuel {
            return Err(Error::GenerateFuelExhausted(self.config.generate_fuel));
        }
        Ok(())
    }

    fn cursor(&self, scope: ScopeId) -> ScopeCursor<'_, E> {
        ScopeCursor::new(self.arena, scope)
    }

    /// Lexically elaborate `expr` against `scope`, without attempting
    /// to fold it to a constant. Returns `None` (and leaves it to the
    /// caller to diagnose) if the evaluator itself fails.
    pub(crate) fn elaborate(&self, expr: &E::Parsed, scope: ScopeId) -> Option<E::Parsed> {
        self.evaluator.elaborate_pexpr(expr, self.cursor(scope))
    }

    /// Lexically elaborate, then opportunistically fold to a constant;
    /// callers that need `signed`/width info this early treat a
    /// successful fold as authoritative and otherwise fall back to a
    /// lexically-elaborated, not-yet-constant slot.
    pub(crate) fn elaborate_and_maybe_fold(
        &self,
        expr: &E::Parsed,
        scope: ScopeId,
    ) -> Option<ParamValue<E>> {
        let elaborated = self.elaborate(expr, scope)?;
        match self.evaluator.eval_tree(&elaborated) {
            Some(v) => Some(ParamValue::Constant(v)),
            None => Some(ParamValue::Elaborated(elaborated)),
        }
    }

    /// Entry point (§4.5): elaborate `decl` into `scope`, which must
    /// already exist (created by the caller — the top-level design
    /// object for a root module, or `instantiate` for a sub-module).
    /// `overrides` carries the instance-site parameter overrides,
    /// already normalized to a symbol→expression map; empty for root
    /// modules.
    pub fn elaborate_module(
        &mut self,
        decl: &ModuleDecl<E>,
        scope: ScopeId,
        overrides: &IndexMap<Symbol, E::Parsed>,
    ) -> Result<bool, Error> {
        self.enter_recursion()?;
        let result = self.elaborate_module_inner(decl, scope, overrides);
        self.exit_recursion();
        result
    }

    fn elaborate_module_inner(
        &mut self,
        decl: &ModuleDecl<E>,
        scope: ScopeId,
        overrides: &IndexMap<Symbol, E::Parsed>,
    ) -> Result<bool, Error> {
        if self.config.trace {
            let path = self.path_str(scope);
            self.tracer.scope_entered(&path);
        }
        let errors_before = self.diagnostics.error_count();

        {
            let data = self.arena.get_mut(scope);
            data.time_unit = decl.time_unit;
            data.time_precision = decl.time_precision;
            data.default_nettype = decl.default_nettype;
            for (name, exprs) in &decl.attributes {
                data.attributes.insert(*name, exprs.clone());
            }
        }

        // Step 1: placeholder parameters.
        for p in &decl.parameters {
            self.arena.set_parameter(
                scope,
                p.name,
                ParamValue::Placeholder(p.expr.clone()),
                p.msb.clone().map(ParamValue::Placeholder),
                p.lsb.clone().map(ParamValue::Placeholder),
                p.signed,
                p.loc,
            );
        }
        for p in &decl.localparams {
            self.arena.set_localparam(
                scope,
                p.name,
                ParamValue::Placeholder(p.expr.clone()),
                p.msb.clone().map(ParamValue::Placeholder),
                p.lsb.clone().map(ParamValue::Placeholder),
                p.signed,
                p.loc,
            );
        }

        // Step 2: parameter elaboration, in declaration order.
        for p in &decl.parameters {
            let value = match self.elaborate_and_maybe_fold(&p.expr, scope) {
                Some(v) => v,
                None => {
                    self.diagnostics
                        .report(
                            DiagnosticKind::ParseAssumptionViolated,
                            format!("parameter {:?} initializer failed to elaborate", p.name),
                            p.loc,
                        )
                        .at_scope(self.path_str(scope))
                        .emit();
                    continue;
                }
            };
            let msb = match &p.msb {
                Some(e) => self.elaborate_and_maybe_fold(e, scope),
                None => None,
            };
            let lsb = match &p.lsb {
                Some(e) => self.elaborate_and_maybe_fold(e, scope),
                None => None,
            };
            let signed = if p.signed {
                true
            } else if p.msb.is_some() {
                false
            } else if let ParamValue::Constant(v) = &value {
                v.is_signed()
            } else {
                false
            };
            self.arena.set_parameter(scope, p.name, value, msb, lsb, signed, p.loc);
        }

        // Step 3: instance overrides, elaborated against the *parent*.
        let parent = self.arena.parent(scope);
        for (name, expr) in overrides.iter() {
            let parent_scope = match parent {
                Some(p) => p,
                None => scope,
            };
            let elaborated = self.elaborate(expr, parent_scope);
            match elaborated {
                Some(e) => {
                    let value = match self.evaluator.eval_tree(&e) {
                        Some(v) => ParamValue::Constant(v),
                        None => ParamValue::Elaborated(e),
                    };
                    if !self.arena.replace_parameter(scope, *name, value) {
                        self.diagnostics
                            .report(
                                DiagnosticKind::UnknownOverrideTarget,
                                format!("no parameter {:?} to override", name),
                                SourceLoc::unknown(),
                            )
                            .at_scope(self.path_str(scope))
                            .emit();
                    }
                }
                None => {
                    self.diagnostics
                        .report(
                            DiagnosticKind::UnknownOverrideTarget,
                            format!("override expression for {:?} failed to elaborate", name),
                            SourceLoc::unknown(),
                        )
                        .at_scope(self.path_str(scope))
                        .emit();
                }
            }
        }

        // Step 4: localparam elaboration; signedness only from the declaration.
        for p in &decl.localparams {
            let value = match self.elaborate_and_maybe_fold(&p.expr, scope) {
                Some(v) => v,
                None => {
                    self.diagnostics
                        .report(
                            DiagnosticKind::ParseAssumptionViolated,
                            format!("localparam {:?} initializer failed to elaborate", p.name),
                            p.loc,
                        )
                        .at_scope(self.path_str(scope))
                        .emit();
                    continue;
                }
            };
            let msb = match &p.msb {
                Some(e) => self.elaborate_and_maybe_fold(e, scope),
                None => None,
            };
            let lsb = match &p.lsb {
                Some(e) => self.elaborate_and_maybe_fold(e, scope),
                None => None,
            };
            self.arena
                .set_localparam(scope, p.name, value, msb, lsb, p.signed, p.loc);
        }

        // Step 5: defparam staging.
        for dp in &decl.defparams {
            let mut path = dp.target.clone();
            let tail = match path.pop_tail() {
                Some(t) => t,
                None => {
                    self.diagnostics
                        .report(
                            DiagnosticKind::ParseAssumptionViolated,
                            "defparam with empty target path",
                            dp.loc,
                        )
                        .at_scope(self.path_str(scope))
                        .emit();
                    continue;
                }
            };
            let elaborated = match self.elaborate(&dp.expr, scope) {
                Some(e) => e,
                None => {
                    self.diagnostics
                        .report(
                            DiagnosticKind::ParseAssumptionViolated,
                            "defparam expression failed to elaborate",
                            dp.loc,
                        )
                        .at_scope(self.path_str(scope))
                        .emit();
                    continue;
                }
            };
            self.arena
                .get_mut(scope)
                .defparam_inbox
                .push(crate::scope::DefparamEntry {
                    path,
                    tail: tail.peek_name(),
                    expr: elaborated,
                    loc: dp.loc,
                });
        }

        // Step 6: generate schemes.
        for scheme in &decl.generates {
            generate::elaborate_generate_scheme(self, scheme, scope)?;
        }

        // Step 7: tasks and functions.
        for tf in &decl.tasks_functions {
            let name = NameComponent::new(tf.name);
            match self.arena.new_child(scope, name, tf.kind) {
                Ok(child) => {
                    for stmt in &tf.body {
                        self.elaborate_statement(stmt, child)?;
                    }
                }
                Err(_) => {
                    self.diagnostics
                        .report(
                            DiagnosticKind::DuplicateScope,
                            format!("duplicate task/function {:?}", tf.name),
                            tf.loc,
                        )
                        .at_scope(self.path_str(scope))
                        .emit();
                }
            }
        }

        // Step 8: sub-module instantiations.
        for inst in &decl.instances {
            instantiate::elaborate_instance(self, inst, scope)?;
        }

        // Step 9: behavioral statements.
        for stmt in &decl.statements {
            self.elaborate_statement(stmt, scope)?;
        }

        // Step 10: named events.
        for ev in &decl.events {
            self.arena.add_event(scope, *ev, SourceLoc::unknown());
        }

        Ok(self.diagnostics.error_count() == errors_before)
    }

    /// Statement descent (§4.5 step 9, §9 design note): a pattern match
    /// over statement variants, creating a BEGIN_END/FORK_JOIN child
    /// only for a *named* block.
    fn elaborate_statement(&mut self, stmt: &Statement<E>, scope: ScopeId) -> Result<(), Error> {
        match stmt {
            Statement::Block { label, is_fork, body } => {
                let child_scope = match label {
                    Some(name) => {
                        let kind = if *is_fork {
                            ScopeKind::ForkJoin
                        } else {
                            ScopeKind::BeginEnd
                        };
                        match self.arena.new_child(scope, NameComponent::new(*name), kind) {
                            Ok(child) => child,
                            Err(_) => {
                                self.diagnostics
                                    .report(
                                        DiagnosticKind::DuplicateScope,
                                        format!("duplicate named block {:?}", name),
                                        SourceLoc::unknown(),
                                    )
                                    .at_scope(self.path_str(scope))
                                    .emit();
                                scope
                            }
                        }
                    }
                    None => scope,
                };
                for s in body {
                    self.elaborate_statement(s, child_scope)?;
                }
            }
            Statement::If { then_branch, else_branch } => {
                self.elaborate_statement(then_branch, scope)?;
                if let Some(e) = else_branch {
                    self.elaborate_statement(e, scope)?;
                }
            }
            Statement::Case { arms } => {
                for arm in arms {
                    self.elaborate_statement(arm, scope)?;
                }
            }
            Statement::Loop { body } => {
                self.elaborate_statement(body, scope)?;
            }
            Statement::Leaf => {}
        }
        Ok(())
    }
}
