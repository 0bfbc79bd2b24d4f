//! ParameterResolver (§4.6): two depth-first, children-first sub-passes
//! over the scope tree built by `ScopeElaborator` — defparam
//! application, then value/width/sign evaluation. Grounded on
//! `net_design.cc`'s two-pass `elaborate_scope`/`evaluate_parameter`
//! walk, threaded through an explicit `Diagnostics` sink instead of
//! direct `cerr <<` the way the rest of this crate does.

use std::collections::HashSet;

use hdlelab_core::{Interner, Symbol};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::eval::{ConstValue, Evaluator, ExprType, ParamValue};
use crate::loc::SourceLoc;
use crate::resolve::{KindFilter, Resolver};
use crate::scope::{ParamSlot, ScopeArena, ScopeId};
use crate::trace::Tracer;


/// Drives both sub-passes of §4.6 over a fully scope-generated tree.
pub struct ParameterResolver<'a, E: Evaluator, T: Tracer> {
    arena: &'a mut ScopeArena<E>,
    interner: &'a Interner,
    evaluator: &'a E,
    tracer: &'a mut T,
    diagnostics: &'a mut Diagnostics,
    trace: bool,
}

impl<'a, E: Evaluator, T: Tracer> ParameterResolver<'a, E, T> {
    pub fn new(
        arena: &'a mut ScopeArena<E>,
        interner: &'a Interner,
        evaluator: &'a E,
        tracer: &'a mut T,
        diagnostics: &'a mut Diagnostics,
        trace: bool,
    ) -> Self {
        Self {
            arena,
            interner,
            evaluator,
            tracer,
            diagnostics,
            trace,
        }
    }

    /// Run sub-pass 1 (defparam application) then sub-pass 2
    /// (evaluation) over every root's subtree.
    pub fn resolve(&mut self) {
        let roots: Vec<ScopeId> = self.arena.roots().to_vec();
        for root in &roots {
            self.apply_defparams(*root);
        }
        for root in &roots {
            self.evaluate_scope(*root);
        }
    }

    fn children_of(&self, scope: ScopeId) -> Vec<ScopeId> {
        self.arena.get(scope).children.values().copied().collect()
    }

    /// Sub-pass 1: children-first application of `scope.defparam_inbox`.
    fn apply_defparams(&mut self, scope: ScopeId) {
        for child in self.children_of(scope) {
            self.apply_defparams(child);
        }

        let inbox = std::mem::take(&mut self.arena.get_mut(scope).defparam_inbox);
        if inbox.is_empty() {
            return;
        }
        let path = self.arena.render_path(scope, self.interner);
        let resolver = Resolver::new();
        let mut seen: HashSet<(ScopeId, Symbol)> = HashSet::new();

        for entry in inbox {
            let target = match resolver.find_relative_filtered(self.arena, scope, &entry.path, KindFilter::Any) {
                Some(t) => t,
                None => {
                    self.diagnostics
                        .report(
                            DiagnosticKind::UnknownScopePath,
                            format!(
                                "defparam target {} did not resolve",
                                entry.path.render(self.interner)
                            ),
                            entry.loc,
                        )
                        .at_scope(path.clone())
                        .emit();
                    continue;
                }
            };

            if !seen.insert((target, entry.tail)) {
                self.diagnostics
                    .report(
                        DiagnosticKind::DuplicateDefparam,
                        format!(
                            "parameter {} overridden by more than one defparam in this scope; last writer wins",
                            self.interner.resolve(entry.tail)
                        ),
                        entry.loc,
                    )
                    .at_scope(path.clone())
                    .emit();
            }

            let value = match self.evaluator.eval_tree(&entry.expr) {
                Some(v) => ParamValue::Constant(v),
                None => ParamValue::Elaborated(entry.expr.clone()),
            };

            if self.arena.replace_parameter(target, entry.tail, value) {
                if self.trace {
                    let target_path = self.arena.render_path(target, self.interner);
                    let name = self.interner.resolve(entry.tail);
                    self.tracer.parameter_replaced(&target_path, name);
                }
            } else {
                self.diagnostics
                    .report(
                        DiagnosticKind::UnknownOverrideTarget,
                        format!(
                            "defparam target has no parameter {}",
                            self.interner.resolve(entry.tail)
                        ),
                        entry.loc,
                    )
                    .at_scope(path.clone())
                    .emit();
            }
        }
    }

    /// Sub-pass 2: children-first evaluation of every parameter and
    /// localparam slot.
    fn evaluate_scope(&mut self, scope: ScopeId) {
        for child in self.children_of(scope) {
            self.evaluate_scope(child);
        }

        let path = self.arena.render_path(scope, self.interner);

        let mut parameters = std::mem::take(&mut self.arena.get_mut(scope).parameters);
        for (name, slot) in parameters.iter_mut() {
            evaluate_slot(self.evaluator, self.diagnostics, &path, *name, slot);
        }
        self.arena.get_mut(scope).parameters = parameters;

        let mut localparams = std::mem::take(&mut self.arena.get_mut(scope).localparams);
        for (name, slot) in localparams.iter_mut() {
            evaluate_slot(self.evaluator, self.diagnostics, &path, *name, slot);
        }
        self.arena.get_mut(scope).localparams = localparams;
    }
}

/// Apply §4.6 sub-pass 2's three steps to one slot.
fn evaluate_slot<E: Evaluator>(
    evaluator: &E,
    diagnostics: &mut Diagnostics,
    path: &str,
    name: Symbol,
    slot: &mut ParamSlot<E>,
) {
    evaluate_bound(evaluator, diagnostics, path, name, "msb", &mut slot.msb);
    evaluate_bound(evaluator, diagnostics, path, name, "lsb", &mut slot.lsb);

    // Capture the type while the value is still in parsed form; once
    // folded to a `Constant` the type is no longer recoverable from it.
    let ty = slot.value.as_parsed().map(|parsed| evaluator.expr_type(parsed));

    if !slot.value.is_constant() {
        if let Some(parsed) = slot.value.as_parsed().cloned() {
            match evaluator.eval_tree(&parsed) {
                Some(mut v) => {
                    if matches!(ty, Some(ExprType::Logic) | Some(ExprType::Bool))
                        && v.is_signed() != slot.signed
                    {
                        if let Some(width) = v.width() {
                            v = v.with_width_and_sign(width, slot.signed);
                        }
                    }
                    slot.value = ParamValue::Constant(v);
                }
                None => {
                    diagnostics
                        .report(
                            DiagnosticKind::UnevaluableParameter,
                            format!("parameter {:?} did not reduce to a constant", name),
                            SourceLoc::unknown(),
                        )
                        .at_scope(path)
                        .emit();
                }
            }
        }
    }

    // Step 3: width coercion against a declared [msb:lsb] range. A
    // REAL-typed value carrying a bit range is a type mismatch, not a
    // coercion target.
    if let (Some(msb), Some(lsb)) = (&slot.msb, &slot.lsb) {
        if let (Some(msb_c), Some(lsb_c)) = (msb.as_constant(), lsb.as_constant()) {
            if ty == Some(ExprType::Real) {
                diagnostics
                    .report(
                        DiagnosticKind::TypeMismatch,
                        format!(
                            "parameter {:?} declares a bit range but its expression is REAL",
                            name
                        ),
                        SourceLoc::unknown(),
                    )
                    .at_scope(path)
                    .emit();
            } else if let ParamValue::Constant(v) = &slot.value {
                let width = (msb_c.as_i64() - lsb_c.as_i64()).unsigned_abs() as u32 + 1;
                if v.width() != Some(width) || v.is_signed() != slot.signed {
                    slot.value = ParamValue::Constant(v.with_width_and_sign(width, slot.signed));
                }
            }
        }
    }
}

fn evaluate_bound<E: Evaluator>(
    evaluator: &E,
    diagnostics: &mut Diagnostics,
    path: &str,
    name: Symbol,
    which: &str,
    bound: &mut Option<ParamValue<E>>,
) {
    let Some(pv) = bound else { return };
    if pv.is_constant() {
        return;
    }
    let Some(parsed) = pv.as_parsed().cloned() else {
        return;
    };
    match evaluator.eval_tree(&parsed) {
        Some(v) => *bound = Some(ParamValue::Constant(v)),
        None => {
            diagnostics
                .report(
                    DiagnosticKind::UnevaluableParameter,
                    format!("{which} of parameter {name:?} did not reduce to a constant"),
                    SourceLoc::unknown(),
                )
                .at_scope(path)
                .emit();
        }
    }
}
