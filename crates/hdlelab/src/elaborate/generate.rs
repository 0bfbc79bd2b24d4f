//! Generate schemes (§4.5.1): loop, conditional-if, conditional-else.

use hdlelab_core::NameComponent;

use crate::decl::{GenerateBody, GenerateKind, GenerateScheme};
use crate::diagnostics::DiagnosticKind;
use crate::eval::{ConstValue, Evaluator, ParamValue};
use crate::scope::ScopeKind;
use crate::trace::Tracer;
use crate::Error;

use super::ScopeElaborator;

/// Lexically elaborate then fold `expr` against `scope`; on any
/// failure, diagnose as `UnevaluableGenvar` and return `None` so the
/// caller can abandon this generate scheme without aborting the
/// enclosing module.
fn eval_required<E: Evaluator, T: Tracer, L: super::ModuleLookup<E>>(
    elaborator: &mut ScopeElaborator<'_, E, T, L>,
    expr: &E::Parsed,
    scope: crate::scope::ScopeId,
    what: &str,
) -> Option<E::Value> {
    let elaborated = elaborator.elaborate(expr, scope)?;
    match elaborator.evaluator.eval_tree(&elaborated) {
        Some(v) => Some(v),
        None => {
            elaborator
                .diagnostics
                .report(
                    DiagnosticKind::UnevaluableGenvar,
                    format!("generate {what} did not reduce to a constant"),
                    crate::loc::SourceLoc::unknown(),
                )
                .at_scope(elaborator.path_str(scope))
                .emit();
            None
        }
    }
}

pub(super) fn elaborate_generate_scheme<E: Evaluator, T: Tracer, L: super::ModuleLookup<E>>(
    elaborator: &mut ScopeElaborator<'_, E, T, L>,
    scheme: &GenerateScheme<E>,
    scope: crate::scope::ScopeId,
) -> Result<(), Error> {
    match &scheme.kind {
        GenerateKind::Loop { genvar, init, test, step } => {
            elaborate_loop(elaborator, scheme, *genvar, init, test, step, scope)
        }
        GenerateKind::ConditionalIf { test } => {
            elaborate_conditional(elaborator, scheme, test, true, scope)
        }
        GenerateKind::ConditionalElse { test } => {
            elaborate_conditional(elaborator, scheme, test, false, scope)
        }
    }
}

fn elaborate_loop<E: Evaluator, T: Tracer, L: super::ModuleLookup<E>>(
    elaborator: &mut ScopeElaborator<'_, E, T, L>,
    scheme: &GenerateScheme<E>,
    genvar: hdlelab_core::Symbol,
    init: &E::Parsed,
    test: &E::Parsed,
    step: &E::Parsed,
    scope: crate::scope::ScopeId,
) -> Result<(), Error> {
    let Some(init_v) = eval_required(elaborator, init, scope, "init") else {
        return Ok(());
    };
    {
        let data = elaborator.arena.get_mut(scope);
        data.genvar_tmp = Some(genvar);
        data.genvar_tmp_val = Some(init_v);
    }

    loop {
        let Some(test_v) = eval_required(elaborator, test, scope, "test") else {
            clear_genvar(elaborator, scope);
            return Ok(());
        };
        if test_v.is_zero() {
            break;
        }
        elaborator.consume_generate_fuel()?;

        let current = elaborator
            .arena
            .get(scope)
            .genvar_tmp_val
            .clone()
            .expect("genvar_tmp_val set before loop body");
        let idx = current.as_i64() as i32;
        let child_name = NameComponent::with_index(scheme.label, idx);

        match elaborator.arena.new_child(scope, child_name, ScopeKind::Genblock) {
            Ok(child) => {
                elaborator.arena.set_localparam(
                    child,
                    genvar,
                    ParamValue::Constant(current.clone()),
                    None,
                    None,
                    false,
                    crate::loc::SourceLoc::unknown(),
                );
                if elaborator.config_trace() {
                    let label = elaborator.interner.resolve(scheme.label).to_string();
                    elaborator.tracer.generate_iteration(&label, idx as i64);
                }
                elaborate_generate_body(elaborator, &scheme.body, child)?;
            }
            Err(_) => {
                elaborator
                    .diagnostics
                    .report(
                        DiagnosticKind::DuplicateScope,
                        "duplicate generate-loop iteration name",
                        crate::loc::SourceLoc::unknown(),
                    )
                    .at_scope(elaborator.path_str(scope))
                    .emit();
            }
        }

        let Some(stepped) = eval_required(elaborator, step, scope, "step") else {
            clear_genvar(elaborator, scope);
            return Ok(());
        };
        elaborator.arena.get_mut(scope).genvar_tmp_val = Some(stepped);
    }

    clear_genvar(elaborator, scope);
    Ok(())
}

fn clear_genvar<E: Evaluator, T: Tracer, L: super::ModuleLookup<E>>(
    elaborator: &mut ScopeElaborator<'_, E, T, L>,
    scope: crate::scope::ScopeId,
) {
    let data = elaborator.arena.get_mut(scope);
    data.genvar_tmp = None;
    data.genvar_tmp_val = None;
}

fn elaborate_conditional<E: Evaluator, T: Tracer, L: super::ModuleLookup<E>>(
    elaborator: &mut ScopeElaborator<'_, E, T, L>,
    scheme: &GenerateScheme<E>,
    test: &E::Parsed,
    wants_nonzero: bool,
    scope: crate::scope::ScopeId,
) -> Result<(), Error> {
    let Some(test_v) = eval_required(elaborator, test, scope, "condition") else {
        return Ok(());
    };
    let taken = !test_v.is_zero() == wants_nonzero;
    if elaborator.config_trace() {
        let label = elaborator.interner.resolve(scheme.label).to_string();
        elaborator.tracer.generate_condition(&label, taken);
    }
    if !taken {
        return Ok(());
    }
    let child_name = NameComponent::new(scheme.label);
    match elaborator.arena.new_child(scope, child_name, ScopeKind::Genblock) {
        Ok(child) => elaborate_generate_body(elaborator, &scheme.body, child),
        Err(_) => {
            elaborator
                .diagnostics
                .report(
                    DiagnosticKind::DuplicateScope,
                    "duplicate generate-conditional block name",
                    crate::loc::SourceLoc::unknown(),
                )
                .at_scope(elaborator.path_str(scope))
                .emit();
            Ok(())
        }
    }
}

fn elaborate_generate_body<E: Evaluator, T: Tracer, L: super::ModuleLookup<E>>(
    elaborator: &mut ScopeElaborator<'_, E, T, L>,
    body: &GenerateBody<E>,
    scope: crate::scope::ScopeId,
) -> Result<(), Error> {
    for p in &body.localparams {
        let value = match elaborator.elaborate_and_maybe_fold(&p.expr, scope) {
            Some(v) => v,
            None => {
                elaborator
                    .diagnostics
                    .report(
                        DiagnosticKind::ParseAssumptionViolated,
                        format!("localparam {:?} initializer failed to elaborate", p.name),
                        p.loc,
                    )
                    .at_scope(elaborator.path_str(scope))
                    .emit();
                continue;
            }
        };
        let msb = match &p.msb {
            Some(e) => elaborator.elaborate_and_maybe_fold(e, scope),
            None => None,
        };
        let lsb = match &p.lsb {
            Some(e) => elaborator.elaborate_and_maybe_fold(e, scope),
            None => None,
        };
        elaborator
            .arena
            .set_localparam(scope, p.name, value, msb, lsb, p.signed, p.loc);
    }

    for inst in &body.instances {
        super::instantiate::elaborate_instance(elaborator, inst, scope)?;
    }

    for nested in &body.generates {
        elaborate_generate_scheme(elaborator, nested, scope)?;
    }

    Ok(())
}
