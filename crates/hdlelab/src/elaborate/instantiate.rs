//! Module instantiation (§4.5.2).
//!
//! The target module's own declaration lives in the front-end's module
//! registry (§9: "global mutable state... belongs to the front-end
//! collaborator"), so this core resolves `module_type` symbols through
//! the `ModuleLookup` the `ScopeElaborator` was built with rather than
//! owning a registry itself.

use hdlelab_core::{NameComponent, Symbol};
use indexmap::IndexMap;

use crate::decl::{InstanceDecl, ModuleDecl, Overrides};
use crate::diagnostics::DiagnosticKind;
use crate::eval::{ConstValue, Evaluator};
use crate::scope::{ScopeId, ScopeKind};
use crate::trace::Tracer;
use crate::Error;

use super::ScopeElaborator;

/// Resolves a module-type symbol to its declaration.
pub trait ModuleLookup<E: Evaluator> {
    fn lookup(&self, module_type: Symbol) -> Option<&ModuleDecl<E>>;
}

/// Normalize `overrides` into a symbol→expression map given the
/// target's parameter declaration order (§9: "Override map
/// normalization"). The two source representations are disjoint by
/// construction; this collapses them once that order is known.
pub fn normalize_overrides<E: Evaluator>(
    overrides: &Overrides<E>,
    param_order: &[Symbol],
) -> IndexMap<Symbol, E::Parsed> {
    match overrides {
        Overrides::Named(map) => map.clone(),
        Overrides::Positional(values) => values
            .iter()
            .zip(param_order.iter())
            .map(|(v, name)| (*name, v.clone()))
            .collect(),
        Overrides::None => IndexMap::new(),
    }
}

/// Elaborate one instantiation statement (§4.5.2).
pub(super) fn elaborate_instance<E, T, L>(
    elaborator: &mut ScopeElaborator<'_, E, T, L>,
    inst: &InstanceDecl<E>,
    scope: ScopeId,
) -> Result<(), Error>
where
    E: Evaluator,
    T: Tracer,
    L: ModuleLookup<E>,
{
    // Step 1: instance_name non-empty — enforced at the type level by
    // `Symbol`; an empty name is a front-end bug, not representable
    // here, so this step is a no-op in this port.

    // Step 2: duplicate check happens per-child inside the loop below,
    // since an array instance creates several children that must each
    // be checked individually.

    // Step 3: recursive-instantiation check.
    if elaborator.arena.has_module_ancestor_of_type(scope, inst.module_type) {
        elaborator
            .diagnostics
            .report(
                DiagnosticKind::RecursiveInstantiation,
                format!("recursive instantiation of module type {:?}", inst.module_type),
                inst.loc,
            )
            .at_scope(elaborator.path_str(scope))
            .emit();
        return Ok(());
    }

    let target_decl = match elaborator.lookup.lookup(inst.module_type) {
        Some(d) => d,
        None => {
            elaborator
                .diagnostics
                .report(
                    DiagnosticKind::ParseAssumptionViolated,
                    format!("unknown module type {:?}", inst.module_type),
                    inst.loc,
                )
                .at_scope(elaborator.path_str(scope))
                .emit();
            return Ok(());
        }
    };

    // Step 4: instance-array range.
    let (low, high, array) = match &inst.range {
        Some(range) => {
            let msb = match elaborator
                .elaborate(&range.msb, scope)
                .and_then(|e| elaborator.evaluator.eval_tree(&e))
            {
                Some(v) => v.as_i64(),
                None => {
                    elaborator
                        .diagnostics
                        .report(
                            DiagnosticKind::UnevaluableParameter,
                            "instance array msb did not reduce to a constant",
                            inst.loc,
                        )
                        .at_scope(elaborator.path_str(scope))
                        .emit();
                    return Ok(());
                }
            };
            let lsb = match elaborator
                .elaborate(&range.lsb, scope)
                .and_then(|e| elaborator.evaluator.eval_tree(&e))
            {
                Some(v) => v.as_i64(),
                None => {
                    elaborator
                        .diagnostics
                        .report(
                            DiagnosticKind::UnevaluableParameter,
                            "instance array lsb did not reduce to a constant",
                            inst.loc,
                        )
                        .at_scope(elaborator.path_str(scope))
                        .emit();
                    return Ok(());
                }
            };
            (msb, lsb, true)
        }
        None => (0, 0, false),
    };
    let count = if array { (high - low).unsigned_abs() as i64 + 1 } else { 1 };

    let mut children = Vec::with_capacity(count as usize);
    let param_order: Vec<Symbol> = target_decl.parameters.iter().map(|p| p.name).collect();
    let override_map = normalize_overrides(&inst.overrides, &param_order);

    for i in 0..count {
        let index = if low <= high { low + i } else { low - i };
        let child_name = if array {
            NameComponent::with_index(inst.instance_name, index as i32)
        } else {
            NameComponent::new(inst.instance_name)
        };

        // Step 2: duplicate check.
        let child = match elaborator.arena.new_child(scope, child_name, ScopeKind::Module) {
            Ok(id) => id,
            Err(_) => {
                elaborator
                    .diagnostics
                    .report(
                        DiagnosticKind::DuplicateScope,
                        format!("duplicate instance name {:?}", inst.instance_name),
                        inst.loc,
                    )
                    .at_scope(elaborator.path_str(scope))
                    .emit();
                continue;
            }
        };

        {
            let data = elaborator.arena.get_mut(child);
            data.module_type_name = Some(inst.module_type);
            data.time_unit = target_decl.time_unit;
            data.time_precision = target_decl.time_precision;
            data.default_nettype = target_decl.default_nettype;
        }

        if elaborator.config_trace() {
            let child_path = elaborator.path_str(child);
            let parent_path = elaborator.path_str(scope);
            elaborator.tracer.instance_created(&child_path, &parent_path);
        }

        elaborator.elaborate_module(target_decl, child, &override_map)?;
        children.push(child);
    }

    elaborator
        .arena
        .get_mut(scope)
        .instance_arrays
        .insert(inst.instance_name, children);

    Ok(())
}
