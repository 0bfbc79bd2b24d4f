use hdlelab_core::{Interner, NameComponent};
use indexmap::IndexMap;

use super::*;
use crate::decl::{
    DefparamDecl, GenerateKind, GenerateScheme, InstanceDecl, ModuleDecl, Overrides, ParamDecl,
};
use crate::diagnostics::Diagnostics;
use crate::scope::ScopeArena;
use crate::test_support::{sym, FakeEvaluator, FakeExpr, FakeModuleRegistry, FakeOp};
use crate::trace::NoopTracer;

fn param(name: hdlelab_core::Symbol, expr: FakeExpr) -> ParamDecl<FakeEvaluator> {
    ParamDecl {
        name,
        expr,
        msb: None,
        lsb: None,
        signed: false,
        loc: SourceLoc::unknown(),
    }
}

/// S1 — Trivial module: `module top; parameter W = 8; endmodule`.
#[test]
fn s1_trivial_module() {
    let mut interner = Interner::new();
    let top_sym = sym(&mut interner, "top");
    let w_sym = sym(&mut interner, "W");

    let decl = ModuleDecl::<FakeEvaluator> {
        type_name: top_sym,
        parameters: vec![param(w_sym, FakeExpr::IntLit(8))],
        ..Default::default()
    };

    let mut arena: ScopeArena<FakeEvaluator> = ScopeArena::new();
    let top_scope = arena.new_root(NameComponent::new(top_sym), top_sym);

    let evaluator = FakeEvaluator::new();
    let mut tracer = NoopTracer;
    let mut diagnostics = Diagnostics::new();
    let registry = FakeModuleRegistry::new();
    let mut elab = ScopeElaborator::new(
        &mut arena,
        &interner,
        &evaluator,
        &mut tracer,
        &mut diagnostics,
        &registry,
        ElabConfig::default(),
    );

    let ok = elab
        .elaborate_module(&decl, top_scope, &IndexMap::new())
        .expect("no fatal abort");
    assert!(ok);
    assert!(diagnostics.is_empty());

    let slot = arena.get(top_scope).parameters.get(&w_sym).unwrap();
    match &slot.value {
        crate::eval::ParamValue::Constant(v) => {
            assert_eq!(v.as_i64(), 8);
            assert!(!v.is_signed());
        }
        other => panic!("expected constant, got {other:?}"),
    }
}

/// S2 — Instance override (named): `sub #(.W(4)) u();` inside `top`.
#[test]
fn s2_instance_override_named() {
    let mut interner = Interner::new();
    let top_sym = sym(&mut interner, "top");
    let sub_sym = sym(&mut interner, "sub");
    let u_sym = sym(&mut interner, "u");
    let w_sym = sym(&mut interner, "W");

    let sub_decl = ModuleDecl::<FakeEvaluator> {
        type_name: sub_sym,
        parameters: vec![param(w_sym, FakeExpr::IntLit(1))],
        ..Default::default()
    };

    let mut overrides = IndexMap::new();
    overrides.insert(w_sym, FakeExpr::IntLit(4));
    let top_decl = ModuleDecl::<FakeEvaluator> {
        type_name: top_sym,
        instances: vec![InstanceDecl {
            instance_name: u_sym,
            module_type: sub_sym,
            range: None,
            overrides: Overrides::Named(overrides),
            loc: SourceLoc::unknown(),
        }],
        ..Default::default()
    };

    let mut registry = FakeModuleRegistry::new();
    registry.insert(sub_sym, sub_decl);

    let mut arena: ScopeArena<FakeEvaluator> = ScopeArena::new();
    let top_scope = arena.new_root(NameComponent::new(top_sym), top_sym);

    let evaluator = FakeEvaluator::new();
    let mut tracer = NoopTracer;
    let mut diagnostics = Diagnostics::new();
    let mut elab = ScopeElaborator::new(
        &mut arena,
        &interner,
        &evaluator,
        &mut tracer,
        &mut diagnostics,
        &registry,
        ElabConfig::default(),
    );

    elab.elaborate_module(&top_decl, top_scope, &IndexMap::new())
        .unwrap();
    assert!(diagnostics.is_empty(), "{:?}", diagnostics.iter().collect::<Vec<_>>());

    let u_scope = arena.child(top_scope, NameComponent::new(u_sym)).expect("u exists");
    assert_eq!(arena.get(u_scope).kind, ScopeKind::Module);
    assert_eq!(arena.get(u_scope).module_type_name, Some(sub_sym));
    let slot = arena.get(u_scope).parameters.get(&w_sym).unwrap();
    assert_eq!(slot.value.as_constant().unwrap().as_i64(), 4);
}

/// S3 — Generate-for: three iterations each instantiating `sub`.
#[test]
fn s3_generate_for() {
    let mut interner = Interner::new();
    let top_sym = sym(&mut interner, "top");
    let sub_sym = sym(&mut interner, "sub");
    let g_sym = sym(&mut interner, "g");
    let i_sym = sym(&mut interner, "i");
    let u_sym = sym(&mut interner, "u");

    let sub_decl = ModuleDecl::<FakeEvaluator> {
        type_name: sub_sym,
        ..Default::default()
    };

    let top_decl = ModuleDecl::<FakeEvaluator> {
        type_name: top_sym,
        generates: vec![GenerateScheme {
            label: g_sym,
            kind: GenerateKind::Loop {
                genvar: i_sym,
                init: FakeExpr::IntLit(0),
                test: FakeExpr::Binary(
                    FakeOp::Lt,
                    Box::new(FakeExpr::Ident(i_sym)),
                    Box::new(FakeExpr::IntLit(3)),
                ),
                step: FakeExpr::Binary(
                    FakeOp::Add,
                    Box::new(FakeExpr::Ident(i_sym)),
                    Box::new(FakeExpr::IntLit(1)),
                ),
            },
            body: crate::decl::GenerateBody {
                localparams: vec![],
                instances: vec![InstanceDecl {
                    instance_name: u_sym,
                    module_type: sub_sym,
                    range: None,
                    overrides: Overrides::None,
                    loc: SourceLoc::unknown(),
                }],
                generates: vec![],
            },
            loc: SourceLoc::unknown(),
        }],
        ..Default::default()
    };

    let mut registry = FakeModuleRegistry::new();
    registry.insert(sub_sym, sub_decl);

    let mut arena: ScopeArena<FakeEvaluator> = ScopeArena::new();
    let top_scope = arena.new_root(NameComponent::new(top_sym), top_sym);

    let evaluator = FakeEvaluator::new();
    let mut tracer = NoopTracer;
    let mut diagnostics = Diagnostics::new();
    let mut elab = ScopeElaborator::new(
        &mut arena,
        &interner,
        &evaluator,
        &mut tracer,
        &mut diagnostics,
        &registry,
        ElabConfig::default(),
    );

    elab.elaborate_module(&top_decl, top_scope, &IndexMap::new())
        .unwrap();
    assert!(diagnostics.is_empty(), "{:?}", diagnostics.iter().collect::<Vec<_>>());

    for i in 0..3i32 {
        let gi = arena
            .child(top_scope, NameComponent::with_index(g_sym, i))
            .unwrap_or_else(|| panic!("missing g[{i}]"));
        assert_eq!(arena.get(gi).kind, ScopeKind::Genblock);
        let localparam = arena.get(gi).localparams.get(&i_sym).unwrap();
        assert_eq!(localparam.value.as_constant().unwrap().as_i64(), i as i64);
        let u = arena.child(gi, NameComponent::new(u_sym)).expect("u child exists");
        assert_eq!(arena.get(u).kind, ScopeKind::Module);
    }
    assert!(arena.get(top_scope).genvar_tmp.is_none());
}

/// S4 (staging half) — defparam statements are staged, not yet applied.
#[test]
fn s4_defparam_is_staged_not_applied() {
    let mut interner = Interner::new();
    let top_sym = sym(&mut interner, "top");
    let mid_sym = sym(&mut interner, "mid");
    let m_sym = sym(&mut interner, "m");
    let u_sym = sym(&mut interner, "u");
    let w_sym = sym(&mut interner, "W");

    let target = hdlelab_core::HierName::from_components(vec![
        NameComponent::new(m_sym),
        NameComponent::new(u_sym),
        NameComponent::new(w_sym),
    ]);
    let top_decl = ModuleDecl::<FakeEvaluator> {
        type_name: top_sym,
        instances: vec![InstanceDecl {
            instance_name: m_sym,
            module_type: mid_sym,
            range: None,
            overrides: Overrides::None,
            loc: SourceLoc::unknown(),
        }],
        defparams: vec![DefparamDecl {
            target,
            expr: FakeExpr::IntLit(7),
            loc: SourceLoc::unknown(),
        }],
        ..Default::default()
    };
    let mid_decl = ModuleDecl::<FakeEvaluator> {
        type_name: mid_sym,
        ..Default::default()
    };

    let mut registry = FakeModuleRegistry::new();
    registry.insert(mid_sym, mid_decl);

    let mut arena: ScopeArena<FakeEvaluator> = ScopeArena::new();
    let top_scope = arena.new_root(NameComponent::new(top_sym), top_sym);

    let evaluator = FakeEvaluator::new();
    let mut tracer = NoopTracer;
    let mut diagnostics = Diagnostics::new();
    let mut elab = ScopeElaborator::new(
        &mut arena,
        &interner,
        &evaluator,
        &mut tracer,
        &mut diagnostics,
        &registry,
        ElabConfig::default(),
    );

    elab.elaborate_module(&top_decl, top_scope, &IndexMap::new())
        .unwrap();
    assert!(diagnostics.is_empty());

    let inbox = &arena.get(top_scope).defparam_inbox;
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].tail, w_sym);
    assert_eq!(inbox[0].path, hdlelab_core::HierName::from_components(vec![
        NameComponent::new(m_sym),
        NameComponent::new(u_sym),
    ]));
}

/// S5 — Recursive instantiation: `module a; a u(); endmodule`.
#[test]
fn s5_recursive_instantiation_rejected() {
    let mut interner = Interner::new();
    let a_sym = sym(&mut interner, "a");
    let u_sym = sym(&mut interner, "u");

    let a_decl = ModuleDecl::<FakeEvaluator> {
        type_name: a_sym,
        instances: vec![InstanceDecl {
            instance_name: u_sym,
            module_type: a_sym,
            range: None,
            overrides: Overrides::None,
            loc: SourceLoc::unknown(),
        }],
        ..Default::default()
    };

    let mut registry = FakeModuleRegistry::new();
    registry.insert(a_sym, ModuleDecl { type_name: a_sym, ..Default::default() });

    let mut arena: ScopeArena<FakeEvaluator> = ScopeArena::new();
    let top_scope = arena.new_root(NameComponent::new(a_sym), a_sym);

    let evaluator = FakeEvaluator::new();
    let mut tracer = NoopTracer;
    let mut diagnostics = Diagnostics::new();
    let mut elab = ScopeElaborator::new(
        &mut arena,
        &interner,
        &evaluator,
        &mut tracer,
        &mut diagnostics,
        &registry,
        ElabConfig::default(),
    );

    let ok = elab
        .elaborate_module(&a_decl, top_scope, &IndexMap::new())
        .unwrap();
    assert!(!ok);
    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.error_count(), 1);
    assert!(arena.child(top_scope, NameComponent::new(u_sym)).is_none());
}

/// S6 — Duplicate child: `sub u(); sub u();` inside `top`.
#[test]
fn s6_duplicate_child_rejected() {
    let mut interner = Interner::new();
    let top_sym = sym(&mut interner, "top");
    let sub_sym = sym(&mut interner, "sub");
    let u_sym = sym(&mut interner, "u");

    let sub_decl = ModuleDecl::<FakeEvaluator> {
        type_name: sub_sym,
        ..Default::default()
    };
    let top_decl = ModuleDecl::<FakeEvaluator> {
        type_name: top_sym,
        instances: vec![
            InstanceDecl {
                instance_name: u_sym,
                module_type: sub_sym,
                range: None,
                overrides: Overrides::None,
                loc: SourceLoc::unknown(),
            },
            InstanceDecl {
                instance_name: u_sym,
                module_type: sub_sym,
                range: None,
                overrides: Overrides::None,
                loc: SourceLoc::unknown(),
            },
        ],
        ..Default::default()
    };

    let mut registry = FakeModuleRegistry::new();
    registry.insert(sub_sym, sub_decl);

    let mut arena: ScopeArena<FakeEvaluator> = ScopeArena::new();
    let top_scope = arena.new_root(NameComponent::new(top_sym), top_sym);

    let evaluator = FakeEvaluator::new();
    let mut tracer = NoopTracer;
    let mut diagnostics = Diagnostics::new();
    let mut elab = ScopeElaborator::new(
        &mut arena,
        &interner,
        &evaluator,
        &mut tracer,
        &mut diagnostics,
        &registry,
        ElabConfig::default(),
    );

    let ok = elab
        .elaborate_module(&top_decl, top_scope, &IndexMap::new())
        .unwrap();
    assert!(!ok);
    assert_eq!(diagnostics.error_count(), 1);
    assert!(arena.child(top_scope, NameComponent::new(u_sym)).is_some());
    assert_eq!(arena.get(top_scope).children.len(), 1);
}
