//! Test-only fixtures: a deterministic `Evaluator` and small builders for
//! constructing `ModuleDecl` trees by hand, standing in for a front-end
//! this core does not implement (§4.2 is an external-collaborator
//! contract; the real constant-folder is out of scope).

use indexmap::IndexMap;

use hdlelab_core::{Interner, Symbol};

use crate::decl::ModuleDecl;
use crate::elaborate::ModuleLookup;
use crate::eval::{ConstValue, Evaluator, ExprType};
use crate::resolve::ScopeCursor;

/// A parsed expression in the fixture language: either an integer
/// literal, a reference to an identifier (resolved lexically against a
/// scope), or a binary arithmetic/comparison node. Rich enough to
/// exercise generate-for loops, width coercion, and defparam overrides
/// without a real lexer/parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeExpr {
    IntLit(i64),
    SizedLit { width: u32, signed: bool, value: i64 },
    Ident(Symbol),
    Binary(FakeOp, Box<FakeExpr>, Box<FakeExpr>),
    /// Already resolved to a concrete value; `elaborate_pexpr` produces
    /// this once an `Ident` has been bound, `eval_tree` requires it.
    Resolved(Box<FakeExpr>, FakeValue),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeOp {
    Add,
    Sub,
    Lt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeValue {
    pub value: i64,
    pub width: Option<u32>,
    pub signed: bool,
}

impl FakeValue {
    pub fn int(value: i64) -> Self {
        Self {
            value,
            width: None,
            signed: true,
        }
    }

    pub fn sized(value: i64, width: u32, signed: bool) -> Self {
        Self {
            value,
            width: Some(width),
            signed,
        }
    }
}

impl ConstValue for FakeValue {
    fn as_i64(&self) -> i64 {
        self.value
    }

    fn width(&self) -> Option<u32> {
        self.width
    }

    fn is_signed(&self) -> bool {
        self.signed
    }

    fn with_width_and_sign(&self, width: u32, signed: bool) -> Self {
        let mask = if width >= 64 { u64::MAX } else { (1u64 << width) - 1 };
        let truncated = (self.value as u64) & mask;
        let value = if signed && width < 64 && (truncated & (1 << (width - 1))) != 0 {
            (truncated | !mask) as i64
        } else {
            truncated as i64
        };
        Self {
            value,
            width: Some(width),
            signed,
        }
    }
}

/// Deterministic evaluator over `FakeExpr` trees. Identifiers resolve
/// against the scope's own `parameters`/`localparams` maps (a
/// simplified stand-in for the source language's full identifier
/// resolution, sufficient to exercise §4.5-§4.6).
#[derive(Debug, Default, Clone)]
pub struct FakeEvaluator;

impl FakeEvaluator {
    pub fn new() -> Self {
        Self
    }

    fn fold(&self, expr: &FakeExpr) -> Option<FakeValue> {
        match expr {
            FakeExpr::IntLit(v) => Some(FakeValue::int(*v)),
            FakeExpr::SizedLit { width, signed, value } => {
                Some(FakeValue::sized(*value, *width, *signed))
            }
            FakeExpr::Resolved(_, v) => Some(*v),
            FakeExpr::Ident(_) => None,
            FakeExpr::Binary(op, lhs, rhs) => {
                let l = self.fold(lhs)?;
                let r = self.fold(rhs)?;
                let value = match op {
                    FakeOp::Add => l.value + r.value,
                    FakeOp::Sub => l.value - r.value,
                    FakeOp::Lt => (l.value < r.value) as i64,
                    FakeOp::Ge => (l.value >= r.value) as i64,
                };
                Some(FakeValue::int(value))
            }
        }
    }
}

impl Evaluator for FakeEvaluator {
    type Parsed = FakeExpr;
    type Value = FakeValue;

    fn elaborate_pexpr(
        &self,
        expr: &FakeExpr,
        scope: ScopeCursor<'_, Self>,
    ) -> Option<FakeExpr> {
        match expr {
            FakeExpr::Ident(sym) => {
                let value = scope.lookup_local_constant(*sym)?;
                Some(FakeExpr::Resolved(Box::new(expr.clone()), value))
            }
            FakeExpr::Binary(op, lhs, rhs) => {
                let l = self.elaborate_pexpr(lhs, scope)?;
                let r = self.elaborate_pexpr(rhs, scope)?;
                Some(FakeExpr::Binary(*op, Box::new(l), Box::new(r)))
            }
            other => Some(other.clone()),
        }
    }

    fn eval_tree(&self, expr: &FakeExpr) -> Option<FakeValue> {
        self.fold(expr)
    }

    fn expr_type(&self, _expr: &FakeExpr) -> ExprType {
        ExprType::Logic
    }
}

pub fn sym(interner: &mut Interner, s: &str) -> Symbol {
    interner.intern(s)
}

/// A fixed module registry, standing in for the front-end's own
/// module table (§9).
#[derive(Debug, Default)]
pub struct FakeModuleRegistry {
    modules: IndexMap<Symbol, ModuleDecl<FakeEvaluator>>,
}

impl FakeModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: Symbol, decl: ModuleDecl<FakeEvaluator>) {
        self.modules.insert(name, decl);
    }
}

impl ModuleLookup<FakeEvaluator> for FakeModuleRegistry {
    fn lookup(&self, module_type: Symbol) -> Option<&ModuleDecl<FakeEvaluator>> {
        self.modules.get(&module_type)
    }
}
