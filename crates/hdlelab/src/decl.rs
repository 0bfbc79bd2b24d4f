//! Front-end declarations consumed by the elaborator.
//!
//! These types are the `Module` description boundary contract of §6:
//! a fully-resolved, front-end-produced tree of declarations. The core
//! never parses source text into these; it only walks them.

use indexmap::IndexMap;

use hdlelab_core::{HierName, Symbol};

use crate::eval::Evaluator;
use crate::loc::SourceLoc;
use crate::scope::ScopeKind;

/// `default_nettype` as declared by a `` `default_nettype `` directive
/// or its absence (the implicit `wire` default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultNetType {
    #[default]
    Wire,
    Tri,
    WOr,
    WAnd,
    Tri0,
    Tri1,
    Supply0,
    Supply1,
    None,
}

/// A parameter or localparam declaration, in the shape §6 names:
/// `{expr, msb?, lsb?, signed}`.
#[derive(Debug, Clone)]
pub struct ParamDecl<E: Evaluator> {
    pub name: Symbol,
    pub expr: E::Parsed,
    pub msb: Option<E::Parsed>,
    pub lsb: Option<E::Parsed>,
    pub signed: bool,
    pub loc: SourceLoc,
}

/// One `defparam path.to.param = expr;` statement.
#[derive(Debug, Clone)]
pub struct DefparamDecl<E: Evaluator> {
    pub target: HierName,
    pub expr: E::Parsed,
    pub loc: SourceLoc,
}

/// Override set carried by one instantiation site. Exactly one variant
/// is populated per instantiation (§6).
#[derive(Debug, Clone)]
pub enum Overrides<E: Evaluator> {
    Positional(Vec<E::Parsed>),
    Named(IndexMap<Symbol, E::Parsed>),
    None,
}

/// Optional `[msb:lsb]` range on an instance, making it an instance
/// array.
#[derive(Debug, Clone)]
pub struct InstanceRange<E: Evaluator> {
    pub msb: E::Parsed,
    pub lsb: E::Parsed,
}

impl<E: Evaluator> InstanceRange<E> {
    pub fn new(msb: E::Parsed, lsb: E::Parsed) -> Self {
        Self { msb, lsb }
    }
}

/// A single instantiation statement: `module_type instance_name [range] (...);`
#[derive(Debug, Clone)]
pub struct InstanceDecl<E: Evaluator> {
    pub instance_name: Symbol,
    pub module_type: Symbol,
    pub range: Option<InstanceRange<E>>,
    pub overrides: Overrides<E>,
    pub loc: SourceLoc,
}

/// The discriminant of a generate scheme (§4.5.1).
#[derive(Debug, Clone)]
pub enum GenerateKind<E: Evaluator> {
    Loop {
        genvar: Symbol,
        init: E::Parsed,
        test: E::Parsed,
        step: E::Parsed,
    },
    ConditionalIf {
        test: E::Parsed,
    },
    ConditionalElse {
        test: E::Parsed,
    },
}

/// A generate-for or generate-if/else block: a label and the body it
/// unrolls/elaborates into a GENBLOCK child per iteration or branch.
#[derive(Debug, Clone)]
pub struct GenerateScheme<E: Evaluator> {
    pub label: Symbol,
    pub kind: GenerateKind<E>,
    pub body: GenerateBody<E>,
    pub loc: SourceLoc,
}

/// The declarations inside one generate block body. Reuses the same
/// shape as a module body, since a generate block may itself contain
/// parameters, localparams, instances and nested generates.
#[derive(Debug, Clone, Default)]
pub struct GenerateBody<E: Evaluator> {
    pub localparams: Vec<ParamDecl<E>>,
    pub instances: Vec<InstanceDecl<E>>,
    pub generates: Vec<GenerateScheme<E>>,
}

/// A task or function declaration. Bodies are statement lists per
/// §4.5 step 7; the core only needs to create the child scope and
/// descend into the body for nested named blocks, not to interpret
/// behavioral semantics.
#[derive(Debug, Clone)]
pub struct TaskFuncDecl<E: Evaluator> {
    pub name: Symbol,
    pub kind: ScopeKind,
    pub body: Vec<Statement<E>>,
    pub loc: SourceLoc,
}

/// A behavioral statement, reduced to the cases that matter for scope
/// elaboration: named blocks introduce scopes, everything else is
/// descended into looking for more named blocks. Per §9's design note,
/// this is a sum type dispatched by pattern match, not a visitor class
/// hierarchy.
#[derive(Debug, Clone)]
pub enum Statement<E: Evaluator> {
    /// `begin : label ... end` or `fork : label ... join`.
    Block {
        label: Option<Symbol>,
        is_fork: bool,
        body: Vec<Statement<E>>,
    },
    If {
        then_branch: Box<Statement<E>>,
        else_branch: Option<Box<Statement<E>>>,
    },
    Case {
        arms: Vec<Statement<E>>,
    },
    Loop {
        body: Box<Statement<E>>,
    },
    /// Any statement kind that carries no nested scope (assignment,
    /// delay, event-wait, system task call, ...).
    Leaf,
}

/// One top-level module, task, or function body as handed to
/// `elaborate_module` (§4.5 entry point).
#[derive(Debug, Clone, Default)]
pub struct ModuleDecl<E: Evaluator> {
    pub type_name: Symbol,
    pub parameters: Vec<ParamDecl<E>>,
    pub localparams: Vec<ParamDecl<E>>,
    pub defparams: Vec<DefparamDecl<E>>,
    pub tasks_functions: Vec<TaskFuncDecl<E>>,
    pub instances: Vec<InstanceDecl<E>>,
    pub generates: Vec<GenerateScheme<E>>,
    pub statements: Vec<Statement<E>>,
    pub events: Vec<Symbol>,
    pub attributes: IndexMap<Symbol, Vec<E::Parsed>>,
    pub time_unit: i32,
    pub time_precision: i32,
    pub default_nettype: DefaultNetType,
}
