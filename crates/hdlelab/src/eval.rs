//! The expression-evaluation seam.
//!
//! Constant folding and type inference over expression trees are an
//! external collaborator (see Non-goals): this crate only needs to call
//! into one, not implement one. `Evaluator` is that seam, parameterizing
//! every type in this crate over a front-end's own parsed-expression and
//! constant-value representations, the way `plotnik-compiler::analyze`
//! is generic over the tree-sitter grammar it was built against rather
//! than hard-coding one language.

use std::fmt::Debug;

use crate::resolve::ScopeCursor;

/// A resolved expression type, for the handful of places width/signedness
/// policy depends on whether an expression denotes a real number or a
/// bit vector (`IVL_VT_REAL`, `IVL_VT_LOGIC`, `IVL_VT_BOOL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprType {
    Real,
    Logic,
    Bool,
}

/// A constant, width- and signedness-carrying value produced by folding
/// a parsed expression. Front-ends plug in their own representation
/// (e.g. a bignum, or a machine integer) by implementing this trait.
pub trait ConstValue: Debug + Clone {
    /// Truncating integer view of the value, used for generate-loop
    /// control, instance-array bounds, and genvar iteration.
    fn as_i64(&self) -> i64;

    fn is_zero(&self) -> bool {
        self.as_i64() == 0
    }

    /// Bit width, if the value carries one (spec.md: "Constants carry
    /// width and signedness").
    fn width(&self) -> Option<u32>;

    fn is_signed(&self) -> bool;

    /// Produce a copy of this value coerced to the given width and
    /// signedness, used when a localparam or parameter's declared range
    /// differs from the range its initializer evaluated to.
    fn with_width_and_sign(&self, width: u32, signed: bool) -> Self;
}

/// External evaluator for parsed-but-not-yet-elaborated expressions.
///
/// `Parsed` is the front-end's raw expression tree (spec.md's pexpr);
/// `Value` is what a fully constant expression folds to. The three
/// methods below are exactly the operations spec.md requires of this
/// collaborator:
///
/// - `elaborate_pexpr` performs lexical substitution of identifiers
///   (parameter/genvar/localparam references) given a scope to resolve
///   them against, without necessarily folding to a constant.
/// - `eval_tree` forces a fully lexically-elaborated expression down to
///   a constant value, or fails if it still contains something
///   unevaluable (an unresolved identifier, a system call with side
///   effects, etc).
/// - `expr_type` classifies a parsed expression without evaluating it.
pub trait Evaluator: Sized {
    type Parsed: Debug + Clone;
    type Value: ConstValue;

    fn elaborate_pexpr(
        &self,
        expr: &Self::Parsed,
        scope: ScopeCursor<'_, Self>,
    ) -> Option<Self::Parsed>;

    fn eval_tree(&self, expr: &Self::Parsed) -> Option<Self::Value>;

    fn expr_type(&self, expr: &Self::Parsed) -> ExprType;
}

/// The three-state lifecycle of a parameter/localparam slot's value,
/// mirroring spec.md's monotone `ParamSlot.value` progression: a slot
/// starts as the raw parsed initializer, becomes lexically elaborated
/// once identifiers in scope are substituted, and finally becomes a
/// constant once fully folded. Values never revert to an earlier state.
#[derive(Debug, Clone)]
pub enum ParamValue<E: Evaluator> {
    Placeholder(E::Parsed),
    Elaborated(E::Parsed),
    Constant(E::Value),
}

impl<E: Evaluator> ParamValue<E> {
    pub fn is_constant(&self) -> bool {
        matches!(self, ParamValue::Constant(_))
    }

    pub fn as_constant(&self) -> Option<&E::Value> {
        match self {
            ParamValue::Constant(v) => Some(v),
            _ => None,
        }
    }

    /// The parsed form, for the two non-constant states; `None` once a
    /// value has reached `Constant`, since only the folded value
    /// remains useful at that point.
    pub fn as_parsed(&self) -> Option<&E::Parsed> {
        match self {
            ParamValue::Placeholder(p) | ParamValue::Elaborated(p) => Some(p),
            ParamValue::Constant(_) => None,
        }
    }
}
