//! The ScopeTree data model (§3) and its arena-backed owner.
//!
//! The original design links scopes with owning/non-owning pointer
//! pairs and destroys subtrees recursively. Per the design notes (§9),
//! this crate instead gives every scope a stable arena index
//! (`ScopeId`); the `parent` back-reference becomes a plain
//! `Option<ScopeId>` rather than a weak pointer, and the whole tree is
//! dropped at once when the owning `ScopeArena` is dropped — there is
//! no dangling-pointer hazard to begin with.

mod arena;

pub use arena::{ScopeArena, ScopeData, ScopeId};

use hdlelab_core::Symbol;

/// The closed set of scope kinds (§9: "a sum type, not a class
/// hierarchy"). Operations that differ per kind dispatch on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Module,
    Task,
    Function,
    BeginEnd,
    ForkJoin,
    Genblock,
}

impl ScopeKind {
    pub fn is_module(self) -> bool {
        matches!(self, ScopeKind::Module)
    }
}

/// A parameter or localparam slot (§3). `value`'s lifecycle is the
/// placeholder → lexically-elaborated → constant progression modeled
/// by `ParamValue`.
#[derive(Debug, Clone)]
pub struct ParamSlot<E: crate::eval::Evaluator> {
    pub value: crate::eval::ParamValue<E>,
    pub msb: Option<crate::eval::ParamValue<E>>,
    pub lsb: Option<crate::eval::ParamValue<E>>,
    pub signed: bool,
    pub origin: crate::loc::SourceLoc,
}

impl<E: crate::eval::Evaluator> ParamSlot<E> {
    pub fn placeholder(expr: E::Parsed, origin: crate::loc::SourceLoc) -> Self {
        Self {
            value: crate::eval::ParamValue::Placeholder(expr),
            msb: None,
            lsb: None,
            signed: false,
            origin,
        }
    }
}

/// A staged-but-unapplied defparam: the path is relative to the scope
/// whose inbox it lives in, `tail` is the final component naming the
/// target parameter.
#[derive(Debug, Clone)]
pub struct DefparamEntry<E: crate::eval::Evaluator> {
    pub path: hdlelab_core::HierName,
    pub tail: Symbol,
    pub expr: E::Parsed,
    pub loc: crate::loc::SourceLoc,
}
