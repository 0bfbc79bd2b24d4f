//! hdlelab: the scope-elaboration core of an HDL compiler.
//!
//! Given a parsed `Module` description — parameters, localparams,
//! defparams, sub-module instances, generate schemes, tasks/functions,
//! and behavioral statements — this crate builds the fully
//! instantiated scope tree and resolves every parameter to a constant
//! wherever the design permits it, the way a synthesizer's front-end
//! elaborates a hierarchy before net elaboration and code generation
//! take over.
//!
//! - [`scope`] — the arena-backed `Scope` tree (§3 of the design).
//! - [`resolve`] — absolute and scope-relative hierarchical-name
//!   resolution (§4.4).
//! - [`eval`] — the `Evaluator` seam a front-end's constant folder
//!   plugs into (§4.2).
//! - [`elaborate`] — scope generation (§4.5): unrolls generate loops,
//!   instantiates sub-modules, stages defparams.
//! - [`params`] — parameter resolution (§4.6): defparam application
//!   then value/width/sign evaluation, both depth-first.
//! - [`design`] — the [`design::Design`] facade tying a full run
//!   together.

pub mod config;
pub mod decl;
pub mod design;
pub mod diagnostics;
pub mod elaborate;
pub mod eval;
pub mod loc;
pub mod params;
pub mod resolve;
pub mod scope;
pub mod trace;

#[cfg(test)]
mod test_support;

pub use config::ElabConfig;
pub use decl::{
    DefaultNetType, DefparamDecl, GenerateBody, GenerateKind, GenerateScheme, InstanceDecl,
    InstanceRange, ModuleDecl, Overrides, ParamDecl, Statement, TaskFuncDecl,
};
pub use design::Design;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use elaborate::{ModuleLookup, ScopeElaborator};
pub use eval::{ConstValue, Evaluator, ExprType, ParamValue};
pub use loc::SourceLoc;
pub use params::ParameterResolver;
pub use resolve::{KindFilter, Resolver, ScopeCursor};
pub use scope::{DefparamEntry, ParamSlot, ScopeArena, ScopeId, ScopeKind};
pub use trace::{CollectingTracer, NoopTracer, Tracer};

/// Conditions that abort an elaboration call outright, distinct from
/// the non-fatal findings recorded in [`Diagnostics`] (§4.7, §7).
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// A single `elaborate_module` call unrolled more generate-loop
    /// iterations than `ElabConfig::generate_fuel` allows.
    #[error("generate fuel exhausted after {0} iterations")]
    GenerateFuelExhausted(u32),

    /// Nested scope creation (module instantiation, tasks, named
    /// blocks) went deeper than `ElabConfig::recursion_limit`.
    #[error("recursion limit of {0} exceeded")]
    RecursionLimitExceeded(u32),
}
