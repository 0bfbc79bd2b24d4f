//! Elaboration configuration.
//!
//! The original elaborator wires its debug output and safety limits through
//! global compiler flags. This crate threads them explicitly instead, the
//! way the rest of this corpus threads configuration through a builder
//! rather than a module static.

/// Tunables for a single elaboration run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElabConfig {
    /// Upper bound on generate-loop iterations across an entire
    /// `elaborate_module` call. Exceeding it raises
    /// `Error::GenerateFuelExhausted` rather than looping forever on a
    /// generate-for whose step never drives the test to zero.
    pub generate_fuel: u32,
    /// Upper bound on nested scope depth (named blocks, tasks/functions,
    /// generate blocks, module instances). Exceeding it raises
    /// `Error::RecursionLimitExceeded`.
    pub recursion_limit: u32,
    /// Whether to record scope-generation trace events (see `trace`).
    pub trace: bool,
}

impl Default for ElabConfig {
    fn default() -> Self {
        Self {
            generate_fuel: 1_000_000,
            recursion_limit: 4096,
            trace: false,
        }
    }
}
