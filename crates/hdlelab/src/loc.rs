//! Minimal source-location tracking.
//!
//! The core does not own a lexer and does not preserve full source spans
//! (see Non-goals); it only carries enough of a location to attribute a
//! diagnostic to a place in the front-end's input.

use hdlelab_core::Symbol;

/// A coarse source location: a file name (interned) and a line number.
///
/// Mirrors the `origin_fileline` field of `ParamSlot` and the file/line
/// pairs the front-end attaches to every declaration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct SourceLoc {
    pub file: Option<Symbol>,
    pub line: u32,
}

impl SourceLoc {
    pub fn new(file: Symbol, line: u32) -> Self {
        Self {
            file: Some(file),
            line,
        }
    }

    pub fn unknown() -> Self {
        Self::default()
    }
}
