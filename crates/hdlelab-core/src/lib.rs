//! Core data structures for hdlelab.
//!
//! This crate provides the primitives shared by the scope-elaboration engine:
//! - `interner` - string interning (`Symbol`, `Interner`)
//! - `name` - hierarchical-name primitives (`NameComponent`, `HierName`)

mod interner;
mod name;

pub use interner::{Interner, Symbol};
pub use name::{HierName, NameComponent};
