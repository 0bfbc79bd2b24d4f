//! Hierarchical-name primitives.
//!
//! A `HierName` is an ordered sequence of `NameComponent`s, each a name plus
//! an optional array index (`g[3]`). Comparison needs the owning `Interner`
//! because `Symbol` only orders by insertion order, not lexicographically.

use std::cmp::Ordering;

use crate::{Interner, Symbol};

/// One component of a hierarchical name: a name plus an optional index.
///
/// The index distinguishes array elements — an instance array entry or a
/// generate-for iteration — from a plain scalar scope.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NameComponent {
    text: Symbol,
    index: Option<i32>,
}

impl NameComponent {
    pub fn new(text: Symbol) -> Self {
        Self { text, index: None }
    }

    pub fn with_index(text: Symbol, index: i32) -> Self {
        Self {
            text,
            index: Some(index),
        }
    }

    #[inline]
    pub fn peek_name(&self) -> Symbol {
        self.text
    }

    #[inline]
    pub fn peek_number(&self) -> Option<i32> {
        self.index
    }

    #[inline]
    pub fn has_number(&self) -> bool {
        self.index.is_some()
    }

    /// Order two components: text first (lexicographic on the resolved
    /// string), then index with `None < Some(_)`.
    pub fn cmp_with(&self, other: &Self, interner: &Interner) -> Ordering {
        let lhs = interner.resolve(self.text);
        let rhs = interner.resolve(other.text);
        lhs.cmp(rhs).then_with(|| self.index.cmp(&other.index))
    }

    pub fn render(&self, interner: &Interner) -> String {
        match self.index {
            Some(n) => format!("{}[{n}]", interner.resolve(self.text)),
            None => interner.resolve(self.text).to_string(),
        }
    }
}

/// An ordered sequence of `NameComponent`s identifying a scope within the
/// design tree. The empty sequence is a valid key (the root).
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct HierName(Vec<NameComponent>);

impl HierName {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn single(c: NameComponent) -> Self {
        Self(vec![c])
    }

    pub fn from_components(v: Vec<NameComponent>) -> Self {
        Self(v)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn front(&self) -> Option<&NameComponent> {
        self.0.first()
    }

    pub fn back(&self) -> Option<&NameComponent> {
        self.0.last()
    }

    pub fn components(&self) -> &[NameComponent] {
        &self.0
    }

    pub fn append(&mut self, c: NameComponent) {
        self.0.push(c);
    }

    /// Return a copy of this name with `c` appended.
    pub fn pushed(&self, c: NameComponent) -> Self {
        let mut v = self.0.clone();
        v.push(c);
        Self(v)
    }

    /// Remove and return the last component, shortening this name in place.
    pub fn pop_tail(&mut self) -> Option<NameComponent> {
        self.0.pop()
    }

    /// All but the first component.
    pub fn tail(&self) -> HierName {
        Self(self.0.iter().skip(1).cloned().collect())
    }

    pub fn is_prefix_of(&self, other: &HierName) -> bool {
        self.0.len() <= other.0.len() && self.0[..] == other.0[..self.0.len()]
    }

    pub fn cmp_with(&self, other: &Self, interner: &Interner) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            let c = a.cmp_with(b, interner);
            if c != Ordering::Equal {
                return c;
            }
        }
        self.0.len().cmp(&other.0.len())
    }

    pub fn render(&self, interner: &Interner) -> String {
        self.0
            .iter()
            .map(|c| c.render(interner))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl FromIterator<NameComponent> for HierName {
    fn from_iter<T: IntoIterator<Item = NameComponent>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
