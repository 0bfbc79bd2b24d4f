use hdlelab_core::{HierName, Interner, NameComponent};

use super::*;
use crate::scope::ScopeArena;
use crate::test_support::FakeEvaluator;

fn build() -> (ScopeArena<FakeEvaluator>, Interner, ScopeId, ScopeId, ScopeId) {
    let mut interner = Interner::new();
    let mut arena: ScopeArena<FakeEvaluator> = ScopeArena::new();

    let top_sym = interner.intern("top");
    let top = arena.new_root(NameComponent::new(top_sym), top_sym);

    let sub_sym = interner.intern("sub");
    let u_sym = interner.intern("u");
    let mid = arena
        .new_child(top, NameComponent::new(u_sym), ScopeKind::Module)
        .unwrap();
    arena.get_mut(mid).module_type_name = Some(sub_sym);

    let w_sym = interner.intern("w");
    let leaf = arena
        .new_child(mid, NameComponent::new(w_sym), ScopeKind::BeginEnd)
        .unwrap();

    (arena, interner, top, mid, leaf)
}

#[test]
fn absolute_lookup_walks_down_from_root() {
    let (arena, mut interner, top, mid, leaf) = build();
    let u = interner.intern("u");
    let w = interner.intern("w");
    let top_sym = arena.get(top).name.peek_name();

    let resolver = Resolver::new();
    let path = HierName::from_components(vec![
        NameComponent::new(top_sym),
        NameComponent::new(u),
        NameComponent::new(w),
    ]);
    assert_eq!(resolver.find_absolute(&arena, &path), Some(leaf));
    let _ = mid;
}

#[test]
fn absolute_lookup_fails_on_missing_component() {
    let (arena, mut interner, top, ..) = build();
    let bogus = interner.intern("bogus");
    let top_sym = arena.get(top).name.peek_name();
    let path = HierName::from_components(vec![NameComponent::new(top_sym), NameComponent::new(bogus)]);
    assert_eq!(Resolver::new().find_absolute(&arena, &path), None);
}

#[test]
fn relative_lookup_finds_direct_child() {
    let (arena, mut interner, top, _mid, _leaf) = build();
    let u = interner.intern("u");
    let path = HierName::single(NameComponent::new(u));
    assert_eq!(
        Resolver::new().find_relative(&arena, top, &path),
        arena.child(top, NameComponent::new(u))
    );
}

#[test]
fn relative_lookup_climbs_and_falls_back_to_absolute() {
    let (arena, mut interner, top, mid, leaf) = build();
    // from leaf, "w" isn't a child of leaf, but climbing to `mid` finds it.
    let w = interner.intern("w");
    let path = HierName::single(NameComponent::new(w));
    assert_eq!(Resolver::new().find_relative(&arena, leaf, &path), Some(leaf));

    let top_sym = arena.get(top).name.peek_name();
    let u = interner.intern("u");
    let abs_path = HierName::from_components(vec![NameComponent::new(top_sym), NameComponent::new(u)]);
    assert_eq!(Resolver::new().find_relative(&arena, leaf, &abs_path), Some(mid));
}

#[test]
fn module_type_up_reference_resolves_via_type_name() {
    let (arena, mut interner, _top, mid, leaf) = build();
    // "sub.w" should resolve from inside `mid` (whose type is `sub`) by
    // treating "sub" as an up-reference to `mid` itself, then descending "w".
    let sub = interner.intern("sub");
    let w = interner.intern("w");
    let path = HierName::from_components(vec![NameComponent::new(sub), NameComponent::new(w)]);
    assert_eq!(Resolver::new().find_relative(&arena, leaf, &path), Some(leaf));
}

#[test]
fn path_round_trips_through_find_absolute() {
    let (arena, _interner, _top, _mid, leaf) = build();
    let path = arena.path(leaf);
    assert_eq!(Resolver::new().find_absolute(&arena, &path), Some(leaf));
}
