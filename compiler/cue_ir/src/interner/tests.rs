use super::*;
use pretty_assertions::assert_eq;

#[test]
fn intern_is_idempotent() {
    let interner = SharedInterner::default();
    let a = interner.intern("answer");
    let b = interner.intern("answer");
    assert_eq!(a, b);
}

#[test]
fn distinct_strings_get_distinct_names() {
    let interner = SharedInterner::default();
    assert_ne!(interner.intern("x"), interner.intern("y"));
}

#[test]
fn resolve_round_trips() {
    let interner = SharedInterner::default();
    let name = interner.intern("callcc");
    assert_eq!(interner.resolve(name).as_deref(), Some("callcc"));
}

#[test]
fn empty_string_is_pre_interned() {
    let interner = SharedInterner::default();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert!(interner.is_empty());
}

#[test]
fn foreign_name_renders_placeholder() {
    let interner = SharedInterner::default();
    assert_eq!(&*interner.display(Name::from_raw(9999)), "<unknown>");
}
