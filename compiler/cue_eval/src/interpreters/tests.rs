use std::cell::RefCell;
use std::rc::Rc;

use cue_ir::{build, NodeTag, SharedInterner};
use pretty_assertions::assert_eq;

use super::*;
use crate::{evaluate_node, Environment, Value};

#[test]
fn base_table_covers_syntax_and_derived_operations() {
    let base = Interpreters::base();
    for tag in [
        NodeTag::NumberLiteral,
        NodeTag::Identifier,
        NodeTag::CallExpression,
        NodeTag::TryStatement,
        NodeTag::ForOfStatement,
        NodeTag::ClassDeclaration,
        NodeTag::Apply,
        NodeTag::GetProperty,
        NodeTag::SetProperty,
    ] {
        assert!(base.lookup(tag).is_some(), "missing {}", tag.as_str());
    }
}

#[test]
fn empty_table_resolves_nothing() {
    let table = Interpreters::from_map(InterpreterMap::default());
    assert!(table.lookup(NodeTag::NumberLiteral).is_none());
}

#[test]
fn layered_override_shadows_and_falls_through() {
    let mut overrides = InterpreterMap::default();
    overrides.set(NodeTag::NumberLiteral, |_item, c, _cerr, _env, _config| {
        // Every number literal becomes 100.
        c(Value::Number(100.0));
    });
    let layered = Interpreters::layered(Interpreters::from_map(overrides), Interpreters::base());

    let interner = SharedInterner::new();
    let env = Environment::root();
    let config = crate::EvalConfig::new(interner).with_interpreters(layered);

    let seen: Rc<RefCell<Vec<Value>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    evaluate_node(
        &build::string("kept"),
        &env,
        &config,
        Rc::new(move |value| sink.borrow_mut().push(value)),
        Rc::new(|signal| panic!("unexpected signal {signal:?}")),
    );
    let sink = Rc::clone(&seen);
    evaluate_node(
        &build::number(1.0),
        &env,
        &config,
        Rc::new(move |value| sink.borrow_mut().push(value)),
        Rc::new(|signal| panic!("unexpected signal {signal:?}")),
    );

    // Strings fall through to the base table; numbers hit the override.
    assert_eq!(
        *seen.borrow(),
        vec![Value::string("kept"), Value::Number(100.0)]
    );
}

#[test]
fn with_interpreters_layers_repeatedly() {
    let interner = SharedInterner::new();
    let config = crate::EvalConfig::new(interner);

    let mut first = InterpreterMap::default();
    first.set(NodeTag::NumberLiteral, |_item, c, _cerr, _env, _config| {
        c(Value::Number(1.0));
    });
    let mut second = InterpreterMap::default();
    second.set(NodeTag::NumberLiteral, |_item, c, _cerr, _env, _config| {
        c(Value::Number(2.0));
    });

    let config = config
        .with_interpreters(Interpreters::from_map(first))
        .with_interpreters(Interpreters::from_map(second));

    // The most recently layered table wins.
    let env = Environment::root();
    let seen: Rc<RefCell<Option<Value>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    evaluate_node(
        &build::number(9.0),
        &env,
        &config,
        Rc::new(move |value| *sink.borrow_mut() = Some(value)),
        Rc::new(|signal| panic!("unexpected signal {signal:?}")),
    );
    assert_eq!(seen.borrow().clone(), Some(Value::Number(2.0)));
}
