use std::cell::RefCell;

use cue_ir::{build, SharedInterner};
use pretty_assertions::assert_eq;

use super::*;
use crate::Value;

fn setup() -> (SharedInterner, EnvRef, EvalConfig) {
    let interner = SharedInterner::new();
    let env = Environment::root();
    let config = EvalConfig::new(interner.clone());
    (interner, env, config)
}

fn invoke(metafn: &Value, args: Vec<Value>) -> Rc<RefCell<Vec<Result<Value, Signal>>>> {
    let Value::Function(metafn) = metafn else {
        panic!("expected a function value");
    };
    let outcome: Rc<RefCell<Vec<Result<Value, Signal>>>> = Rc::new(RefCell::new(Vec::new()));
    let ok = Rc::clone(&outcome);
    let err = Rc::clone(&outcome);
    evaluate_meta_function(
        metafn,
        Value::Undefined,
        args,
        Rc::new(move |value| ok.borrow_mut().push(Ok(value))),
        Rc::new(move |signal| err.borrow_mut().push(Err(signal))),
    );
    outcome
}

#[test]
fn expression_body_yields_its_value() {
    let (interner, env, config) = setup();
    let x = interner.intern("x");
    // x => x + 1
    let node = build::arrow(
        vec![build::ident(x)],
        build::binary(cue_ir::BinaryOp::Add, build::ident(x), build::number(1.0)),
    );
    let f = MetaFunction::new(&node, &env, &config);
    let outcome = invoke(&f, vec![Value::Number(41.0)]);
    assert_eq!(*outcome.borrow(), vec![Ok(Value::Number(42.0))]);
}

#[test]
fn block_body_completes_with_undefined_without_return() {
    let (_, env, config) = setup();
    let node = build::arrow(Vec::new(), build::block(vec![build::expr_stmt(build::number(5.0))]));
    let f = MetaFunction::new(&node, &env, &config);
    let outcome = invoke(&f, Vec::new());
    assert_eq!(*outcome.borrow(), vec![Ok(Value::Undefined)]);
}

#[test]
fn return_signal_becomes_the_call_value() {
    let (_, env, config) = setup();
    let node = build::arrow(
        Vec::new(),
        build::block(vec![
            build::return_stmt(Some(build::number(7.0))),
            build::expr_stmt(build::number(99.0)),
        ]),
    );
    let f = MetaFunction::new(&node, &env, &config);
    let outcome = invoke(&f, Vec::new());
    assert_eq!(*outcome.borrow(), vec![Ok(Value::Number(7.0))]);
}

#[test]
fn missing_arguments_bind_undefined() {
    let (interner, env, config) = setup();
    let x = interner.intern("x");
    let node = build::arrow(
        vec![build::ident(x)],
        build::unary(cue_ir::UnaryOp::Typeof, build::ident(x)),
    );
    let f = MetaFunction::new(&node, &env, &config);
    let outcome = invoke(&f, Vec::new());
    assert_eq!(*outcome.borrow(), vec![Ok(Value::string("undefined"))]);
}

#[test]
fn rest_parameter_collects_the_tail() {
    let (interner, env, config) = setup();
    let head = interner.intern("head");
    let rest = interner.intern("rest");
    let node = build::arrow(
        vec![build::ident(head), build::rest(build::ident(rest))],
        build::ident(rest),
    );
    let f = MetaFunction::new(&node, &env, &config);
    let outcome = invoke(
        &f,
        vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)],
    );
    assert_eq!(
        *outcome.borrow(),
        vec![Ok(Value::array(vec![Value::Number(2.0), Value::Number(3.0)]))]
    );
}

#[test]
fn arguments_is_bound_in_the_call_scope() {
    let (interner, env, config) = setup();
    let arguments = interner.intern("arguments");
    let node = build::arrow(Vec::new(), build::ident(arguments));
    let f = MetaFunction::new(&node, &env, &config);
    let outcome = invoke(&f, vec![Value::Number(9.0)]);
    assert_eq!(
        *outcome.borrow(),
        vec![Ok(Value::array(vec![Value::Number(9.0)]))]
    );
}

#[test]
fn object_pattern_binds_fields() {
    let (interner, env, config) = setup();
    let a = interner.intern("a");
    let source = Value::object();
    let Value::Object(map) = &source else {
        panic!("expected object");
    };
    map.borrow_mut().insert(a, Value::Number(5.0));

    let pattern = build::object_pattern(vec![build::property(build::ident(a), build::ident(a))]);
    let scope = Environment::child(&env);
    bind_pattern(&pattern, &source, &scope, &config, true).expect("binding succeeds");
    assert_eq!(scope.lookup(a), Some(Value::Number(5.0)));
}

#[test]
fn destructuring_nullish_fails_with_type_error() {
    let (interner, env, config) = setup();
    let a = interner.intern("a");
    let pattern = build::object_pattern(vec![build::property(build::ident(a), build::ident(a))]);
    let err = bind_pattern(&pattern, &Value::Undefined, &env, &config, true).unwrap_err();
    assert_eq!(err.type_tag(), "TypeError");
}

#[test]
fn calling_a_non_function_node_fails() {
    let (_, env, config) = setup();
    // A metafunction wrapping a non-function node is a host mistake.
    let f = Value::Function(Rc::new(MetaFunction {
        node: build::number(1.0),
        closure: env,
        config,
        methods: None,
    }));
    let outcome = invoke(&f, Vec::new());
    let outcome = outcome.borrow();
    assert_eq!(outcome.len(), 1);
    match &outcome[0] {
        Err(signal) => assert_eq!(signal.type_tag(), "TypeError"),
        Ok(value) => panic!("expected failure, got {value:?}"),
    }
}
