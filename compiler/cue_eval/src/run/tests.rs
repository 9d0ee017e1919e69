use cue_ir::{build, Session, SharedInterner};
use pretty_assertions::assert_eq;

use super::*;
use crate::{Environment, ParseError};

fn setup() -> (SharedInterner, EnvRef, EvalConfig) {
    let interner = SharedInterner::new();
    let env = Environment::root();
    let config = EvalConfig::new(interner.clone());
    (interner, env, config)
}

#[test]
fn collects_a_synchronous_value() {
    let (_, env, config) = setup();
    let node = build::program(vec![build::expr_stmt(build::binary(
        cue_ir::BinaryOp::Add,
        build::number(2.0),
        build::number(2.0),
    ))]);
    assert_eq!(
        eval_collecting(&node, &env, &config),
        Some(Ok(Value::Number(4.0)))
    );
}

#[test]
fn uncaught_signals_reach_the_error_hook() {
    let (interner, env, config) = setup();
    let hooked: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&hooked);
    let config = config.with_on_error(Rc::new(move |signal| {
        *sink.borrow_mut() = Some(signal.type_tag().to_string());
    }));

    let node = build::ident(interner.intern("nope"));
    let outcome = eval_collecting(&node, &env, &config);
    match outcome {
        Some(Err(signal)) => assert_eq!(signal.type_tag(), "ReferenceError"),
        other => panic!("expected a failure, got {other:?}"),
    }
    assert_eq!(hooked.borrow().clone(), Some("ReferenceError".to_string()));
}

#[test]
fn suspension_yields_no_outcome() {
    let (_, env, config) = setup();
    // A scheduler that queues work without running it: evaluation starts
    // but never completes within this call.
    let parked: Rc<RefCell<Vec<crate::Thunk>>> = Rc::new(RefCell::new(Vec::new()));
    let queue = Rc::clone(&parked);
    let config = config.with_scheduler(Rc::new(move |thunk| queue.borrow_mut().push(thunk)));

    let node = build::number(1.0);
    assert_eq!(eval_collecting(&node, &env, &config), None);
    assert_eq!(parked.borrow().len(), 1);
}

#[test]
fn scripts_evaluate_through_the_parser() {
    let (_, env, config) = setup();
    let session = Session::new();
    let script = session.anonymous("40 + 2");
    let parser = CachedParser::new(Rc::new(|_source| {
        Ok(build::program(vec![build::expr_stmt(build::binary(
            cue_ir::BinaryOp::Add,
            build::number(40.0),
            build::number(2.0),
        ))]))
    }));
    assert_eq!(
        evaluate_script(&script, &parser, &env, &config),
        Some(Ok(Value::Number(42.0)))
    );
}

#[test]
fn parse_failures_surface_as_syntax_errors_with_location() {
    let (_, env, config) = setup();
    let session = Session::new();
    let script = session.anonymous("let let");
    let parser = CachedParser::new(Rc::new(|_source| Err(ParseError::new("unexpected token"))));
    match evaluate_script(&script, &parser, &env, &config) {
        Some(Err(signal)) => assert_eq!(signal.type_tag(), "SyntaxError"),
        other => panic!("expected a parse failure, got {other:?}"),
    }
}
