//! The engine's acceptance scenarios, assembled as ASTs.

use cue_ir::{build, BinaryOp, DeclKind};
use pretty_assertions::assert_eq;

use super::*;
use crate::{install_callcc, lifted, Continuation, ErrorContinuation, ReceiverFunction, Trampoline};

#[test]
fn two_plus_two_in_an_empty_environment() {
    let program = build::program(vec![build::expr_stmt(build::binary(
        BinaryOp::Add,
        build::number(2.0),
        build::number(2.0),
    ))]);
    assert_eq!(eval_value(&program), Value::Number(4.0));
}

#[test]
fn callcc_receiver_observes_the_current_environment() {
    let (interner, env, config) = setup();
    install_callcc(&env, &interner);

    let answer = interner.intern("answer");
    let observed: Rc<RefCell<Option<Value>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&observed);
    env.define(
        interner.intern("receiver"),
        Value::Receiver(ReceiverFunction::new(
            "observe",
            move |_value, c, _cerr, env, _config| {
                *sink.borrow_mut() = env.lookup(answer);
                c(Value::Undefined);
            },
        )),
    );

    // var answer = 42; callcc(receiver)
    let program = build::program(vec![
        build::var(answer, build::number(42.0)),
        build::expr_stmt(build::call(
            build::ident(interner.intern("callcc")),
            vec![build::ident(interner.intern("receiver"))],
        )),
    ]);
    eval_in(&program, &env, &config).expect("program completes");
    assert_eq!(observed.borrow().clone(), Some(Value::Number(42.0)));
}

#[test]
fn deferred_resumption_completes_the_surrounding_expression() {
    let (interner, env, config) = setup();
    let trampoline = Trampoline::new();
    let config = config.with_scheduler(trampoline.scheduler());
    install_callcc(&env, &interner);

    let stashed: Rc<RefCell<Option<Value>>> = Rc::new(RefCell::new(None));
    let stash = Rc::clone(&stashed);
    env.define(
        interner.intern("receiver"),
        Value::Receiver(ReceiverFunction::new(
            "stash",
            move |_value, c, _cerr, _env, _config| {
                *stash.borrow_mut() = Some(lifted(c));
            },
        )),
    );

    // 2 * callcc(receiver)
    let program = build::binary(
        BinaryOp::Mul,
        build::number(2.0),
        build::call(
            build::ident(interner.intern("callcc")),
            vec![build::ident(interner.intern("receiver"))],
        ),
    );
    let outcomes = eval_recording(&program, &env, &config);
    assert!(outcomes.borrow().is_empty(), "evaluation is suspended");

    // Resume later with 21: the multiplication picks up where it stopped.
    let Some(Value::Receiver(k)) = stashed.borrow().clone() else {
        panic!("continuation captured");
    };
    let done: Continuation = Rc::new(|_| {});
    let fail: ErrorContinuation = Rc::new(|signal| panic!("unexpected signal {signal:?}"));
    k.invoke(Value::Number(21.0), &done, &fail, &env, &config);
    assert_eq!(*outcomes.borrow(), vec![Ok(Value::Number(42.0))]);
}

#[test]
fn resumed_for_of_loop_appends_to_the_same_result() {
    let (interner, env, config) = setup();
    install_callcc(&env, &interner);

    // Shared result array visible to both the program and the test.
    let result = Value::array(Vec::new());
    env.define(interner.intern("result"), result.clone());

    let stashed: Rc<RefCell<Option<Value>>> = Rc::new(RefCell::new(None));
    let stash = Rc::clone(&stashed);
    env.define(
        interner.intern("receiver"),
        Value::Receiver(ReceiverFunction::new(
            "stash-and-resume",
            move |_value, c, _cerr, _env, _config| {
                *stash.borrow_mut() = Some(lifted(c));
                c(Value::array(vec![
                    Value::Number(1.0),
                    Value::Number(2.0),
                    Value::Number(3.0),
                ]));
            },
        )),
    );

    // for (let x of callcc(receiver)) result.push(x)
    let x = interner.intern("x");
    let program = build::for_of(
        build::declare(
            DeclKind::Let,
            vec![build::declarator(build::ident(x), None)],
        ),
        build::call(
            build::ident(interner.intern("callcc")),
            vec![build::ident(interner.intern("receiver"))],
        ),
        build::expr_stmt(build::call(
            build::member(build::ident(interner.intern("result")), build::ident(interner.intern("push"))),
            vec![build::ident(x)],
        )),
    );
    eval_recording(&program, &env, &config);
    assert_eq!(
        result,
        Value::array(vec![
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Number(3.0),
        ])
    );

    // A second resumption re-runs the loop over the new sequence,
    // accumulating into the same array.
    let Some(Value::Receiver(k)) = stashed.borrow().clone() else {
        panic!("continuation captured");
    };
    let done: Continuation = Rc::new(|_| {});
    let fail: ErrorContinuation = Rc::new(|signal| panic!("unexpected signal {signal:?}"));
    k.invoke(
        Value::array(vec![
            Value::Number(4.0),
            Value::Number(5.0),
            Value::Number(6.0),
        ]),
        &done,
        &fail,
        &env,
        &config,
    );
    assert_eq!(
        result,
        Value::array(vec![
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Number(3.0),
            Value::Number(4.0),
            Value::Number(5.0),
            Value::Number(6.0),
        ])
    );
}

#[test]
fn unbound_identifier_is_a_reference_error() {
    let (interner, env, config) = setup();
    let program = build::ident(interner.intern("a"));
    let signal = match eval_in(&program, &env, &config) {
        Err(signal) => signal,
        Ok(value) => panic!("expected a failure, got {value:?}"),
    };
    assert_eq!(signal.type_tag(), "ReferenceError");
    assert_eq!(signal.message(), "ReferenceError: a is not defined");
}

#[test]
fn throw_in_a_function_body_propagates_as_throw_statement() {
    let (interner, env, config) = setup();
    let f = interner.intern("f");
    // function f() { throw 1 } f()
    let program = build::program(vec![
        build::function_decl(
            f,
            Vec::new(),
            build::block(vec![build::throw_stmt(build::number(1.0))]),
        ),
        build::expr_stmt(build::call(build::ident(f), Vec::new())),
    ]);
    let signal = match eval_in(&program, &env, &config) {
        Err(signal) => signal,
        Ok(value) => panic!("expected a throw, got {value:?}"),
    };
    assert_eq!(signal.type_tag(), "ThrowStatement");
    assert_eq!(signal.catch_value(), Value::Number(1.0));
}
