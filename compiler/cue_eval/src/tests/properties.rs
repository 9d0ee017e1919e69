//! Property tests: the operator table against host arithmetic, and
//! resolution failures against the never-undefined rule.

use cue_ir::{build, BinaryOp, UnaryOp};
use proptest::prelude::*;

use super::*;
use crate::{evaluate_binary, evaluate_unary};

/// Extract the number a successful evaluation produced.
fn number(outcome: Result<Value, Signal>) -> f64 {
    match outcome {
        Ok(Value::Number(n)) => n,
        other => panic!("expected a number, got {other:?}"),
    }
}

/// Bitwise equality so `NaN == NaN` and `-0.0 != 0.0` distinctions hold.
fn same_f64(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

proptest! {
    /// Arithmetic over number operands is exactly the host's `f64`
    /// arithmetic, whether computed directly or through a full dispatch.
    #[test]
    fn arithmetic_matches_host_semantics(a in any::<f64>(), b in any::<f64>()) {
        let cases: [(BinaryOp, f64); 5] = [
            (BinaryOp::Add, a + b),
            (BinaryOp::Sub, a - b),
            (BinaryOp::Mul, a * b),
            (BinaryOp::Div, a / b),
            (BinaryOp::Mod, a % b),
        ];
        for (op, expected) in cases {
            let direct = evaluate_binary(op, &Value::Number(a), &Value::Number(b));
            let Ok(Value::Number(direct)) = direct else {
                return Err(TestCaseError::fail(format!("{op:?} failed: {direct:?}")));
            };
            prop_assert!(same_f64(direct, expected), "{a} {} {b}", op.as_symbol());

            let (_, env, config) = setup();
            let node = build::binary(op, build::number(a), build::number(b));
            let evaluated = number(eval_in(&node, &env, &config));
            prop_assert!(same_f64(evaluated, expected), "dispatch {a} {} {b}", op.as_symbol());
        }
    }

    /// Comparisons agree with the host's partial order; any `NaN` operand
    /// makes every comparison false.
    #[test]
    fn comparisons_match_host_semantics(a in any::<f64>(), b in any::<f64>()) {
        let cases: [(BinaryOp, bool); 4] = [
            (BinaryOp::Lt, a < b),
            (BinaryOp::LtEq, a <= b),
            (BinaryOp::Gt, a > b),
            (BinaryOp::GtEq, a >= b),
        ];
        for (op, expected) in cases {
            let outcome = evaluate_binary(op, &Value::Number(a), &Value::Number(b));
            prop_assert_eq!(outcome, Ok(Value::Bool(expected)), "{} {} {}", a, op.as_symbol(), b);
        }
    }

    /// Negation round-trips through the unary table.
    #[test]
    fn negation_matches_host_semantics(a in any::<f64>()) {
        let Ok(Value::Number(negated)) = evaluate_unary(UnaryOp::Neg, &Value::Number(a)) else {
            return Err(TestCaseError::fail("negation failed"));
        };
        prop_assert!(same_f64(negated, -a));
    }

    /// Reading any unbound identifier is a `ReferenceError`; it never
    /// quietly yields `undefined`.
    #[test]
    fn unbound_identifiers_always_fail(name in "[a-z][a-z0-9_]{0,11}") {
        let (interner, env, config) = setup();
        let node = build::ident(interner.intern(&name));
        match eval_in(&node, &env, &config) {
            Err(signal) => prop_assert_eq!(signal.type_tag(), "ReferenceError"),
            Ok(value) => {
                return Err(TestCaseError::fail(format!("resolved to {value:?}")));
            }
        }
    }

    /// An array literal's length is its syntactic length, holes included.
    #[test]
    fn array_literal_length_is_syntactic_length(
        shape in proptest::collection::vec(proptest::option::of(any::<f64>()), 0..16)
    ) {
        let elements = shape
            .iter()
            .map(|slot| slot.map(build::number))
            .collect::<Vec<_>>();
        let (_, env, config) = setup();
        let outcome = eval_in(&build::array(elements), &env, &config);
        let Ok(Value::Array(items)) = outcome else {
            return Err(TestCaseError::fail(format!("expected an array, got {outcome:?}")));
        };
        prop_assert_eq!(items.borrow().len(), shape.len());
        for (slot, value) in shape.iter().zip(items.borrow().iter()) {
            match slot {
                Some(n) => prop_assert!(matches!(value, Value::Number(v) if same_f64(*v, *n))),
                None => prop_assert!(matches!(value, Value::Undefined)),
            }
        }
    }

    /// Resuming a captured continuation `n` times completes the surrounding
    /// expression `n` times.
    #[test]
    fn each_resumption_completes_the_expression(n in 1usize..8) {
        use crate::{install_callcc, lifted, Continuation, ErrorContinuation, ReceiverFunction};

        let (interner, env, config) = setup();
        install_callcc(&env, &interner);

        let stashed: Rc<RefCell<Option<Value>>> = Rc::new(RefCell::new(None));
        let stash = Rc::clone(&stashed);
        env.define(
            interner.intern("receiver"),
            Value::Receiver(ReceiverFunction::new("stash", move |_value, c, _cerr, _env, _config| {
                *stash.borrow_mut() = Some(lifted(c));
            })),
        );

        // 1 + callcc(receiver)
        let node = build::binary(
            BinaryOp::Add,
            build::number(1.0),
            build::call(
                build::ident(interner.intern("callcc")),
                vec![build::ident(interner.intern("receiver"))],
            ),
        );
        let outcomes = eval_recording(&node, &env, &config);
        prop_assert!(outcomes.borrow().is_empty());

        let Some(Value::Receiver(k)) = stashed.borrow().clone() else {
            return Err(TestCaseError::fail("no continuation captured"));
        };
        let done: Continuation = Rc::new(|_| {});
        let fail: ErrorContinuation = Rc::new(|signal| panic!("unexpected signal {signal:?}"));
        for i in 0..n {
            #[expect(clippy::cast_precision_loss, reason = "test indices are tiny")]
            let resumed = Value::Number(i as f64);
            k.invoke(resumed, &done, &fail, &env, &config);
        }
        let outcomes = outcomes.borrow();
        prop_assert_eq!(outcomes.len(), n);
        for (i, outcome) in outcomes.iter().enumerate() {
            #[expect(clippy::cast_precision_loss, reason = "test indices are tiny")]
            let expected = Value::Number(1.0 + i as f64);
            prop_assert_eq!(outcome.clone(), Ok(expected));
        }
    }
}
