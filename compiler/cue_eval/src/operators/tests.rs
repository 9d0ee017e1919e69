use super::*;
use pretty_assertions::assert_eq;

fn num(n: f64) -> Value {
    Value::Number(n)
}

#[test]
fn arithmetic_matches_host_semantics() {
    let cases = [
        (BinaryOp::Add, 2.0, 2.0, 4.0),
        (BinaryOp::Sub, 7.0, 2.5, 4.5),
        (BinaryOp::Mul, 3.0, -4.0, -12.0),
        (BinaryOp::Div, 1.0, 4.0, 0.25),
        (BinaryOp::Mod, 7.0, 3.0, 1.0),
        (BinaryOp::Exp, 2.0, 10.0, 1024.0),
    ];
    for (op, a, b, expected) in cases {
        assert_eq!(
            evaluate_binary(op, &num(a), &num(b)).unwrap(),
            num(expected),
            "{a} {} {b}",
            op.as_symbol()
        );
    }
}

#[test]
fn division_by_zero_is_infinity() {
    assert_eq!(
        evaluate_binary(BinaryOp::Div, &num(1.0), &num(0.0)).unwrap(),
        num(f64::INFINITY)
    );
}

#[test]
fn add_concatenates_strings() {
    assert_eq!(
        evaluate_binary(BinaryOp::Add, &Value::string("a"), &num(1.0)).unwrap(),
        Value::string("a1")
    );
    assert_eq!(
        evaluate_binary(BinaryOp::Add, &num(1.5), &Value::string("s")).unwrap(),
        Value::string("1.5s")
    );
}

#[test]
fn comparisons() {
    assert_eq!(
        evaluate_binary(BinaryOp::Lt, &num(1.0), &num(2.0)).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        evaluate_binary(BinaryOp::GtEq, &num(2.0), &num(2.0)).unwrap(),
        Value::Bool(true)
    );
    // String comparison is lexicographic.
    assert_eq!(
        evaluate_binary(BinaryOp::Lt, &Value::string("apple"), &Value::string("pear")).unwrap(),
        Value::Bool(true)
    );
    // NaN compares false both ways.
    assert_eq!(
        evaluate_binary(BinaryOp::Lt, &num(f64::NAN), &num(1.0)).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        evaluate_binary(BinaryOp::GtEq, &num(f64::NAN), &num(1.0)).unwrap(),
        Value::Bool(false)
    );
}

#[test]
fn equality_strict_vs_loose() {
    assert_eq!(
        evaluate_binary(BinaryOp::Eq, &Value::Null, &Value::Undefined).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        evaluate_binary(BinaryOp::StrictEq, &Value::Null, &Value::Undefined).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        evaluate_binary(BinaryOp::StrictNotEq, &num(1.0), &Value::string("1")).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn bitwise_operators_use_int32() {
    assert_eq!(
        evaluate_binary(BinaryOp::BitAnd, &num(6.0), &num(3.0)).unwrap(),
        num(2.0)
    );
    assert_eq!(
        evaluate_binary(BinaryOp::Shl, &num(1.0), &num(33.0)).unwrap(),
        num(2.0)
    );
    assert_eq!(
        evaluate_binary(BinaryOp::Shr, &num(-8.0), &num(1.0)).unwrap(),
        num(-4.0)
    );
}

#[test]
fn unsupported_operators_are_typed_not_implemented() {
    let err = evaluate_binary(BinaryOp::Instanceof, &num(1.0), &num(2.0)).unwrap_err();
    assert_eq!(err.type_tag(), "NotImplemented");
    let err = evaluate_unary(UnaryOp::Delete, &num(1.0)).unwrap_err();
    assert_eq!(err.type_tag(), "NotImplemented");
}

#[test]
fn unary_operators() {
    assert_eq!(evaluate_unary(UnaryOp::Not, &num(0.0)).unwrap(), Value::Bool(true));
    assert_eq!(evaluate_unary(UnaryOp::Neg, &num(2.0)).unwrap(), num(-2.0));
    assert_eq!(
        evaluate_unary(UnaryOp::Typeof, &Value::string("s")).unwrap(),
        Value::string("string")
    );
    assert_eq!(evaluate_unary(UnaryOp::Void, &num(9.0)).unwrap(), Value::Undefined);
    assert_eq!(evaluate_unary(UnaryOp::BitNot, &num(0.0)).unwrap(), num(-1.0));
}
