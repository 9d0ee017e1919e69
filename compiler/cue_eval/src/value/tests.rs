use super::*;
use pretty_assertions::assert_eq;

#[test]
fn truthiness() {
    assert!(!Value::Undefined.is_truthy());
    assert!(!Value::Null.is_truthy());
    assert!(!Value::Number(0.0).is_truthy());
    assert!(!Value::Number(f64::NAN).is_truthy());
    assert!(!Value::string("").is_truthy());
    assert!(Value::Number(-1.0).is_truthy());
    assert!(Value::string("0").is_truthy());
    assert!(Value::array(vec![]).is_truthy());
}

#[test]
fn strict_equality_is_identity_for_aggregates() {
    let a = Value::array(vec![Value::Number(1.0)]);
    let b = Value::array(vec![Value::Number(1.0)]);
    assert!(!a.strict_equals(&b));
    assert!(a.strict_equals(&a.clone()));
}

#[test]
fn loose_equality_coerces() {
    assert!(Value::Null.loose_equals(&Value::Undefined));
    assert!(Value::Number(1.0).loose_equals(&Value::string("1")));
    assert!(Value::Bool(true).loose_equals(&Value::Number(1.0)));
    assert!(!Value::Number(1.0).loose_equals(&Value::string("x")));
}

#[test]
fn number_coercion() {
    assert_eq!(Value::Null.to_number(), 0.0);
    assert_eq!(Value::string(" 42 ").to_number(), 42.0);
    assert_eq!(Value::string("").to_number(), 0.0);
    assert!(Value::Undefined.to_number().is_nan());
    assert!(Value::string("nope").to_number().is_nan());
}

#[test]
fn int32_coercion_wraps() {
    assert_eq!(Value::Number(4_294_967_296.0).to_int32(), 0);
    assert_eq!(Value::Number(2_147_483_648.0).to_int32(), i32::MIN);
    assert_eq!(Value::Number(-1.0).to_int32(), -1);
    assert_eq!(Value::Number(f64::NAN).to_int32(), 0);
}

#[test]
fn numbers_render_without_trailing_fraction() {
    assert_eq!(format_number(1.0), "1");
    assert_eq!(format_number(1.5), "1.5");
    assert_eq!(format_number(-0.0), "-0");
    assert_eq!(format_number(f64::NAN), "NaN");
}

#[test]
fn typeof_names() {
    assert_eq!(Value::Undefined.type_of(), "undefined");
    assert_eq!(Value::Null.type_of(), "object");
    assert_eq!(Value::CallCc.type_of(), "function");
}

#[test]
fn structural_equality_compares_array_contents() {
    let a = Value::array(vec![Value::Number(1.0), Value::string("x")]);
    let b = Value::array(vec![Value::Number(1.0), Value::string("x")]);
    assert_eq!(a, b);
}
