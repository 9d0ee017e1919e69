//! Binary and unary operator evaluation.
//!
//! Direct enum dispatch over a fixed operator set. Every `match` is
//! exhaustive; operators the engine does not support produce the typed
//! not-implemented signal rather than a crash.

use cue_ir::{BinaryOp, UnaryOp};

use crate::{Signal, Value};

/// Evaluate a binary operator over two values.
pub fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, Signal> {
    match op {
        // `+` concatenates when either side is a string.
        BinaryOp::Add => match (left, right) {
            (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::string(format!(
                "{}{}",
                left.to_display_string(),
                right.to_display_string()
            ))),
            _ => Ok(Value::Number(left.to_number() + right.to_number())),
        },
        BinaryOp::Sub => Ok(Value::Number(left.to_number() - right.to_number())),
        BinaryOp::Mul => Ok(Value::Number(left.to_number() * right.to_number())),
        BinaryOp::Div => Ok(Value::Number(left.to_number() / right.to_number())),
        BinaryOp::Mod => Ok(Value::Number(left.to_number() % right.to_number())),
        BinaryOp::Exp => Ok(Value::Number(left.to_number().powf(right.to_number()))),

        BinaryOp::Eq => Ok(Value::Bool(left.loose_equals(right))),
        BinaryOp::NotEq => Ok(Value::Bool(!left.loose_equals(right))),
        BinaryOp::StrictEq => Ok(Value::Bool(left.strict_equals(right))),
        BinaryOp::StrictNotEq => Ok(Value::Bool(!left.strict_equals(right))),

        BinaryOp::Lt => compare(left, right, |o| o == std::cmp::Ordering::Less),
        BinaryOp::LtEq => compare(left, right, |o| o != std::cmp::Ordering::Greater),
        BinaryOp::Gt => compare(left, right, |o| o == std::cmp::Ordering::Greater),
        BinaryOp::GtEq => compare(left, right, |o| o != std::cmp::Ordering::Less),

        BinaryOp::BitAnd => Ok(int32_op(left, right, |a, b| a & b)),
        BinaryOp::BitOr => Ok(int32_op(left, right, |a, b| a | b)),
        BinaryOp::BitXor => Ok(int32_op(left, right, |a, b| a ^ b)),
        BinaryOp::Shl => Ok(int32_op(left, right, |a, b| a.wrapping_shl(shift_count(b)))),
        BinaryOp::Shr => Ok(int32_op(left, right, |a, b| a.wrapping_shr(shift_count(b)))),

        BinaryOp::UnsignedShr | BinaryOp::In | BinaryOp::Instanceof => Err(
            Signal::not_implemented(format!("binary operator {}", op.as_symbol())),
        ),
    }
}

/// Relational comparison: string-to-string compares lexicographically,
/// everything else numerically. `NaN` on either side is always false.
fn compare(
    left: &Value,
    right: &Value,
    accept: impl Fn(std::cmp::Ordering) -> bool,
) -> Result<Value, Signal> {
    if let (Value::Str(a), Value::Str(b)) = (left, right) {
        return Ok(Value::Bool(accept(a.cmp(b))));
    }
    let (a, b) = (left.to_number(), right.to_number());
    Ok(Value::Bool(
        a.partial_cmp(&b).is_some_and(accept),
    ))
}

fn int32_op(left: &Value, right: &Value, f: impl Fn(i32, i32) -> i32) -> Value {
    Value::Number(f64::from(f(left.to_int32(), right.to_int32())))
}

/// Shift counts take the low five bits of the right operand.
fn shift_count(b: i32) -> u32 {
    u32::try_from(b & 31).unwrap_or(0)
}

/// Evaluate a unary operator.
///
/// `typeof` on an unresolved identifier never reaches here; the
/// `UnaryExpression` interpreter intercepts the `ReferenceError` first.
pub fn evaluate_unary(op: UnaryOp, value: &Value) -> Result<Value, Signal> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
        UnaryOp::Neg => Ok(Value::Number(-value.to_number())),
        UnaryOp::Pos => Ok(Value::Number(value.to_number())),
        UnaryOp::Typeof => Ok(Value::string(value.type_of())),
        UnaryOp::Void => Ok(Value::Undefined),
        UnaryOp::BitNot => Ok(Value::Number(f64::from(!value.to_int32()))),
        UnaryOp::Delete => Err(Signal::not_implemented("unary operator delete")),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
