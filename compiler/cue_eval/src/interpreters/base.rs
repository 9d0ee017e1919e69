//! Literals, identifier resolution, and the runtime-derived operations.

use std::rc::Rc;

use cue_ir::{Name, NodeKind, NodeTag};

use crate::interpreters::{dispatch_mismatch, InterpreterMap};
use crate::{
    apply_callcc, evaluate_meta_function, Continuation, EnvRef, ErrorContinuation, EvalConfig,
    EvalItem, NativeFunction, Signal, Value,
};

pub(crate) fn register(map: &mut InterpreterMap) {
    map.set(NodeTag::NumberLiteral, literal);
    map.set(NodeTag::StringLiteral, literal);
    map.set(NodeTag::BooleanLiteral, literal);
    map.set(NodeTag::NullLiteral, literal);
    map.set(NodeTag::Identifier, identifier);
    map.set(NodeTag::Apply, apply);
    map.set(NodeTag::GetProperty, get_property);
    map.set(NodeTag::SetProperty, set_property);
}

fn literal(
    item: &EvalItem,
    c: &Continuation,
    cerr: &ErrorContinuation,
    _env: &EnvRef,
    _config: &EvalConfig,
) {
    let EvalItem::Syntax(node) = item else {
        cerr(dispatch_mismatch(item));
        return;
    };
    match &node.kind {
        NodeKind::Number(n) => c(Value::Number(*n)),
        NodeKind::Str(s) => c(Value::Str(s.clone())),
        NodeKind::Bool(b) => c(Value::Bool(*b)),
        NodeKind::Null => c(Value::Null),
        _ => cerr(dispatch_mismatch(item)),
    }
}

fn identifier(
    item: &EvalItem,
    c: &Continuation,
    cerr: &ErrorContinuation,
    env: &EnvRef,
    config: &EvalConfig,
) {
    let EvalItem::Syntax(node) = item else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let NodeKind::Identifier(name) = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    match env.get_value(*name, &config.interner) {
        Ok(value) => c(value),
        Err(signal) => cerr(signal),
    }
}

/// Primitive application.
///
/// Closures run through [`evaluate_meta_function`]; native functions return
/// synchronously and their `Result` maps onto the two continuations; host
/// receivers own both continuations outright; the `callcc` marker routes to
/// continuation capture.
fn apply(
    item: &EvalItem,
    c: &Continuation,
    cerr: &ErrorContinuation,
    env: &EnvRef,
    config: &EvalConfig,
) {
    let EvalItem::Apply(op) = item else {
        cerr(dispatch_mismatch(item));
        return;
    };
    match &op.target {
        Value::Function(f) => {
            evaluate_meta_function(f, op.this_value.clone(), op.args.clone(), c.clone(), cerr.clone());
        }
        Value::Native(native) => match native.call(&op.this_value, &op.args) {
            Ok(value) => c(value),
            Err(signal) => cerr(signal),
        },
        Value::Receiver(receiver) => {
            let value = op.args.first().cloned().unwrap_or(Value::Undefined);
            receiver.invoke(value, c, cerr, env, config);
        }
        Value::CallCc => apply_callcc(&op.args, env, config, c.clone(), cerr.clone()),
        other => cerr(Signal::type_error(format!(
            "{} is not a function",
            other.type_name()
        ))),
    }
}

fn get_property(
    item: &EvalItem,
    c: &Continuation,
    cerr: &ErrorContinuation,
    _env: &EnvRef,
    config: &EvalConfig,
) {
    let EvalItem::GetProperty(op) = item else {
        cerr(dispatch_mismatch(item));
        return;
    };
    match get_property_value(&op.object, op.property, config) {
        Ok(value) => c(value),
        Err(signal) => cerr(signal),
    }
}

/// Property read semantics shared by `GetProperty` and compound operations.
pub(crate) fn get_property_value(
    object: &Value,
    property: Name,
    config: &EvalConfig,
) -> Result<Value, Signal> {
    match object {
        Value::Undefined | Value::Null => Err(Signal::type_error(format!(
            "cannot read property {} of {}",
            config.interner.display(property),
            object.type_name()
        ))),
        Value::Object(map) => Ok(map
            .borrow()
            .get(&property)
            .cloned()
            .unwrap_or(Value::Undefined)),
        Value::Array(items) => {
            if property == config.names.length {
                #[expect(clippy::cast_precision_loss, reason = "array lengths fit in f64")]
                return Ok(Value::Number(items.borrow().len() as f64));
            }
            if property == config.names.push {
                return Ok(array_push(items));
            }
            match index_key(property, config) {
                Some(index) => Ok(items
                    .borrow()
                    .get(index)
                    .cloned()
                    .unwrap_or(Value::Undefined)),
                None => Ok(Value::Undefined),
            }
        }
        Value::Str(s) => {
            if property == config.names.length {
                #[expect(clippy::cast_precision_loss, reason = "string lengths fit in f64")]
                return Ok(Value::Number(s.chars().count() as f64));
            }
            match index_key(property, config) {
                Some(index) => Ok(s
                    .chars()
                    .nth(index)
                    .map_or(Value::Undefined, |ch| Value::string(ch.to_string()))),
                None => Ok(Value::Undefined),
            }
        }
        _ => Ok(Value::Undefined),
    }
}

fn set_property(
    item: &EvalItem,
    c: &Continuation,
    cerr: &ErrorContinuation,
    _env: &EnvRef,
    config: &EvalConfig,
) {
    let EvalItem::SetProperty(op) = item else {
        cerr(dispatch_mismatch(item));
        return;
    };
    match &op.object {
        Value::Object(map) => {
            map.borrow_mut().insert(op.property, op.value.clone());
            c(op.value.clone());
        }
        Value::Array(items) => {
            if op.property == config.names.length {
                let n = op.value.to_number();
                #[expect(clippy::cast_precision_loss, reason = "array lengths fit in f64")]
                let valid = n >= 0.0 && n.trunc() == n && n < usize::MAX as f64;
                if !valid {
                    cerr(Signal::range_error("invalid array length"));
                    return;
                }
                #[expect(clippy::cast_possible_truncation, reason = "validated above")]
                #[expect(clippy::cast_sign_loss, reason = "validated above")]
                items.borrow_mut().resize(n as usize, Value::Undefined);
                c(op.value.clone());
            } else if let Some(index) = index_key(op.property, config) {
                let mut items = items.borrow_mut();
                if index >= items.len() {
                    items.resize(index + 1, Value::Undefined);
                }
                items[index] = op.value.clone();
                drop(items);
                c(op.value.clone());
            } else {
                cerr(Signal::not_implemented(format!(
                    "named property {} on array",
                    config.interner.display(op.property)
                )));
            }
        }
        other => cerr(Signal::type_error(format!(
            "cannot set property on {}",
            other.type_name()
        ))),
    }
}

/// `push` bound to its array: appends every argument, answers the new
/// length.
fn array_push(items: &crate::ArrayRef) -> Value {
    let items = Rc::clone(items);
    Value::Native(NativeFunction::new("push", move |_this, args| {
        let mut items = items.borrow_mut();
        items.extend(args.iter().cloned());
        #[expect(clippy::cast_precision_loss, reason = "array lengths fit in f64")]
        let length = items.len() as f64;
        Ok(Value::Number(length))
    }))
}

/// Resolve a property name to an array/string index, when it is one.
fn index_key(property: Name, config: &EvalConfig) -> Option<usize> {
    config
        .interner
        .resolve(property)
        .and_then(|s| s.parse::<usize>().ok())
}
