//! Runtime values.
//!
//! Dynamically typed values in the style of the surface language. Aggregates
//! (arrays, objects) and functions are `Rc`-backed so that environments,
//! closures, and captured continuations can share them freely; the engine is
//! single-threaded, so interior mutability needs no locking.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use cue_ir::{Name, SharedInterner};
use rustc_hash::FxHashMap;

use crate::{Continuation, EnvRef, ErrorContinuation, EvalConfig, MetaFunction, Signal};

/// Shared array storage.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

/// Shared object storage (property map keyed by interned names).
pub type ObjectRef = Rc<RefCell<FxHashMap<Name, Value>>>;

/// Host function signature: `(this, args) -> value | signal`.
pub type NativeFn = dyn Fn(&Value, &[Value]) -> Result<Value, Signal>;

/// Host function value.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    f: Rc<NativeFn>,
}

impl NativeFunction {
    pub fn new(
        name: &'static str,
        f: impl Fn(&Value, &[Value]) -> Result<Value, Signal> + 'static,
    ) -> Self {
        NativeFunction { name, f: Rc::new(f) }
    }

    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value, Signal> {
        (self.f)(this, args)
    }

    fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.f).cast::<()>() as usize
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

/// Receiver signature for `callcc`: the receiver owns the captured
/// continuations and may fire either, any number of times, now or later.
pub type ReceiverFn = dyn Fn(Value, &Continuation, &ErrorContinuation, &EnvRef, &EvalConfig);

/// Host receiver value for `callcc` (and `lifted` wrappers).
#[derive(Clone)]
pub struct ReceiverFunction {
    pub name: &'static str,
    f: Rc<ReceiverFn>,
}

impl ReceiverFunction {
    pub fn new(
        name: &'static str,
        f: impl Fn(Value, &Continuation, &ErrorContinuation, &EnvRef, &EvalConfig) + 'static,
    ) -> Self {
        ReceiverFunction { name, f: Rc::new(f) }
    }

    pub fn invoke(
        &self,
        value: Value,
        c: &Continuation,
        cerr: &ErrorContinuation,
        env: &EnvRef,
        config: &EvalConfig,
    ) {
        (self.f)(value, c, cerr, env, config);
    }

    fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.f).cast::<()>() as usize
    }
}

impl fmt::Debug for ReceiverFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReceiverFunction({})", self.name)
    }
}

/// A runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Array(ArrayRef),
    Object(ObjectRef),
    /// Closure: function node + defining environment.
    Function(Rc<MetaFunction>),
    Native(NativeFunction),
    Receiver(ReceiverFunction),
    /// The reserved `callcc` marker, recognized by referential identity at
    /// call sites and never executed as an ordinary function.
    CallCc,
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Value {
        Value::Str(Rc::from(s.as_ref()))
    }

    pub fn array(values: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(values)))
    }

    pub fn object() -> Value {
        Value::Object(Rc::new(RefCell::new(FxHashMap::default())))
    }

    /// Truthiness per the surface language.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Function(_) | Value::Native(_) | Value::Receiver(_) | Value::CallCc
        )
    }

    /// `typeof` result.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Function(_) | Value::Native(_) | Value::Receiver(_) | Value::CallCc => {
                "function"
            }
        }
    }

    /// Type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
            Value::Native(_) => "native function",
            Value::Receiver(_) => "receiver",
            Value::CallCc => "callcc",
        }
    }

    /// Identity for reference types; `None` for primitives.
    fn ptr_id(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(Rc::as_ptr(a).cast::<()>() as usize),
            Value::Object(o) => Some(Rc::as_ptr(o).cast::<()>() as usize),
            Value::Function(f) => Some(Rc::as_ptr(f).cast::<()>() as usize),
            Value::Native(f) => Some(f.ptr_id()),
            Value::Receiver(f) => Some(f.ptr_id()),
            _ => None,
        }
    }

    /// `===`: same type and value; reference identity for aggregates.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::CallCc, Value::CallCc) => true,
            _ => match (self.ptr_id(), other.ptr_id()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// `==`: strict equality plus the nullish pair and number/string/bool
    /// coercions. Aggregates still compare by identity.
    pub fn loose_equals(&self, other: &Value) -> bool {
        if self.strict_equals(other) {
            return true;
        }
        match (self, other) {
            (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
            (Value::Number(n), Value::Str(s)) | (Value::Str(s), Value::Number(n)) => {
                s.trim().parse::<f64>().is_ok_and(|parsed| parsed == *n)
            }
            (Value::Bool(b), other) | (other, Value::Bool(b)) => {
                Value::Number(f64::from(u8::from(*b))).loose_equals(other)
            }
            _ => false,
        }
    }

    /// Numeric coercion (`NaN` where the language says so).
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
            _ => f64::NAN,
        }
    }

    /// 32-bit integer coercion for bitwise operators.
    pub fn to_int32(&self) -> i32 {
        let n = self.to_number();
        if !n.is_finite() {
            return 0;
        }
        // Wrap modulo 2^32 like ToInt32.
        let m = n.trunc() % 4_294_967_296.0;
        let m = if m < 0.0 { m + 4_294_967_296.0 } else { m };
        #[expect(clippy::cast_possible_truncation, reason = "m is within i32 range")]
        let wrapped = if m >= 2_147_483_648.0 {
            (m - 4_294_967_296.0) as i32
        } else {
            m as i32
        };
        wrapped
    }

    /// String key an object index expression resolves to.
    pub fn to_property_key(&self, interner: &SharedInterner) -> Name {
        interner.intern(&self.to_display_string())
    }

    /// String conversion used by `+`, template literals, and property keys.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::Str(s) => s.to_string(),
            other => format!("{other}"),
        }
    }
}

/// Number formatting: integral values render without a fraction, like the
/// surface language ("1", not "1.0").
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == n.trunc() && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

impl PartialEq for Value {
    /// Structural equality for tests and hosts: aggregates compare by
    /// contents, functions by identity. This is not `==` of the surface
    /// language; see [`Value::loose_equals`] / [`Value::strict_equals`].
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (Value::Object(a), Value::Object(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            _ => self.ptr_id().zip(other.ptr_id()).is_some_and(|(a, b)| a == b)
                || matches!((self, other), (Value::CallCc, Value::CallCc)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Str(s) => write!(f, "{s}"),
            Value::Array(a) => {
                write!(f, "[")?;
                for (i, v) in a.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Object(_) => write!(f, "[object Object]"),
            Value::Function(_) => write!(f, "[function]"),
            Value::Native(n) => write!(f, "[native {}]", n.name),
            Value::Receiver(r) => write!(f, "[receiver {}]", r.name),
            Value::CallCc => write!(f, "[callcc]"),
        }
    }
}

#[cfg(test)]
mod tests;
