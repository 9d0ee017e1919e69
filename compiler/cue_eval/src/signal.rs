//! Evaluation signals.
//!
//! The engine has exactly one error channel, and everything non-local rides
//! it: real failures, `return`, `throw`, `break`, `continue`, and the typed
//! not-implemented marker. Every consumer (`TryStatement`, loops, function
//! invocation) pattern-matches the variant it intercepts and re-raises the
//! rest unchanged.

use cue_ir::{Name, NodeRef, ScriptId, Session, Span};

use crate::Value;

/// Kinds of real evaluation failures.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExceptionKind {
    ReferenceError,
    TypeError,
    RangeError,
    /// Host-level failure surfaced by a native function.
    Runtime,
    /// Parse failure forwarded from the external parser boundary.
    Parse,
}

impl ExceptionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReferenceError => "ReferenceError",
            Self::TypeError => "TypeError",
            Self::RangeError => "RangeError",
            Self::Runtime => "Error",
            Self::Parse => "SyntaxError",
        }
    }
}

/// A located evaluation failure.
#[derive(Clone, Debug)]
pub struct EvalException {
    pub kind: ExceptionKind,
    pub message: String,
    /// The value carried by the failure, when one exists (host throws).
    pub value: Option<Value>,
    /// The node being evaluated when the failure surfaced.
    pub location: Option<NodeRef>,
    pub script: Option<ScriptId>,
}

impl EvalException {
    pub fn new(kind: ExceptionKind, message: impl Into<String>) -> Self {
        EvalException {
            kind,
            message: message.into(),
            value: None,
            location: None,
            script: None,
        }
    }

    /// The value a `catch` clause binds for this exception.
    pub fn catch_value(&self) -> Value {
        match &self.value {
            Some(value) => value.clone(),
            None => Value::string(format!("{}: {}", self.kind.as_str(), self.message)),
        }
    }
}

/// A value routed through the error continuation.
///
/// `Error` is a true failure; the rest are control transfer. `EmptyNode`
/// reports access to a missing optional child node.
#[derive(Clone, Debug)]
pub enum Signal {
    Error(EvalException),
    Return(Value),
    Throw {
        value: Value,
        location: Option<NodeRef>,
    },
    Break {
        label: Option<Name>,
    },
    Continue {
        label: Option<Name>,
    },
    NotImplemented {
        message: String,
        location: Option<NodeRef>,
    },
    EmptyNode,
}

impl Signal {
    pub fn reference_error(message: impl Into<String>) -> Signal {
        Signal::Error(EvalException::new(ExceptionKind::ReferenceError, message))
    }

    pub fn type_error(message: impl Into<String>) -> Signal {
        Signal::Error(EvalException::new(ExceptionKind::TypeError, message))
    }

    pub fn range_error(message: impl Into<String>) -> Signal {
        Signal::Error(EvalException::new(ExceptionKind::RangeError, message))
    }

    pub fn runtime_error(message: impl Into<String>) -> Signal {
        Signal::Error(EvalException::new(ExceptionKind::Runtime, message))
    }

    pub fn not_implemented(message: impl Into<String>) -> Signal {
        Signal::NotImplemented {
            message: message.into(),
            location: None,
        }
    }

    /// The signal's type tag as hosts and tests observe it.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Signal::Error(e) => e.kind.as_str(),
            Signal::Return(_) => "ReturnStatement",
            Signal::Throw { .. } => "ThrowStatement",
            Signal::Break { .. } => "BreakStatement",
            Signal::Continue { .. } => "ContinueStatement",
            Signal::NotImplemented { .. } => "NotImplemented",
            Signal::EmptyNode => "EmptyNode",
        }
    }

    /// Whether a `catch` clause intercepts this signal.
    ///
    /// Only real failures and `throw` are catchable; `return`/`break`/
    /// `continue` pass through `try` (after `finally`) unchanged.
    pub fn is_catchable(&self) -> bool {
        matches!(
            self,
            Signal::Error(_) | Signal::Throw { .. } | Signal::NotImplemented { .. }
        )
    }

    /// The value a `catch` clause binds for this signal.
    pub fn catch_value(&self) -> Value {
        match self {
            Signal::Throw { value, .. } => value.clone(),
            Signal::Error(e) => e.catch_value(),
            Signal::NotImplemented { message, .. } => {
                Value::string(format!("NotImplemented: {message}"))
            }
            _ => Value::Undefined,
        }
    }

    /// Attach a location and script where they are still missing.
    ///
    /// Interpreters call continuations with bare signals; the driver fills
    /// in the originating node on the way out, innermost node winning.
    #[must_use]
    pub fn located(self, node: &NodeRef, script: Option<ScriptId>) -> Signal {
        match self {
            Signal::Error(mut e) => {
                if e.location.is_none() {
                    e.location = Some(node.clone());
                }
                if e.script.is_none() {
                    e.script = script;
                }
                Signal::Error(e)
            }
            Signal::Throw {
                value,
                location: None,
            } => Signal::Throw {
                value,
                location: Some(node.clone()),
            },
            Signal::NotImplemented {
                message,
                location: None,
            } => Signal::NotImplemented {
                message,
                location: Some(node.clone()),
            },
            other => other,
        }
    }

    /// Human-readable message for drivers and logs.
    pub fn message(&self) -> String {
        match self {
            Signal::Error(e) => format!("{}: {}", e.kind.as_str(), e.message),
            Signal::Return(_) => "return outside of function".to_string(),
            Signal::Throw { value, .. } => format!("uncaught {value}"),
            Signal::Break { .. } => "break outside of loop".to_string(),
            Signal::Continue { .. } => "continue outside of loop".to_string(),
            Signal::NotImplemented { message, .. } => format!("not implemented: {message}"),
            Signal::EmptyNode => "missing node".to_string(),
        }
    }

    /// Source range of the originating node, when known.
    pub fn span(&self) -> Option<Span> {
        match self {
            Signal::Error(e) => e.location.as_ref().and_then(|n| n.span),
            Signal::Throw { location, .. } | Signal::NotImplemented { location, .. } => {
                location.as_ref().and_then(|n| n.span)
            }
            _ => None,
        }
    }

    /// Render `url:line:col - message` with a `~~~` underline, resolving
    /// the script through the session registry.
    pub fn render(&self, session: &Session) -> String {
        let script = match self {
            Signal::Error(e) => e.script.and_then(|id| session.script(id)),
            _ => None,
        };
        cue_diagnostic::render_located(&self.message(), self.span(), script.as_ref())
    }
}

impl PartialEq for EvalException {
    /// Structural equality for tests and hosts; source locations are
    /// ignored.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.message == other.message && self.value == other.value
    }
}

impl PartialEq for Signal {
    /// Structural equality for tests and hosts; source locations are
    /// ignored.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Signal::Error(a), Signal::Error(b)) => a == b,
            (Signal::Return(a), Signal::Return(b)) => a == b,
            (Signal::Throw { value: a, .. }, Signal::Throw { value: b, .. }) => a == b,
            (Signal::Break { label: a }, Signal::Break { label: b })
            | (Signal::Continue { label: a }, Signal::Continue { label: b }) => a == b,
            (
                Signal::NotImplemented { message: a, .. },
                Signal::NotImplemented { message: b, .. },
            ) => a == b,
            (Signal::EmptyNode, Signal::EmptyNode) => true,
            _ => false,
        }
    }
}
