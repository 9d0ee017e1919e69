//! The evaluation driver.
//!
//! `evaluate` looks up a node's interpreter, fires the interceptor's enter
//! event, and hands the actual work to the config's scheduler with the
//! success/error continuations wired to fire the exit event on the way out.
//!
//! Interpreters never return values; they call exactly one of their two
//! continuations exactly once per activation. A continuation may outlive
//! the activation (retained by a `callcc` receiver) and fire again later —
//! the driver's wrappers are plain `Rc` closures, so multi-shot resumption
//! needs no engine bookkeeping.

use std::cell::RefCell;
use std::rc::Rc;

use cue_ir::{Name, NodeRef, NodeTag};
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::{Continuation, EnvRef, ErrorContinuation, EvalConfig, Phase, Signal, Value};

/// Primitive application: `target(args)` with a `this` value.
///
/// Derived at call sites and dispatched through the interpreter table so
/// hosts can override application semantics.
#[derive(Clone, Debug)]
pub struct ApplyOp {
    pub target: Value,
    pub this_value: Value,
    pub args: Vec<Value>,
    /// The call-site node, for locations and interception.
    pub node: NodeRef,
}

/// Primitive property read: `object[property]`.
#[derive(Clone, Debug)]
pub struct GetPropertyOp {
    pub object: Value,
    pub property: Name,
    pub node: NodeRef,
}

/// Primitive property write: `object[property] = value`.
#[derive(Clone, Debug)]
pub struct SetPropertyOp {
    pub object: Value,
    pub property: Name,
    pub value: Value,
    pub node: NodeRef,
}

/// A unit of dispatch: either a syntax node or a runtime-derived primitive
/// operation attached to one.
#[derive(Clone, Debug)]
pub enum EvalItem {
    Syntax(NodeRef),
    Apply(ApplyOp),
    GetProperty(GetPropertyOp),
    SetProperty(SetPropertyOp),
}

impl EvalItem {
    /// The tag keying the interpreter table.
    pub fn tag(&self) -> NodeTag {
        match self {
            EvalItem::Syntax(node) => node.tag(),
            EvalItem::Apply(_) => NodeTag::Apply,
            EvalItem::GetProperty(_) => NodeTag::GetProperty,
            EvalItem::SetProperty(_) => NodeTag::SetProperty,
        }
    }

    /// The syntax node this item originates from.
    pub fn node(&self) -> &NodeRef {
        match self {
            EvalItem::Syntax(node) => node,
            EvalItem::Apply(op) => &op.node,
            EvalItem::GetProperty(op) => &op.node,
            EvalItem::SetProperty(op) => &op.node,
        }
    }
}

/// A node interpreter. Must call exactly one of the two continuations
/// exactly once per activation.
pub type InterpreterFn =
    Rc<dyn Fn(&EvalItem, &Continuation, &ErrorContinuation, &EnvRef, &EvalConfig)>;

fn intercept(config: &EvalConfig, phase: Phase, node: &NodeRef, env: &EnvRef, value: Option<&Value>) {
    if let Some(interceptor) = &config.interceptor {
        interceptor(phase, node, env, value);
    }
}

/// Evaluate one item under the config's scheduler.
pub fn evaluate(
    item: EvalItem,
    env: &EnvRef,
    config: &EvalConfig,
    c: Continuation,
    cerr: ErrorContinuation,
) {
    let tag = item.tag();
    let Some(interpreter) = config.interpreters.lookup(tag) else {
        cerr(Signal::NotImplemented {
            message: format!("no interpreter for {}", tag.as_str()),
            location: Some(item.node().clone()),
        });
        return;
    };

    trace!(node = tag.as_str(), "evaluate");
    let node = item.node().clone();
    intercept(config, Phase::Enter, &node, env, None);

    let success: Continuation = {
        let config = config.clone();
        let node = node.clone();
        let env = env.clone();
        Rc::new(move |value| {
            intercept(&config, Phase::Exit, &node, &env, Some(&value));
            c(value);
        })
    };
    let error: ErrorContinuation = {
        let config = config.clone();
        let env = env.clone();
        Rc::new(move |signal| {
            let signal = signal.located(&node, config.script_id());
            intercept(&config, Phase::Exit, &node, &env, None);
            cerr(signal);
        })
    };

    let env = env.clone();
    let run_config = config.clone();
    (config.schedule)(Box::new(move || {
        interpreter(&item, &success, &error, &env, &run_config);
    }));
}

/// Evaluate a syntax node.
pub fn evaluate_node(
    node: &NodeRef,
    env: &EnvRef,
    config: &EvalConfig,
    c: Continuation,
    cerr: ErrorContinuation,
) {
    evaluate(EvalItem::Syntax(node.clone()), env, config, c, cerr);
}

/// Continuation receiving an ordered array of results.
pub type ArrayContinuation = Rc<dyn Fn(Vec<Value>)>;

struct ArrayLoop {
    items: Vec<Option<NodeRef>>,
    env: EnvRef,
    config: EvalConfig,
    c: ArrayContinuation,
    cerr: ErrorContinuation,
    results: RefCell<Vec<Value>>,
    /// Indices whose continuation has fired at least once. A second firing
    /// (multi-shot resumption into the middle of the array) truncates the
    /// accumulator back to that index, discarding stale tail results.
    visited: RefCell<FxHashSet<usize>>,
}

impl ArrayLoop {
    fn record(&self, index: usize, value: Value) {
        let mut results = self.results.borrow_mut();
        if self.visited.borrow().contains(&index) {
            results.truncate(index);
        }
        results.push(value);
        self.visited.borrow_mut().insert(index);
    }

    fn advance(self: &Rc<Self>, next_index: usize) {
        let this = Rc::clone(self);
        (self.config.schedule)(Box::new(move || this.visit(next_index)));
    }

    fn visit(self: &Rc<Self>, index: usize) {
        if index >= self.items.len() {
            (self.c)(self.results.borrow().clone());
            return;
        }
        match &self.items[index] {
            // A sparse-literal hole advances the index without evaluating
            // anything; the slot stays undefined so the accumulated length
            // always equals the syntactic length.
            None => {
                self.record(index, Value::Undefined);
                self.advance(index + 1);
            }
            Some(node) => {
                let this = Rc::clone(self);
                let success: Continuation = Rc::new(move |value| {
                    this.record(index, value);
                    this.advance(index + 1);
                });
                evaluate_node(node, &self.env, &self.config, success, self.cerr.clone());
            }
        }
    }
}

/// Evaluate sub-nodes left-to-right, accumulating results in index order.
///
/// Each element's evaluation is scheduled through the config's scheduler.
/// Re-entrant indices (a continuation fired again by `callcc`) truncate
/// the accumulator so the final result is coherent and order-respecting.
pub fn evaluate_array(
    items: Vec<Option<NodeRef>>,
    env: &EnvRef,
    config: &EvalConfig,
    c: ArrayContinuation,
    cerr: ErrorContinuation,
) {
    let array_loop = Rc::new(ArrayLoop {
        items,
        env: env.clone(),
        config: config.clone(),
        c,
        cerr,
        results: RefCell::new(Vec::new()),
        visited: RefCell::new(FxHashSet::default()),
    });
    array_loop.visit(0);
}

/// [`evaluate_array`] over a hole-free node list.
pub fn evaluate_nodes(
    items: &[NodeRef],
    env: &EnvRef,
    config: &EvalConfig,
    c: ArrayContinuation,
    cerr: ErrorContinuation,
) {
    evaluate_array(
        items.iter().cloned().map(Some).collect(),
        env,
        config,
        c,
        cerr,
    );
}
