//! Top-level evaluation drivers.

use std::cell::RefCell;
use std::rc::Rc;

use cue_ir::{NodeRef, Script};
use tracing::debug;

use crate::{
    evaluate_node, CachedParser, Continuation, EnvRef, ErrorContinuation, EvalConfig, Signal, Value,
};

/// Evaluate a node and collect the outcome, if one arrives synchronously.
///
/// Returns `None` when the evaluation suspended: some continuation was
/// captured and not yet fired, so there is no outcome to report. If a
/// retained continuation fires more than once before returning, the last
/// outcome wins.
pub fn eval_collecting(node: &NodeRef, env: &EnvRef, config: &EvalConfig) -> Option<Result<Value, Signal>> {
    let outcome: Rc<RefCell<Option<Result<Value, Signal>>>> = Rc::new(RefCell::new(None));

    let c: Continuation = {
        let outcome = Rc::clone(&outcome);
        Rc::new(move |value| {
            *outcome.borrow_mut() = Some(Ok(value));
        })
    };
    let cerr: ErrorContinuation = {
        let outcome = Rc::clone(&outcome);
        let on_error = config.on_error.clone();
        Rc::new(move |signal| {
            debug!(signal = signal.type_tag(), "uncaught signal");
            if let Some(hook) = &on_error {
                hook(&signal);
            }
            *outcome.borrow_mut() = Some(Err(signal));
        })
    };

    evaluate_node(node, env, config, c, cerr);
    outcome.take()
}

/// Parse and evaluate a script, attaching it to the config so signals carry
/// its id for rendering.
pub fn evaluate_script(
    script: &Script,
    parser: &CachedParser,
    env: &EnvRef,
    config: &EvalConfig,
) -> Option<Result<Value, Signal>> {
    let config = config.clone().with_script(script.clone());
    match parser.parse(&script.source) {
        Ok(node) => eval_collecting(&node, env, &config),
        Err(error) => Some(Err(Signal::from(error))),
    }
}

#[cfg(test)]
mod tests;
