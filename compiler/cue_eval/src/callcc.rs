//! `callcc`: multi-shot continuation capture.
//!
//! The `callcc` binding is a marker value, not a function body. Applying it
//! reifies the call site's two continuations as callable values and hands
//! them to the receiver. Nothing is unwound on capture and nothing expires
//! on resume: the continuations are plain `Rc` closures, so the receiver
//! may fire them zero, one, or many times, during the call or long after
//! the evaluation otherwise finished.

use cue_ir::SharedInterner;

use crate::{
    evaluate_meta_function, Continuation, EnvRef, ErrorContinuation, EvalConfig, ReceiverFunction,
    Signal, Value,
};

/// Seed the capture markers into an environment. Both surface names bind
/// the same reserved value.
pub fn install_callcc(env: &EnvRef, interner: &SharedInterner) {
    env.define(interner.intern("callcc"), Value::CallCc);
    env.define(
        interner.intern("callWithCurrentContinuation"),
        Value::CallCc,
    );
}

/// Reify a success continuation as a value the evaluated program can call.
///
/// Invoking the result transfers control to the captured point; the
/// invoking call site's own continuation is discarded, which is exactly the
/// jump semantics a continuation value has.
pub fn lifted(c: &Continuation) -> Value {
    let c = c.clone();
    Value::Receiver(ReceiverFunction::new(
        "continuation",
        move |value, _c, _cerr, _env, _config| c(value),
    ))
}

/// Reify an error continuation: invoking it raises its argument as a thrown
/// value at the captured point.
pub fn lifted_error(cerr: &ErrorContinuation) -> Value {
    let cerr = cerr.clone();
    Value::Receiver(ReceiverFunction::new(
        "error-continuation",
        move |value, _c, _cerr, _env, _config| {
            cerr(Signal::Throw {
                value,
                location: None,
            });
        },
    ))
}

/// Apply the `callcc` marker.
///
/// `callcc(receiver, value?)` hands the optional `value` argument through
/// the receiver's first slot. Host receivers take the raw continuation pair
/// alongside it; in-language receivers get the continuations reified as
/// callable values after the value slot. A receiver that completes without
/// firing a continuation resumes the call site with its completion value.
pub fn apply_callcc(
    args: &[Value],
    env: &EnvRef,
    config: &EvalConfig,
    c: Continuation,
    cerr: ErrorContinuation,
) {
    let Some(receiver) = args.first() else {
        cerr(Signal::type_error("callcc expects a receiver"));
        return;
    };
    let value = args.get(1).cloned().unwrap_or(Value::Undefined);
    match receiver {
        // Host receiver: owns both continuations outright.
        Value::Receiver(receiver) => receiver.invoke(value, &c, &cerr, env, config),
        // In-language receiver: called as `receiver(value, k, kerr)`.
        Value::Function(f) => {
            let k = lifted(&c);
            let k_err = lifted_error(&cerr);
            evaluate_meta_function(f, Value::Undefined, vec![value, k, k_err], c, cerr);
        }
        Value::Native(native) => {
            let k = lifted(&c);
            let k_err = lifted_error(&cerr);
            match native.call(&Value::Undefined, &[value, k, k_err]) {
                Ok(value) => c(value),
                Err(signal) => cerr(signal),
            }
        }
        other => cerr(Signal::type_error(format!(
            "callcc receiver must be callable, got {}",
            other.type_name()
        ))),
    }
}
