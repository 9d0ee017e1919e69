//! Continuation-passing evaluator for a dynamic, JavaScript-like language.
//!
//! Every node interpreter receives two continuations instead of returning a
//! value: one for success, one for signals (failures and `return`/`throw`/
//! `break`/`continue` control transfer). Because continuations are plain
//! `Rc` closures, `callcc` can hand them to the evaluated program, a host,
//! or a scheduler, and fire them later — or more than once.
//!
//! Dispatch goes through a per-config table keyed by node tag; hosts layer
//! override tables to change the semantics of individual node types,
//! including the runtime-derived `Apply`/`GetProperty`/`SetProperty`
//! operations. An interceptor hook observes every enter/exit step.

mod callcc;
mod config;
mod environment;
mod evaluate;
mod interpreters;
mod metafunction;
mod operators;
mod parse;
mod run;
mod signal;
mod value;

pub use callcc::{apply_callcc, install_callcc, lifted, lifted_error};
pub use config::{
    immediate, Continuation, ErrorContinuation, ErrorHook, EvalConfig, Interceptor, Phase,
    Scheduler, Thunk, Trampoline, WellKnown,
};
pub use environment::{EnvRef, Environment};
pub use evaluate::{
    evaluate, evaluate_array, evaluate_node, evaluate_nodes, ApplyOp, ArrayContinuation, EvalItem,
    GetPropertyOp, InterpreterFn, SetPropertyOp,
};
pub use interpreters::{InterpreterMap, Interpreters};
pub use metafunction::{bind_parameters, bind_pattern, evaluate_meta_function, MetaFunction};
pub use operators::{evaluate_binary, evaluate_unary};
pub use parse::{CachedParser, ParseError, ParseFn};
pub use run::{eval_collecting, evaluate_script};
pub use signal::{EvalException, ExceptionKind, Signal};
pub use value::{
    format_number, ArrayRef, NativeFn, NativeFunction, ObjectRef, ReceiverFn, ReceiverFunction,
    Value,
};
