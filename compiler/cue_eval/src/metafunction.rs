//! Closures and their invocation.
//!
//! A `MetaFunction` pairs a function node with the environment active at
//! its creation. Invoking one builds a fresh environment parented at that
//! closure environment, binds `this`/`arguments`/parameters, and evaluates
//! the body. A block body's result is whatever a `Return` signal carries
//! on the error channel — ordinary completion yields `undefined`. An
//! expression body (arrow shorthand) yields its value directly.

use std::rc::Rc;

use cue_ir::{NodeKind, NodeRef};

use crate::{
    evaluate_node, Continuation, EnvRef, Environment, ErrorContinuation, EvalConfig, ObjectRef,
    Signal, Value,
};

/// A closure: function node + defining environment + the config it was
/// created under (nested invocations keep any interpreter overrides that
/// were active at creation).
pub struct MetaFunction {
    pub node: NodeRef,
    pub closure: EnvRef,
    pub config: EvalConfig,
    /// Method table for class constructors; copied onto instances by `new`.
    pub methods: Option<ObjectRef>,
}

impl std::fmt::Debug for MetaFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaFunction")
            .field("node", &self.node.tag().as_str())
            .finish_non_exhaustive()
    }
}

impl MetaFunction {
    /// Wrap a function-shaped node evaluated in `env` into a value.
    pub fn new(node: &NodeRef, env: &EnvRef, config: &EvalConfig) -> Value {
        Value::Function(Rc::new(MetaFunction {
            node: node.clone(),
            closure: env.clone(),
            config: config.clone(),
            methods: None,
        }))
    }

    /// Parameter list and body of the underlying node.
    fn parts(&self) -> Option<(&[NodeRef], &NodeRef)> {
        match &self.node.kind {
            NodeKind::Function { params, body, .. }
            | NodeKind::Arrow { params, body }
            | NodeKind::FunctionDeclaration { params, body, .. } => {
                Some((params.as_slice(), body))
            }
            _ => None,
        }
    }
}

/// Invoke a closure.
///
/// Builds the invocation environment, binds parameters left-to-right, and
/// evaluates the body. `Return` signals surfacing from a block body become
/// the call's value; every other signal propagates to `cerr` unchanged.
pub fn evaluate_meta_function(
    metafn: &Rc<MetaFunction>,
    this_value: Value,
    args: Vec<Value>,
    c: Continuation,
    cerr: ErrorContinuation,
) {
    let config = metafn.config.clone();
    let Some((params, body)) = metafn.parts() else {
        cerr(Signal::type_error("value is not a function"));
        return;
    };

    let env = Environment::child(&metafn.closure);
    env.define(config.names.this, this_value);
    env.define(config.names.arguments, Value::array(args.clone()));

    if let Err(signal) = bind_parameters(params, &args, &env, &config) {
        cerr(signal);
        return;
    }

    if body.tag() == cue_ir::NodeTag::BlockStatement {
        let return_filter: ErrorContinuation = {
            let c = c.clone();
            Rc::new(move |signal| match signal {
                Signal::Return(value) => c(value),
                other => cerr(other),
            })
        };
        let complete: Continuation = Rc::new(move |_| c(Value::Undefined));
        evaluate_node(body, &env, &config, complete, return_filter);
    } else {
        // Expression body: the evaluated value is the result directly.
        evaluate_node(body, &env, &config, c, cerr);
    }
}

/// Bind call arguments against the parameter list.
///
/// Supports plain identifiers, a trailing rest parameter, and object
/// destructuring patterns. Nested shapes the engine does not support fail
/// with the typed not-implemented signal.
pub fn bind_parameters(
    params: &[NodeRef],
    args: &[Value],
    env: &EnvRef,
    config: &EvalConfig,
) -> Result<(), Signal> {
    for (i, param) in params.iter().enumerate() {
        match &param.kind {
            NodeKind::Identifier(name) => {
                env.define(*name, args.get(i).cloned().unwrap_or(Value::Undefined));
            }
            NodeKind::RestElement { argument } => {
                let NodeKind::Identifier(name) = &argument.kind else {
                    return Err(Signal::not_implemented("rest element pattern target"));
                };
                let rest: Vec<Value> = args.iter().skip(i).cloned().collect();
                env.define(*name, Value::array(rest));
                break;
            }
            NodeKind::ObjectPattern { .. } => {
                let source = args.get(i).cloned().unwrap_or(Value::Undefined);
                bind_pattern(param, &source, env, config, true)?;
            }
            other => {
                return Err(Signal::not_implemented(format!(
                    "parameter pattern {}",
                    other.tag().as_str()
                )));
            }
        }
    }
    Ok(())
}

/// Bind a destructuring pattern against a source value.
///
/// `declaration` selects declaration vs. assignment write semantics in the
/// target environment.
pub fn bind_pattern(
    pattern: &NodeRef,
    source: &Value,
    env: &EnvRef,
    config: &EvalConfig,
    declaration: bool,
) -> Result<(), Signal> {
    match &pattern.kind {
        NodeKind::Identifier(name) => {
            env.set_value(*name, source.clone(), declaration, &config.interner)?;
            Ok(())
        }
        NodeKind::ObjectPattern { properties } => {
            if source.is_nullish() {
                return Err(Signal::type_error(format!(
                    "cannot destructure {}",
                    source.type_name()
                )));
            }
            for property in properties {
                let NodeKind::Property {
                    key,
                    value,
                    computed,
                } = &property.kind
                else {
                    return Err(Signal::not_implemented(format!(
                        "object pattern element {}",
                        property.tag().as_str()
                    )));
                };
                if *computed {
                    return Err(Signal::not_implemented("computed key in object pattern"));
                }
                let key_name = match &key.kind {
                    NodeKind::Identifier(name) => *name,
                    NodeKind::Str(s) => config.interner.intern(s),
                    other => {
                        return Err(Signal::not_implemented(format!(
                            "object pattern key {}",
                            other.tag().as_str()
                        )));
                    }
                };
                let field = match source {
                    Value::Object(map) => {
                        map.borrow().get(&key_name).cloned().unwrap_or(Value::Undefined)
                    }
                    _ => Value::Undefined,
                };
                bind_pattern(value, &field, env, config, declaration)?;
            }
            Ok(())
        }
        other => Err(Signal::not_implemented(format!(
            "binding pattern {}",
            other.tag().as_str()
        ))),
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap for brevity"
)]
mod tests;
