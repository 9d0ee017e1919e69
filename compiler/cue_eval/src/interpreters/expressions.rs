//! Expression interpreters.
//!
//! Every multi-step expression threads its sub-evaluations through
//! [`evaluate_node`]/[`evaluate_nodes`], so each step is separately
//! scheduled, intercepted, and resumable.

use std::cell::RefCell;
use std::rc::Rc;

use cue_ir::{LogicalOp, Name, NodeKind, NodeRef, NodeTag, UnaryOp};
use rustc_hash::FxHashMap;

use crate::interpreters::{dispatch_mismatch, InterpreterMap};
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::{
    evaluate, evaluate_array, evaluate_meta_function, evaluate_node, evaluate_nodes, ApplyOp,
    ArrayContinuation, Continuation, EnvRef, ErrorContinuation, EvalConfig, EvalItem,
    GetPropertyOp, MetaFunction, SetPropertyOp, Signal, Value,
};

pub(crate) fn register(map: &mut InterpreterMap) {
    map.set(NodeTag::BinaryExpression, binary);
    map.set(NodeTag::LogicalExpression, logical);
    map.set(NodeTag::UnaryExpression, unary);
    map.set(NodeTag::UpdateExpression, update);
    map.set(NodeTag::MemberExpression, member);
    map.set(NodeTag::AssignmentExpression, assignment);
    map.set(NodeTag::ObjectExpression, object);
    map.set(NodeTag::Property, property);
    map.set(NodeTag::ArrayExpression, array);
    map.set(NodeTag::NewExpression, new_expression);
    map.set(NodeTag::SequenceExpression, sequence);
    map.set(NodeTag::ConditionalExpression, conditional);
    map.set(NodeTag::TemplateLiteral, template);
    map.set(NodeTag::CallExpression, call);
    map.set(NodeTag::FunctionExpression, function_expression);
    map.set(NodeTag::ArrowFunctionExpression, function_expression);
    map.set(NodeTag::RestElement, pattern_outside_binding);
    map.set(NodeTag::ObjectPattern, pattern_outside_binding);
}

fn binary(
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
    let NodeKind::Binary { op, left, right } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let op = *op;
    let done: ArrayContinuation = {
        let c = c.clone();
        let cerr = cerr.clone();
        Rc::new(move |values| {
            let (Some(left), Some(right)) = (values.first(), values.get(1)) else {
                cerr(Signal::EmptyNode);
                return;
            };
            match evaluate_binary(op, left, right) {
                Ok(value) => c(value),
                Err(signal) => cerr(signal),
            }
        })
    };
    evaluate_nodes(&[left.clone(), right.clone()], env, config, done, cerr.clone());
}

fn logical(
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
    let NodeKind::Logical { op, left, right } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let op = *op;
    let right = right.clone();
    let on_left: Continuation = {
        let c = c.clone();
        let cerr = cerr.clone();
        let env = env.clone();
        let config = config.clone();
        Rc::new(move |value| {
            let short_circuits = match op {
                LogicalOp::And => !value.is_truthy(),
                LogicalOp::Or => value.is_truthy(),
            };
            if short_circuits {
                c(value);
            } else {
                evaluate_node(&right, &env, &config, c.clone(), cerr.clone());
            }
        })
    };
    evaluate_node(left, env, config, on_left, cerr.clone());
}

fn unary(
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
    let NodeKind::Unary { op, argument } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let op = *op;
    // `typeof unbound` answers "undefined" instead of raising.
    if op == UnaryOp::Typeof {
        if let NodeKind::Identifier(name) = &argument.kind {
            if env.lookup(*name).is_none() {
                c(Value::string("undefined"));
                return;
            }
        }
    }
    let done: Continuation = {
        let c = c.clone();
        let cerr = cerr.clone();
        Rc::new(move |value| match evaluate_unary(op, &value) {
            Ok(result) => c(result),
            Err(signal) => cerr(signal),
        })
    };
    evaluate_node(argument, env, config, done, cerr.clone());
}

fn update(
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
    let NodeKind::Update {
        op,
        prefix,
        argument,
    } = &node.kind
    else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let (delta, prefix) = (op.delta(), *prefix);
    match &argument.kind {
        NodeKind::Identifier(name) => {
            let old = match env.get_value(*name, &config.interner) {
                Ok(value) => value.to_number(),
                Err(signal) => {
                    cerr(signal);
                    return;
                }
            };
            let new = Value::Number(old + delta);
            match env.set_value(*name, new.clone(), false, &config.interner) {
                Ok(_) => c(if prefix { new } else { Value::Number(old) }),
                Err(signal) => cerr(signal),
            }
        }
        NodeKind::Member {
            object,
            property,
            computed,
        } => {
            let node = node.clone();
            let c = c.clone();
            let cerr2 = cerr.clone();
            let env2 = env.clone();
            let config2 = config.clone();
            with_member_parts(
                object,
                property,
                *computed,
                env,
                config,
                cerr.clone(),
                Rc::new(move |target, key| {
                    let write_back = target.clone();
                    let op_node = node.clone();
                    let c = c.clone();
                    let cerr = cerr2.clone();
                    let env = env2.clone();
                    let config = config2.clone();
                    let after_read: Continuation = Rc::new(move |old| {
                        let old = old.to_number();
                        let new = Value::Number(old + delta);
                        let result = if prefix { new.clone() } else { Value::Number(old) };
                        let c = c.clone();
                        let done: Continuation = Rc::new(move |_| c(result.clone()));
                        evaluate(
                            EvalItem::SetProperty(SetPropertyOp {
                                object: write_back.clone(),
                                property: key,
                                value: new,
                                node: op_node.clone(),
                            }),
                            &env,
                            &config,
                            done,
                            cerr.clone(),
                        );
                    });
                    evaluate(
                        EvalItem::GetProperty(GetPropertyOp {
                            object: target,
                            property: key,
                            node: node.clone(),
                        }),
                        &env2,
                        &config2,
                        after_read,
                        cerr2.clone(),
                    );
                }),
            );
        }
        other => cerr(Signal::not_implemented(format!(
            "update target {}",
            other.tag().as_str()
        ))),
    }
}

/// Evaluate the object (and computed key) of a member expression, handing
/// the resolved `(object value, property name)` pair to `k`.
fn with_member_parts(
    object: &NodeRef,
    property: &NodeRef,
    computed: bool,
    env: &EnvRef,
    config: &EvalConfig,
    cerr: ErrorContinuation,
    k: Rc<dyn Fn(Value, Name)>,
) {
    let property = property.clone();
    let env2 = env.clone();
    let config2 = config.clone();
    let cerr2 = cerr.clone();
    let on_object: Continuation = Rc::new(move |object_value| {
        if computed {
            let k = k.clone();
            let config = config2.clone();
            let on_key: Continuation = Rc::new(move |key_value| {
                k(
                    object_value.clone(),
                    key_value.to_property_key(&config.interner),
                );
            });
            evaluate_node(&property, &env2, &config2, on_key, cerr2.clone());
        } else {
            match static_key(&property, &config2) {
                Ok(key) => k(object_value, key),
                Err(signal) => cerr2(signal),
            }
        }
    });
    evaluate_node(object, env, config, on_object, cerr);
}

/// Non-computed member keys are identifiers or string literals.
fn static_key(property: &NodeRef, config: &EvalConfig) -> Result<Name, Signal> {
    match &property.kind {
        NodeKind::Identifier(name) => Ok(*name),
        NodeKind::Str(s) => Ok(config.interner.intern(s)),
        other => Err(Signal::not_implemented(format!(
            "member key {}",
            other.tag().as_str()
        ))),
    }
}

fn member(
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
    let NodeKind::Member {
        object,
        property,
        computed,
    } = &node.kind
    else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let node = node.clone();
    let c = c.clone();
    let cerr2 = cerr.clone();
    let env2 = env.clone();
    let config2 = config.clone();
    with_member_parts(
        object,
        property,
        *computed,
        env,
        config,
        cerr.clone(),
        Rc::new(move |target, key| {
            evaluate(
                EvalItem::GetProperty(GetPropertyOp {
                    object: target,
                    property: key,
                    node: node.clone(),
                }),
                &env2,
                &config2,
                c.clone(),
                cerr2.clone(),
            );
        }),
    );
}

fn assignment(
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
    let NodeKind::Assignment { op, target, value } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let compound = op.binary_op();
    match &target.kind {
        NodeKind::Identifier(name) => {
            let name = *name;
            let c = c.clone();
            let cerr2 = cerr.clone();
            let env2 = env.clone();
            let config2 = config.clone();
            let done: Continuation = Rc::new(move |new| {
                let new = match compound {
                    None => new,
                    Some(bop) => {
                        let old = match env2.get_value(name, &config2.interner) {
                            Ok(value) => value,
                            Err(signal) => {
                                cerr2(signal);
                                return;
                            }
                        };
                        match evaluate_binary(bop, &old, &new) {
                            Ok(value) => value,
                            Err(signal) => {
                                cerr2(signal);
                                return;
                            }
                        }
                    }
                };
                match env2.set_value(name, new, false, &config2.interner) {
                    Ok(value) => c(value),
                    Err(signal) => cerr2(signal),
                }
            });
            evaluate_node(value, env, config, done, cerr.clone());
        }
        NodeKind::Member {
            object,
            property,
            computed,
        } => {
            let node = node.clone();
            let value = value.clone();
            let c = c.clone();
            let cerr2 = cerr.clone();
            let env2 = env.clone();
            let config2 = config.clone();
            with_member_parts(
                object,
                property,
                *computed,
                env,
                config,
                cerr.clone(),
                Rc::new(move |target_value, key| {
                    let op_node = node.clone();
                    let c = c.clone();
                    let cerr = cerr2.clone();
                    let env = env2.clone();
                    let config = config2.clone();
                    let on_value: Continuation = Rc::new(move |new| {
                        let write = {
                            let op_node = op_node.clone();
                            let target_value = target_value.clone();
                            let c = c.clone();
                            let cerr = cerr.clone();
                            let env = env.clone();
                            let config = config.clone();
                            move |value: Value| {
                                evaluate(
                                    EvalItem::SetProperty(SetPropertyOp {
                                        object: target_value.clone(),
                                        property: key,
                                        value,
                                        node: op_node.clone(),
                                    }),
                                    &env,
                                    &config,
                                    c.clone(),
                                    cerr.clone(),
                                );
                            }
                        };
                        match compound {
                            None => write(new),
                            Some(bop) => {
                                let read_err = cerr.clone();
                                let after_read: Continuation = Rc::new(move |old| {
                                    match evaluate_binary(bop, &old, &new) {
                                        Ok(value) => write(value),
                                        Err(signal) => read_err(signal),
                                    }
                                });
                                evaluate(
                                    EvalItem::GetProperty(GetPropertyOp {
                                        object: target_value.clone(),
                                        property: key,
                                        node: op_node.clone(),
                                    }),
                                    &env,
                                    &config,
                                    after_read,
                                    cerr.clone(),
                                );
                            }
                        }
                    });
                    evaluate_node(&value, &env2, &config2, on_value, cerr2.clone());
                }),
            );
        }
        NodeKind::ObjectPattern { .. } if compound.is_none() => {
            let target = target.clone();
            let c = c.clone();
            let cerr2 = cerr.clone();
            let env2 = env.clone();
            let config2 = config.clone();
            let done: Continuation = Rc::new(move |new| {
                match crate::bind_pattern(&target, &new, &env2, &config2, false) {
                    Ok(()) => c(new),
                    Err(signal) => cerr2(signal),
                }
            });
            evaluate_node(value, env, config, done, cerr.clone());
        }
        other => cerr(Signal::not_implemented(format!(
            "assignment target {}",
            other.tag().as_str()
        ))),
    }
}

/// A `Property` evaluates to a `[key, value]` pair consumed by
/// `ObjectExpression`; computed keys evaluate their key expression first.
fn property(
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
    let NodeKind::Property {
        key,
        value,
        computed,
    } = &node.kind
    else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let value = value.clone();
    let env2 = env.clone();
    let config2 = config.clone();
    let c = c.clone();
    let cerr2 = cerr.clone();
    let with_key = Rc::new(move |key_text: String| {
        let c = c.clone();
        let on_value: Continuation = Rc::new(move |v| {
            c(Value::array(vec![Value::string(&key_text), v]));
        });
        evaluate_node(&value, &env2, &config2, on_value, cerr2.clone());
    });
    if *computed {
        let on_key: Continuation = Rc::new(move |key_value| {
            with_key(key_value.to_display_string());
        });
        evaluate_node(key, env, config, on_key, cerr.clone());
    } else {
        let key_text = match &key.kind {
            NodeKind::Identifier(name) => config.interner.display(*name).to_string(),
            NodeKind::Str(s) => s.to_string(),
            NodeKind::Number(n) => crate::format_number(*n),
            other => {
                cerr(Signal::not_implemented(format!(
                    "property key {}",
                    other.tag().as_str()
                )));
                return;
            }
        };
        with_key(key_text);
    }
}

fn object(
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
    let NodeKind::Object { properties } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let done: ArrayContinuation = {
        let c = c.clone();
        let cerr = cerr.clone();
        let config = config.clone();
        Rc::new(move |pairs| {
            let mut map: FxHashMap<Name, Value> = FxHashMap::default();
            for pair in &pairs {
                let Value::Array(pair) = pair else {
                    cerr(Signal::EmptyNode);
                    return;
                };
                let pair = pair.borrow();
                let (Some(key), Some(value)) = (pair.first(), pair.get(1)) else {
                    cerr(Signal::EmptyNode);
                    return;
                };
                map.insert(config.interner.intern(&key.to_display_string()), value.clone());
            }
            c(Value::Object(Rc::new(RefCell::new(map))));
        })
    };
    evaluate_nodes(properties, env, config, done, cerr.clone());
}

fn array(
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
    let NodeKind::Array { elements } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let done: ArrayContinuation = {
        let c = c.clone();
        Rc::new(move |values| c(Value::array(values)))
    };
    evaluate_array(elements.clone(), env, config, done, cerr.clone());
}

fn sequence(
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
    let NodeKind::Sequence { expressions } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let done: ArrayContinuation = {
        let c = c.clone();
        Rc::new(move |values| c(values.last().cloned().unwrap_or(Value::Undefined)))
    };
    evaluate_nodes(expressions, env, config, done, cerr.clone());
}

fn conditional(
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
    let NodeKind::Conditional {
        test,
        consequent,
        alternate,
    } = &node.kind
    else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let consequent = consequent.clone();
    let alternate = alternate.clone();
    let c = c.clone();
    let cerr2 = cerr.clone();
    let env2 = env.clone();
    let config2 = config.clone();
    let on_test: Continuation = Rc::new(move |test_value| {
        let branch = if test_value.is_truthy() {
            &consequent
        } else {
            &alternate
        };
        evaluate_node(branch, &env2, &config2, c.clone(), cerr2.clone());
    });
    evaluate_node(test, env, config, on_test, cerr.clone());
}

fn template(
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
    let NodeKind::Template {
        quasis,
        expressions,
    } = &node.kind
    else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let quasis = quasis.clone();
    let done: ArrayContinuation = {
        let c = c.clone();
        Rc::new(move |values| {
            let mut text = String::new();
            for (i, quasi) in quasis.iter().enumerate() {
                text.push_str(quasi);
                if let Some(value) = values.get(i) {
                    text.push_str(&value.to_display_string());
                }
            }
            c(Value::string(text));
        })
    };
    evaluate_nodes(expressions, env, config, done, cerr.clone());
}

fn call(
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
    let NodeKind::Call { callee, arguments } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    // Method calls resolve the target through the property table and keep
    // the receiver object as `this`.
    if let NodeKind::Member {
        object,
        property,
        computed,
    } = &callee.kind
    {
        let node = node.clone();
        let arguments = arguments.clone();
        let c = c.clone();
        let cerr2 = cerr.clone();
        let env2 = env.clone();
        let config2 = config.clone();
        with_member_parts(
            object,
            property,
            *computed,
            env,
            config,
            cerr.clone(),
            Rc::new(move |receiver, key| {
                let op_node = node.clone();
                let arguments = arguments.clone();
                let c = c.clone();
                let cerr = cerr2.clone();
                let env = env2.clone();
                let config = config2.clone();
                let this_value = receiver.clone();
                let on_target: Continuation = Rc::new(move |target| {
                    apply_with_args(
                        target,
                        this_value.clone(),
                        &arguments,
                        &op_node,
                        &env,
                        &config,
                        c.clone(),
                        cerr.clone(),
                    );
                });
                evaluate(
                    EvalItem::GetProperty(GetPropertyOp {
                        object: receiver,
                        property: key,
                        node: node.clone(),
                    }),
                    &env2,
                    &config2,
                    on_target,
                    cerr2.clone(),
                );
            }),
        );
        return;
    }

    let node = node.clone();
    let arguments = arguments.clone();
    let c = c.clone();
    let cerr2 = cerr.clone();
    let env2 = env.clone();
    let config2 = config.clone();
    let on_target: Continuation = Rc::new(move |target| {
        apply_with_args(
            target,
            Value::Undefined,
            &arguments,
            &node,
            &env2,
            &config2,
            c.clone(),
            cerr2.clone(),
        );
    });
    evaluate_node(callee, env, config, on_target, cerr.clone());
}

/// Evaluate call arguments in order, then dispatch the application through
/// the interpreter table.
#[expect(clippy::too_many_arguments, reason = "call-site plumbing")]
fn apply_with_args(
    target: Value,
    this_value: Value,
    arguments: &[NodeRef],
    node: &NodeRef,
    env: &EnvRef,
    config: &EvalConfig,
    c: Continuation,
    cerr: ErrorContinuation,
) {
    let node = node.clone();
    let env2 = env.clone();
    let config2 = config.clone();
    let cerr2 = cerr.clone();
    let done: ArrayContinuation = Rc::new(move |args| {
        evaluate(
            EvalItem::Apply(ApplyOp {
                target: target.clone(),
                this_value: this_value.clone(),
                args,
                node: node.clone(),
            }),
            &env2,
            &config2,
            c.clone(),
            cerr2.clone(),
        );
    });
    evaluate_nodes(arguments, env, config, done, cerr);
}

fn function_expression(
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
    c(MetaFunction::new(node, env, config));
}

fn new_expression(
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
    let NodeKind::New { callee, arguments } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let arguments = arguments.clone();
    let c = c.clone();
    let cerr2 = cerr.clone();
    let env2 = env.clone();
    let config2 = config.clone();
    let on_callee: Continuation = Rc::new(move |target| {
        let Value::Function(constructor) = target else {
            cerr2(Signal::type_error(format!(
                "{} is not a constructor",
                target.type_name()
            )));
            return;
        };
        let c = c.clone();
        let cerr = cerr2.clone();
        let done: ArrayContinuation = Rc::new(move |args| {
            let instance = Value::object();
            if let (Value::Object(map), Some(methods)) = (&instance, &constructor.methods) {
                for (key, method) in methods.borrow().iter() {
                    map.borrow_mut().insert(*key, method.clone());
                }
            }
            let result = instance.clone();
            let finish: Continuation = {
                let c = c.clone();
                Rc::new(move |_| c(result.clone()))
            };
            evaluate_meta_function(&constructor, instance, args, finish, cerr.clone());
        });
        evaluate_nodes(&arguments, &env2, &config2, done, cerr2.clone());
    });
    evaluate_node(callee, env, config, on_callee, cerr.clone());
}

fn pattern_outside_binding(
    item: &EvalItem,
    _c: &Continuation,
    cerr: &ErrorContinuation,
    _env: &EnvRef,
    _config: &EvalConfig,
) {
    cerr(Signal::not_implemented(format!(
        "{} outside a binding position",
        item.tag().as_str()
    )));
}
