//! Statement interpreters.
//!
//! Control flow rides the error continuation: `return`, `throw`, `break`,
//! and `continue` raise signals that the enclosing construct intercepts.
//! Loops are `Rc`-shaped so a continuation captured mid-iteration can
//! resume the loop from that exact point later.

use std::rc::Rc;

use cue_ir::{build, MethodKind, NodeKind, NodeRef, NodeTag};

use crate::interpreters::{dispatch_mismatch, InterpreterMap};
use crate::{
    bind_pattern, evaluate_node, evaluate_nodes, ArrayContinuation, Continuation, EnvRef,
    Environment, ErrorContinuation, EvalConfig, EvalItem, MetaFunction, Signal, Value,
};

pub(crate) fn register(map: &mut InterpreterMap) {
    map.set(NodeTag::Program, program);
    map.set(NodeTag::BlockStatement, block);
    map.set(NodeTag::ExpressionStatement, expression_statement);
    map.set(NodeTag::IfStatement, if_statement);
    map.set(NodeTag::VariableDeclaration, variable_declaration);
    map.set(NodeTag::VariableDeclarator, variable_declarator);
    map.set(NodeTag::FunctionDeclaration, function_declaration);
    map.set(NodeTag::ReturnStatement, return_statement);
    map.set(NodeTag::ThrowStatement, throw_statement);
    map.set(NodeTag::TryStatement, try_statement);
    map.set(NodeTag::CatchClause, catch_clause);
    map.set(NodeTag::WhileStatement, while_statement);
    map.set(NodeTag::ForInStatement, for_in);
    map.set(NodeTag::ForOfStatement, for_of);
    map.set(NodeTag::BreakStatement, break_statement);
    map.set(NodeTag::ContinueStatement, continue_statement);
    map.set(NodeTag::EmptyStatement, empty_statement);
    map.set(NodeTag::ClassDeclaration, class_declaration);
    map.set(NodeTag::MethodDefinition, method_definition);
}

/// Pre-bind function declarations so they are callable before their
/// textual position.
fn hoist_functions(body: &[NodeRef], env: &EnvRef, config: &EvalConfig) {
    for stmt in body {
        if let NodeKind::FunctionDeclaration { id, .. } = &stmt.kind {
            env.define(*id, MetaFunction::new(stmt, env, config));
        }
    }
}

/// Statement-list completion: the value of the last statement.
fn last_value(c: &Continuation) -> ArrayContinuation {
    let c = c.clone();
    Rc::new(move |values| c(values.last().cloned().unwrap_or(Value::Undefined)))
}

/// A program runs in the caller's environment, so its declarations land
/// where the host put its globals.
fn program(
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
    let NodeKind::Program { body } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    hoist_functions(body, env, config);
    evaluate_nodes(body, env, config, last_value(c), cerr.clone());
}

fn block(
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
    let NodeKind::Block { body } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let scope = Environment::child(env);
    hoist_functions(body, &scope, config);
    evaluate_nodes(body, &scope, config, last_value(c), cerr.clone());
}

fn expression_statement(
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
    let NodeKind::ExpressionStatement { expression } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    evaluate_node(expression, env, config, c.clone(), cerr.clone());
}

fn if_statement(
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
    let NodeKind::If {
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
        if test_value.is_truthy() {
            evaluate_node(&consequent, &env2, &config2, c.clone(), cerr2.clone());
        } else if let Some(alternate) = &alternate {
            evaluate_node(alternate, &env2, &config2, c.clone(), cerr2.clone());
        } else {
            c(Value::Undefined);
        }
    });
    evaluate_node(test, env, config, on_test, cerr.clone());
}

fn variable_declaration(
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
    let NodeKind::VariableDeclaration { declarations, .. } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let c = c.clone();
    let done: ArrayContinuation = Rc::new(move |_| c(Value::Undefined));
    evaluate_nodes(declarations, env, config, done, cerr.clone());
}

fn variable_declarator(
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
    let NodeKind::VariableDeclarator { id, init } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let id = id.clone();
    let c = c.clone();
    let cerr2 = cerr.clone();
    let env2 = env.clone();
    let config2 = config.clone();
    let bind: Continuation = Rc::new(move |value| {
        match bind_pattern(&id, &value, &env2, &config2, true) {
            Ok(()) => c(Value::Undefined),
            Err(signal) => cerr2(signal),
        }
    });
    match init {
        Some(init) => evaluate_node(init, env, config, bind, cerr.clone()),
        None => bind(Value::Undefined),
    }
}

fn function_declaration(
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
    let NodeKind::FunctionDeclaration { id, .. } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    env.define(*id, MetaFunction::new(node, env, config));
    c(Value::Undefined);
}

fn return_statement(
    item: &EvalItem,
    _c: &Continuation,
    cerr: &ErrorContinuation,
    env: &EnvRef,
    config: &EvalConfig,
) {
    let EvalItem::Syntax(node) = item else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let NodeKind::Return { argument } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    match argument {
        Some(argument) => {
            let cerr2 = cerr.clone();
            let raise: Continuation = Rc::new(move |value| cerr2(Signal::Return(value)));
            evaluate_node(argument, env, config, raise, cerr.clone());
        }
        None => cerr(Signal::Return(Value::Undefined)),
    }
}

fn throw_statement(
    item: &EvalItem,
    _c: &Continuation,
    cerr: &ErrorContinuation,
    env: &EnvRef,
    config: &EvalConfig,
) {
    let EvalItem::Syntax(node) = item else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let NodeKind::Throw { argument } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let location = node.clone();
    let cerr2 = cerr.clone();
    let raise: Continuation = Rc::new(move |value| {
        cerr2(Signal::Throw {
            value,
            location: Some(location.clone()),
        });
    });
    evaluate_node(argument, env, config, raise, cerr.clone());
}

/// `try`/`catch`/`finally`.
///
/// The catch clause intercepts catchable signals only; `return`, `break`,
/// and `continue` pass through after the finalizer runs. The finalizer runs
/// exactly once on every path, and a signal raised by the finalizer itself
/// replaces the pending outcome.
fn try_statement(
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
    let NodeKind::Try {
        block,
        handler,
        finalizer,
    } = &node.kind
    else {
        cerr(dispatch_mismatch(item));
        return;
    };

    type Finalize = Rc<dyn Fn(Rc<dyn Fn()>)>;
    let finalize: Finalize = {
        let finalizer = finalizer.clone();
        let env = env.clone();
        let config = config.clone();
        let cerr = cerr.clone();
        Rc::new(move |after: Rc<dyn Fn()>| match &finalizer {
            Some(finalizer) => {
                let after = after.clone();
                let done: Continuation = Rc::new(move |_| after());
                evaluate_node(finalizer, &env, &config, done, cerr.clone());
            }
            None => after(),
        })
    };

    let on_success: Continuation = {
        let finalize = finalize.clone();
        let c = c.clone();
        Rc::new(move |value| {
            let c = c.clone();
            finalize(Rc::new(move || c(value.clone())));
        })
    };

    let on_signal: ErrorContinuation = {
        let handler = handler.clone();
        let finalize = finalize.clone();
        let c = c.clone();
        let cerr = cerr.clone();
        let env = env.clone();
        let config = config.clone();
        Rc::new(move |signal| {
            let catchable = signal.is_catchable();
            match &handler {
                Some(handler) if catchable => {
                    // The error binding lives in an internal frame so that
                    // declarations inside the handler skip past it.
                    let scope = Environment::internal_child(&env);
                    if let NodeKind::CatchClause {
                        param: Some(param), ..
                    } = &handler.kind
                    {
                        if let NodeKind::Identifier(name) = &param.kind {
                            scope.define(*name, signal.catch_value());
                        }
                    }
                    let handled: Continuation = {
                        let finalize = finalize.clone();
                        let c = c.clone();
                        Rc::new(move |value| {
                            let c = c.clone();
                            finalize(Rc::new(move || c(value.clone())));
                        })
                    };
                    let rethrow: ErrorContinuation = {
                        let finalize = finalize.clone();
                        let cerr = cerr.clone();
                        Rc::new(move |signal: Signal| {
                            let cerr = cerr.clone();
                            finalize(Rc::new(move || cerr(signal.clone())));
                        })
                    };
                    evaluate_node(handler, &scope, &config, handled, rethrow);
                }
                _ => {
                    let cerr = cerr.clone();
                    finalize(Rc::new(move || cerr(signal.clone())));
                }
            }
        })
    };

    evaluate_node(block, env, config, on_success, on_signal);
}

/// Evaluates the handler body; the error binding was installed by the
/// enclosing `TryStatement`.
fn catch_clause(
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
    let NodeKind::CatchClause { body, .. } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    evaluate_node(body, env, config, c.clone(), cerr.clone());
}

struct WhileLoop {
    test: NodeRef,
    body: NodeRef,
    env: EnvRef,
    config: EvalConfig,
    c: Continuation,
    cerr: ErrorContinuation,
}

impl WhileLoop {
    fn iterate(self: &Rc<Self>) {
        let this = Rc::clone(self);
        let on_test: Continuation = Rc::new(move |test_value| {
            if !test_value.is_truthy() {
                (this.c)(Value::Undefined);
                return;
            }
            let next = Rc::clone(&this);
            let advance: Continuation = Rc::new(move |_| next.next());
            let control = Rc::clone(&this);
            let on_signal: ErrorContinuation = Rc::new(move |signal| match signal {
                Signal::Break { label: None } => (control.c)(Value::Undefined),
                Signal::Continue { label: None } => control.next(),
                other => (control.cerr)(other),
            });
            evaluate_node(&this.body, &this.env, &this.config, advance, on_signal);
        });
        evaluate_node(&self.test, &self.env, &self.config, on_test, self.cerr.clone());
    }

    fn next(self: &Rc<Self>) {
        let this = Rc::clone(self);
        (self.config.schedule)(Box::new(move || this.iterate()));
    }
}

fn while_statement(
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
    let NodeKind::While { test, body } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    Rc::new(WhileLoop {
        test: test.clone(),
        body: body.clone(),
        env: env.clone(),
        config: config.clone(),
        c: c.clone(),
        cerr: cerr.clone(),
    })
    .iterate();
}

/// Bind a loop target (`let x`, bare identifier, or pattern) to the current
/// iteration value in `scope`.
fn bind_loop_target(
    left: &NodeRef,
    value: &Value,
    scope: &EnvRef,
    config: &EvalConfig,
) -> Result<(), Signal> {
    match &left.kind {
        NodeKind::VariableDeclaration { declarations, .. } => match declarations.first() {
            Some(declarator) => {
                let NodeKind::VariableDeclarator { id, .. } = &declarator.kind else {
                    return Err(Signal::not_implemented("loop declaration shape"));
                };
                bind_pattern(id, value, scope, config, true)
            }
            None => Err(Signal::not_implemented("empty loop declaration")),
        },
        // A bare identifier or pattern assigns to an existing binding.
        _ => bind_pattern(left, value, scope, config, false),
    }
}

struct IterationLoop {
    left: NodeRef,
    body: NodeRef,
    items: Vec<Value>,
    env: EnvRef,
    config: EvalConfig,
    c: Continuation,
    cerr: ErrorContinuation,
}

impl IterationLoop {
    fn iterate(self: &Rc<Self>, index: usize) {
        let Some(value) = self.items.get(index) else {
            (self.c)(Value::Undefined);
            return;
        };
        let scope = Environment::child(&self.env);
        if let Err(signal) = bind_loop_target(&self.left, value, &scope, &self.config) {
            (self.cerr)(signal);
            return;
        }
        let next = Rc::clone(self);
        let advance: Continuation = Rc::new(move |_| next.next(index + 1));
        let control = Rc::clone(self);
        let on_signal: ErrorContinuation = Rc::new(move |signal| match signal {
            Signal::Break { label: None } => (control.c)(Value::Undefined),
            Signal::Continue { label: None } => control.next(index + 1),
            other => (control.cerr)(other),
        });
        evaluate_node(&self.body, &scope, &self.config, advance, on_signal);
    }

    fn next(self: &Rc<Self>, index: usize) {
        let this = Rc::clone(self);
        (self.config.schedule)(Box::new(move || this.iterate(index)));
    }
}

fn for_of(
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
    let NodeKind::ForOf { left, right, body } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let left = left.clone();
    let body = body.clone();
    let c = c.clone();
    let cerr2 = cerr.clone();
    let env2 = env.clone();
    let config2 = config.clone();
    let on_iterable: Continuation = Rc::new(move |iterable| {
        // Iterate over a snapshot; mutation during the loop does not shift
        // the sequence under a resumed continuation.
        let items = match &iterable {
            Value::Array(items) => items.borrow().clone(),
            Value::Str(s) => s.chars().map(|ch| Value::string(ch.to_string())).collect(),
            other => {
                cerr2(Signal::type_error(format!(
                    "{} is not iterable",
                    other.type_name()
                )));
                return;
            }
        };
        Rc::new(IterationLoop {
            left: left.clone(),
            body: body.clone(),
            items,
            env: env2.clone(),
            config: config2.clone(),
            c: c.clone(),
            cerr: cerr2.clone(),
        })
        .iterate(0);
    });
    evaluate_node(right, env, config, on_iterable, cerr.clone());
}

fn for_in(
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
    let NodeKind::ForIn { left, right, body } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let left = left.clone();
    let body = body.clone();
    let c = c.clone();
    let cerr2 = cerr.clone();
    let env2 = env.clone();
    let config2 = config.clone();
    let on_source: Continuation = Rc::new(move |source| {
        let keys: Vec<Value> = match &source {
            Value::Object(map) => {
                let mut keys: Vec<String> = map
                    .borrow()
                    .keys()
                    .map(|name| config2.interner.display(*name).to_string())
                    .collect();
                // Deterministic order; the property map itself is unordered.
                keys.sort_unstable();
                keys.into_iter().map(Value::string).collect()
            }
            Value::Array(items) => (0..items.borrow().len())
                .map(|i| Value::string(i.to_string()))
                .collect(),
            other => {
                cerr2(Signal::type_error(format!(
                    "cannot enumerate {}",
                    other.type_name()
                )));
                return;
            }
        };
        Rc::new(IterationLoop {
            left: left.clone(),
            body: body.clone(),
            items: keys,
            env: env2.clone(),
            config: config2.clone(),
            c: c.clone(),
            cerr: cerr2.clone(),
        })
        .iterate(0);
    });
    evaluate_node(right, env, config, on_source, cerr.clone());
}

fn break_statement(
    item: &EvalItem,
    _c: &Continuation,
    cerr: &ErrorContinuation,
    _env: &EnvRef,
    _config: &EvalConfig,
) {
    let EvalItem::Syntax(node) = item else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let NodeKind::Break { label } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    cerr(Signal::Break { label: *label });
}

fn continue_statement(
    item: &EvalItem,
    _c: &Continuation,
    cerr: &ErrorContinuation,
    _env: &EnvRef,
    _config: &EvalConfig,
) {
    let EvalItem::Syntax(node) = item else {
        cerr(dispatch_mismatch(item));
        return;
    };
    let NodeKind::Continue { label } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    cerr(Signal::Continue { label: *label });
}

fn empty_statement(
    item: &EvalItem,
    c: &Continuation,
    cerr: &ErrorContinuation,
    _env: &EnvRef,
    _config: &EvalConfig,
) {
    let EvalItem::Syntax(_) = item else {
        cerr(dispatch_mismatch(item));
        return;
    };
    c(Value::Undefined);
}

/// Classes are sugar over closures: methods close over the declaration
/// environment, and `new` copies them onto each instance. Inheritance is
/// out of scope.
fn class_declaration(
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
    let NodeKind::ClassDeclaration {
        id,
        superclass,
        body,
    } = &node.kind
    else {
        cerr(dispatch_mismatch(item));
        return;
    };
    if superclass.is_some() {
        cerr(Signal::not_implemented("class inheritance"));
        return;
    }

    let methods = Value::object();
    let Value::Object(methods) = methods else {
        cerr(Signal::EmptyNode);
        return;
    };
    let mut constructor: Option<NodeRef> = None;
    for member in body {
        let NodeKind::MethodDefinition { key, kind, value } = &member.kind else {
            cerr(Signal::not_implemented(format!(
                "class member {}",
                member.tag().as_str()
            )));
            return;
        };
        match kind {
            MethodKind::Constructor => constructor = Some(value.clone()),
            MethodKind::Method => {
                methods
                    .borrow_mut()
                    .insert(*key, MetaFunction::new(value, env, config));
            }
        }
    }
    // A class without a constructor gets an empty one.
    let constructor =
        constructor.unwrap_or_else(|| build::function(Some(*id), Vec::new(), build::block(Vec::new())));

    let metafn = Rc::new(MetaFunction {
        node: constructor,
        closure: env.clone(),
        config: config.clone(),
        methods: Some(methods),
    });
    match env.set_value(*id, Value::Function(metafn), true, &config.interner) {
        Ok(_) => c(Value::Undefined),
        Err(signal) => cerr(signal),
    }
}

fn method_definition(
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
    let NodeKind::MethodDefinition { value, .. } = &node.kind else {
        cerr(dispatch_mismatch(item));
        return;
    };
    c(MetaFunction::new(value, env, config));
}
