//! Node constructors.
//!
//! The parser is an external collaborator, so tests and embedders assemble
//! ASTs through these helpers. Each returns a span-less [`NodeRef`]; attach
//! a range with [`Node::spanned`] when one is known.

use std::rc::Rc;

use crate::{
    AssignOp, BinaryOp, DeclKind, LogicalOp, MethodKind, Name, Node, NodeKind, NodeRef, UnaryOp,
    UpdateOp,
};

pub fn number(value: f64) -> NodeRef {
    Node::new(NodeKind::Number(value))
}

pub fn string(value: &str) -> NodeRef {
    Node::new(NodeKind::Str(Rc::from(value)))
}

pub fn boolean(value: bool) -> NodeRef {
    Node::new(NodeKind::Bool(value))
}

pub fn null() -> NodeRef {
    Node::new(NodeKind::Null)
}

pub fn ident(name: Name) -> NodeRef {
    Node::new(NodeKind::Identifier(name))
}

pub fn binary(op: BinaryOp, left: NodeRef, right: NodeRef) -> NodeRef {
    Node::new(NodeKind::Binary { op, left, right })
}

pub fn logical(op: LogicalOp, left: NodeRef, right: NodeRef) -> NodeRef {
    Node::new(NodeKind::Logical { op, left, right })
}

pub fn unary(op: UnaryOp, argument: NodeRef) -> NodeRef {
    Node::new(NodeKind::Unary { op, argument })
}

pub fn update(op: UpdateOp, prefix: bool, argument: NodeRef) -> NodeRef {
    Node::new(NodeKind::Update {
        op,
        prefix,
        argument,
    })
}

/// `object.property` (non-computed member access).
pub fn member(object: NodeRef, property: NodeRef) -> NodeRef {
    Node::new(NodeKind::Member {
        object,
        property,
        computed: false,
    })
}

/// `object[property]` (computed member access).
pub fn index(object: NodeRef, property: NodeRef) -> NodeRef {
    Node::new(NodeKind::Member {
        object,
        property,
        computed: true,
    })
}

pub fn assign(target: NodeRef, value: NodeRef) -> NodeRef {
    Node::new(NodeKind::Assignment {
        op: AssignOp::Assign,
        target,
        value,
    })
}

pub fn assign_op(op: AssignOp, target: NodeRef, value: NodeRef) -> NodeRef {
    Node::new(NodeKind::Assignment { op, target, value })
}

pub fn object(properties: Vec<NodeRef>) -> NodeRef {
    Node::new(NodeKind::Object { properties })
}

pub fn property(key: NodeRef, value: NodeRef) -> NodeRef {
    Node::new(NodeKind::Property {
        key,
        value,
        computed: false,
    })
}

pub fn array(elements: Vec<Option<NodeRef>>) -> NodeRef {
    Node::new(NodeKind::Array { elements })
}

/// Array literal with no holes.
pub fn array_of(elements: Vec<NodeRef>) -> NodeRef {
    array(elements.into_iter().map(Some).collect())
}

pub fn new_expr(callee: NodeRef, arguments: Vec<NodeRef>) -> NodeRef {
    Node::new(NodeKind::New { callee, arguments })
}

pub fn sequence(expressions: Vec<NodeRef>) -> NodeRef {
    Node::new(NodeKind::Sequence { expressions })
}

pub fn conditional(test: NodeRef, consequent: NodeRef, alternate: NodeRef) -> NodeRef {
    Node::new(NodeKind::Conditional {
        test,
        consequent,
        alternate,
    })
}

pub fn template(quasis: Vec<&str>, expressions: Vec<NodeRef>) -> NodeRef {
    Node::new(NodeKind::Template {
        quasis: quasis.into_iter().map(Rc::from).collect(),
        expressions,
    })
}

pub fn call(callee: NodeRef, arguments: Vec<NodeRef>) -> NodeRef {
    Node::new(NodeKind::Call { callee, arguments })
}

pub fn function(id: Option<Name>, params: Vec<NodeRef>, body: NodeRef) -> NodeRef {
    Node::new(NodeKind::Function { id, params, body })
}

pub fn arrow(params: Vec<NodeRef>, body: NodeRef) -> NodeRef {
    Node::new(NodeKind::Arrow { params, body })
}

pub fn rest(argument: NodeRef) -> NodeRef {
    Node::new(NodeKind::RestElement { argument })
}

pub fn object_pattern(properties: Vec<NodeRef>) -> NodeRef {
    Node::new(NodeKind::ObjectPattern { properties })
}

pub fn program(body: Vec<NodeRef>) -> NodeRef {
    Node::new(NodeKind::Program { body })
}

pub fn block(body: Vec<NodeRef>) -> NodeRef {
    Node::new(NodeKind::Block { body })
}

pub fn expr_stmt(expression: NodeRef) -> NodeRef {
    Node::new(NodeKind::ExpressionStatement { expression })
}

pub fn if_stmt(test: NodeRef, consequent: NodeRef, alternate: Option<NodeRef>) -> NodeRef {
    Node::new(NodeKind::If {
        test,
        consequent,
        alternate,
    })
}

pub fn declare(kind: DeclKind, declarations: Vec<NodeRef>) -> NodeRef {
    Node::new(NodeKind::VariableDeclaration { kind, declarations })
}

pub fn declarator(id: NodeRef, init: Option<NodeRef>) -> NodeRef {
    Node::new(NodeKind::VariableDeclarator { id, init })
}

/// `var name = init` as a single-declarator statement.
pub fn var(name: Name, init: NodeRef) -> NodeRef {
    declare(DeclKind::Var, vec![declarator(ident(name), Some(init))])
}

/// `let name = init` as a single-declarator statement.
pub fn let_(name: Name, init: NodeRef) -> NodeRef {
    declare(DeclKind::Let, vec![declarator(ident(name), Some(init))])
}

pub fn function_decl(id: Name, params: Vec<NodeRef>, body: NodeRef) -> NodeRef {
    Node::new(NodeKind::FunctionDeclaration { id, params, body })
}

pub fn return_stmt(argument: Option<NodeRef>) -> NodeRef {
    Node::new(NodeKind::Return { argument })
}

pub fn throw_stmt(argument: NodeRef) -> NodeRef {
    Node::new(NodeKind::Throw { argument })
}

pub fn try_stmt(block: NodeRef, handler: Option<NodeRef>, finalizer: Option<NodeRef>) -> NodeRef {
    Node::new(NodeKind::Try {
        block,
        handler,
        finalizer,
    })
}

pub fn catch(param: Option<NodeRef>, body: NodeRef) -> NodeRef {
    Node::new(NodeKind::CatchClause { param, body })
}

pub fn while_stmt(test: NodeRef, body: NodeRef) -> NodeRef {
    Node::new(NodeKind::While { test, body })
}

pub fn for_in(left: NodeRef, right: NodeRef, body: NodeRef) -> NodeRef {
    Node::new(NodeKind::ForIn { left, right, body })
}

pub fn for_of(left: NodeRef, right: NodeRef, body: NodeRef) -> NodeRef {
    Node::new(NodeKind::ForOf { left, right, body })
}

pub fn break_stmt(label: Option<Name>) -> NodeRef {
    Node::new(NodeKind::Break { label })
}

pub fn continue_stmt(label: Option<Name>) -> NodeRef {
    Node::new(NodeKind::Continue { label })
}

pub fn empty() -> NodeRef {
    Node::new(NodeKind::Empty)
}

pub fn class(id: Name, superclass: Option<NodeRef>, body: Vec<NodeRef>) -> NodeRef {
    Node::new(NodeKind::ClassDeclaration {
        id,
        superclass,
        body,
    })
}

pub fn method(key: Name, kind: MethodKind, value: NodeRef) -> NodeRef {
    Node::new(NodeKind::MethodDefinition { key, kind, value })
}
