//! AST node model.
//!
//! Nodes are immutable once built and shared as `Rc<Node>`: the evaluator's
//! continuation closures retain nodes past any syntactic lifetime (a captured
//! continuation may re-run a node long after its statement finished), so
//! shared ownership replaces arena indices here.
//!
//! The parser producing these nodes is an external collaborator; tests and
//! hosts assemble nodes through [`crate::build`].

use std::rc::Rc;

use crate::{AssignOp, BinaryOp, LogicalOp, Name, Span, UnaryOp, UpdateOp};

/// Shared handle to an AST node.
pub type NodeRef = Rc<Node>;

/// Declaration kinds for `VariableDeclaration`.
///
/// The environment model treats all three uniformly (declarations land in
/// the nearest non-internal scope); the kind is kept for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

impl DeclKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

/// Kinds of class members.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MethodKind {
    Constructor,
    Method,
}

/// An AST node: a kind plus an optional source range.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Option<Span>,
}

impl Node {
    /// Create a node without a source range (synthesized nodes).
    pub fn new(kind: NodeKind) -> NodeRef {
        Rc::new(Node { kind, span: None })
    }

    /// Create a node carrying its source range.
    pub fn spanned(kind: NodeKind, span: Span) -> NodeRef {
        Rc::new(Node {
            kind,
            span: Some(span),
        })
    }

    /// The discriminant tag used to key the interpreter table.
    #[inline]
    pub fn tag(&self) -> NodeTag {
        self.kind.tag()
    }
}

/// Node kinds.
///
/// One variant per supported node type of the surface language. The
/// evaluator's runtime-derived operations (`Apply`, `GetProperty`,
/// `SetProperty`) are not syntax and live with the evaluator; only their
/// [`NodeTag`]s appear here so they share the dispatch table.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    // Literals and identifiers
    Number(f64),
    Str(Rc<str>),
    Bool(bool),
    Null,
    Identifier(Name),

    // Expressions
    Binary {
        op: BinaryOp,
        left: NodeRef,
        right: NodeRef,
    },
    Logical {
        op: LogicalOp,
        left: NodeRef,
        right: NodeRef,
    },
    Unary {
        op: UnaryOp,
        argument: NodeRef,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        argument: NodeRef,
    },
    Member {
        object: NodeRef,
        property: NodeRef,
        computed: bool,
    },
    Assignment {
        op: AssignOp,
        target: NodeRef,
        value: NodeRef,
    },
    Object {
        properties: Vec<NodeRef>,
    },
    /// Object literal property or object-pattern element.
    Property {
        key: NodeRef,
        value: NodeRef,
        computed: bool,
    },
    Array {
        /// `None` is a sparse-literal hole.
        elements: Vec<Option<NodeRef>>,
    },
    New {
        callee: NodeRef,
        arguments: Vec<NodeRef>,
    },
    Sequence {
        expressions: Vec<NodeRef>,
    },
    Conditional {
        test: NodeRef,
        consequent: NodeRef,
        alternate: NodeRef,
    },
    Template {
        /// Literal text segments; always `expressions.len() + 1` entries.
        quasis: Vec<Rc<str>>,
        expressions: Vec<NodeRef>,
    },
    Call {
        callee: NodeRef,
        arguments: Vec<NodeRef>,
    },
    /// Function expression (possibly named).
    Function {
        id: Option<Name>,
        params: Vec<NodeRef>,
        body: NodeRef,
    },
    /// Arrow function; `body` may be a `Block` or a bare expression.
    Arrow {
        params: Vec<NodeRef>,
        body: NodeRef,
    },

    // Patterns
    RestElement {
        argument: NodeRef,
    },
    ObjectPattern {
        properties: Vec<NodeRef>,
    },

    // Statements
    Program {
        body: Vec<NodeRef>,
    },
    Block {
        body: Vec<NodeRef>,
    },
    ExpressionStatement {
        expression: NodeRef,
    },
    If {
        test: NodeRef,
        consequent: NodeRef,
        alternate: Option<NodeRef>,
    },
    VariableDeclaration {
        kind: DeclKind,
        declarations: Vec<NodeRef>,
    },
    VariableDeclarator {
        id: NodeRef,
        init: Option<NodeRef>,
    },
    FunctionDeclaration {
        id: Name,
        params: Vec<NodeRef>,
        body: NodeRef,
    },
    Return {
        argument: Option<NodeRef>,
    },
    Throw {
        argument: NodeRef,
    },
    Try {
        block: NodeRef,
        handler: Option<NodeRef>,
        finalizer: Option<NodeRef>,
    },
    CatchClause {
        param: Option<NodeRef>,
        body: NodeRef,
    },
    While {
        test: NodeRef,
        body: NodeRef,
    },
    ForIn {
        left: NodeRef,
        right: NodeRef,
        body: NodeRef,
    },
    ForOf {
        left: NodeRef,
        right: NodeRef,
        body: NodeRef,
    },
    Break {
        label: Option<Name>,
    },
    Continue {
        label: Option<Name>,
    },
    Empty,
    ClassDeclaration {
        id: Name,
        superclass: Option<NodeRef>,
        body: Vec<NodeRef>,
    },
    MethodDefinition {
        key: Name,
        kind: MethodKind,
        value: NodeRef,
    },
}

impl NodeKind {
    /// The discriminant tag used to key the interpreter table.
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Number(_) => NodeTag::NumberLiteral,
            NodeKind::Str(_) => NodeTag::StringLiteral,
            NodeKind::Bool(_) => NodeTag::BooleanLiteral,
            NodeKind::Null => NodeTag::NullLiteral,
            NodeKind::Identifier(_) => NodeTag::Identifier,
            NodeKind::Binary { .. } => NodeTag::BinaryExpression,
            NodeKind::Logical { .. } => NodeTag::LogicalExpression,
            NodeKind::Unary { .. } => NodeTag::UnaryExpression,
            NodeKind::Update { .. } => NodeTag::UpdateExpression,
            NodeKind::Member { .. } => NodeTag::MemberExpression,
            NodeKind::Assignment { .. } => NodeTag::AssignmentExpression,
            NodeKind::Object { .. } => NodeTag::ObjectExpression,
            NodeKind::Property { .. } => NodeTag::Property,
            NodeKind::Array { .. } => NodeTag::ArrayExpression,
            NodeKind::New { .. } => NodeTag::NewExpression,
            NodeKind::Sequence { .. } => NodeTag::SequenceExpression,
            NodeKind::Conditional { .. } => NodeTag::ConditionalExpression,
            NodeKind::Template { .. } => NodeTag::TemplateLiteral,
            NodeKind::Call { .. } => NodeTag::CallExpression,
            NodeKind::Function { .. } => NodeTag::FunctionExpression,
            NodeKind::Arrow { .. } => NodeTag::ArrowFunctionExpression,
            NodeKind::RestElement { .. } => NodeTag::RestElement,
            NodeKind::ObjectPattern { .. } => NodeTag::ObjectPattern,
            NodeKind::Program { .. } => NodeTag::Program,
            NodeKind::Block { .. } => NodeTag::BlockStatement,
            NodeKind::ExpressionStatement { .. } => NodeTag::ExpressionStatement,
            NodeKind::If { .. } => NodeTag::IfStatement,
            NodeKind::VariableDeclaration { .. } => NodeTag::VariableDeclaration,
            NodeKind::VariableDeclarator { .. } => NodeTag::VariableDeclarator,
            NodeKind::FunctionDeclaration { .. } => NodeTag::FunctionDeclaration,
            NodeKind::Return { .. } => NodeTag::ReturnStatement,
            NodeKind::Throw { .. } => NodeTag::ThrowStatement,
            NodeKind::Try { .. } => NodeTag::TryStatement,
            NodeKind::CatchClause { .. } => NodeTag::CatchClause,
            NodeKind::While { .. } => NodeTag::WhileStatement,
            NodeKind::ForIn { .. } => NodeTag::ForInStatement,
            NodeKind::ForOf { .. } => NodeTag::ForOfStatement,
            NodeKind::Break { .. } => NodeTag::BreakStatement,
            NodeKind::Continue { .. } => NodeTag::ContinueStatement,
            NodeKind::Empty => NodeTag::EmptyStatement,
            NodeKind::ClassDeclaration { .. } => NodeTag::ClassDeclaration,
            NodeKind::MethodDefinition { .. } => NodeTag::MethodDefinition,
        }
    }
}

/// Closed set of node-type tags keying the interpreter table.
///
/// Includes the three runtime-derived operation tags (`Apply`,
/// `GetProperty`, `SetProperty`) so hosts can override primitive
/// application and property access through the same table chain.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeTag {
    NumberLiteral,
    StringLiteral,
    BooleanLiteral,
    NullLiteral,
    Identifier,
    BinaryExpression,
    LogicalExpression,
    UnaryExpression,
    UpdateExpression,
    MemberExpression,
    AssignmentExpression,
    ObjectExpression,
    Property,
    ArrayExpression,
    NewExpression,
    SequenceExpression,
    ConditionalExpression,
    TemplateLiteral,
    CallExpression,
    FunctionExpression,
    ArrowFunctionExpression,
    RestElement,
    ObjectPattern,
    Program,
    BlockStatement,
    ExpressionStatement,
    IfStatement,
    VariableDeclaration,
    VariableDeclarator,
    FunctionDeclaration,
    ReturnStatement,
    ThrowStatement,
    TryStatement,
    CatchClause,
    WhileStatement,
    ForInStatement,
    ForOfStatement,
    BreakStatement,
    ContinueStatement,
    EmptyStatement,
    ClassDeclaration,
    MethodDefinition,
    // Runtime-derived operations
    Apply,
    GetProperty,
    SetProperty,
}

impl NodeTag {
    /// The node-type name as the surface language spells it.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NumberLiteral => "NumberLiteral",
            Self::StringLiteral => "StringLiteral",
            Self::BooleanLiteral => "BooleanLiteral",
            Self::NullLiteral => "NullLiteral",
            Self::Identifier => "Identifier",
            Self::BinaryExpression => "BinaryExpression",
            Self::LogicalExpression => "LogicalExpression",
            Self::UnaryExpression => "UnaryExpression",
            Self::UpdateExpression => "UpdateExpression",
            Self::MemberExpression => "MemberExpression",
            Self::AssignmentExpression => "AssignmentExpression",
            Self::ObjectExpression => "ObjectExpression",
            Self::Property => "Property",
            Self::ArrayExpression => "ArrayExpression",
            Self::NewExpression => "NewExpression",
            Self::SequenceExpression => "SequenceExpression",
            Self::ConditionalExpression => "ConditionalExpression",
            Self::TemplateLiteral => "TemplateLiteral",
            Self::CallExpression => "CallExpression",
            Self::FunctionExpression => "FunctionExpression",
            Self::ArrowFunctionExpression => "ArrowFunctionExpression",
            Self::RestElement => "RestElement",
            Self::ObjectPattern => "ObjectPattern",
            Self::Program => "Program",
            Self::BlockStatement => "BlockStatement",
            Self::ExpressionStatement => "ExpressionStatement",
            Self::IfStatement => "IfStatement",
            Self::VariableDeclaration => "VariableDeclaration",
            Self::VariableDeclarator => "VariableDeclarator",
            Self::FunctionDeclaration => "FunctionDeclaration",
            Self::ReturnStatement => "ReturnStatement",
            Self::ThrowStatement => "ThrowStatement",
            Self::TryStatement => "TryStatement",
            Self::CatchClause => "CatchClause",
            Self::WhileStatement => "WhileStatement",
            Self::ForInStatement => "ForInStatement",
            Self::ForOfStatement => "ForOfStatement",
            Self::BreakStatement => "BreakStatement",
            Self::ContinueStatement => "ContinueStatement",
            Self::EmptyStatement => "EmptyStatement",
            Self::ClassDeclaration => "ClassDeclaration",
            Self::MethodDefinition => "MethodDefinition",
            Self::Apply => "Apply",
            Self::GetProperty => "GetProperty",
            Self::SetProperty => "SetProperty",
        }
    }
}

#[cfg(test)]
mod tests;
