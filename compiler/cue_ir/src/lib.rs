//! Cue IR - AST node model for the Cue evaluator.
//!
//! This crate provides the data the evaluator consumes:
//! - `Node`/`NodeKind`/`NodeTag`: reference-counted AST nodes and the closed
//!   tag set keying the interpreter dispatch table
//! - `Name`/`StringInterner`: interned identifiers and property keys
//! - `Span`: byte-offset source ranges
//! - `Script`/`Session`: source registration with session-scoped id counters
//! - `build`: node constructors standing in for the external parser

pub mod build;
mod interner;
mod name;
mod node;
mod ops;
mod script;
mod span;

pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use node::{DeclKind, MethodKind, Node, NodeKind, NodeRef, NodeTag};
pub use ops::{AssignOp, BinaryOp, LogicalOp, UnaryOp, UpdateOp};
pub use script::{Script, ScriptId, Session};
pub use span::{Span, SpanError};
