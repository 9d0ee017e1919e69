//! The external parser boundary.
//!
//! The engine evaluates ASTs; producing them from text is a collaborator's
//! job. Hosts hand in a [`ParseFn`] and the engine wraps it with a source
//! cache, so re-running the same script re-parses nothing.

use std::cell::RefCell;
use std::rc::Rc;

use cue_ir::{NodeRef, Span};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{EvalException, ExceptionKind, Signal};

/// Failure reported by the external parser.
#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Option<Span>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
            span: None,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

impl From<ParseError> for Signal {
    fn from(error: ParseError) -> Signal {
        Signal::Error(EvalException::new(ExceptionKind::Parse, error.message))
    }
}

/// Parser callback provided by the host.
pub type ParseFn = Rc<dyn Fn(&str) -> Result<NodeRef, ParseError>>;

/// Memoizing wrapper around a [`ParseFn`].
///
/// Nodes are immutable, so a cached tree is safe to share between runs.
/// Parse failures are not cached; a host may swap its parser mid-session.
pub struct CachedParser {
    parse: ParseFn,
    cache: RefCell<FxHashMap<String, NodeRef>>,
}

impl CachedParser {
    pub fn new(parse: ParseFn) -> Self {
        CachedParser {
            parse,
            cache: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn parse(&self, source: &str) -> Result<NodeRef, ParseError> {
        if let Some(node) = self.cache.borrow().get(source) {
            return Ok(node.clone());
        }
        let node = (self.parse)(source)?;
        self.cache
            .borrow_mut()
            .insert(source.to_string(), node.clone());
        Ok(node)
    }

    /// Number of cached sources.
    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Tests use expect for brevity")]
mod tests;
