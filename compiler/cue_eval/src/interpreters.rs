//! The interpreter table.
//!
//! Evaluation dispatches on [`NodeTag`] through a chain of tables. The base
//! table covers every supported node type plus the three runtime-derived
//! operations (`Apply`, `GetProperty`, `SetProperty`). Hosts layer override
//! tables on top; lookup walks the chain outermost-first, so an override
//! shadows the base interpreter for its tag while everything else falls
//! through unchanged.

use std::rc::Rc;

use cue_ir::NodeTag;
use rustc_hash::FxHashMap;

use crate::{Continuation, EnvRef, ErrorContinuation, EvalConfig, EvalItem, InterpreterFn, Signal};

mod base;
mod expressions;
mod statements;

/// A mutable tag-to-interpreter map used to assemble a table.
#[derive(Default)]
pub struct InterpreterMap {
    values: FxHashMap<NodeTag, InterpreterFn>,
}

impl InterpreterMap {
    pub fn set(
        &mut self,
        tag: NodeTag,
        f: impl Fn(&EvalItem, &Continuation, &ErrorContinuation, &EnvRef, &EvalConfig) + 'static,
    ) {
        self.values.insert(tag, Rc::new(f));
    }

    pub fn set_fn(&mut self, tag: NodeTag, f: InterpreterFn) {
        self.values.insert(tag, f);
    }
}

/// One layer of the dispatch chain.
pub struct Interpreters {
    values: FxHashMap<NodeTag, InterpreterFn>,
    prev: Option<Rc<Interpreters>>,
}

impl Interpreters {
    /// The base table with every built-in interpreter registered.
    pub fn base() -> Rc<Interpreters> {
        let mut map = InterpreterMap::default();
        base::register(&mut map);
        expressions::register(&mut map);
        statements::register(&mut map);
        Rc::new(Interpreters {
            values: map.values,
            prev: None,
        })
    }

    /// A standalone table from a host-assembled map (no fallthrough).
    pub fn from_map(map: InterpreterMap) -> Rc<Interpreters> {
        Rc::new(Interpreters {
            values: map.values,
            prev: None,
        })
    }

    /// Chain `overrides` in front of `prev`.
    pub fn layered(overrides: Rc<Interpreters>, prev: Rc<Interpreters>) -> Rc<Interpreters> {
        Rc::new(Interpreters {
            values: overrides.values.clone(),
            prev: Some(prev),
        })
    }

    /// Resolve `tag`, walking the chain outermost-first.
    pub fn lookup(&self, tag: NodeTag) -> Option<InterpreterFn> {
        let mut current = self;
        loop {
            if let Some(f) = current.values.get(&tag) {
                return Some(f.clone());
            }
            match &current.prev {
                Some(prev) => current = prev,
                None => return None,
            }
        }
    }
}

/// An interpreter received an item whose shape does not match its tag.
/// Only reachable when a host registers an interpreter under the wrong tag.
pub(crate) fn dispatch_mismatch(item: &EvalItem) -> Signal {
    Signal::not_implemented(format!("malformed dispatch for {}", item.tag().as_str()))
}

#[cfg(test)]
mod tests;
