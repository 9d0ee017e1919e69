//! Environment: chained scope records.
//!
//! A scope is one `Name -> Value` map plus a parent link toward the global
//! scope. Ownership is shared: a closure keeps an `Rc` to the environment
//! active at its creation, which keeps the whole parent chain alive for as
//! long as the closure (or a captured continuation) exists. No cycles occur
//! naturally here since links are strictly parent-directed.
//!
//! `internal` marks administrative frames (the catch-clause error binding)
//! that declaration writes must skip.

use std::cell::RefCell;
use std::rc::Rc;

use cue_ir::{Name, SharedInterner};
use rustc_hash::FxHashMap;

use crate::{Signal, Value};

/// Shared handle to an environment record.
pub type EnvRef = Rc<Environment>;

/// One lexical scope.
#[derive(Debug)]
pub struct Environment {
    values: RefCell<FxHashMap<Name, Value>>,
    prev: Option<EnvRef>,
    internal: bool,
}

impl Environment {
    /// A root scope with no parent (the global scope of an evaluation).
    pub fn root() -> EnvRef {
        Rc::new(Environment {
            values: RefCell::new(FxHashMap::default()),
            prev: None,
            internal: false,
        })
    }

    /// A fresh scope chained under `prev`.
    pub fn child(prev: &EnvRef) -> EnvRef {
        Rc::new(Environment {
            values: RefCell::new(FxHashMap::default()),
            prev: Some(prev.clone()),
            internal: false,
        })
    }

    /// An administrative frame chained under `prev`.
    ///
    /// Declarations skip these when choosing their target scope.
    pub fn internal_child(prev: &EnvRef) -> EnvRef {
        Rc::new(Environment {
            values: RefCell::new(FxHashMap::default()),
            prev: Some(prev.clone()),
            internal: true,
        })
    }

    /// The parent scope, if any.
    pub fn prev(&self) -> Option<&EnvRef> {
        self.prev.as_ref()
    }

    /// Whether this is an administrative frame.
    pub fn is_internal(&self) -> bool {
        self.internal
    }

    /// Unconditionally bind `name` in this scope.
    ///
    /// Used for host seeding and parameter/`this`/`arguments` binding,
    /// which target a specific frame by construction.
    pub fn define(&self, name: Name, value: Value) {
        self.values.borrow_mut().insert(name, value);
    }

    /// Look up `name` along the chain without failing.
    pub fn lookup(&self, name: Name) -> Option<Value> {
        let mut current = self;
        loop {
            if let Some(value) = current.values.borrow().get(&name) {
                return Some(value.clone());
            }
            match &current.prev {
                Some(prev) => current = prev,
                None => return None,
            }
        }
    }

    /// Read `name`, failing with `ReferenceError` when the chain is
    /// exhausted. Pure linked lookup; no prototype-style inheritance.
    pub fn get_value(&self, name: Name, interner: &SharedInterner) -> Result<Value, Signal> {
        self.lookup(name).ok_or_else(|| {
            Signal::reference_error(format!("{} is not defined", interner.display(name)))
        })
    }

    /// Write `name`.
    ///
    /// A declaration lands in the nearest non-internal scope (creating or
    /// overwriting the binding there). A plain assignment writes to the
    /// existing owner of `name`, and fails with `ReferenceError` when no
    /// owner exists — assignment never creates a binding.
    pub fn set_value(
        &self,
        name: Name,
        value: Value,
        is_declaration: bool,
        interner: &SharedInterner,
    ) -> Result<Value, Signal> {
        if is_declaration {
            let mut current = self;
            while current.internal {
                match &current.prev {
                    Some(prev) => current = prev,
                    None => break,
                }
            }
            current.values.borrow_mut().insert(name, value.clone());
            return Ok(value);
        }

        let mut current = self;
        loop {
            {
                let mut values = current.values.borrow_mut();
                if values.contains_key(&name) {
                    values.insert(name, value.clone());
                    return Ok(value);
                }
            }
            match &current.prev {
                Some(prev) => current = prev,
                None => {
                    return Err(Signal::reference_error(format!(
                        "{} is not defined",
                        interner.display(name)
                    )))
                }
            }
        }
    }

    /// Names bound directly in this scope (not the chain).
    pub fn own_names(&self) -> Vec<Name> {
        self.values.borrow().keys().copied().collect()
    }
}
