//! Evaluation configuration: continuations, schedulers, interceptor.
//!
//! `EvalConfig` is threaded explicitly through every evaluation call — the
//! engine holds no ambient global state. All fields are `Rc`-backed so a
//! config clone is a handful of pointer bumps; captured continuations clone
//! it freely.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use cue_ir::{Name, NodeRef, Script, ScriptId, SharedInterner};

use crate::{EnvRef, Interpreters, Signal, Value};

/// Pre-interned names the interpreters touch on hot paths.
///
/// Interned once at config construction so binding `this`/`arguments` and
/// resolving `length` are `u32` comparisons, not string lookups.
#[derive(Clone, Copy, Debug)]
pub struct WellKnown {
    pub this: Name,
    pub arguments: Name,
    pub length: Name,
    pub constructor: Name,
    pub message: Name,
    pub push: Name,
}

impl WellKnown {
    pub fn new(interner: &SharedInterner) -> Self {
        WellKnown {
            this: interner.intern("this"),
            arguments: interner.intern("arguments"),
            length: interner.intern("length"),
            constructor: interner.intern("constructor"),
            message: interner.intern("message"),
            push: interner.intern("push"),
        }
    }
}

/// Success continuation: "what happens next" with the produced value.
///
/// Plain callables, not resumable data structures — resumability comes from
/// retaining them (e.g. inside a `callcc` receiver) past the point a direct
/// -style interpreter would have discarded them, and they may be fired any
/// number of times.
pub type Continuation = Rc<dyn Fn(Value)>;

/// Error continuation: receives every [`Signal`], failures and control
/// transfer alike.
pub type ErrorContinuation = Rc<dyn Fn(Signal)>;

/// One scheduled unit of evaluation work.
pub type Thunk = Box<dyn FnOnce()>;

/// Pluggable scheduler deciding when a scheduled step actually runs.
pub type Scheduler = Rc<dyn Fn(Thunk)>;

/// Interceptor phases.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Phase {
    Enter,
    Exit,
}

/// Observation hook fired around every dispatched node.
///
/// Side-effect only: the engine ignores anything it does, and
/// implementations must not panic into the evaluator.
pub type Interceptor = Rc<dyn Fn(Phase, &NodeRef, &EnvRef, Option<&Value>)>;

/// Hook receiving signals that reach the top of an evaluation uncaught.
pub type ErrorHook = Rc<dyn Fn(&Signal)>;

/// The scheduler used when a config does not choose one: run the step
/// synchronously in the caller's turn.
///
/// Simple and predictable, but deep programs grow the host call stack;
/// use a [`Trampoline`] for anything long-running.
pub fn immediate() -> Scheduler {
    Rc::new(|thunk| thunk())
}

/// Trampolined scheduler.
///
/// Steps queue into a pending list drained by a single non-reentrant loop,
/// so nested scheduling never grows the host call stack. Draining is LIFO:
/// the most recently queued step runs first. Ordering within one
/// interpreter's own continuation chain is preserved; no FIFO ordering
/// across independently scheduled siblings is promised.
pub struct Trampoline {
    queue: RefCell<Vec<Thunk>>,
    draining: Cell<bool>,
}

impl Trampoline {
    pub fn new() -> Rc<Self> {
        Rc::new(Trampoline {
            queue: RefCell::new(Vec::new()),
            draining: Cell::new(false),
        })
    }

    /// Queue a step, starting the drain loop unless one is already running.
    ///
    /// A continuation fired later (from host code, after suspension) lands
    /// here with no drain running and restarts one — resumption needs no
    /// extra plumbing.
    pub fn schedule(self: &Rc<Self>, thunk: Thunk) {
        self.queue.borrow_mut().push(thunk);
        if !self.draining.get() {
            self.drain();
        }
    }

    /// Run queued steps until the queue is empty.
    pub fn drain(&self) {
        self.draining.set(true);
        loop {
            let next = self.queue.borrow_mut().pop();
            let Some(thunk) = next else { break };
            thunk();
        }
        self.draining.set(false);
    }

    /// Adapt this trampoline into a [`Scheduler`].
    pub fn scheduler(self: &Rc<Self>) -> Scheduler {
        let this = Rc::clone(self);
        Rc::new(move |thunk| this.schedule(thunk))
    }
}

/// Per-run evaluation configuration.
///
/// Nested evaluations (function bodies) reuse the invoking function's
/// config; hosts layer interpreter overrides with
/// [`EvalConfig::with_interpreters`].
#[derive(Clone)]
pub struct EvalConfig {
    pub interpreters: Rc<Interpreters>,
    pub schedule: Scheduler,
    pub interceptor: Option<Interceptor>,
    pub on_error: Option<ErrorHook>,
    pub script: Option<Script>,
    pub interner: SharedInterner,
    pub names: WellKnown,
}

impl EvalConfig {
    /// Default configuration: base interpreter table, immediate scheduler,
    /// no interceptor.
    pub fn new(interner: SharedInterner) -> Self {
        let names = WellKnown::new(&interner);
        EvalConfig {
            interpreters: Interpreters::base(),
            schedule: immediate(),
            interceptor: None,
            on_error: None,
            script: None,
            interner,
            names,
        }
    }

    #[must_use]
    pub fn with_script(mut self, script: Script) -> Self {
        self.script = Some(script);
        self
    }

    #[must_use]
    pub fn with_scheduler(mut self, schedule: Scheduler) -> Self {
        self.schedule = schedule;
        self
    }

    #[must_use]
    pub fn with_interceptor(mut self, interceptor: Interceptor) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    #[must_use]
    pub fn with_on_error(mut self, hook: ErrorHook) -> Self {
        self.on_error = Some(hook);
        self
    }

    /// Layer an interpreter table on top of the current chain.
    #[must_use]
    pub fn with_interpreters(mut self, overrides: Rc<Interpreters>) -> Self {
        self.interpreters = Interpreters::layered(overrides, self.interpreters);
        self
    }

    pub fn script_id(&self) -> Option<ScriptId> {
        self.script.as_ref().map(|s| s.id)
    }
}
