//! Scripts and evaluation sessions.
//!
//! A [`Session`] owns the script-id counter and a registry of script
//! sources, replacing any ambient global counter: every evaluation that
//! needs an id is handed a session explicitly.

// Arc<str> lets diagnostics hold source text without copying while the
// session stays Sync for host embedding.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Identifier of a script within one [`Session`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct ScriptId(u32);

impl ScriptId {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// One unit of source text under evaluation.
#[derive(Clone, Debug)]
pub struct Script {
    pub id: ScriptId,
    pub source: Arc<str>,
    pub url: Arc<str>,
}

/// Session-scoped counters and script registry.
///
/// Holds its own id counter so two sessions never share numbering.
pub struct Session {
    next_id: RwLock<u32>,
    scripts: RwLock<FxHashMap<ScriptId, Script>>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            next_id: RwLock::new(0),
            scripts: RwLock::new(FxHashMap::default()),
        }
    }

    /// Register a new script, allocating the next id in this session.
    pub fn new_script(&self, source: impl Into<Arc<str>>, url: impl Into<Arc<str>>) -> Script {
        let id = {
            let mut next = self.next_id.write();
            let id = ScriptId(*next);
            *next += 1;
            id
        };
        let script = Script {
            id,
            source: source.into(),
            url: url.into(),
        };
        self.scripts.write().insert(id, script.clone());
        script
    }

    /// Look up a previously registered script.
    pub fn script(&self, id: ScriptId) -> Option<Script> {
        self.scripts.read().get(&id).cloned()
    }

    /// Anonymous script with a placeholder url.
    pub fn anonymous(&self, source: impl Into<Arc<str>>) -> Script {
        self.new_script(source, "anonymous")
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Tests use expect for brevity")]
mod tests;
