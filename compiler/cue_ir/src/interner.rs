//! String interner backing [`Name`] identifiers.
//!
//! Property keys computed at runtime (`obj[expr]`) are interned on the fly,
//! so the interner is shared between the host, the IR, and the evaluator.

// Arc is required so SharedInterner can be handed to host callbacks that
// outlive any single evaluation.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::ops::Deref;
use std::sync::Arc;

use crate::Name;

struct Inner {
    /// Map from string content to index.
    map: FxHashMap<Arc<str>, u32>,
    /// Storage for string contents, indexed by `Name::raw()`.
    strings: Vec<Arc<str>>,
}

/// String interner with O(1) lookup and `u32` equality for interned names.
///
/// The evaluator itself is single-threaded; the lock exists so a
/// [`SharedInterner`] stays `Sync` for hosts that keep one around.
pub struct StringInterner {
    inner: RwLock<Inner>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let empty: Arc<str> = Arc::from("");
        let mut map = FxHashMap::default();
        map.insert(Arc::clone(&empty), 0);
        StringInterner {
            inner: RwLock::new(Inner {
                map,
                strings: vec![empty],
            }),
        }
    }

    /// Intern a string, returning its `Name`.
    ///
    /// Interning the same content twice returns the same `Name`.
    pub fn intern(&self, s: &str) -> Name {
        // Fast path: already interned.
        {
            let guard = self.inner.read();
            if let Some(&idx) = guard.map.get(s) {
                return Name::from_raw(idx);
            }
        }

        let mut guard = self.inner.write();
        // Double-check after acquiring the write lock.
        if let Some(&idx) = guard.map.get(s) {
            return Name::from_raw(idx);
        }
        let stored: Arc<str> = Arc::from(s);
        // Interned strings are bounded by source size; u32 cannot realistically
        // overflow here, but saturate rather than wrap if it ever does.
        let idx = u32::try_from(guard.strings.len()).unwrap_or(u32::MAX);
        guard.strings.push(Arc::clone(&stored));
        guard.map.insert(stored, idx);
        Name::from_raw(idx)
    }

    /// Resolve a `Name` back to its string content.
    ///
    /// Returns `None` for a `Name` not produced by this interner.
    pub fn resolve(&self, name: Name) -> Option<Arc<str>> {
        self.inner
            .read()
            .strings
            .get(name.raw() as usize)
            .cloned()
    }

    /// Resolve a `Name`, falling back to a placeholder for foreign names.
    ///
    /// Useful in error messages where failing to render would hide the
    /// underlying problem.
    pub fn display(&self, name: Name) -> Arc<str> {
        self.resolve(name).unwrap_or_else(|| Arc::from("<unknown>"))
    }

    /// Number of interned strings (including the pre-interned empty string).
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    /// Whether the interner holds only the pre-interned empty string.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Reference-counted handle to a [`StringInterner`].
#[derive(Clone)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    /// Create a fresh interner handle.
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for SharedInterner {
    type Target = StringInterner;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests;
