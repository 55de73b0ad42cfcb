//! Memoization of resolved configurations per scope.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use ts::CompilerOptions;

use crate::file_system::AbsoluteFsPath;

/// Identifies the configuration scope a module belongs to.
///
/// With an explicit configuration location every module shares that one key;
/// otherwise the key is the module's directory, so sibling modules share an entry
/// while modules in other directories resolve on their own even when they end up
/// at the same `tsconfig.json`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeKey(String);

impl ScopeKey {
    pub fn for_module(module: &AbsoluteFsPath, explicit_location: Option<&str>) -> Self {
        match explicit_location {
            Some(location) => ScopeKey(location.to_string()),
            None => ScopeKey(module.dirname().into_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolved configurations keyed by [`ScopeKey`], owned by one plugin instance.
///
/// Entries are only ever added; the whole map is dropped by [`clear`](Self::clear)
/// at the start of each build.
///
/// The resolver runs without any lock held. Two callers missing on the same new key
/// at once may therefore both resolve; insertion is insert-if-absent, so the first
/// stored value wins and both callers get that same `Arc`. Resolution is a pure
/// function of its inputs, which makes the duplicate work harmless.
#[derive(Debug, Default)]
pub struct ConfigurationCache {
    entries: RwLock<HashMap<ScopeKey, Arc<CompilerOptions>>>,
}

impl ConfigurationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ScopeKey) -> Option<Arc<CompilerOptions>> {
        self.entries.read().get(key).cloned()
    }

    /// Return the entry for `key`, calling `resolve` to populate it on a miss.
    ///
    /// Errors from `resolve` are returned as-is and nothing is stored, so the next
    /// caller with the same key tries again.
    pub fn get_or_resolve<E, F>(&self, key: &ScopeKey, resolve: F) -> Result<Arc<CompilerOptions>, E>
    where
        F: FnOnce() -> Result<CompilerOptions, E>,
    {
        if let Some(options) = self.get(key) {
            tracing::debug!(scope = %key, "configuration cache hit");
            return Ok(options);
        }

        tracing::debug!(scope = %key, "configuration cache miss");
        let resolved = Arc::new(resolve()?);
        let mut entries = self.entries.write();
        Ok(entries.entry(key.clone()).or_insert(resolved).clone())
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn contains(&self, key: &ScopeKey) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
