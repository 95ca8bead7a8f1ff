//! A shared, mutable property table.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Thread-safe `name -> value` table shared by every provider that reads it.
///
/// Clones share the same table, so a value set after the engine is built
/// is visible to the next `get()` on a non-deterministic value.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    inner: Arc<RwLock<BTreeMap<String, String>>>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.inner.read().get(name).cloned()
    }

    /// Set a property, returning the previous value.
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.inner.write().insert(name.into(), value.into())
    }

    pub fn remove(&self, name: &str) -> Option<String> {
        self.inner.write().remove(name)
    }

    pub fn extend(&self, entries: impl IntoIterator<Item = (String, String)>) {
        self.inner.write().extend(entries);
    }

    /// Entries whose name starts with `prefix` and is longer than it, with
    /// the prefix stripped.
    pub fn stripped(&self, prefix: &str) -> BTreeMap<String, String> {
        self.inner
            .read()
            .iter()
            .filter_map(|(name, value)| {
                name.strip_prefix(prefix)
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| (rest.to_string(), value.clone()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }
}
