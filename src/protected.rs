use alloc::{collections::BTreeMap, string::String};

use crate::{any::Object, registry::FactoryFn};

/// Entry kept outside bindings: never autowired, cached or decorated.
#[derive(Debug, Clone)]
pub(crate) enum Protected {
    Factory(FactoryFn),
    Value(Object),
}

#[derive(Default)]
pub(crate) struct ProtectedStore {
    entries: BTreeMap<String, Protected>,
}

impl ProtectedStore {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self { entries: BTreeMap::new() }
    }

    #[inline]
    pub(crate) fn insert(&mut self, key: String, entry: Protected) -> Option<Protected> {
        self.entries.insert(key, entry)
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, key: &str) -> Option<Protected> {
        self.entries.get(key).cloned()
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
