use alloc::{
    boxed::Box,
    collections::{BTreeMap, BTreeSet},
    string::String,
    vec::Vec,
};

use crate::any::Object;

/// Instances of shared bindings plus the keys resolved at least once.
#[derive(Default)]
pub(crate) struct Cache {
    map: Option<Box<BTreeMap<String, Object>>>,
    resolved: BTreeSet<String>,
}

impl Cache {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self {
            map: None,
            resolved: BTreeSet::new(),
        }
    }

    #[inline]
    pub(crate) fn insert(&mut self, key: String, value: Object) -> Option<Object> {
        self.map.get_or_insert_with(Box::default).insert(key, value)
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, key: &str) -> Option<Object> {
        self.map.as_ref().and_then(|map| map.get(key)).cloned()
    }

    #[inline]
    pub(crate) fn remove(&mut self, key: &str) -> Option<Object> {
        self.map.as_mut().and_then(|map| map.remove(key))
    }

    /// Evicts every instance, resolved markers stay.
    #[inline]
    pub(crate) fn clear_instances(&mut self) {
        self.map = None;
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.map = None;
        self.resolved.clear();
    }

    #[inline]
    pub(crate) fn mark_resolved(&mut self, key: &str) {
        if !self.resolved.contains(key) {
            self.resolved.insert(key.into());
        }
    }

    #[inline]
    pub(crate) fn unmark_resolved(&mut self, key: &str) {
        self.resolved.remove(key);
    }

    #[inline]
    #[must_use]
    pub(crate) fn is_resolved(&self, key: &str) -> bool {
        self.resolved.contains(key)
    }

    #[must_use]
    pub(crate) fn instance_keys(&self) -> Vec<String> {
        self.map.as_ref().map(|map| map.keys().cloned().collect()).unwrap_or_default()
    }

    #[must_use]
    pub(crate) fn resolved_keys(&self) -> Vec<String> {
        self.resolved.iter().cloned().collect()
    }
}
