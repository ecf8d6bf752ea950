use crate::{any::Object, errors::ResolveErrorKind, registry::Recipe, Container};

/// Index-style access to a container, each operation delegating to a primitive one.
pub trait Offset {
    /// # Errors
    /// See [`Container::resolve`]
    fn offset_get(&self, key: &str) -> Result<Object, ResolveErrorKind>;

    /// Registers a transient binding.
    fn offset_set(&self, key: &str, value: impl Into<Recipe>);

    fn offset_exists(&self, key: &str) -> bool;

    fn offset_unset(&self, key: &str);
}

impl Offset for Container {
    #[inline]
    fn offset_get(&self, key: &str) -> Result<Object, ResolveErrorKind> {
        self.resolve(key)
    }

    #[inline]
    fn offset_set(&self, key: &str, value: impl Into<Recipe>) {
        self.register(key, value);
    }

    #[inline]
    fn offset_exists(&self, key: &str) -> bool {
        self.has(key)
    }

    #[inline]
    fn offset_unset(&self, key: &str) {
        self.delete(key);
    }
}
