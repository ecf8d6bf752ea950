use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::fmt::{self, Debug, Formatter};

use crate::{
    any::Object,
    arguments::Arguments,
    errors::InstantiateErrorKind,
    identifier::TypeIdentifier,
    service::{service_fn, BoxCloneService},
    utils::thread_safety::{SendSafety, SyncSafety},
    Container,
};

pub(crate) type BoxedCloneFactory = BoxCloneService<(Arguments, Container), Object, InstantiateErrorKind>;

/// A factory callable: receives the caller's arguments and the container itself.
#[derive(Clone)]
pub struct FactoryFn(pub(crate) BoxedCloneFactory);

impl FactoryFn {
    /// An [`Object`] returned by `factory` (a forwarded `resolve`, for example) becomes the value as is.
    /// Return `Object::from(rc)` to forward an `RcThreadSafety<T>` as `T`.
    #[must_use]
    pub fn new<F, R, E>(mut factory: F) -> Self
    where
        F: FnMut(Arguments, &Container) -> Result<R, E> + Clone + Send + Sync + 'static,
        R: SendSafety + SyncSafety + 'static,
        E: Into<InstantiateErrorKind>,
    {
        Self(BoxCloneService::new(service_fn(move |(arguments, container): (Arguments, Container)| {
            factory(arguments, &container).map(Object::new).map_err(Into::into)
        })))
    }
}

impl Debug for FactoryFn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("FactoryFn")
    }
}

/// How a binding produces its value.
#[derive(Debug, Clone)]
pub enum Recipe {
    /// Already built value, handed out as is.
    Instance(Object),
    /// Type built through the catalog, autowiring its constructor.
    Alias(TypeIdentifier),
    Factory(FactoryFn),
}

impl Recipe {
    #[inline]
    #[must_use]
    pub fn factory<F, R, E>(factory: F) -> Self
    where
        F: FnMut(Arguments, &Container) -> Result<R, E> + Clone + Send + Sync + 'static,
        R: SendSafety + SyncSafety + 'static,
        E: Into<InstantiateErrorKind>,
    {
        Self::Factory(FactoryFn::new(factory))
    }

    #[inline]
    #[must_use]
    pub fn instance<T: SendSafety + SyncSafety + 'static>(value: T) -> Self {
        Self::Instance(Object::new(value))
    }
}

impl From<&str> for Recipe {
    #[inline]
    fn from(type_id: &str) -> Self {
        Self::Alias(type_id.into())
    }
}

impl From<String> for Recipe {
    #[inline]
    fn from(type_id: String) -> Self {
        Self::Alias(type_id.into())
    }
}

impl From<TypeIdentifier> for Recipe {
    #[inline]
    fn from(type_id: TypeIdentifier) -> Self {
        Self::Alias(type_id)
    }
}

impl From<Object> for Recipe {
    #[inline]
    fn from(object: Object) -> Self {
        Self::Instance(object)
    }
}

impl From<FactoryFn> for Recipe {
    #[inline]
    fn from(factory: FactoryFn) -> Self {
        Self::Factory(factory)
    }
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub value: Recipe,
    pub shared: bool,
}

#[derive(Default)]
pub(crate) struct Registry {
    bindings: BTreeMap<String, Binding>,
}

impl Registry {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self { bindings: BTreeMap::new() }
    }

    #[inline]
    pub(crate) fn insert(&mut self, key: String, binding: Binding) -> Option<Binding> {
        self.bindings.insert(key, binding)
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, key: &str) -> Option<&Binding> {
        self.bindings.get(key)
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    #[inline]
    pub(crate) fn remove(&mut self, key: &str) -> Option<Binding> {
        self.bindings.remove(key)
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.bindings.clear();
    }

    #[must_use]
    pub(crate) fn keys(&self) -> Vec<String> {
        self.bindings.keys().cloned().collect()
    }
}
