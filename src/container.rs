use alloc::{
    boxed::Box,
    string::{String, ToString as _},
    vec::Vec,
};
use core::any::type_name;
use parking_lot::Mutex;
use tracing::{debug, error, info_span};

use crate::{
    any::Object,
    arguments::Arguments,
    cache::Cache,
    catalog::{Construction, Injectable, MethodDescriptor, Param, TypeCatalog, TypeDescriptor},
    config::Config,
    errors::{ExtendErrorKind, InstantiateErrorKind, InstantiatorErrorKind, NotInstantiableReason, ProtectedErrorKind, ResolveErrorKind},
    extension::{boxed_decorator, Extension, Extensions},
    identifier::TypeIdentifier,
    protected::{Protected, ProtectedStore},
    provider::ServiceProvider,
    registry::{Binding, FactoryFn, Recipe, Registry},
    service::Service as _,
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
};

/// String-keyed IoC container.
///
/// The handle is cheap to clone; clones share the same bindings, instances and extensions.
/// Factories, decorators and constructors receive the container and may register or resolve
/// further entries while they run.
#[derive(Clone)]
pub struct Container {
    pub(crate) inner: RcThreadSafety<ContainerInner>,
}

pub(crate) struct ContainerInner {
    registry: Mutex<Registry>,
    cache: Mutex<Cache>,
    extensions: Mutex<Extensions>,
    protected: Mutex<ProtectedStore>,
    catalog: Mutex<TypeCatalog>,
    resolving: Mutex<Vec<String>>,
}

/// Snapshot of the container stores, for introspection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keys {
    pub bindings: Vec<String>,
    pub resolved: Vec<String>,
    pub instances: Vec<String>,
    pub extensions: Vec<String>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Creates an empty container with an empty type catalog.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(TypeCatalog::new())
    }

    #[inline]
    #[must_use]
    pub fn with_catalog(catalog: TypeCatalog) -> Self {
        Self {
            inner: RcThreadSafety::new(ContainerInner {
                registry: Mutex::new(Registry::new()),
                cache: Mutex::new(Cache::new()),
                extensions: Mutex::new(Extensions::new()),
                protected: Mutex::new(ProtectedStore::new()),
                catalog: Mutex::new(catalog),
                resolving: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Adds `T` to the type catalog.
    #[inline]
    pub fn describe<T: Injectable>(&self) -> &Self {
        self.add_descriptor(T::descriptor())
    }

    #[inline]
    pub fn describe_interface(&self, type_id: impl Into<TypeIdentifier>) -> &Self {
        self.add_descriptor(TypeDescriptor::interface(type_id))
    }

    #[inline]
    pub fn add_descriptor(&self, descriptor: TypeDescriptor) -> &Self {
        debug!(type_id = %descriptor.type_id(), "Described");
        self.inner.catalog.lock().insert(descriptor);
        self
    }

    #[inline]
    pub fn add_provider(&self, provider: &impl ServiceProvider) -> &Self {
        provider.register(self);
        self
    }
}

impl Container {
    /// Binds `key` to `target` with the given options, replacing any previous binding.
    /// A cached instance of the previous binding is evicted.
    pub fn register_with_config(&self, key: impl Into<String>, target: impl Into<Recipe>, config: Config) -> &Self {
        let key = key.into();
        let value = target.into();
        debug!(%key, ?value, shared = config.shared, "Registered");

        self.inner.cache.lock().remove(&key);
        self.inner.registry.lock().insert(
            key,
            Binding {
                value,
                shared: config.shared,
            },
        );
        self
    }

    /// Binds `key` to a type identifier, an instance or a factory. Transient.
    #[inline]
    pub fn register(&self, key: impl Into<String>, target: impl Into<Recipe>) -> &Self {
        self.register_with_config(key, target, Config::transient())
    }

    /// Binds `key` to the capitalized key as a type identifier: `foo` -> `::Foo`.
    #[inline]
    pub fn register_self(&self, key: &str) -> &Self {
        self.register(key, TypeIdentifier::capitalized(key))
    }

    #[inline]
    pub fn register_factory<F, R, E>(&self, key: impl Into<String>, factory: F) -> &Self
    where
        F: FnMut(Arguments, &Container) -> Result<R, E> + Clone + Send + Sync + 'static,
        R: SendSafety + SyncSafety + 'static,
        E: Into<InstantiateErrorKind>,
    {
        self.register(key, FactoryFn::new(factory))
    }

    #[inline]
    pub fn singleton(&self, key: impl Into<String>, target: impl Into<Recipe>) -> &Self {
        self.register_with_config(key, target, Config::shared())
    }

    /// Alias of [`Self::singleton`].
    #[inline]
    pub fn share(&self, key: impl Into<String>, target: impl Into<Recipe>) -> &Self {
        self.singleton(key, target)
    }

    #[inline]
    pub fn singleton_self(&self, key: &str) -> &Self {
        self.singleton(key, TypeIdentifier::capitalized(key))
    }

    #[inline]
    pub fn singleton_factory<F, R, E>(&self, key: impl Into<String>, factory: F) -> &Self
    where
        F: FnMut(Arguments, &Container) -> Result<R, E> + Clone + Send + Sync + 'static,
        R: SendSafety + SyncSafety + 'static,
        E: Into<InstantiateErrorKind>,
    {
        self.singleton(key, FactoryFn::new(factory))
    }

    /// Binds an already built value. Shared, so the cache is seeded right away.
    #[inline]
    pub fn instance<T: SendSafety + SyncSafety + 'static>(&self, key: impl Into<String>, value: T) -> &Self {
        self.instance_with_config(key, Object::new(value), Config::shared())
    }

    pub fn instance_with_config(&self, key: impl Into<String>, object: Object, config: Config) -> &Self {
        let key = key.into();
        self.register_with_config(key.clone(), object.clone(), config);
        if config.shared {
            self.inner.cache.lock().insert(key, object);
            debug!("Cached");
        }
        self
    }

    #[inline]
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.inner.registry.lock().contains(key)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Binding> {
        self.inner.registry.lock().get(key).cloned()
    }

    /// Removes the binding together with its cached instance and resolved marker.
    pub fn delete(&self, key: &str) {
        self.inner.registry.lock().remove(key);
        let mut cache = self.inner.cache.lock();
        cache.remove(key);
        cache.unmark_resolved(key);
        debug!(key, "Deleted");
    }

    /// Evicts the cached instance only. The binding survives, so the next resolve builds a new value.
    pub fn delete_instance(&self, key: &str) {
        self.inner.cache.lock().remove(key);
        debug!(key, "Instance deleted");
    }

    pub fn delete_instances(&self) {
        self.inner.cache.lock().clear_instances();
        debug!("Instances deleted");
    }

    /// Drops bindings, instances, extensions and protected entries. The type catalog is kept.
    pub fn flush(&self) {
        self.inner.registry.lock().clear();
        self.inner.cache.lock().clear();
        self.inner.extensions.lock().clear();
        self.inner.protected.lock().clear();
        debug!("Flushed");
    }

    #[inline]
    #[must_use]
    pub fn is_resolved(&self, key: &str) -> bool {
        self.inner.cache.lock().is_resolved(key)
    }

    #[must_use]
    pub fn keys(&self) -> Keys {
        let bindings = self.inner.registry.lock().keys();
        let (resolved, instances) = {
            let cache = self.inner.cache.lock();
            (cache.resolved_keys(), cache.instance_keys())
        };
        let extensions = self.inner.extensions.lock().keys();

        Keys {
            bindings,
            resolved,
            instances,
            extensions,
        }
    }
}

impl Container {
    /// Resolves `key` without extra arguments.
    ///
    /// # Errors
    /// See [`Self::resolve_with`]
    #[inline]
    pub fn resolve(&self, key: &str) -> Result<Object, ResolveErrorKind> {
        self.resolve_with(key, Arguments::new())
    }

    /// Resolves `key`, passing `arguments` to the constructor or factory.
    ///
    /// Unbound keys are treated as type identifiers. Cached instances of shared bindings are returned
    /// as is; `arguments` are ignored for them.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NotInstantiable`] if the type is unknown or abstract without binding
    /// - Returns [`ResolveErrorKind::CircularDependency`] if `key` depends on itself
    /// - Returns [`ResolveErrorKind::IncorrectType`] if a decorator doesn't accept the value
    /// - Returns [`ResolveErrorKind::Instantiator`] if a dependency, constructor, factory or decorator fails
    pub fn resolve_with(&self, key: &str, arguments: Arguments) -> Result<Object, ResolveErrorKind> {
        let span = info_span!("resolve", key);
        let _guard = span.enter();

        let cached = self.inner.cache.lock().get(key);
        if let Some(object) = cached {
            debug!("Found in cache");
            return Ok(object);
        }
        debug!("Not found in cache");

        let resolving = self.enter(key)?;
        let result = self.build(key, arguments);
        drop(resolving);
        let (object, shared) = result?;

        let mut cache = self.inner.cache.lock();
        if shared {
            cache.insert(key.to_string(), object.clone());
            debug!("Cached");
        }
        cache.mark_resolved(key);
        debug!(type_name = object.type_info().name, "Resolved");

        Ok(object)
    }

    /// Resolves `key` and downcasts the value to `T`.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::IncorrectType`] if the value isn't a `T`
    /// - See [`Self::resolve`] for the rest
    pub fn resolve_as<T: SendSafety + SyncSafety + 'static>(&self, key: &str) -> Result<RcThreadSafety<T>, ResolveErrorKind> {
        let object = self.resolve(key)?;
        downcast(&object)
    }

    /// Builds the decorated value of `key` and reports whether it has to be cached.
    fn build(&self, key: &str, arguments: Arguments) -> Result<(Object, bool), ResolveErrorKind> {
        let binding = self.inner.registry.lock().get(key).cloned();
        let (object, shared) = match binding {
            Some(Binding { value, shared }) => (self.construct(key, value, arguments)?, shared),
            None => {
                debug!("Binding not found, resolving key as type");
                (self.construct_type(key, &TypeIdentifier::new(key), arguments)?, false)
            }
        };
        let object = self.decorate(key, object)?;
        Ok((object, shared))
    }

    fn construct(&self, key: &str, recipe: Recipe, arguments: Arguments) -> Result<Object, ResolveErrorKind> {
        match recipe {
            Recipe::Instance(object) => Ok(object),
            Recipe::Alias(type_id) => self.construct_type(key, &type_id, arguments),
            Recipe::Factory(FactoryFn(mut factory)) => factory.call((arguments, self.clone())).map_err(|err| {
                error!("{}", err);
                ResolveErrorKind::from(err)
            }),
        }
    }

    fn construct_type(&self, key: &str, type_id: &TypeIdentifier, arguments: Arguments) -> Result<Object, ResolveErrorKind> {
        let descriptor = self.inner.catalog.lock().get(type_id).cloned();
        let Some(descriptor) = descriptor else {
            let err = ResolveErrorKind::NotInstantiable {
                type_id: type_id.clone(),
                reason: NotInstantiableReason::Unknown,
            };
            error!("{}", err);
            return Err(err);
        };

        match descriptor.construction {
            Construction::Abstract => {
                let name = type_id.name();
                if name != key && self.has(name) {
                    debug!(type_id = %type_id, "Abstract type, following its binding");
                    return self.resolve_with(name, arguments);
                }
                let err = ResolveErrorKind::NotInstantiable {
                    type_id: type_id.clone(),
                    reason: NotInstantiableReason::Abstract,
                };
                error!("{}", err);
                Err(err)
            }
            Construction::Concrete { params, mut constructor } => {
                let arguments = self.autowire(&params, arguments)?;
                constructor.call(arguments).map_err(|err| {
                    error!("{}", err);
                    ResolveErrorKind::from(err)
                })
            }
        }
    }

    /// Merges autowired dependencies with caller arguments in parameter order.
    ///
    /// Required type parameters are resolved through the container, every other parameter takes the
    /// next caller argument (an empty slot once they run out). Leftover arguments go last.
    fn autowire(&self, params: &[Param], mut arguments: Arguments) -> Result<Arguments, ResolveErrorKind> {
        let mut merged = Arguments::new();
        for param in params {
            match param.autowired() {
                Some(type_id) => {
                    let dependency = self
                        .resolve(type_id.name())
                        .map_err(|err| ResolveErrorKind::Instantiator(InstantiatorErrorKind::Deps(Box::new(err))))?;
                    merged.push(dependency);
                }
                None => match arguments.pop_front().flatten() {
                    Some(value) => merged.push(value),
                    None => merged.push_empty(),
                },
            }
        }
        merged.append(arguments);
        Ok(merged)
    }

    fn decorate(&self, key: &str, mut object: Object) -> Result<Object, ResolveErrorKind> {
        let chain = self.inner.extensions.lock().get(key);
        for Extension { accepts, mut decorator } in chain {
            if accepts != object.type_info() {
                let err = ResolveErrorKind::IncorrectType {
                    expected: accepts.name,
                    actual: object.type_info().name,
                };
                error!("{}", err);
                return Err(err);
            }
            object = decorator.call((object, self.clone())).map_err(|err| {
                error!("{}", err);
                ResolveErrorKind::from(err)
            })?;
            debug!("Decorated");
        }
        Ok(object)
    }

    fn enter<'a>(&'a self, key: &'a str) -> Result<ResolvingGuard<'a>, ResolveErrorKind> {
        let mut resolving = self.inner.resolving.lock();
        if let Some(position) = resolving.iter().position(|resolving_key| resolving_key == key) {
            let mut path = resolving[position..].to_vec();
            path.push(key.to_string());

            let err = ResolveErrorKind::CircularDependency { path };
            error!("{}", err);
            return Err(err);
        }
        resolving.push(key.to_string());
        Ok(ResolvingGuard {
            resolving: &self.inner.resolving,
            key,
        })
    }
}

/// Removes its own key from the resolving stack on drop, including when user code panics.
struct ResolvingGuard<'a> {
    resolving: &'a Mutex<Vec<String>>,
    key: &'a str,
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        let mut resolving = self.resolving.lock();
        if let Some(position) = resolving.iter().rposition(|resolving_key| resolving_key == self.key) {
            resolving.remove(position);
        }
    }
}

impl Container {
    /// Adds a decorator to `key` and applies it to the current value right away.
    ///
    /// The decorator is reapplied, after the ones added before it, every time the value of `key` is built.
    /// For shared bindings the cached instance is replaced with the decorated one.
    ///
    /// # Errors
    /// - Returns [`ExtendErrorKind::UnknownBinding`] if `key` isn't bound
    /// - Returns [`ExtendErrorKind::InvalidExtension`] if the decorator doesn't accept the value of `key`
    /// - Returns [`ExtendErrorKind::Resolve`] if the current value can't be resolved or the decorator fails
    pub fn extend<Dep, F, R, E>(&self, key: &str, decorator: F) -> Result<Object, ExtendErrorKind>
    where
        Dep: SendSafety + SyncSafety + 'static,
        F: FnMut(RcThreadSafety<Dep>, &Container) -> Result<R, E> + Clone + Send + Sync + 'static,
        R: Into<Object>,
        E: Into<InstantiateErrorKind>,
    {
        let span = info_span!("extend", key);
        let _guard = span.enter();

        let shared = self.inner.registry.lock().get(key).map(|binding| binding.shared);
        let Some(shared) = shared else {
            let err = ExtendErrorKind::UnknownBinding { key: key.to_string() };
            error!("{}", err);
            return Err(err);
        };

        let extension = boxed_decorator(decorator);
        let cached = self.inner.cache.lock().get(key);
        let current = match cached {
            Some(object) => object,
            None => self.resolve(key)?,
        };
        if !extension.accepts(&current) {
            let err = ExtendErrorKind::InvalidExtension {
                key: key.to_string(),
                expected: extension.accepts.name,
                actual: current.type_info().name,
            };
            error!("{}", err);
            return Err(err);
        }

        let decorated = extension.decorator.clone().call((current, self.clone())).map_err(|err| {
            error!("{}", err);
            ResolveErrorKind::from(err)
        })?;
        self.inner.extensions.lock().push(key.to_string(), extension);
        if shared {
            self.inner.cache.lock().insert(key.to_string(), decorated.clone());
            debug!("Cached");
        }
        debug!("Extended");

        Ok(decorated)
    }
}

impl Container {
    /// Stores a factory outside of bindings: it's never autowired, cached or decorated.
    pub fn protect<F, R, E>(&self, key: impl Into<String>, factory: F) -> &Self
    where
        F: FnMut(Arguments, &Container) -> Result<R, E> + Clone + Send + Sync + 'static,
        R: SendSafety + SyncSafety + 'static,
        E: Into<InstantiateErrorKind>,
    {
        self.inner
            .protected
            .lock()
            .insert(key.into(), Protected::Factory(FactoryFn::new(factory)));
        self
    }

    /// Stores a value that is handed back verbatim by [`Self::get_protected`].
    pub fn protect_value<T: SendSafety + SyncSafety + 'static>(&self, key: impl Into<String>, value: T) -> &Self {
        self.inner.protected.lock().insert(key.into(), Protected::Value(Object::new(value)));
        self
    }

    #[inline]
    #[must_use]
    pub fn has_protected(&self, key: &str) -> bool {
        self.inner.protected.lock().contains(key)
    }

    /// Calls the protected factory with `arguments` and the container, or returns the protected value.
    ///
    /// # Errors
    /// - Returns [`ProtectedErrorKind::Missing`] if nothing is protected under `key`
    /// - Returns [`ProtectedErrorKind::Factory`] if the factory fails
    pub fn get_protected(&self, key: &str, arguments: Arguments) -> Result<Object, ProtectedErrorKind> {
        let entry = self.inner.protected.lock().get(key);
        match entry {
            Some(Protected::Factory(FactoryFn(mut factory))) => factory.call((arguments, self.clone())).map_err(|err| {
                error!("{}", err);
                ProtectedErrorKind::Factory(err)
            }),
            Some(Protected::Value(object)) => Ok(object),
            None => {
                debug!(key, "Protected entry not found");
                Err(ProtectedErrorKind::Missing { key: key.to_string() })
            }
        }
    }
}

impl Container {
    /// Resolves the type of a `"Type@method"` reference, autowires the method parameters and calls it.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::InvalidMethodReference`] if `reference` isn't `"Type@method"`
    /// - Returns [`ResolveErrorKind::NoMethod`] if the resolved type has no such method
    /// - See [`Self::resolve`] for resolution of the receiver and the parameters
    pub fn invoke_method(&self, reference: &str, arguments: Arguments) -> Result<Object, ResolveErrorKind> {
        let span = info_span!("invoke_method", reference);
        let _guard = span.enter();

        let (type_path, method_name) = match reference.rsplit_once('@') {
            Some((type_path, method_name)) if !type_path.is_empty() && !method_name.is_empty() => (type_path, method_name),
            _ => {
                let err = ResolveErrorKind::InvalidMethodReference {
                    reference: reference.to_string(),
                };
                error!("{}", err);
                return Err(err);
            }
        };
        let type_id = TypeIdentifier::new(type_path);
        let receiver = self.resolve(type_id.name())?;

        let method = {
            let catalog = self.inner.catalog.lock();
            catalog
                .find_by_type_id(&receiver.type_info().id)
                .or_else(|| catalog.get(&type_id))
                .and_then(|descriptor| descriptor.methods.get(method_name).cloned())
        };
        let Some(MethodDescriptor { params, mut method }) = method else {
            let err = ResolveErrorKind::NoMethod {
                type_id,
                method: method_name.to_string(),
            };
            error!("{}", err);
            return Err(err);
        };

        let arguments = self.autowire(&params, arguments)?;
        let result = method.call((receiver, arguments)).map_err(|err| {
            error!("{}", err);
            ResolveErrorKind::from(err)
        })?;
        debug!("Invoked");

        Ok(result)
    }

    /// Same as [`Self::invoke_method`], downcasting the result to `R`.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::IncorrectType`] if the result isn't an `R`
    /// - See [`Self::invoke_method`] for the rest
    pub fn invoke_method_as<R: SendSafety + SyncSafety + 'static>(
        &self,
        reference: &str,
        arguments: Arguments,
    ) -> Result<RcThreadSafety<R>, ResolveErrorKind> {
        let object = self.invoke_method(reference, arguments)?;
        downcast(&object)
    }
}

fn downcast<T: SendSafety + SyncSafety + 'static>(object: &Object) -> Result<RcThreadSafety<T>, ResolveErrorKind> {
    object.downcast().ok_or_else(|| {
        let err = ResolveErrorKind::IncorrectType {
            expected: type_name::<T>(),
            actual: object.type_info().name,
        };
        error!("{}", err);
        err
    })
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{Container, Keys};
    use crate::{
        args,
        errors::{ExtendErrorKind, InstantiateErrorKind, NotInstantiableReason, ProtectedErrorKind, ResolveErrorKind},
        utils::thread_safety::RcThreadSafety,
        Arguments, Injectable, Object, Param, Recipe, TypeCatalog, TypeDescriptor,
    };

    use alloc::{
        format,
        string::{String, ToString as _},
        vec,
    };
    use core::sync::atomic::{AtomicU8, Ordering};
    use tracing::debug;
    use tracing_test::traced_test;

    struct Foo;
    struct Bar(RcThreadSafety<Foo>);
    struct Loop;
    struct Left;
    struct Right;

    impl Injectable for Foo {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::concrete::<Self, _, InstantiateErrorKind>([], |_| Ok(Foo))
        }
    }

    impl Injectable for Bar {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::concrete::<Self, _, InstantiateErrorKind>([Param::of::<Foo>()], |mut args| Ok(Bar(args.next()?)))
        }
    }

    impl Injectable for Loop {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::concrete::<Self, _, InstantiateErrorKind>([Param::of::<Loop>()], |_| Ok(Loop))
        }
    }

    impl Injectable for Left {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::concrete::<Self, _, InstantiateErrorKind>([Param::of::<Right>()], |_| Ok(Left))
        }
    }

    impl Injectable for Right {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::concrete::<Self, _, InstantiateErrorKind>([Param::of::<Left>()], |_| Ok(Right))
        }
    }

    fn container() -> Container {
        Container::with_catalog(
            TypeCatalog::new()
                .with::<Foo>()
                .with::<Bar>()
                .with::<Loop>()
                .with::<Left>()
                .with::<Right>()
                .with_interface("Service"),
        )
    }

    #[test]
    #[traced_test]
    fn test_transient_by_default() {
        let container = container();
        container.register("foo", "Foo");

        let foo_1 = container.resolve("foo").unwrap();
        let foo_2 = container.resolve("foo").unwrap();

        assert!(foo_1.is::<Foo>());
        assert!(!Object::ptr_eq(&foo_1, &foo_2));
        assert!(container.is_resolved("foo"));
    }

    #[test]
    #[traced_test]
    fn test_shared_identity() {
        let container = container();
        container.singleton("foo", "Foo").share("bar", "Bar");

        for key in ["foo", "bar"] {
            let first = container.resolve(key).unwrap();
            for _ in 0..3 {
                assert!(Object::ptr_eq(&first, &container.resolve(key).unwrap()));
            }
        }
    }

    #[test]
    #[traced_test]
    fn test_transitive_autowiring() {
        let container = container();

        let bar = container.resolve_as::<Bar>("Bar").unwrap();
        let other = container.resolve_as::<Bar>("::Bar").unwrap();

        assert!(!RcThreadSafety::ptr_eq(&bar.0, &other.0));
    }

    #[test]
    #[traced_test]
    fn test_autowiring_uses_bindings() {
        let container = container();
        container.singleton("Foo", "Foo");

        let foo = container.resolve_as::<Foo>("Foo").unwrap();
        let bar = container.resolve_as::<Bar>("Bar").unwrap();

        assert!(RcThreadSafety::ptr_eq(&foo, &bar.0));
    }

    #[test]
    #[traced_test]
    fn test_delete_instance_rebuilds() {
        let container = container();
        container.singleton("foo", "Foo");

        let foo_1 = container.resolve("foo").unwrap();
        container.delete_instance("foo");
        let foo_2 = container.resolve("foo").unwrap();

        assert!(foo_2.is::<Foo>());
        assert!(!Object::ptr_eq(&foo_1, &foo_2));
        assert!(container.has("foo"));
        assert!(Object::ptr_eq(&foo_2, &container.resolve("foo").unwrap()));
    }

    #[test]
    #[traced_test]
    fn test_register_defaults_to_capitalized_key() {
        let container = container();
        container.register_self("foo");

        assert!(matches!(container.get("foo").unwrap().value, Recipe::Alias(type_id) if type_id.as_str() == "::Foo"));
        assert!(container.resolve("foo").unwrap().is::<Foo>());
    }

    #[test]
    #[traced_test]
    fn test_instance_seeds_cache() {
        let container = container();
        let foo = RcThreadSafety::new(Foo);
        container.instance_with_config("foo", Object::from(foo.clone()), crate::Config::shared());

        assert_eq!(container.keys().instances, ["foo"]);
        assert!(RcThreadSafety::ptr_eq(&foo, &container.resolve_as::<Foo>("foo").unwrap()));
    }

    #[test]
    #[traced_test]
    fn test_reregister_evicts_instance() {
        let container = container();
        container.singleton("service", "Foo");
        assert!(container.resolve("service").unwrap().is::<Foo>());

        container.singleton("service", "Bar");
        assert!(container.resolve("service").unwrap().is::<Bar>());
    }

    #[test]
    #[traced_test]
    fn test_factory_receives_arguments_and_container() {
        let calls = RcThreadSafety::new(AtomicU8::new(0));
        let container = container();
        container.register("foo", "Foo").register_factory("bar", {
            let calls = calls.clone();
            move |mut args: Arguments, container: &Container| {
                calls.fetch_add(1, Ordering::SeqCst);
                debug!("Call factory bar");

                assert_eq!(args.next_value::<u8>()?, 7);
                Ok::<_, ResolveErrorKind>(Bar(container.resolve_as("foo")?))
            }
        });

        assert!(container.resolve_with("bar", args![7u8]).unwrap().is::<Bar>());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[traced_test]
    fn test_not_instantiable() {
        let container = container();

        assert!(matches!(
            container.resolve("Unknown"),
            Err(ResolveErrorKind::NotInstantiable {
                reason: NotInstantiableReason::Unknown,
                ..
            })
        ));
        assert!(matches!(
            container.resolve("Service"),
            Err(ResolveErrorKind::NotInstantiable {
                reason: NotInstantiableReason::Abstract,
                ..
            })
        ));
    }

    #[test]
    #[traced_test]
    fn test_abstract_follows_binding() {
        let container = container();
        container.register("service", "Service");
        assert!(container.resolve("service").is_err());

        container.singleton("Service", "Foo");
        let service = container.resolve("service").unwrap();

        assert!(service.is::<Foo>());
        assert!(Object::ptr_eq(&service, &container.resolve("Service").unwrap()));
    }

    #[test]
    #[traced_test]
    fn test_circular_dependency() {
        let container = container();

        let err = container.resolve("Loop").unwrap_err();
        assert!(matches!(
            err.root_cause(),
            ResolveErrorKind::CircularDependency { path } if path == &["Loop", "Loop"]
        ));

        let err = container.resolve("Left").unwrap_err();
        assert!(matches!(
            err.root_cause(),
            ResolveErrorKind::CircularDependency { path } if path == &["Left", "Right", "Left"]
        ));

        // Stack is unwound after failures
        assert!(container.resolve("Foo").is_ok());
        assert!(container.inner.resolving.lock().is_empty());
    }

    #[test]
    #[traced_test]
    fn test_resolving_stack_removes_own_key() {
        let container = container();

        let resolving = container.enter("outer").unwrap();
        container.inner.resolving.lock().push("inner".to_string());
        drop(resolving);

        assert_eq!(*container.inner.resolving.lock(), ["inner"]);
    }

    #[test]
    #[traced_test]
    fn test_resolving_stack_unwound_on_panic() {
        let container = container();
        container.register_factory("panics", |_, _: &Container| -> Result<Foo, InstantiateErrorKind> { panic!("factory panicked") });

        let result = std::panic::catch_unwind(core::panic::AssertUnwindSafe(|| container.resolve("panics")));

        assert!(result.is_err());
        assert!(container.inner.resolving.lock().is_empty());
        assert!(container.resolve("Foo").is_ok());
    }

    #[test]
    #[traced_test]
    fn test_failed_resolve_keeps_state() {
        let container = container();
        container.singleton_factory("broken", |_, _: &Container| Err::<Foo, _>(anyhow::anyhow!("broken")));

        assert!(matches!(container.resolve("broken"), Err(ResolveErrorKind::Instantiator(_))));
        assert!(!container.is_resolved("broken"));
        assert!(container.keys().instances.is_empty());
        assert!(container.has("broken"));
    }

    #[test]
    #[traced_test]
    fn test_extend_preconditions() {
        let container = container();

        assert!(matches!(
            container.extend("bar", |bar: RcThreadSafety<Bar>, _: &Container| Ok::<_, InstantiateErrorKind>(bar)),
            Err(ExtendErrorKind::UnknownBinding { .. })
        ));

        container.register("bar", "Bar");
        assert!(matches!(
            container.extend("bar", |foo: RcThreadSafety<Foo>, _: &Container| Ok::<_, InstantiateErrorKind>(foo)),
            Err(ExtendErrorKind::InvalidExtension { .. })
        ));
        assert!(container.keys().extensions.is_empty());
    }

    #[test]
    #[traced_test]
    fn test_extend_chain_reapplied() {
        let container = container();
        container.singleton_factory("number", |_, _: &Container| Ok::<_, InstantiateErrorKind>(1u32));

        let first = container
            .extend("number", |number: RcThreadSafety<u32>, _: &Container| {
                Ok::<_, InstantiateErrorKind>(Object::new(*number + 10))
            })
            .unwrap();
        assert_eq!(first.downcast_ref::<u32>(), Some(&11));
        assert_eq!(container.resolve_as::<u32>("number").map(|number| *number).unwrap(), 11);

        container
            .extend("number", |number: RcThreadSafety<u32>, _: &Container| {
                Ok::<_, InstantiateErrorKind>(Object::new(*number * 2))
            })
            .unwrap();
        assert_eq!(*container.resolve_as::<u32>("number").unwrap(), 22);

        container.delete_instance("number");
        assert_eq!(*container.resolve_as::<u32>("number").unwrap(), 22);
        assert_eq!(container.keys().extensions, ["number"]);
    }

    #[test]
    #[traced_test]
    fn test_protected_not_cached() {
        let calls = RcThreadSafety::new(AtomicU8::new(0));
        let container = container();
        container.protect("counter", {
            let calls = calls.clone();
            move |_, _: &Container| Ok::<_, InstantiateErrorKind>(calls.fetch_add(1, Ordering::SeqCst))
        });
        container.protect_value("Foo", "not a type");

        assert_eq!(container.get_protected("counter", Arguments::new()).unwrap().downcast_ref::<u8>(), Some(&0));
        assert_eq!(container.get_protected("counter", Arguments::new()).unwrap().downcast_ref::<u8>(), Some(&1));
        assert_eq!(
            container.get_protected("Foo", Arguments::new()).unwrap().downcast_ref::<&str>(),
            Some(&"not a type")
        );
        assert!(matches!(
            container.get_protected("missing", Arguments::new()),
            Err(ProtectedErrorKind::Missing { .. })
        ));
        assert!(!container.has("counter"));
        assert_eq!(container.keys(), Keys::default());
    }

    #[test]
    #[traced_test]
    fn test_delete_and_flush() {
        let container = container();
        container.singleton("foo", "Foo").register("bar", "Bar");
        container.resolve("foo").unwrap();
        container.resolve("bar").unwrap();
        container.extend("bar", |bar: RcThreadSafety<Bar>, _: &Container| Ok::<_, InstantiateErrorKind>(bar)).unwrap();

        container.delete("foo");
        assert!(!container.has("foo"));
        assert!(!container.is_resolved("foo"));
        assert!(container.keys().instances.is_empty());

        container.protect_value("value", 1u8);
        container.flush();
        assert_eq!(container.keys(), Keys::default());
        assert!(!container.has_protected("value"));
        assert!(container.resolve("Foo").is_ok());
    }

    #[test]
    #[traced_test]
    fn test_keys_snapshot() {
        let container = container();
        container.singleton("foo", "Foo").register("bar", "Bar");
        container.resolve("bar").unwrap();

        assert_eq!(
            container.keys(),
            Keys {
                bindings: vec!["bar".to_string(), "foo".to_string()],
                resolved: vec!["Foo".to_string(), "bar".to_string()],
                instances: vec![],
                extensions: vec![],
            }
        );
    }
}
