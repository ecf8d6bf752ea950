use alloc::{
    collections::BTreeMap,
    string::{String, ToString as _},
};
use core::any::type_name;
use parking_lot::Mutex;
use tracing::{debug, error, info_span};

use crate::{
    any::Object,
    errors::FacadeErrorKind,
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
    Container,
};

/// Forwards calls to root services of one container.
///
/// Each root is resolved once by key and memoized until cleared, so repeated calls reuse the same value
/// even for transient bindings.
///
/// # Examples
/// ```rust
/// use illusion::{Container, Facade};
///
/// struct Greeter;
///
/// impl Greeter {
///     fn greet(&self, name: &str) -> String {
///         format!("Hello, {name}")
///     }
/// }
///
/// let container = Container::new();
/// container.instance("greeter", Greeter);
///
/// let facade = Facade::with_container(container);
/// assert_eq!(facade.call("greeter", |greeter: &Greeter| greeter.greet("Rust")).unwrap(), "Hello, Rust");
/// ```
#[derive(Default)]
pub struct Facade {
    container: Mutex<Option<Container>>,
    resolved: Mutex<BTreeMap<String, Object>>,
}

impl Facade {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            container: Mutex::new(None),
            resolved: Mutex::new(BTreeMap::new()),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_container(container: Container) -> Self {
        let facade = Self::new();
        facade.set_container(container);
        facade
    }

    /// Replaces the container. Memoized roots are kept until cleared.
    #[inline]
    pub fn set_container(&self, container: Container) {
        *self.container.lock() = Some(container);
        debug!("Container set");
    }

    /// # Errors
    /// Returns [`FacadeErrorKind::NoContainer`] if no container is set
    pub fn container(&self) -> Result<Container, FacadeErrorKind> {
        self.container.lock().clone().ok_or_else(|| {
            let err = FacadeErrorKind::NoContainer;
            error!("{}", err);
            err
        })
    }

    /// Returns the memoized root for `key`, resolving it on first use.
    ///
    /// # Errors
    /// - Returns [`FacadeErrorKind::NoContainer`] if no container is set
    /// - Returns [`FacadeErrorKind::Resolve`] if the root can't be resolved
    pub fn root(&self, key: &str) -> Result<Object, FacadeErrorKind> {
        let span = info_span!("facade_root", key);
        let _guard = span.enter();

        let memoized = self.resolved.lock().get(key).cloned();
        if let Some(object) = memoized {
            debug!("Found memoized root");
            return Ok(object);
        }

        let object = self.container()?.resolve(key)?;
        self.resolved.lock().insert(key.to_string(), object.clone());
        debug!("Root memoized");

        Ok(object)
    }

    /// # Errors
    /// - Returns [`FacadeErrorKind::IncorrectType`] if the root isn't a `T`
    /// - See [`Self::root`] for the rest
    pub fn root_as<T: SendSafety + SyncSafety + 'static>(&self, key: &str) -> Result<RcThreadSafety<T>, FacadeErrorKind> {
        let object = self.root(key)?;
        object.downcast().ok_or_else(|| {
            let err = FacadeErrorKind::IncorrectType {
                expected: type_name::<T>(),
                actual: object.type_info().name,
            };
            error!("{}", err);
            err
        })
    }

    /// Calls `f` with the root for `key`.
    ///
    /// # Errors
    /// See [`Self::root_as`]
    #[inline]
    pub fn call<T, R>(&self, key: &str, f: impl FnOnce(&T) -> R) -> Result<R, FacadeErrorKind>
    where
        T: SendSafety + SyncSafety + 'static,
    {
        let root = self.root_as::<T>(key)?;
        Ok(f(&root))
    }

    #[inline]
    pub fn clear_resolved_instance(&self, key: &str) {
        self.resolved.lock().remove(key);
        debug!(key, "Memoized root cleared");
    }

    #[inline]
    pub fn clear_resolved_instances(&self) {
        self.resolved.lock().clear();
        debug!("Memoized roots cleared");
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::Facade;
    use crate::{
        errors::{FacadeErrorKind, InstantiateErrorKind},
        Container, Object,
    };

    use alloc::{format, string::{String, ToString as _}};
    use core::sync::atomic::{AtomicU8, Ordering};
    use tracing_test::traced_test;

    struct Mailer(u8);

    fn container() -> Container {
        let counter = crate::utils::thread_safety::RcThreadSafety::new(AtomicU8::new(0));
        let container = Container::new();
        container.register_factory("mailer", move |_, _: &Container| {
            Ok::<_, InstantiateErrorKind>(Mailer(counter.fetch_add(1, Ordering::SeqCst)))
        });
        container
    }

    #[test]
    #[traced_test]
    fn test_no_container() {
        let facade = Facade::new();

        assert!(matches!(facade.root("mailer"), Err(FacadeErrorKind::NoContainer)));
    }

    #[test]
    #[traced_test]
    fn test_root_memoized() {
        let facade = Facade::with_container(container());

        let mailer_1 = facade.root("mailer").unwrap();
        let mailer_2 = facade.root("mailer").unwrap();
        assert!(Object::ptr_eq(&mailer_1, &mailer_2));
        assert_eq!(facade.call("mailer", |mailer: &Mailer| mailer.0).unwrap(), 0);

        facade.clear_resolved_instance("mailer");
        assert_eq!(facade.call("mailer", |mailer: &Mailer| mailer.0).unwrap(), 1);

        facade.clear_resolved_instances();
        assert_eq!(facade.call("mailer", |mailer: &Mailer| mailer.0).unwrap(), 2);
    }

    #[test]
    #[traced_test]
    fn test_incorrect_root_type() {
        let facade = Facade::with_container(container());

        assert!(matches!(
            facade.root_as::<u8>("mailer"),
            Err(FacadeErrorKind::IncorrectType { .. })
        ));
        assert!(matches!(facade.root("missing"), Err(FacadeErrorKind::Resolve(_))));
    }
}
