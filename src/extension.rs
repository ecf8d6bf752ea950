use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::any::type_name;

use crate::{
    any::{Object, TypeInfo},
    errors::InstantiateErrorKind,
    service::{service_fn, BoxCloneService},
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
    Container,
};

pub(crate) type BoxedCloneDecorator = BoxCloneService<(Object, Container), Object, InstantiateErrorKind>;

/// A decorator along with the type of values it accepts.
#[derive(Clone)]
pub(crate) struct Extension {
    pub(crate) accepts: TypeInfo,
    pub(crate) decorator: BoxedCloneDecorator,
}

impl Extension {
    #[inline]
    #[must_use]
    pub(crate) fn accepts(&self, object: &Object) -> bool {
        self.accepts == object.type_info()
    }
}

#[must_use]
pub(crate) fn boxed_decorator<Dep, F, R, E>(mut decorator: F) -> Extension
where
    Dep: SendSafety + SyncSafety + 'static,
    F: FnMut(RcThreadSafety<Dep>, &Container) -> Result<R, E> + Clone + Send + Sync + 'static,
    R: Into<Object>,
    E: Into<InstantiateErrorKind>,
{
    Extension {
        accepts: TypeInfo::of::<Dep>(),
        decorator: BoxCloneService::new(service_fn(move |(object, container): (Object, Container)| {
            let Some(dependency) = object.downcast::<Dep>() else {
                return Err(InstantiateErrorKind::IncorrectType {
                    expected: type_name::<Dep>(),
                    actual: object.type_info().name,
                });
            };
            decorator(dependency, &container).map(Into::into).map_err(Into::into)
        })),
    }
}

/// Decorator chains, in registration order, per key.
#[derive(Default)]
pub(crate) struct Extensions {
    chains: BTreeMap<String, Vec<Extension>>,
}

impl Extensions {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self { chains: BTreeMap::new() }
    }

    #[inline]
    pub(crate) fn push(&mut self, key: String, extension: Extension) {
        self.chains.entry(key).or_default().push(extension);
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, key: &str) -> Vec<Extension> {
        self.chains.get(key).cloned().unwrap_or_default()
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.chains.clear();
    }

    #[must_use]
    pub(crate) fn keys(&self) -> Vec<String> {
        self.chains.keys().cloned().collect()
    }
}
