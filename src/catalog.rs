//! Compile-time description of constructible types.
//!
//! The catalog plays the part runtime reflection would play elsewhere: for every type identifier it
//! knows the ordered constructor parameters, which of them name other types, and how to build the value.

use alloc::{
    collections::BTreeMap,
    string::{String, ToString as _},
    vec::Vec,
};
use core::any::{type_name, TypeId};

use crate::{
    any::{Object, TypeInfo},
    arguments::Arguments,
    errors::InstantiateErrorKind,
    identifier::TypeIdentifier,
    service::{service_fn, BoxCloneService},
    utils::thread_safety::{SendSafety, SyncSafety},
};

pub(crate) type BoxedCloneConstructor = BoxCloneService<Arguments, Object, InstantiateErrorKind>;
pub(crate) type BoxedCloneMethod = BoxCloneService<(Object, Arguments), Object, InstantiateErrorKind>;

/// Types the container can build by itself.
///
/// # Examples
/// ```rust
/// use illusion::{args, Container, Injectable, Param, TypeDescriptor};
///
/// struct Foo;
/// struct Bar(std::sync::Arc<Foo>);
///
/// impl Injectable for Foo {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::concrete::<Self, _, _>([], |_| Ok::<_, anyhow::Error>(Foo))
///     }
/// }
///
/// impl Injectable for Bar {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::concrete::<Self, _, _>([Param::of::<Foo>()], |mut args| {
///             Ok::<_, illusion::InstantiateErrorKind>(Bar(args.next()?))
///         })
///     }
/// }
///
/// let container = Container::new();
/// container.describe::<Foo>().describe::<Bar>();
///
/// assert!(container.resolve_as::<Bar>("Bar").is_ok());
/// ```
pub trait Injectable: SendSafety + SyncSafety + Sized + 'static {
    /// Defaults to the type name without its path, see [`TypeInfo::short_name`].
    #[must_use]
    fn type_identifier() -> TypeIdentifier {
        TypeIdentifier::new(TypeInfo::of::<Self>().short_name())
    }

    #[must_use]
    fn descriptor() -> TypeDescriptor;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// Names another type, autowired through the container when required.
    Type(TypeIdentifier),
    /// Primitive or collection, always taken from the caller's arguments.
    Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub kind: ParamKind,
    pub optional: bool,
}

impl Param {
    #[inline]
    #[must_use]
    pub fn of<T: Injectable>() -> Self {
        Self::named(T::type_identifier())
    }

    #[inline]
    #[must_use]
    pub fn named(type_id: impl Into<TypeIdentifier>) -> Self {
        Self {
            kind: ParamKind::Type(type_id.into()),
            optional: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn value() -> Self {
        Self {
            kind: ParamKind::Value,
            optional: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Type the container has to resolve for this parameter, if any.
    #[inline]
    #[must_use]
    pub fn autowired(&self) -> Option<&TypeIdentifier> {
        match &self.kind {
            ParamKind::Type(type_id) if !self.optional => Some(type_id),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub(crate) struct MethodDescriptor {
    pub(crate) params: Vec<Param>,
    pub(crate) method: BoxedCloneMethod,
}

#[derive(Clone)]
pub(crate) enum Construction {
    Abstract,
    Concrete {
        params: Vec<Param>,
        constructor: BoxedCloneConstructor,
    },
}

#[derive(Clone)]
pub struct TypeDescriptor {
    pub(crate) type_id: TypeIdentifier,
    pub(crate) type_info: Option<TypeInfo>,
    pub(crate) construction: Construction,
    pub(crate) methods: BTreeMap<String, MethodDescriptor>,
}

impl TypeDescriptor {
    /// Describes `T`, built by `constructor` from the merged arguments.
    #[must_use]
    pub fn concrete<T, F, E>(params: impl IntoIterator<Item = Param>, mut constructor: F) -> Self
    where
        T: Injectable,
        F: FnMut(Arguments) -> Result<T, E> + Clone + Send + Sync + 'static,
        E: Into<InstantiateErrorKind>,
    {
        Self {
            type_id: T::type_identifier(),
            type_info: Some(TypeInfo::of::<T>()),
            construction: Construction::Concrete {
                params: params.into_iter().collect(),
                constructor: BoxCloneService::new(service_fn(move |arguments| {
                    constructor(arguments).map(Object::new).map_err(Into::into)
                })),
            },
            methods: BTreeMap::new(),
        }
    }

    /// Describes an abstract type: resolvable only through a binding of its name.
    #[must_use]
    pub fn interface(type_id: impl Into<TypeIdentifier>) -> Self {
        Self {
            type_id: type_id.into(),
            type_info: None,
            construction: Construction::Abstract,
            methods: BTreeMap::new(),
        }
    }

    /// Adds a method the container can invoke on a resolved `T`.
    #[must_use]
    pub fn method<T, R, F, E>(mut self, name: &str, params: impl IntoIterator<Item = Param>, mut method: F) -> Self
    where
        T: 'static,
        R: SendSafety + SyncSafety + 'static,
        F: FnMut(&T, Arguments) -> Result<R, E> + Clone + Send + Sync + 'static,
        E: Into<InstantiateErrorKind>,
    {
        let method = BoxCloneService::new(service_fn(move |(receiver, arguments): (Object, Arguments)| {
            let Some(this) = receiver.downcast_ref::<T>() else {
                return Err(InstantiateErrorKind::IncorrectType {
                    expected: type_name::<T>(),
                    actual: receiver.type_info().name,
                });
            };
            method(this, arguments).map(Object::new).map_err(Into::into)
        }));
        self.methods.insert(
            name.to_string(),
            MethodDescriptor {
                params: params.into_iter().collect(),
                method,
            },
        );
        self
    }

    #[inline]
    #[must_use]
    pub fn type_id(&self) -> &TypeIdentifier {
        &self.type_id
    }

    #[inline]
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        matches!(self.construction, Construction::Abstract)
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &[Param] {
        match &self.construction {
            Construction::Abstract => &[],
            Construction::Concrete { params, .. } => params,
        }
    }

    #[inline]
    #[must_use]
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }
}

#[derive(Clone, Default)]
pub struct TypeCatalog {
    types: BTreeMap<TypeIdentifier, TypeDescriptor>,
    by_type: BTreeMap<TypeId, TypeIdentifier>,
}

impl TypeCatalog {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            types: BTreeMap::new(),
            by_type: BTreeMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with<T: Injectable>(mut self) -> Self {
        self.insert(T::descriptor());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_interface(mut self, type_id: impl Into<TypeIdentifier>) -> Self {
        self.insert(TypeDescriptor::interface(type_id));
        self
    }

    /// Adds a descriptor, replacing one with the same identifier.
    pub fn insert(&mut self, descriptor: TypeDescriptor) -> Option<TypeDescriptor> {
        if let Some(type_info) = descriptor.type_info {
            self.by_type.insert(type_info.id, descriptor.type_id.clone());
        }
        self.types.insert(descriptor.type_id.clone(), descriptor)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, type_id: &TypeIdentifier) -> Option<&TypeDescriptor> {
        self.types.get(type_id)
    }

    /// Descriptor of the concrete Rust type behind an object.
    #[inline]
    #[must_use]
    pub fn find_by_type_id(&self, id: &TypeId) -> Option<&TypeDescriptor> {
        self.by_type.get(id).and_then(|type_id| self.types.get(type_id))
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, type_id: &TypeIdentifier) -> bool {
        self.types.contains_key(type_id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
