#![no_std]

extern crate alloc;

pub(crate) mod any;
pub(crate) mod arguments;
pub(crate) mod cache;
pub(crate) mod catalog;
pub(crate) mod config;
pub(crate) mod container;
pub(crate) mod errors;
pub(crate) mod extension;
pub(crate) mod facade;
pub(crate) mod identifier;
pub(crate) mod offset;
pub(crate) mod protected;
pub(crate) mod provider;
pub(crate) mod registry;
pub(crate) mod service;

pub mod utils;

#[cfg(feature = "auto")]
#[doc(hidden)]
pub mod autowired;

pub use any::{Object, TypeInfo};
pub use arguments::Arguments;
pub use catalog::{Injectable, Param, ParamKind, TypeCatalog, TypeDescriptor};
pub use config::Config;
pub use container::{Container, Keys};
pub use errors::{
    ExtendErrorKind, FacadeErrorKind, InstantiateErrorKind, InstantiatorErrorKind, NotInstantiableReason, ProtectedErrorKind,
    ResolveErrorKind,
};
pub use facade::Facade;
pub use identifier::TypeIdentifier;
pub use offset::Offset;
pub use provider::ServiceProvider;
pub use registry::{Binding, FactoryFn, Recipe};
