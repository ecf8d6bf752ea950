use alloc::{boxed::Box, string::String, vec::Vec};
use core::fmt::{self, Display, Formatter};

use super::{instantiate::InstantiateErrorKind, instantiator::InstantiatorErrorKind};
use crate::identifier::TypeIdentifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotInstantiableReason {
    /// The type is missing from the catalog.
    Unknown,
    /// The type is an interface and nothing is bound under its name.
    Abstract,
}

impl Display for NotInstantiableReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NotInstantiableReason::Unknown => f.write_str("type isn't described in catalog"),
            NotInstantiableReason::Abstract => f.write_str("type is abstract and has no binding"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("\"{type_id}\" is not instantiable: {reason}")]
    NotInstantiable {
        type_id: TypeIdentifier,
        reason: NotInstantiableReason,
    },
    #[error("Circular dependency detected: {}", .path.join(" -> "))]
    CircularDependency { path: Vec<String> },
    #[error("Incorrect type. Actual: {actual}, expected: {expected}")]
    IncorrectType { expected: &'static str, actual: &'static str },
    #[error("Invalid method reference \"{reference}\", expected \"Type@method\"")]
    InvalidMethodReference { reference: String },
    #[error("Method \"{method}\" not found on \"{type_id}\"")]
    NoMethod { type_id: TypeIdentifier, method: String },
    #[error(transparent)]
    Instantiator(InstantiatorErrorKind<Box<ResolveErrorKind>, InstantiateErrorKind>),
}

impl ResolveErrorKind {
    /// Follows wrapped dependency errors, including the ones raised from factories, down to the one
    /// that started the failure.
    #[must_use]
    pub fn root_cause(&self) -> &ResolveErrorKind {
        let mut err = self;
        loop {
            match err {
                ResolveErrorKind::Instantiator(
                    InstantiatorErrorKind::Deps(inner) | InstantiatorErrorKind::Factory(InstantiateErrorKind::Resolve(inner)),
                ) => err = &**inner,
                _ => return err,
            }
        }
    }
}

impl From<InstantiateErrorKind> for ResolveErrorKind {
    fn from(err: InstantiateErrorKind) -> Self {
        ResolveErrorKind::Instantiator(InstantiatorErrorKind::Factory(err))
    }
}
