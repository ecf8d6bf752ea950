use alloc::boxed::Box;

use super::resolve::ResolveErrorKind;

/// Errors returned by user code: constructors, factories, decorators and methods.
#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error("Missing argument at position {position}")]
    MissingArgument { position: usize },
    #[error("Incorrect argument at position {position}. Actual: {actual}, expected: {expected}")]
    IncorrectArgument {
        position: usize,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("Incorrect receiver type. Actual: {actual}, expected: {expected}")]
    IncorrectType { expected: &'static str, actual: &'static str },
    /// A factory or method failed to resolve something it needed from the container.
    #[error(transparent)]
    Resolve(Box<ResolveErrorKind>),
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl From<ResolveErrorKind> for InstantiateErrorKind {
    fn from(err: ResolveErrorKind) -> Self {
        InstantiateErrorKind::Resolve(Box::new(err))
    }
}
