use super::resolve::ResolveErrorKind;

#[derive(thiserror::Error, Debug)]
pub enum FacadeErrorKind {
    #[error("Container isn't set for facade")]
    NoContainer,
    #[error("Incorrect root type. Actual: {actual}, expected: {expected}")]
    IncorrectType { expected: &'static str, actual: &'static str },
    #[error(transparent)]
    Resolve(#[from] ResolveErrorKind),
}
