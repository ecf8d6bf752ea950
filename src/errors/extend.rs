use alloc::string::String;

use super::resolve::ResolveErrorKind;

#[derive(thiserror::Error, Debug)]
pub enum ExtendErrorKind {
    #[error("Binding \"{key}\" not found in container")]
    UnknownBinding { key: String },
    #[error("Extension for \"{key}\" accepts {expected}, but the binding provides {actual}")]
    InvalidExtension {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error(transparent)]
    Resolve(#[from] ResolveErrorKind),
}
