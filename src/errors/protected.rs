use alloc::string::String;

use super::instantiate::InstantiateErrorKind;

#[derive(thiserror::Error, Debug)]
pub enum ProtectedErrorKind {
    #[error("Protected entry \"{key}\" not found in container")]
    Missing { key: String },
    #[error(transparent)]
    Factory(#[from] InstantiateErrorKind),
}
