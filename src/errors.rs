mod extend;
mod facade;
mod instantiate;
mod instantiator;
mod protected;
mod resolve;

pub use extend::ExtendErrorKind;
pub use facade::FacadeErrorKind;
pub use instantiate::InstantiateErrorKind;
pub use instantiator::InstantiatorErrorKind;
pub use protected::ProtectedErrorKind;
pub use resolve::{NotInstantiableReason, ResolveErrorKind};
