//! Link-time collection of type descriptors.
//!
//! Types registered with [`injectable!`](crate::injectable) end up in one distributed slice,
//! so a catalog can be assembled without listing every type by hand.

use crate::catalog::{TypeCatalog, TypeDescriptor};

pub use linkme::{self, distributed_slice};

#[distributed_slice]
pub static __GLOBAL_TYPE_DESCRIPTORS: [fn() -> TypeDescriptor];

impl TypeCatalog {
    /// Adds the descriptors of every type registered with [`injectable!`](crate::injectable).
    #[inline]
    #[must_use]
    pub fn provide_auto_types(mut self) -> Self {
        for getter in __GLOBAL_TYPE_DESCRIPTORS.iter() {
            self.insert(getter());
        }
        self
    }
}

/// Registers the descriptor of an [`Injectable`](crate::Injectable) type for [`TypeCatalog::provide_auto_types`].
///
/// # Examples
/// ```rust
/// use illusion::{injectable, Container, Injectable, TypeCatalog, TypeDescriptor};
///
/// struct Clock;
///
/// impl Injectable for Clock {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::concrete::<Self, _, _>([], |_| Ok::<_, anyhow::Error>(Clock))
///     }
/// }
///
/// injectable!(Clock);
///
/// let container = Container::with_catalog(TypeCatalog::new().provide_auto_types());
/// assert!(container.resolve_as::<Clock>("Clock").is_ok());
/// ```
#[macro_export]
macro_rules! injectable {
    ($($ty:ty),+ $(,)?) => {
        $(
            const _: () = {
                #[$crate::autowired::distributed_slice($crate::autowired::__GLOBAL_TYPE_DESCRIPTORS)]
                #[linkme(crate = $crate::autowired::linkme)]
                static DESCRIPTOR_GETTER: fn() -> $crate::TypeDescriptor = <$ty as $crate::Injectable>::descriptor;
            };
        )+
    };
}
