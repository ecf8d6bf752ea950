use core::{
    any::{type_name, Any, TypeId},
    cmp::Ordering,
    fmt::{self, Debug, Formatter},
};

use crate::utils::thread_safety::{erase, RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety};

#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl PartialOrd for TypeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// Type name without the path of the outer type, `my_app::services::Foo` -> `Foo`.
    /// Generic arguments are kept in full: `my_app::Wrapper<my_app::a::Foo>` -> `Wrapper<my_app::a::Foo>`.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        let path_end = self.name.find('<').unwrap_or(self.name.len());
        let start = self.name[..path_end].rfind("::").map_or(0, |position| position + 2);
        &self.name[start..]
    }
}

/// A type-erased, reference-counted value handled by the container.
///
/// Cloning an [`Object`] clones the pointer, not the value, so two clones are the same object
/// in the sense of [`Object::ptr_eq`].
#[derive(Clone)]
pub struct Object {
    value: RcAnyThreadSafety,
    type_info: TypeInfo,
}

impl Object {
    /// Wraps `value`. An [`Object`] passed in is returned as is, so forwarding a resolved value
    /// keeps its type and identity.
    ///
    /// A shared `RcThreadSafety<T>` is wrapped as a value of its own; use [`Object::from_rc`] (or `Object::from`)
    /// to keep `T` as the type and the allocation as the identity.
    #[inline]
    #[must_use]
    pub fn new<T: SendSafety + SyncSafety + 'static>(value: T) -> Self {
        if let Some(object) = (&value as &dyn Any).downcast_ref::<Self>() {
            return object.clone();
        }
        Self::from_rc(RcThreadSafety::new(value))
    }

    #[inline]
    #[must_use]
    pub fn from_rc<T: SendSafety + SyncSafety + 'static>(value: RcThreadSafety<T>) -> Self {
        Self {
            value: erase(value),
            type_info: TypeInfo::of::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    #[inline]
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_info.id == TypeId::of::<T>()
    }

    #[inline]
    #[must_use]
    pub fn downcast<T: SendSafety + SyncSafety + 'static>(&self) -> Option<RcThreadSafety<T>> {
        self.value.clone().downcast().ok()
    }

    #[inline]
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    /// Returns `true` if both handles point to the same allocation.
    #[inline]
    #[must_use]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        RcThreadSafety::ptr_eq(&this.value, &other.value)
    }
}

impl<T: SendSafety + SyncSafety + 'static> From<RcThreadSafety<T>> for Object {
    #[inline]
    fn from(value: RcThreadSafety<T>) -> Self {
        Self::from_rc(value)
    }
}

impl Debug for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object").field("type", &self.type_info.name).finish_non_exhaustive()
    }
}
