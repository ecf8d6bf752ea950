//! Pointer and marker aliases switched by the `thread_safe` feature.
//!
//! With the feature enabled every shared value lives behind an [`Arc`](alloc::sync::Arc)
//! and must be `Send + Sync`; without it an [`Rc`](alloc::rc::Rc) is used and no bounds apply.

#[cfg(feature = "thread_safe")]
mod imp {
    use alloc::sync::Arc;
    use core::any::Any;

    pub trait SendSafety: Send {}
    pub trait SyncSafety: Sync {}

    impl<T: Send + ?Sized> SendSafety for T {}
    impl<T: Sync + ?Sized> SyncSafety for T {}

    pub type RcThreadSafety<T> = Arc<T>;
    pub type RcAnyThreadSafety = Arc<dyn Any + Send + Sync>;

    #[inline]
    pub(crate) fn erase<T: Send + Sync + 'static>(value: Arc<T>) -> RcAnyThreadSafety {
        value
    }
}

#[cfg(not(feature = "thread_safe"))]
mod imp {
    use alloc::rc::Rc;
    use core::any::Any;

    pub trait SendSafety {}
    pub trait SyncSafety {}

    impl<T: ?Sized> SendSafety for T {}
    impl<T: ?Sized> SyncSafety for T {}

    pub type RcThreadSafety<T> = Rc<T>;
    pub type RcAnyThreadSafety = Rc<dyn Any>;

    #[inline]
    pub(crate) fn erase<T: 'static>(value: Rc<T>) -> RcAnyThreadSafety {
        value
    }
}

pub use imp::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety};
pub(crate) use imp::erase;
