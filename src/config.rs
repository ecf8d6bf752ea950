/// Options of a single binding
/// ## Fields
/// - `shared`:
///   If `true`, the resolved value is cached and the same object is returned on every resolve
///   until the instance is deleted.
///
///   This does **not** affect the dependencies of the value.
///   Only the final, decorated result is cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub shared: bool,
}

impl Config {
    #[inline]
    #[must_use]
    pub const fn shared() -> Self {
        Self { shared: true }
    }

    #[inline]
    #[must_use]
    pub const fn transient() -> Self {
        Self { shared: false }
    }
}
