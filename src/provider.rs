use crate::Container;

/// A bundle of registrations, applied with [`Container::add_provider`].
///
/// # Examples
/// ```rust
/// use illusion::{Container, ServiceProvider};
///
/// struct Settings;
///
/// impl ServiceProvider for Settings {
///     fn register(&self, container: &Container) {
///         container.instance("timeout", 30u32).instance("retries", 3u8);
///     }
/// }
///
/// let container = Container::new();
/// container.add_provider(&Settings);
///
/// assert_eq!(*container.resolve_as::<u32>("timeout").unwrap(), 30);
/// ```
pub trait ServiceProvider {
    fn register(&self, container: &Container);
}
