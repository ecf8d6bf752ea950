/// Splits a construction failure by where it happened: while autowiring the dependencies,
/// or inside the constructor/factory/decorator itself.
#[derive(thiserror::Error, Debug)]
pub enum InstantiatorErrorKind<DepsErr, FactoryErr> {
    #[error(transparent)]
    Deps(DepsErr),
    #[error(transparent)]
    Factory(FactoryErr),
}
