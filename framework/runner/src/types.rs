/// Recommended error type for your scenario `main` function. Configuration errors returned from
/// [crate::prelude::run] can be recovered with `downcast_ref::<ConfigurationError>()`.
pub type LoadResult<T> = anyhow::Result<T>;
