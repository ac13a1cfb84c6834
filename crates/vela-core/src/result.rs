//! Result type aliases for Vela.

use crate::VelaError;

/// A specialized `Result` type for Vela operations.
pub type VelaResult<T> = Result<T, VelaError>;

/// A boxed future returning a `VelaResult`.
pub type BoxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = VelaResult<T>> + Send + 'a>>;
