//! The wrapped operation: one interface over sync and async callables.
//!
//! Both calling conventions normalize into the same future-of-`Result` shape
//! here, so the retry engine never distinguishes a synchronous error return
//! from an asynchronous one.

use std::future::Future;
use std::pin::Pin;

use futures::future::{self, FutureExt};

/// Boxed future alias used across the crate.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// An operation that can be attempted against an explicit bound context `Cx`
/// with an argument list `Args`.
///
/// The context stands in for the receiver a dynamically-dispatched language
/// would bind implicitly: it is captured once by the caller and passed by
/// reference into every attempt, so all attempts of one invocation observe
/// the identical receiver. Arguments are cloned per attempt from the same
/// original value.
pub trait Target<Cx, Args> {
    /// Success value of one attempt.
    type Output;
    /// Failure value of one attempt.
    type Error;

    /// Run a single attempt.
    fn invoke(&self, cx: &Cx, args: Args) -> BoxFuture<'_, Result<Self::Output, Self::Error>>;
}

/// A synchronous callable adapted to [`Target`].
///
/// Built with [`from_sync`].
pub struct SyncFn<F>(F);

/// A future-returning callable adapted to [`Target`].
///
/// Built with [`from_async`].
pub struct AsyncFn<F>(F);

/// Wrap a synchronous fallible function as a retryable target.
///
/// An `Err` return plays the role a thrown exception would: it enters the
/// retry engine through exactly the same path as an async rejection.
///
/// # Examples
///
/// ```rust
/// use resurge::from_sync;
///
/// struct Parser {
///     radix: u32,
/// }
///
/// let target = from_sync(|cx: &Parser, input: String| {
///     u32::from_str_radix(&input, cx.radix).map_err(|e| e.to_string())
/// });
/// # let _ = target;
/// ```
pub fn from_sync<F>(f: F) -> SyncFn<F> {
    SyncFn(f)
}

/// Wrap an async fallible function as a retryable target.
///
/// The returned future must own its data; clone what you need out of the
/// context before the `async move` block:
///
/// ```rust
/// use resurge::from_async;
///
/// #[derive(Clone)]
/// struct Client {
///     endpoint: String,
/// }
///
/// let target = from_async(|cx: &Client, attempt_payload: u32| {
///     let endpoint = cx.endpoint.clone();
///     async move {
///         if endpoint.is_empty() {
///             Err("no endpoint configured".to_string())
///         } else {
///             Ok(attempt_payload * 2)
///         }
///     }
/// });
/// # let _ = target;
/// ```
pub fn from_async<F>(f: F) -> AsyncFn<F> {
    AsyncFn(f)
}

impl<Cx, Args, T, E, F> Target<Cx, Args> for SyncFn<F>
where
    F: Fn(&Cx, Args) -> Result<T, E>,
    T: Send + 'static,
    E: Send + 'static,
{
    type Output = T;
    type Error = E;

    fn invoke(&self, cx: &Cx, args: Args) -> BoxFuture<'_, Result<T, E>> {
        future::ready((self.0)(cx, args)).boxed()
    }
}

impl<Cx, Args, T, E, F, Fut> Target<Cx, Args> for AsyncFn<F>
where
    F: Fn(&Cx, Args) -> Fut,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    type Output = T;
    type Error = E;

    fn invoke(&self, cx: &Cx, args: Args) -> BoxFuture<'_, Result<T, E>> {
        (self.0)(cx, args).boxed()
    }
}

impl<F> std::fmt::Debug for SyncFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncFn").finish_non_exhaustive()
    }
}

impl<F> std::fmt::Debug for AsyncFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncFn").finish_non_exhaustive()
    }
}
