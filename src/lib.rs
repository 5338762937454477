//! # Resurge
//!
//! Transparent retry wrappers for fallible operations, sync or async.
//!
//! A [`Retrier`] holds immutable process-level defaults; its wrap operations
//! bind those defaults (merged per-field with call-site options) to a target
//! callable and hand back a [`Wrapped`] value. Invoking the wrapped value
//! retries transient failures with deterministic multiplicative backoff,
//! optionally restricted to an allow-list of retryable errors, with an
//! observability hook per retry. Call sites keep their shape: the caller's
//! context and arguments are forwarded unchanged into every attempt.
//!
//! ## Quick Example
//!
//! ```rust
//! use resurge::{from_async, Retrier, RetryOptions};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let retrier = Retrier::<String>::new();
//!
//! let wrapped = retrier
//!     .wrap_with(
//!         from_async(|_cx: &(), n: u32| async move {
//!             if n < 3 {
//!                 Err("too small".to_string())
//!             } else {
//!                 Ok(n * 2)
//!             }
//!         }),
//!         RetryOptions::new()
//!             .with_retries(2)
//!             .with_timeout(Duration::from_millis(1)),
//!     )
//!     .unwrap();
//!
//! assert_eq!(wrapped.call(&(), 5).await, Ok(10));
//! # });
//! ```
//!
//! ## Selective retries
//!
//! Without an error allow-list every failure is retryable. With one, only
//! matching failures consume the retry budget; anything else propagates
//! immediately, exactly as the target produced it:
//!
//! ```rust
//! use resurge::{from_sync, Matcher, Retrier, RetryOptions};
//!
//! # tokio_test::block_on(async {
//! #[derive(Debug, PartialEq)]
//! enum StoreError {
//!     Busy,
//!     Corrupt,
//! }
//!
//! let retrier = Retrier::with_defaults(
//!     RetryOptions::new()
//!         .with_retries(3)
//!         .with_errors(Matcher::when(|e: &StoreError| matches!(e, StoreError::Busy))),
//! )
//! .unwrap();
//!
//! let wrapped = retrier
//!     .wrap(from_sync(|_cx: &(), ()| Err::<u32, _>(StoreError::Corrupt)))
//!     .unwrap();
//!
//! // Corrupt is not in the allow-list: no retries, error surfaced verbatim.
//! assert_eq!(wrapped.call(&(), ()).await, Err(StoreError::Corrupt));
//! # });
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod backoff;
pub mod config;
pub mod error;
pub mod matcher;
pub mod target;

#[cfg(feature = "async")]
mod engine;
#[cfg(feature = "async")]
pub mod factory;

// Re-exports
pub use config::{LogHook, RetryConfig, RetryOptions};
pub use error::ConfigError;
#[cfg(feature = "async")]
pub use factory::{Retrier, Wrapped};
pub use matcher::{is_instance, BoxError, ErrorPredicate, Matcher};
pub use target::{from_async, from_sync, AsyncFn, BoxFuture, SyncFn, Target};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{RetryConfig, RetryOptions};
    pub use crate::error::ConfigError;
    #[cfg(feature = "async")]
    pub use crate::factory::{Retrier, Wrapped};
    pub use crate::matcher::{is_instance, BoxError, Matcher};
    pub use crate::target::{from_async, from_sync, Target};
}
