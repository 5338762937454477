//! The retry factory and the wrapped callable it produces.

use std::fmt;

use crate::config::{RetryConfig, RetryOptions};
use crate::engine;
use crate::error::ConfigError;
use crate::target::Target;

/// Normalized form of the accepted wrap call shapes.
///
/// Each shape resolves exactly once into an `(options, target)` pair before
/// any merging happens; nothing downstream re-inspects argument order.
enum WrapArgs<F, E> {
    Bare(F),
    TargetFirst(F, RetryOptions<E>),
    OptionsFirst(RetryOptions<E>, F),
}

impl<F, E> WrapArgs<F, E> {
    fn resolve(self) -> (Option<RetryOptions<E>>, F) {
        match self {
            WrapArgs::Bare(target) => (None, target),
            WrapArgs::TargetFirst(target, options) => (Some(options), target),
            WrapArgs::OptionsFirst(options, target) => (Some(options), target),
        }
    }
}

/// A retry factory: immutable process-level defaults plus the wrap
/// operations that bind them to individual targets.
///
/// The defaults are fixed at construction and shared read-only by every
/// wrapped callable the factory produces; wrapping never mutates them.
///
/// # Examples
///
/// ```rust
/// use resurge::{from_async, Retrier, RetryOptions};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let retrier = Retrier::with_defaults(
///     RetryOptions::<String>::new()
///         .with_retries(2)
///         .with_timeout(Duration::from_millis(1)),
/// )
/// .unwrap();
///
/// let wrapped = retrier
///     .wrap(from_async(|_cx: &(), n: u32| async move {
///         if n == 0 {
///             Err("zero is not allowed".to_string())
///         } else {
///             Ok(n * 2)
///         }
///     }))
///     .unwrap();
///
/// assert_eq!(wrapped.call(&(), 21).await, Ok(42));
/// # });
/// ```
pub struct Retrier<E> {
    defaults: RetryOptions<E>,
}

impl<E> Retrier<E> {
    /// A factory with empty defaults.
    ///
    /// Behaves identically to `Retrier::with_defaults(RetryOptions::new())`:
    /// every unset field resolves to the built-in defaults (no retries, no
    /// delay, factor 1, all errors retryable, no hook).
    pub fn new() -> Self {
        Self {
            defaults: RetryOptions::new(),
        }
    }

    /// A factory with process-level default options, validated up front.
    pub fn with_defaults(defaults: RetryOptions<E>) -> Result<Self, ConfigError> {
        defaults.validate()?;
        Ok(Self { defaults })
    }

    /// Borrow the factory-level defaults.
    pub fn defaults(&self) -> &RetryOptions<E> {
        &self.defaults
    }

    /// Wrap a target using the factory defaults alone.
    pub fn wrap<F>(&self, target: F) -> Result<Wrapped<F, E>, ConfigError> {
        self.build(WrapArgs::Bare(target))
    }

    /// Wrap a target with call-site options layered over the factory
    /// defaults, narrowest field wins.
    pub fn wrap_with<F>(
        &self,
        target: F,
        options: RetryOptions<E>,
    ) -> Result<Wrapped<F, E>, ConfigError> {
        self.build(WrapArgs::TargetFirst(target, options))
    }

    /// Options-first spelling of [`wrap_with`](Self::wrap_with). The two are
    /// interchangeable; both normalize through the same resolution step.
    pub fn wrap_configured<F>(
        &self,
        options: RetryOptions<E>,
        target: F,
    ) -> Result<Wrapped<F, E>, ConfigError> {
        self.build(WrapArgs::OptionsFirst(options, target))
    }

    fn build<F>(&self, args: WrapArgs<F, E>) -> Result<Wrapped<F, E>, ConfigError> {
        let (options, target) = args.resolve();
        let options = options.unwrap_or_default();
        options.validate()?;
        let config = options.resolve_over(&self.defaults);
        Ok(Wrapped { target, config })
    }
}

impl<E> Default for Retrier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Retrier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retrier")
            .field("defaults", &self.defaults)
            .finish()
    }
}

/// A target bound to its resolved retry configuration.
///
/// Produced by the wrap operations on [`Retrier`]. The configuration is
/// resolved once at wrap time and immutable afterwards; each invocation of
/// [`call`](Wrapped::call) runs its own independent attempt loop, so a single
/// `Wrapped` value can serve concurrent callers.
pub struct Wrapped<F, E> {
    target: F,
    config: RetryConfig<E>,
}

impl<F, E> Wrapped<F, E> {
    /// The resolved configuration this callable runs under.
    pub fn config(&self) -> &RetryConfig<E> {
        &self.config
    }

    /// Invoke the target with an explicit bound context and argument list,
    /// retrying on failure per the resolved configuration.
    ///
    /// The same context reference and a clone of the same arguments are
    /// passed to every attempt, retries included. Settles with the target's
    /// success value, or with the terminal error exactly as the target
    /// produced it.
    pub async fn call<Cx, Args>(&self, cx: &Cx, args: Args) -> Result<F::Output, E>
    where
        F: Target<Cx, Args, Error = E>,
        Args: Clone,
    {
        engine::run(&self.config, &self.target, cx, args).await
    }
}

impl<F, E> fmt::Debug for Wrapped<F, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapped")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
