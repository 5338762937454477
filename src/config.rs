//! Retry configuration: layerable options and the resolved per-wrap config.
//!
//! Configuration is assembled from up to three layers, narrowest wins:
//! built-in defaults, factory-level defaults, call-site options. Fields merge
//! independently: a field left unset at a narrow layer falls back to the
//! next layer out, never the whole object at once.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ConfigError;
use crate::matcher::Matcher;

/// Observability hook invoked once per retry, strictly before the backoff
/// delay, with the triggering error and the zero-based attempt index.
pub type LogHook<E> = Arc<dyn Fn(&E, u32) + Send + Sync>;

pub(crate) const DEFAULT_RETRIES: u32 = 0;
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::ZERO;
pub(crate) const DEFAULT_FACTOR: f64 = 1.0;

/// One layer of retry configuration.
///
/// Every field is optional; unset fields fall through to the next layer when
/// the configuration is resolved at wrap time. Options are plain data and can
/// be cloned and reused across wraps.
///
/// # Examples
///
/// ```rust
/// use resurge::RetryOptions;
/// use std::time::Duration;
///
/// let options: RetryOptions<String> = RetryOptions::new()
///     .with_retries(3)
///     .with_timeout(Duration::from_millis(100))
///     .with_factor(2.0);
///
/// assert!(options.validate().is_ok());
/// ```
pub struct RetryOptions<E> {
    pub(crate) retries: Option<u32>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) factor: Option<f64>,
    pub(crate) errors: Option<Matcher<E>>,
    pub(crate) log: Option<LogHook<E>>,
}

impl<E> RetryOptions<E> {
    /// Options with every field unset.
    pub fn new() -> Self {
        Self {
            retries: None,
            timeout: None,
            factor: None,
            errors: None,
            log: None,
        }
    }

    /// Set the retry budget: additional attempts after the first failure.
    /// `0` means run once, never retry.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Set the base delay before the first retry.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the multiplier applied to the delay after each retry. Must be at
    /// least 1.
    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = Some(factor);
        self
    }

    /// Restrict retries to failures accepted by the matcher. Without a
    /// matcher, every failure is retryable.
    pub fn with_errors(mut self, errors: Matcher<E>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Install an observability hook, called once per retry with the
    /// triggering error and the zero-based attempt index.
    pub fn with_log<F>(mut self, log: F) -> Self
    where
        F: Fn(&E, u32) + Send + Sync + 'static,
    {
        self.log = Some(Arc::new(log));
        self
    }

    /// Structural validation.
    ///
    /// Rejects `factor < 1` (including NaN) and a present-but-empty error
    /// allow-list. Unset fields are always valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(factor) = self.factor {
            if !(factor >= 1.0) {
                return Err(ConfigError::FactorBelowOne(factor));
            }
        }
        if let Some(errors) = &self.errors {
            if errors.is_empty() {
                return Err(ConfigError::EmptyErrorList);
            }
        }
        Ok(())
    }

    /// Per-field merge: fields set on `self` win, the rest fall back to
    /// `base`, then to the built-in defaults.
    pub(crate) fn resolve_over(&self, base: &RetryOptions<E>) -> RetryConfig<E> {
        RetryConfig {
            retries: self.retries.or(base.retries).unwrap_or(DEFAULT_RETRIES),
            timeout: self.timeout.or(base.timeout).unwrap_or(DEFAULT_TIMEOUT),
            factor: self.factor.or(base.factor).unwrap_or(DEFAULT_FACTOR),
            errors: self.errors.clone().or_else(|| base.errors.clone()),
            log: self.log.clone().or_else(|| base.log.clone()),
        }
    }
}

impl<E> Default for RetryOptions<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for RetryOptions<E> {
    fn clone(&self) -> Self {
        Self {
            retries: self.retries,
            timeout: self.timeout,
            factor: self.factor,
            errors: self.errors.clone(),
            log: self.log.clone(),
        }
    }
}

impl<E> fmt::Debug for RetryOptions<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryOptions")
            .field("retries", &self.retries)
            .field("timeout", &self.timeout)
            .field("factor", &self.factor)
            .field("errors", &self.errors)
            .field("log", &self.log.as_ref().map(|_| "<hook>"))
            .finish()
    }
}

/// Fully resolved configuration for one wrapped target.
///
/// Immutable once produced; every invocation of the wrapped target reads the
/// same values. Built-in defaults are `retries = 0`, `timeout = 0`,
/// `factor = 1`, no matcher, no hook.
pub struct RetryConfig<E> {
    pub(crate) retries: u32,
    pub(crate) timeout: Duration,
    pub(crate) factor: f64,
    pub(crate) errors: Option<Matcher<E>>,
    pub(crate) log: Option<LogHook<E>>,
}

impl<E> RetryConfig<E> {
    /// Maximum number of retries after the first failure.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Base delay before the first retry.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Backoff multiplier.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// The retryable-error allow-list, if one is configured.
    pub fn errors(&self) -> Option<&Matcher<E>> {
        self.errors.as_ref()
    }

    /// Whether a failure qualifies for a retry. Always true without an
    /// allow-list; otherwise the matcher decides.
    pub fn is_retryable(&self, error: &E) -> bool {
        match &self.errors {
            None => true,
            Some(matcher) => matcher.matches(error),
        }
    }

    pub(crate) fn log(&self) -> Option<&(dyn Fn(&E, u32) + Send + Sync)> {
        self.log.as_deref()
    }
}

impl<E> Clone for RetryConfig<E> {
    fn clone(&self) -> Self {
        Self {
            retries: self.retries,
            timeout: self.timeout,
            factor: self.factor,
            errors: self.errors.clone(),
            log: self.log.clone(),
        }
    }
}

impl<E> fmt::Debug for RetryConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryConfig")
            .field("retries", &self.retries)
            .field("timeout", &self.timeout)
            .field("factor", &self.factor)
            .field("errors", &self.errors)
            .field("log", &self.log.as_ref().map(|_| "<hook>"))
            .finish()
    }
}
