//! Retryable-error matching.
//!
//! A [`Matcher`] is an ordered allow-list of predicates over an error type.
//! When a wrapped target is configured with a matcher, only failures accepted
//! by at least one predicate are retried; everything else propagates to the
//! caller immediately and untouched. Without a matcher, every failure is
//! retryable.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Boxed dynamic error, for targets that erase their error type.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// A single shared retryability predicate.
pub type ErrorPredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// An ordered allow-list of retryable-error predicates.
///
/// Predicates are evaluated in insertion order, but order never changes the
/// boolean result: a failure is retryable iff *any* predicate accepts it.
/// Predicates are expected to be pure checks with no side effects.
///
/// # Examples
///
/// ```rust
/// use resurge::Matcher;
///
/// #[derive(Debug)]
/// enum FetchError {
///     Timeout,
///     RateLimited,
///     BadRequest,
/// }
///
/// let matcher = Matcher::when(|e: &FetchError| matches!(e, FetchError::Timeout))
///     .or_when(|e| matches!(e, FetchError::RateLimited));
///
/// assert!(matcher.matches(&FetchError::Timeout));
/// assert!(matcher.matches(&FetchError::RateLimited));
/// assert!(!matcher.matches(&FetchError::BadRequest));
/// ```
pub struct Matcher<E> {
    predicates: Vec<ErrorPredicate<E>>,
}

impl<E> Matcher<E> {
    /// Start an allow-list from a single predicate.
    pub fn when<P>(predicate: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Self {
            predicates: vec![Arc::new(predicate)],
        }
    }

    /// Add another acceptable error shape to the list.
    pub fn or_when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Arc::new(predicate));
        self
    }

    /// Build a matcher from an already-assembled predicate list.
    ///
    /// An empty list is representable here but is rejected by configuration
    /// validation: an allow-list that accepts nothing would silently disable
    /// retries entirely.
    pub fn from_predicates(predicates: Vec<ErrorPredicate<E>>) -> Self {
        Self { predicates }
    }

    /// True iff at least one predicate accepts the error.
    pub fn matches(&self, error: &E) -> bool {
        self.predicates.iter().any(|predicate| (**predicate)(error))
    }

    /// Number of predicates in the list.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// True if the list holds no predicates.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl<E> Clone for Matcher<E> {
    fn clone(&self) -> Self {
        Self {
            predicates: self.predicates.clone(),
        }
    }
}

impl<E> fmt::Debug for Matcher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

/// Predicate matching a concrete error type behind a [`BoxError`].
///
/// This is the type-identity check for targets that return dynamic errors:
/// the predicate accepts exactly the failures that downcast to `T`.
///
/// # Examples
///
/// ```rust
/// use resurge::matcher::{is_instance, BoxError};
/// use resurge::Matcher;
///
/// let matcher: Matcher<BoxError> = Matcher::when(is_instance::<std::io::Error>());
///
/// let io: BoxError = Box::new(std::io::Error::new(std::io::ErrorKind::Other, "flaky"));
/// let parse: BoxError = Box::new("12a".parse::<u32>().unwrap_err());
///
/// assert!(matcher.matches(&io));
/// assert!(!matcher.matches(&parse));
/// ```
pub fn is_instance<T: Error + 'static>() -> impl Fn(&BoxError) -> bool + Send + Sync + 'static {
    |error: &BoxError| error.downcast_ref::<T>().is_some()
}
