//! Error types for configuration validation.

use std::fmt;

/// Structurally invalid retry configuration.
///
/// Validation is a deliberate hardening: the configuration is checked when a
/// factory is created and when a target is wrapped, instead of silently
/// accepting values whose retry behavior would be undefined.
///
/// Negative retry counts and delays are unrepresentable (`u32` and
/// [`Duration`](std::time::Duration)), so only two structural faults remain.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `factor` must be at least 1; backoff delays never shrink.
    FactorBelowOne(f64),
    /// An `errors` allow-list was supplied but contains no predicates.
    EmptyErrorList,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FactorBelowOne(factor) => {
                write!(f, "retry factor must be at least 1, got {}", factor)
            }
            Self::EmptyErrorList => {
                write!(f, "errors allow-list must contain at least one predicate")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
