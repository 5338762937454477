//! Wrap a flaky async operation and retry it with exponential backoff.
//!
//! Run with: cargo run --example retry_basic

use resurge::{from_async, Matcher, Retrier, RetryOptions};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

#[derive(Debug)]
enum FetchError {
    Unavailable,
    Forbidden,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "service unavailable"),
            Self::Forbidden => write!(f, "forbidden"),
        }
    }
}

struct Service {
    name: &'static str,
    failures_left: AtomicU32,
}

#[tokio::main]
async fn main() {
    let retrier = Retrier::with_defaults(
        RetryOptions::new()
            .with_retries(4)
            .with_timeout(Duration::from_millis(50))
            .with_factor(2.0)
            .with_errors(Matcher::when(|e: &FetchError| {
                matches!(e, FetchError::Unavailable)
            }))
            .with_log(|error: &FetchError, attempt| {
                println!("attempt {} failed ({}), retrying", attempt, error);
            }),
    )
    .expect("valid retry defaults");

    let fetch = retrier
        .wrap(from_async(|service: &Service, query: String| {
            let name = service.name;
            let remaining = service.failures_left.fetch_update(
                Ordering::SeqCst,
                Ordering::SeqCst,
                |n| Some(n.saturating_sub(1)),
            );
            async move {
                if query.is_empty() {
                    return Err(FetchError::Forbidden);
                }
                match remaining {
                    Ok(n) if n > 0 => Err(FetchError::Unavailable),
                    _ => Ok(format!("{}: results for '{}'", name, query)),
                }
            }
        }))
        .expect("valid wrap options");

    let service = Service {
        name: "search",
        failures_left: AtomicU32::new(3),
    };

    match fetch.call(&service, "retry patterns".to_string()).await {
        Ok(result) => println!("resolved: {}", result),
        Err(error) => println!("gave up: {}", error),
    }
}
