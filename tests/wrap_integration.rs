//! End-to-end tests through the public crate surface.

use resurge::matcher::is_instance;
use resurge::{from_async, from_sync, BoxError, Matcher, Retrier, RetryOptions};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_exponential_backoff_timing() {
    let calls = Arc::new(AtomicU32::new(0));
    let retrier = Retrier::<String>::new();

    let wrapped = retrier
        .wrap_with(
            from_async({
                let calls = calls.clone();
                move |_cx: &(), ()| {
                    let calls = calls.clone();
                    async move {
                        let n = calls.fetch_add(1, Ordering::SeqCst);
                        if n < 3 {
                            Err("retry".to_string())
                        } else {
                            Ok("done")
                        }
                    }
                }
            }),
            RetryOptions::new()
                .with_retries(5)
                .with_timeout(Duration::from_millis(10))
                .with_factor(2.0),
        )
        .unwrap();

    let start = Instant::now();
    assert_eq!(wrapped.call(&(), ()).await, Ok("done"));
    let elapsed = start.elapsed();

    // Backoff before retries 1..=3: 10ms + 20ms + 40ms = 70ms minimum.
    // Allow some scheduler slack below the theoretical floor.
    assert!(
        elapsed >= Duration::from_millis(50),
        "expected at least 50ms of backoff, got {:?}",
        elapsed
    );
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_boxed_error_type_matching_retries_io_errors() {
    let calls = Arc::new(AtomicU32::new(0));
    let retrier = Retrier::with_defaults(
        RetryOptions::<BoxError>::new()
            .with_retries(3)
            .with_timeout(Duration::from_millis(1))
            .with_errors(Matcher::when(is_instance::<std::io::Error>())),
    )
    .unwrap();

    let wrapped = retrier
        .wrap(from_sync({
            let calls = calls.clone();
            move |_cx: &(), ()| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err::<u32, BoxError>(Box::new(std::io::Error::new(
                        std::io::ErrorKind::ConnectionReset,
                        "connection reset",
                    )))
                } else {
                    Ok(99)
                }
            }
        }))
        .unwrap();

    assert_eq!(wrapped.call(&(), ()).await.unwrap(), 99);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_boxed_error_type_matching_rejects_other_errors() {
    let calls = Arc::new(AtomicU32::new(0));
    let retrier = Retrier::with_defaults(
        RetryOptions::<BoxError>::new()
            .with_retries(3)
            .with_timeout(Duration::from_millis(1))
            .with_errors(Matcher::when(is_instance::<std::io::Error>())),
    )
    .unwrap();

    let wrapped = retrier
        .wrap(from_sync({
            let calls = calls.clone();
            move |_cx: &(), input: String| {
                calls.fetch_add(1, Ordering::SeqCst);
                input
                    .parse::<u32>()
                    .map_err(|e| Box::new(e) as BoxError)
            }
        }))
        .unwrap();

    let error = wrapped.call(&(), "not-a-number".to_string()).await.unwrap_err();
    assert!(error.downcast_ref::<std::num::ParseIntError>().is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_one_wrapped_callable_serves_many_calls() {
    let retrier = Retrier::<String>::new();

    let wrapped = retrier
        .wrap(from_async(|base: &u32, n: u32| {
            let base = *base;
            async move { Ok::<_, String>(base + n) }
        }))
        .unwrap();

    let base = 100;
    for n in 0..5 {
        assert_eq!(wrapped.call(&base, n).await, Ok(100 + n));
    }
}

#[tokio::test]
async fn test_defaults_and_overrides_compose_end_to_end() {
    let calls = Arc::new(AtomicU32::new(0));
    let retrier = Retrier::with_defaults(
        RetryOptions::<String>::new()
            .with_retries(0)
            .with_timeout(Duration::from_millis(1)),
    )
    .unwrap();

    let flaky = from_sync({
        let calls = calls.clone();
        move |_cx: &(), ()| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n % 3 == 2 {
                Ok(n)
            } else {
                Err("flaky".to_string())
            }
        }
    });

    // Factory default budget of 0 fails on the first error...
    let strict = retrier.wrap(flaky).unwrap();
    assert!(strict.call(&(), ()).await.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // ...while a call-site override retries through to success.
    calls.store(0, Ordering::SeqCst);
    let flaky = from_sync({
        let calls = calls.clone();
        move |_cx: &(), ()| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n % 3 == 2 {
                Ok(n)
            } else {
                Err("flaky".to_string())
            }
        }
    });
    let patient = retrier
        .wrap_with(flaky, RetryOptions::new().with_retries(4))
        .unwrap();
    assert_eq!(patient.call(&(), ()).await, Ok(2));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}
