//! The attempt loop: invoke, classify the outcome, back off, retry or settle.

use crate::backoff::delay_for_retry;
use crate::config::RetryConfig;
use crate::target::Target;

/// Per-invocation retry state. Owned by a single in-flight call and dropped
/// when the call settles; concurrent invocations never share it.
struct AttemptState {
    /// Zero-based index of the attempt currently running.
    attempt: u32,
    /// Retries still permitted after the current attempt.
    remaining: u32,
}

impl AttemptState {
    fn new(budget: u32) -> Self {
        Self {
            attempt: 0,
            remaining: budget,
        }
    }
}

/// Drive one invocation of `target` to a terminal outcome.
///
/// Success settles immediately with the target's value. A failure propagates
/// when it is non-retryable per the allow-list (the budget is irrelevant) or
/// when the budget is exhausted; otherwise it triggers the log hook, a
/// backoff sleep, and another attempt. The terminal error is returned exactly
/// as the target produced it, never wrapped or annotated.
///
/// The log hook runs strictly before the backoff sleep. A panicking hook is
/// not caught; it unwinds through the caller.
pub(crate) async fn run<Cx, Args, F>(
    config: &RetryConfig<F::Error>,
    target: &F,
    cx: &Cx,
    args: Args,
) -> Result<F::Output, F::Error>
where
    F: Target<Cx, Args>,
    Args: Clone,
{
    let mut state = AttemptState::new(config.retries());

    loop {
        match target.invoke(cx, args.clone()).await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if !config.is_retryable(&error) {
                    return Err(error);
                }
                if state.remaining == 0 {
                    return Err(error);
                }

                if let Some(hook) = config.log() {
                    hook(&error, state.attempt);
                }

                let delay = delay_for_retry(state.attempt + 1, config.timeout(), config.factor());

                #[cfg(feature = "tracing")]
                tracing::debug!(
                    attempt = state.attempt,
                    remaining = state.remaining,
                    delay_ms = delay.as_millis() as u64,
                    "attempt failed, retrying"
                );

                state.remaining -= 1;
                state.attempt += 1;

                // Suspends cooperatively even when the delay is zero.
                tokio::time::sleep(delay).await;
            }
        }
    }
}
