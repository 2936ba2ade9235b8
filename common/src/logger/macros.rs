use std::future::Future;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use tracing::{Span, field};

use super::TraceId;

/// Root span for one accepted network client.
pub fn connection_span(peer: SocketAddr, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "connection",
        %peer,
        trace_id = %trace_id.short(),
        requests = field::Empty
    )
}

/// Root span for one inbound agent message and its reply.
pub fn conversation_span(sender: &str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "conversation",
        sender = %sender,
        trace_id = %trace_id.short(),
        item = field::Empty
    )
}

/// Awaits `fut` and logs a `performance` warning when it took longer than `max`.
pub async fn warn_if_slow<F, T>(label: &'static str, max: Duration, fut: F) -> T
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let out = fut.await;
    let elapsed = start.elapsed();
    if elapsed > max {
        tracing::warn!(
            target: "performance",
            label = label,
            elapsed_ms = elapsed.as_millis() as u64,
            "slow operation detected"
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[tokio::test]
    #[traced_test]
    async fn slow_future_is_reported() {
        let out = warn_if_slow("sleepy", Duration::from_millis(1), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            7
        })
        .await;

        assert_eq!(out, 7);
        assert!(logs_contain("slow operation detected"));
    }

    #[tokio::test]
    #[traced_test]
    async fn fast_future_is_silent() {
        let out = warn_if_slow("quick", Duration::from_secs(5), async { 1 }).await;

        assert_eq!(out, 1);
        assert!(!logs_contain("slow operation detected"));
    }
}
