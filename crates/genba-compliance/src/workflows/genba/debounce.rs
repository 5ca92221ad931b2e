use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Trailing-edge debounce for search input.
///
/// Every call to [`SearchDebouncer::settle`] waits for the configured delay and
/// yields its value only if no newer value arrived meanwhile. Clones share the
/// same input stream.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    latest: Arc<AtomicU64>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn settle<T>(&self, value: T) -> Option<T> {
        let ticket = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        tokio::time::sleep(self.delay).await;

        if self.latest.load(Ordering::Acquire) == ticket {
            Some(value)
        } else {
            tracing::trace!(ticket, "search input superseded before debounce elapsed");
            None
        }
    }
}
