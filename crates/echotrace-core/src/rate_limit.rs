//! Pacing between successive calls to a rate-limited provider.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum interval between successive calls.
///
/// The web search provider requires a pause between queries as a condition of
/// use; the pacer makes that policy an injected component instead of a sleep
/// buried in lookup code, so tests can disable it. Last-call-timestamp
/// scheme: each `acquire` waits out the remainder of the interval since the
/// previous call, then records the current time.
pub struct Pacer {
    interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_call: Mutex::new(None),
        }
    }

    /// A pacer that never waits. For tests and for providers without a
    /// pacing requirement.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Wait until the interval has elapsed since the previous call, then
    /// record now as the last call time.
    pub async fn acquire(&self) {
        if self.interval.is_zero() {
            return;
        }

        loop {
            let wait = {
                let mut last = self.last_call.lock().await;
                let now = Instant::now();
                match *last {
                    Some(prev) if now.duration_since(prev) < self.interval => {
                        self.interval - now.duration_since(prev)
                    }
                    _ => {
                        *last = Some(now);
                        return;
                    }
                }
            };
            tokio::time::sleep(wait).await;
        }
    }
}
