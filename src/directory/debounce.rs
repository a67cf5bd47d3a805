use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// Holds back a changing value until it has been stable for `delay`.
///
/// Each [`push`](Debouncer::push) replaces the pending value and restarts
/// the timer, so a burst of edits yields a single value: the last one.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.delay));
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value will be released.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Waits for the pending value to settle and takes it.
    ///
    /// Cancel safe: dropping the future before it completes leaves the
    /// pending value in place. Never resolves while nothing is pending, so
    /// guard it with [`is_pending`](Debouncer::is_pending) inside `select!`.
    pub async fn settled(&mut self) -> T {
        loop {
            match self.deadline() {
                Some(deadline) => {
                    sleep_until(deadline).await;
                    if let Some((value, _)) = self.pending.take() {
                        return value;
                    }
                }
                None => std::future::pending::<()>().await,
            }
        }
    }
}
