//! Ctrl+C handling for long-running commands.
//!
//! Responsibilities:
//! - A clonable token that `main` cancels on SIGINT and commands race against.
//! - A `Cancelled` marker error carried through `anyhow::Result` so `main`
//!   can exit with 130.
//!
//! Does NOT handle:
//! - Installing the signal handler (done in `main`).
//! - Deleting the search job that was running when the user interrupted.
//!
//! Invariants:
//! - Once cancelled, a token stays cancelled.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once `cancel` has been called.
    pub async fn cancelled(&self) {
        // Register before checking the flag so a concurrent cancel is not missed.
        let notified = self.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

/// Marker error for user-driven cancellation.
#[derive(Debug, Clone, Copy)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cancelled")
    }
}

impl std::error::Error for Cancelled {}

pub fn is_cancelled_error(err: &anyhow::Error) -> bool {
    err.is::<Cancelled>()
}

pub fn print_cancelled_message() {
    eprintln!("^C\nOperation cancelled by user");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_wakes_waiter() {
        let token = CancellationToken::new();
        let waiter = token.clone();

        let handle = tokio::spawn(async move { waiter.cancelled().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_already_cancelled_resolves_immediately() {
        let token = CancellationToken::new();
        token.cancel();
        token.cancel();
        tokio::time::timeout(Duration::from_millis(100), token.cancelled())
            .await
            .unwrap();
    }

    #[test]
    fn test_cancelled_error_is_recognized() {
        assert!(is_cancelled_error(&anyhow::Error::new(Cancelled)));
        assert!(!is_cancelled_error(&anyhow::anyhow!("other")));
    }
}
