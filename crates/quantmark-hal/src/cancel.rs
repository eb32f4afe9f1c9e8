//! Cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{HalError, HalResult};

/// Shared cancellation flag with an optional deadline.
///
/// Clones share the flag, so cancelling any clone cancels all of them.
/// Long-running loops poll [`is_cancelled`](Self::is_cancelled) between
/// units of work; nothing is interrupted preemptively.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that also trips once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Token that also trips `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire) || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// `Err(HalError::Cancelled)` once the token has tripped.
    pub fn check(&self) -> HalResult<()> {
        if self.is_cancelled() {
            Err(HalError::Cancelled)
        } else {
            Ok(())
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
