//! Cooperative cancellation for multi-year runs.
//!
//! The simulator checks the token at each year boundary; a year is always
//! either fully applied or not started.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag. Cloning hands out another handle to the same
/// flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_starts_clear() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_is_shared_and_idempotent() {
        let token = CancelToken::new();
        let handle = token.clone();
        handle.cancel();
        handle.cancel();
        assert!(token.is_cancelled());
    }
}
