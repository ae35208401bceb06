use std::time::Duration;

/// What happens after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Only an explicit `retry()` starts a new attempt.
    Manual,
    /// One automatic retry with the same input after `delay`. Never follows a
    /// timeout or validation failure, and an automatic retry is not itself
    /// retried.
    AutomaticOnce { delay: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationPolicy {
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl OperationPolicy {
    pub fn manual(timeout: Duration) -> Self {
        Self {
            timeout,
            retry: RetryPolicy::Manual,
        }
    }

    pub fn retry_once(timeout: Duration, delay: Duration) -> Self {
        Self {
            timeout,
            retry: RetryPolicy::AutomaticOnce { delay },
        }
    }
}
