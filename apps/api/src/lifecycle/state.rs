use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::ErrorKind;

/// The live state of one operation. Exactly one exists per operation.
///
/// Each attempt moves `Pending -> Succeeded | Failed`; starting a new attempt
/// goes back to `Pending` with a higher `attempt` number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RequestState<T> {
    Idle,
    Pending {
        attempt: u64,
        started_at: DateTime<Utc>,
    },
    Succeeded {
        attempt: u64,
        result: T,
        completed_at: DateTime<Utc>,
    },
    Failed {
        attempt: u64,
        kind: ErrorKind,
        message: String,
        failed_at: DateTime<Utc>,
        /// An automatic retry of the same input is queued.
        retry_scheduled: bool,
    },
}

impl<T> RequestState<T> {
    pub fn attempt(&self) -> Option<u64> {
        match self {
            RequestState::Idle => None,
            RequestState::Pending { attempt, .. }
            | RequestState::Succeeded { attempt, .. }
            | RequestState::Failed { attempt, .. } => Some(*attempt),
        }
    }

    /// Nothing more will happen without a new `start` or `retry`.
    pub fn is_settled(&self) -> bool {
        match self {
            RequestState::Succeeded { .. } => true,
            RequestState::Failed {
                retry_scheduled, ..
            } => !retry_scheduled,
            RequestState::Idle | RequestState::Pending { .. } => false,
        }
    }
}

#[cfg(test)]
impl<T> RequestState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending { .. })
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            RequestState::Succeeded { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            RequestState::Failed { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
