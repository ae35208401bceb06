use serde::Serialize;
use uuid::Uuid;

use super::error::ErrorKind;
use super::state::RequestState;

/// What a client renders for an operation: a loading placeholder, an error
/// panel with a retry affordance, or the result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum View<T> {
    Idle,
    Loading {
        attempt: u64,
    },
    Error {
        kind: ErrorKind,
        message: String,
        /// A manual retry with the same input can help.
        retryable: bool,
        /// The controller will retry on its own shortly.
        retry_scheduled: bool,
    },
    Ready {
        result: T,
    },
}

impl<T: Clone> View<T> {
    pub fn from_state(state: &RequestState<T>) -> Self {
        match state {
            RequestState::Idle => View::Idle,
            RequestState::Pending { attempt, .. } => View::Loading { attempt: *attempt },
            RequestState::Succeeded { result, .. } => View::Ready {
                result: result.clone(),
            },
            RequestState::Failed {
                kind,
                message,
                retry_scheduled,
                ..
            } => View::Error {
                kind: *kind,
                message: message.clone(),
                retryable: *kind != ErrorKind::Validation,
                retry_scheduled: *retry_scheduled,
            },
        }
    }
}

impl<T> View<T> {
    /// Converts the ready payload, e.g. into a display form.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> View<U> {
        match self {
            View::Idle => View::Idle,
            View::Loading { attempt } => View::Loading { attempt },
            View::Error {
                kind,
                message,
                retryable,
                retry_scheduled,
            } => View::Error {
                kind,
                message,
                retryable,
                retry_scheduled,
            },
            View::Ready { result } => View::Ready { result: f(result) },
        }
    }
}

/// A view of a registered operation, with the id clients poll it by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationView<T> {
    pub id: Uuid,
    #[serde(flatten)]
    pub view: View<T>,
}
