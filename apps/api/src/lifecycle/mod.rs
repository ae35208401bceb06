// Async operation lifecycle: Idle -> Pending -> Succeeded | Failed, with a
// timeout guard, attempt sequencing, cancellation and a uniform retry policy.
// Every feature that calls an external service goes through `Operation`.

pub mod controller;
pub mod error;
pub mod policy;
pub mod registry;
pub mod state;
pub mod view;

pub use controller::{ExternalCall, Operation};
pub use error::{CallError, ErrorKind, LifecycleError};
pub use policy::{OperationPolicy, RetryPolicy};
pub use registry::OperationRegistry;
pub use state::RequestState;
pub use view::{OperationView, View};

/// Runs a request-scoped operation to completion and returns its view.
/// The operation lives for the duration of the request and is disposed when
/// the request future is dropped.
pub async fn run_once<C: ExternalCall>(
    name: &'static str,
    call: C,
    policy: OperationPolicy,
    input: C::Input,
) -> Result<View<C::Output>, LifecycleError> {
    let operation = Operation::new(name, call, policy);
    operation.start(input)?;
    let state = operation.settled().await;
    Ok(View::from_state(&state))
}
