//! The lifecycle controller: one outstanding external call per operation,
//! bounded by a timeout, with manual or automatic-once retry.
//!
//! Every attempt gets a sequence number and its own cancellation token.
//! Starting a new attempt cancels the previous token, which drops the
//! previous call future and with it any in-flight HTTP request. A result is
//! committed only if its sequence number is still the current one, so a
//! late answer can never overwrite a newer attempt.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error::{CallError, LifecycleError};
use super::policy::{OperationPolicy, RetryPolicy};
use super::state::RequestState;

/// An external call driven by an `Operation`.
#[async_trait]
pub trait ExternalCall: Send + Sync + 'static {
    type Input: Clone + Send + Sync + 'static;
    type Output: Clone + Send + Sync + 'static;

    async fn call(&self, input: &Self::Input) -> Result<Self::Output, CallError>;

    /// Runs once `output` is the operation's committed result. It is outside
    /// the timeout, and results of superseded attempts never get here.
    async fn committed(&self, _input: &Self::Input, _output: &Self::Output) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    User,
    Automatic,
}

struct AttemptSlot<I> {
    seq: u64,
    token: Option<CancellationToken>,
    input: Option<I>,
}

struct Shared<C: ExternalCall> {
    name: &'static str,
    call: C,
    policy: OperationPolicy,
    state: watch::Sender<RequestState<C::Output>>,
    slot: Mutex<AttemptSlot<C::Input>>,
    root: CancellationToken,
}

/// Exclusive owner of one operation's state. Dropping it disposes the
/// operation: in-flight work is cancelled and no transition happens after.
pub struct Operation<C: ExternalCall> {
    shared: Arc<Shared<C>>,
}

impl<C: ExternalCall> Operation<C> {
    pub fn new(name: &'static str, call: C, policy: OperationPolicy) -> Self {
        let (state, _) = watch::channel(RequestState::Idle);
        Self {
            shared: Arc::new(Shared {
                name,
                call,
                policy,
                state,
                slot: Mutex::new(AttemptSlot {
                    seq: 0,
                    token: None,
                    input: None,
                }),
                root: CancellationToken::new(),
            }),
        }
    }

    /// Starts a new attempt with `input`, superseding any attempt in flight.
    /// Returns the attempt's sequence number.
    pub fn start(&self, input: C::Input) -> Result<u64, LifecycleError> {
        let (seq, token) = self.shared.begin(input.clone(), Origin::User, None)?;
        tokio::spawn(Shared::drive(Arc::clone(&self.shared), seq, token, input));
        Ok(seq)
    }

    /// Starts a new attempt with the input of the most recent one.
    pub fn retry(&self) -> Result<u64, LifecycleError> {
        let input = self
            .shared
            .slot()
            .input
            .clone()
            .ok_or(LifecycleError::NothingToRetry)?;
        self.start(input)
    }

    pub fn snapshot(&self) -> RequestState<C::Output> {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestState<C::Output>> {
        self.shared.state.subscribe()
    }

    /// Waits until the operation is settled (succeeded, or failed with no
    /// automatic retry queued) and returns that state. Returns the current
    /// state immediately if the operation is disposed. Never returns while the
    /// operation is `Idle`, so call `start` first.
    pub async fn settled(&self) -> RequestState<C::Output> {
        let mut rx = self.subscribe();
        loop {
            let current = rx.borrow_and_update().clone();
            if current.is_settled() || self.is_disposed() {
                return current;
            }
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        return self.snapshot();
                    }
                }
                _ = self.shared.root.cancelled() => return self.snapshot(),
            }
        }
    }

    pub fn is_settled(&self) -> bool {
        self.shared.state.borrow().is_settled()
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.root.is_cancelled()
    }

    /// Cancels all in-flight work. Later results are discarded and later
    /// `start` calls fail with `LifecycleError::Disposed`.
    pub fn dispose(&self) {
        let _slot = self.shared.slot();
        if !self.shared.root.is_cancelled() {
            debug!(operation = self.shared.name, "operation disposed");
            self.shared.root.cancel();
        }
    }
}

impl<C: ExternalCall> Drop for Operation<C> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<C: ExternalCall> Shared<C> {
    fn slot(&self) -> MutexGuard<'_, AttemptSlot<C::Input>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a new attempt and publishes `Pending`. With `expected`, the
    /// attempt is only registered if `expected` is still the current one.
    fn begin(
        &self,
        input: C::Input,
        origin: Origin,
        expected: Option<u64>,
    ) -> Result<(u64, CancellationToken), LifecycleError> {
        let mut slot = self.slot();
        if self.root.is_cancelled() {
            return Err(LifecycleError::Disposed);
        }
        if let Some(expected) = expected {
            if slot.seq != expected {
                return Err(LifecycleError::NothingToRetry);
            }
        }

        if let Some(previous) = slot.token.take() {
            previous.cancel();
        }
        slot.seq += 1;
        let seq = slot.seq;
        let token = self.root.child_token();
        slot.token = Some(token.clone());
        slot.input = Some(input);

        self.state.send_replace(RequestState::Pending {
            attempt: seq,
            started_at: Utc::now(),
        });
        info!(operation = self.name, attempt = seq, ?origin, "attempt started");

        Ok((seq, token))
    }

    /// Publishes `next` if `seq` is still current and the operation is live.
    fn commit(&self, seq: u64, next: RequestState<C::Output>) -> bool {
        let slot = self.slot();
        if self.root.is_cancelled() || slot.seq != seq {
            debug!(
                operation = self.name,
                attempt = seq,
                current = slot.seq,
                "discarding stale result"
            );
            return false;
        }
        self.state.send_replace(next);
        true
    }

    /// Runs an attempt and, when the policy asks for it, the one automatic
    /// retry that may follow it.
    async fn drive(
        shared: Arc<Self>,
        mut seq: u64,
        mut token: CancellationToken,
        input: C::Input,
    ) {
        let mut origin = Origin::User;
        loop {
            let Some(delay) = shared.attempt(seq, &token, &input, origin).await else {
                return;
            };

            tokio::select! {
                biased;
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            match shared.begin(input.clone(), Origin::Automatic, Some(seq)) {
                Ok((next_seq, next_token)) => {
                    seq = next_seq;
                    token = next_token;
                    origin = Origin::Automatic;
                }
                Err(_) => return,
            }
        }
    }

    /// Runs one attempt to completion. Returns the delay before the automatic
    /// retry if one was scheduled.
    async fn attempt(
        &self,
        seq: u64,
        token: &CancellationToken,
        input: &C::Input,
        origin: Origin,
    ) -> Option<Duration> {
        let timeout = self.policy.timeout;
        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!(operation = self.name, attempt = seq, "attempt cancelled");
                return None;
            }
            result = self.call.call(input) => result,
            _ = tokio::time::sleep(timeout) => Err(CallError::timeout(timeout)),
        };

        match outcome {
            Ok(result) => {
                let committed = self.commit(
                    seq,
                    RequestState::Succeeded {
                        attempt: seq,
                        result: result.clone(),
                        completed_at: Utc::now(),
                    },
                );
                if committed {
                    self.call.committed(input, &result).await;
                }
                None
            }
            Err(error) => {
                let retry_delay = match (origin, self.policy.retry) {
                    (Origin::User, RetryPolicy::AutomaticOnce { delay })
                        if error.kind.allows_automatic_retry() =>
                    {
                        Some(delay)
                    }
                    _ => None,
                };

                warn!(
                    operation = self.name,
                    attempt = seq,
                    kind = %error.kind,
                    retry_scheduled = retry_delay.is_some(),
                    "attempt failed: {}",
                    error.detail
                );

                let committed = self.commit(
                    seq,
                    RequestState::Failed {
                        attempt: seq,
                        kind: error.kind,
                        message: error.message,
                        failed_at: Utc::now(),
                        retry_scheduled: retry_delay.is_some(),
                    },
                );

                if committed {
                    retry_delay
                } else {
                    None
                }
            }
        }
    }
}
