use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use super::controller::{ExternalCall, Operation};
use super::error::LifecycleError;
use super::policy::OperationPolicy;
use super::state::RequestState;

struct Entry<C: ExternalCall> {
    operation: Operation<C>,
    last_read: Instant,
}

/// Long-lived operations of one feature, keyed by id.
///
/// Each entry is owned by the registry alone; removing it drops the
/// `Operation`, which cancels whatever it still has in flight. A settled
/// operation nobody has read for `ttl` is evicted the same way.
pub struct OperationRegistry<C: ExternalCall + Clone> {
    name: &'static str,
    call: C,
    policy: OperationPolicy,
    ttl: Duration,
    operations: Mutex<HashMap<Uuid, Entry<C>>>,
}

impl<C: ExternalCall + Clone> OperationRegistry<C> {
    pub fn new(name: &'static str, call: C, policy: OperationPolicy, ttl: Duration) -> Self {
        Self {
            name,
            call,
            policy,
            ttl,
            operations: Mutex::new(HashMap::new()),
        }
    }

    fn operations(&self) -> MutexGuard<'_, HashMap<Uuid, Entry<C>>> {
        self.operations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Looks up `id` and marks it as read.
    fn touch<'a>(
        operations: &'a mut HashMap<Uuid, Entry<C>>,
        id: Uuid,
    ) -> Result<&'a Operation<C>, LifecycleError> {
        let entry = operations
            .get_mut(&id)
            .ok_or(LifecycleError::NotFound(id))?;
        entry.last_read = Instant::now();
        Ok(&entry.operation)
    }

    /// Creates a new operation and starts its first attempt.
    pub fn create(
        &self,
        input: C::Input,
    ) -> Result<(Uuid, RequestState<C::Output>), LifecycleError> {
        self.evict_expired();

        let id = Uuid::new_v4();
        let operation = Operation::new(self.name, self.call.clone(), self.policy);
        operation.start(input)?;
        let state = operation.snapshot();
        self.operations().insert(
            id,
            Entry {
                operation,
                last_read: Instant::now(),
            },
        );
        Ok((id, state))
    }

    /// Starts a new attempt with new input, superseding the current one.
    pub fn resubmit(
        &self,
        id: Uuid,
        input: C::Input,
    ) -> Result<RequestState<C::Output>, LifecycleError> {
        let mut operations = self.operations();
        let operation = Self::touch(&mut operations, id)?;
        operation.start(input)?;
        Ok(operation.snapshot())
    }

    pub fn retry(&self, id: Uuid) -> Result<RequestState<C::Output>, LifecycleError> {
        let mut operations = self.operations();
        let operation = Self::touch(&mut operations, id)?;
        operation.retry()?;
        Ok(operation.snapshot())
    }

    pub fn get(&self, id: Uuid) -> Result<RequestState<C::Output>, LifecycleError> {
        let mut operations = self.operations();
        let state = Self::touch(&mut operations, id)?.snapshot();
        Ok(state)
    }

    /// Removes and disposes the operation.
    pub fn remove(&self, id: Uuid) -> Result<(), LifecycleError> {
        self.operations()
            .remove(&id)
            .map(drop)
            .ok_or(LifecycleError::NotFound(id))
    }

    pub fn active_count(&self) -> usize {
        self.evict_expired();
        self.operations().len()
    }

    /// Drops settled operations whose last read is older than `ttl`.
    /// Returns how many were evicted.
    pub fn evict_expired(&self) -> usize {
        let mut operations = self.operations();
        let before = operations.len();
        operations.retain(|_, entry| {
            !(entry.operation.is_settled() && entry.last_read.elapsed() >= self.ttl)
        });

        let evicted = before - operations.len();
        if evicted > 0 {
            debug!(operation = self.name, evicted, "evicted idle operations");
        }
        evicted
    }

    /// Runs `evict_expired` every `ttl` until the registry is dropped.
    pub fn spawn_eviction(self: &Arc<Self>) {
        let registry = Arc::downgrade(self);
        let mut ticks = tokio::time::interval(self.ttl);
        tokio::spawn(async move {
            ticks.tick().await;
            loop {
                ticks.tick().await;
                let Some(registry) = registry.upgrade() else {
                    return;
                };
                registry.evict_expired();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::error::CallError;
    use async_trait::async_trait;

    #[derive(Clone)]
    struct Echo;

    #[async_trait]
    impl ExternalCall for Echo {
        type Input = String;
        type Output = String;

        async fn call(&self, input: &String) -> Result<String, CallError> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(input.to_uppercase())
        }
    }

    fn registry_with_ttl(ttl: Duration) -> OperationRegistry<Echo> {
        OperationRegistry::new(
            "echo",
            Echo,
            OperationPolicy::manual(Duration::from_secs(5)),
            ttl,
        )
    }

    fn registry() -> OperationRegistry<Echo> {
        registry_with_ttl(Duration::from_secs(900))
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_then_poll_until_ready() {
        let registry = registry();
        let (id, state) = registry.create("hi".to_string()).unwrap();
        assert!(state.is_pending());

        tokio::time::sleep(Duration::from_millis(200)).await;
        let state = registry.get(id).unwrap();
        assert_eq!(state.result().map(String::as_str), Some("HI"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmit_supersedes() {
        let registry = registry();
        let (id, _) = registry.create("first".to_string()).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let state = registry.resubmit(id, "second".to_string()).unwrap();
        assert_eq!(state.attempt(), Some(2));

        tokio::time::sleep(Duration::from_secs(1)).await;
        let state = registry.get(id).unwrap();
        assert_eq!(state.result().map(String::as_str), Some("SECOND"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_and_removed_ids_are_not_found() {
        let registry = registry();
        let missing = Uuid::new_v4();
        assert_eq!(registry.get(missing), Err(LifecycleError::NotFound(missing)));

        let (id, _) = registry.create("x".to_string()).unwrap();
        assert_eq!(registry.active_count(), 1);
        registry.remove(id).unwrap();
        assert_eq!(registry.active_count(), 0);
        assert_eq!(registry.retry(id), Err(LifecycleError::NotFound(id)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unread_settled_operations_are_evicted() {
        let registry = registry();
        let ids: Vec<Uuid> = (0..50)
            .map(|_| registry.create("x".repeat(64 * 1024)).unwrap().0)
            .collect();
        assert_eq!(registry.active_count(), 50);

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(registry.active_count(), 0);
        assert_eq!(registry.get(ids[0]), Err(LifecycleError::NotFound(ids[0])));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reading_keeps_an_operation_alive() {
        let registry = registry_with_ttl(Duration::from_secs(60));
        let (id, _) = registry.create("kept".to_string()).unwrap();

        tokio::time::sleep(Duration::from_secs(40)).await;
        registry.get(id).unwrap();
        tokio::time::sleep(Duration::from_secs(40)).await;
        assert_eq!(registry.active_count(), 1);

        tokio::time::sleep(Duration::from_secs(21)).await;
        assert_eq!(registry.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_operations_are_not_evicted() {
        let registry = registry_with_ttl(Duration::from_millis(10));
        registry.create("slow".to_string()).unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(registry.evict_expired(), 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(registry.evict_expired(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_eviction_runs_without_traffic() {
        let registry = Arc::new(registry_with_ttl(Duration::from_secs(60)));
        registry.spawn_eviction();
        registry.create("idle".to_string()).unwrap();

        tokio::time::sleep(Duration::from_secs(121)).await;
        assert!(registry.operations().is_empty());
    }
}
