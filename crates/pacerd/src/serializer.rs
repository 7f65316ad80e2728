//! Request serialization for configuration-mutating routes.
//!
//! One mutual-exclusion primitive per daemon process, scoped to the
//! statically declared route subset that mutates cluster sync
//! configuration. Unrelated routes never touch the lock. Waiters are
//! served in arrival order: `tokio::sync::Mutex` queues them FIFO.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Paths under the remote prefix whose handlers must hold the sync lock.
pub const GUARDED_PATHS: &[&str] = &["/remote/set_sync_options", "/remote/set_certs"];

/// Whether a request path belongs to the guarded subset.
pub fn is_guarded(path: &str) -> bool {
    GUARDED_PATHS.contains(&path)
}

/// Re-entrant acquisition within one request: a programming error.
#[derive(Debug, Error)]
#[error("sync configuration lock is already held by this request")]
pub struct LockStateError;

/// Per-request acquisition state, used to detect re-entrant misuse.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    holding: Arc<AtomicBool>,
}

impl RequestContext {
    /// Create a fresh context for one logical request.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Process-wide serializer over the guarded routes.
#[derive(Debug, Clone, Default)]
pub struct RequestSerializer {
    lock: Arc<Mutex<()>>,
}

impl RequestSerializer {
    /// Create the serializer. One instance per daemon process.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for the given request.
    ///
    /// Suspends cooperatively until the lock is free; other requests keep
    /// running on the same loop. The returned guard releases on drop, so
    /// every exit path releases.
    pub async fn acquire(&self, ctx: &RequestContext) -> Result<SerializerGuard, LockStateError> {
        if ctx.holding.swap(true, Ordering::SeqCst) {
            return Err(LockStateError);
        }
        let guard = Arc::clone(&self.lock).lock_owned().await;
        Ok(SerializerGuard {
            _guard: guard,
            holding: Arc::clone(&ctx.holding),
        })
    }
}

/// Scoped hold of the sync lock.
pub struct SerializerGuard {
    _guard: OwnedMutexGuard<()>,
    holding: Arc<AtomicBool>,
}

impl Drop for SerializerGuard {
    fn drop(&mut self) {
        self.holding.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_reentrant_acquire_is_an_error() {
        let serializer = RequestSerializer::new();
        let ctx = RequestContext::new();
        let _guard = serializer.acquire(&ctx).await.unwrap();
        assert!(serializer.acquire(&ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_release_on_drop_allows_next_request() {
        let serializer = RequestSerializer::new();
        let first = serializer.acquire(&RequestContext::new()).await.unwrap();

        let second = {
            let serializer = serializer.clone();
            tokio::spawn(async move {
                serializer.acquire(&RequestContext::new()).await.unwrap();
            })
        };

        // Still held: the second acquire must not complete yet.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!second.is_finished());

        drop(first);
        timeout(Duration::from_secs(1), second).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_waiters_served_in_arrival_order() {
        let serializer = RequestSerializer::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let head = serializer.acquire(&RequestContext::new()).await.unwrap();
        let mut tasks = Vec::new();
        for i in 0..3 {
            let serializer = serializer.clone();
            let order = Arc::clone(&order);
            tasks.push(tokio::spawn(async move {
                let _guard = serializer.acquire(&RequestContext::new()).await.unwrap();
                order.lock().await.push(i);
            }));
            // Give each waiter time to enqueue before the next arrives.
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        drop(head);
        for task in tasks {
            timeout(Duration::from_secs(1), task).await.unwrap().unwrap();
        }
        assert_eq!(*order.lock().await, vec![0, 1, 2]);
    }

    #[test]
    fn test_guarded_path_set() {
        assert!(is_guarded("/remote/set_sync_options"));
        assert!(is_guarded("/remote/set_certs"));
        assert!(!is_guarded("/remote/auth"));
        assert!(!is_guarded("/remote/status"));
    }
}
