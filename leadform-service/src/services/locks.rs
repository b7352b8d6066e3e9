//! Per-session-id write serialization.
//!
//! Two concurrent turns on the same session id race on the session's
//! read-modify-write; holding a per-key async mutex across the whole turn
//! (and across submit's transcript snapshot) prevents lost messages.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Lock map keyed by external session id. Entries are created on demand and
/// kept for the process lifetime; cardinality is bounded by live sessions.
#[derive(Clone, Default)]
pub struct SessionLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the lock for a session id, creating it if needed.
    pub fn for_session(&self, session_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_session_id_shares_one_lock() {
        let locks = SessionLocks::new();
        let a = locks.for_session("sess-1");
        let b = locks.for_session("sess-1");
        assert!(Arc::ptr_eq(&a, &b));

        let other = locks.for_session("sess-2");
        assert!(!Arc::ptr_eq(&a, &other));
    }

    #[tokio::test]
    async fn lock_serializes_critical_sections() {
        let locks = SessionLocks::new();
        let lock = locks.for_session("sess-1");

        let guard = lock.lock().await;
        assert!(lock.try_lock().is_err());
        drop(guard);
        assert!(lock.try_lock().is_ok());
    }
}
