//! In-process session store used by tests.
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::services::session::store::{
    Session, SessionStore, SessionStoreError, SessionStoreResult,
};

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, token_key: &str, user_id: &str) {
        self.sessions.lock().await.insert(
            token_key.to_string(),
            Session {
                token_key: token_key.to_string(),
                user_id: user_id.to_string(),
                last_accessed_time: Utc::now(),
            },
        );
    }

    // Every later lookup fails as if the backend were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find_one_and_update_last_accessed_time(
        &self,
        token_key: &str,
    ) -> SessionStoreResult<Option<Session>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SessionStoreError::Unavailable("connection refused".into()));
        }

        let mut sessions = self.sessions.lock().await;
        Ok(sessions.get_mut(token_key).map(|session| {
            session.last_accessed_time = session.last_accessed_time.max(Utc::now());
            session.clone()
        }))
    }
}
