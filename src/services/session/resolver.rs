use std::sync::Arc;

use crate::services::session::store::{Session, SessionStore, SessionStoreResult};

/// Token key → live session, touching it on the way.
///
/// Thin on purpose: matching, expiry and atomicity all live in the store.
#[derive(Clone)]
pub struct SessionResolver {
    store: Arc<dyn SessionStore>,
}

impl SessionResolver {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub async fn resolve(&self, token_key: Option<&str>) -> SessionStoreResult<Option<Session>> {
        match token_key {
            Some(token_key) if !token_key.is_empty() => {
                self.store
                    .find_one_and_update_last_accessed_time(token_key)
                    .await
            }
            _ => Ok(None),
        }
    }
}
