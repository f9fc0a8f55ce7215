//! Session store interface consumed by the security filter.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type for session store operations.
pub type SessionStoreResult<T> = Result<T, SessionStoreError>;

/// Server-side session record, bound to an opaque token the client presents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token_key: String,
    pub user_id: String,
    pub last_accessed_time: DateTime<Utc>,
}

/// Store-layer errors.
///
/// Note:
/// - "not found" is not an error; it is `Ok(None)`.
/// - Kept apart from `AppError` so the filter decides how each one surfaces.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid session record: {0}")]
    InvalidRecord(String),
}

impl From<sqlx::Error> for SessionStoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::InvalidRecord(e.to_string())
            }
            _ => Self::Unavailable(e.to_string()),
        }
    }
}

impl From<redis::RedisError> for SessionStoreError {
    fn from(e: redis::RedisError) -> Self {
        Self::Unavailable(e.to_string())
    }
}

/// Lookup-and-touch access to the session store.
///
/// Implementations must be safe to call concurrently for the same token; the touch has to be
/// atomic on the backend side (no read-modify-write round trips from here).
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    // Backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Find the session for `token_key` and set its last-accessed time to now.
    //
    // Returns:
    // - `Ok(Some(session))` with the refreshed timestamp
    // - `Ok(None)` if no live session matches (expired, revoked, never issued)
    async fn find_one_and_update_last_accessed_time(
        &self,
        token_key: &str,
    ) -> SessionStoreResult<Option<Session>>;
}
