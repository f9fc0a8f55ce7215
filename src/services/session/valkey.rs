use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::LazyLock;
use std::time::Duration;

use crate::services::session::store::{
    Session, SessionStore, SessionStoreError, SessionStoreResult,
};

// KEYS[1] = session hash, ARGV[1] = now (unix millis), ARGV[2] = idle ttl seconds (0 = none)
//
// Runs as one script, so concurrent touches of the same key are serialized by the server.
// Returns nil when the session does not exist.
const FIND_AND_TOUCH: &str = r#"
local user_id = redis.call('HGET', KEYS[1], 'user_id')
if not user_id then
    return false
end
local last = redis.call('HGET', KEYS[1], 'last_accessed_time')
if (tonumber(last) or 0) < tonumber(ARGV[1]) then
    last = ARGV[1]
    redis.call('HSET', KEYS[1], 'last_accessed_time', last)
end
local ttl = tonumber(ARGV[2])
if ttl > 0 then
    redis.call('EXPIRE', KEYS[1], ttl)
end
return { user_id, last }
"#;

static FIND_AND_TOUCH_SCRIPT: LazyLock<redis::Script> =
    LazyLock::new(|| redis::Script::new(FIND_AND_TOUCH));

/// Valkey/Redis-backed session store.
///
/// Each session is a hash at `<prefix>:<token_key>` with fields `user_id` and
/// `last_accessed_time` (unix millis). With an idle timeout, every touch slides the key TTL.
#[derive(Clone)]
pub struct ValkeySessionStore {
    manager: redis::aio::ConnectionManager,
    prefix: String,
    idle_timeout: Option<Duration>,
}

impl ValkeySessionStore {
    // Connect from a URL like `redis://localhost:6379`
    pub async fn connect(
        url: &str,
        prefix: impl Into<String>,
        idle_timeout: Option<Duration>,
    ) -> SessionStoreResult<Self> {
        let client = redis::Client::open(url)?;
        let manager = client.get_connection_manager().await?;

        Ok(Self {
            manager,
            prefix: prefix.into(),
            idle_timeout,
        })
    }

    pub fn key(&self, token_key: &str) -> String {
        format!("{}:{}", self.prefix, token_key)
    }
}

#[async_trait]
impl SessionStore for ValkeySessionStore {
    fn backend_name(&self) -> &'static str {
        "valkey"
    }

    async fn find_one_and_update_last_accessed_time(
        &self,
        token_key: &str,
    ) -> SessionStoreResult<Option<Session>> {
        // Use a clone of the connection manager
        let mut conn = self.manager.clone();

        let ttl_seconds = self.idle_timeout.map(|d| d.as_secs().max(1)).unwrap_or(0);

        let resp: Option<(String, String)> = FIND_AND_TOUCH_SCRIPT
            .key(self.key(token_key))
            .arg(Utc::now().timestamp_millis())
            .arg(ttl_seconds)
            .invoke_async(&mut conn)
            .await?;

        session_from_reply(token_key, resp)
    }
}

// Script reply → Session. `last_accessed_time` is stored as unix millis.
fn session_from_reply(
    token_key: &str,
    reply: Option<(String, String)>,
) -> SessionStoreResult<Option<Session>> {
    let Some((user_id, last_accessed_millis)) = reply else {
        return Ok(None);
    };

    let last_accessed_time = last_accessed_millis
        .parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .ok_or_else(|| {
            SessionStoreError::InvalidRecord(format!(
                "last_accessed_time is not unix millis: {last_accessed_millis}"
            ))
        })?;

    Ok(Some(Session {
        token_key: token_key.to_string(),
        user_id,
        last_accessed_time,
    }))
}
