use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, postgres::PgPoolOptions};
use std::time::Duration;

use crate::services::session::store::{Session, SessionStore, SessionStoreResult};

/// Postgres-backed session store.
///
/// Schema (see `migrations/`):
/// - sessions.token_key (text, primary key)
/// - sessions.user_id (text)
/// - sessions.last_accessed_time (timestamptz)
#[derive(Clone, Debug)]
pub struct PgSessionStore {
    pool: PgPool,
    idle_timeout: Option<Duration>,
}

#[derive(Debug, FromRow)]
struct SessionRow {
    token_key: String,
    user_id: String,
    last_accessed_time: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Self {
            token_key: row.token_key,
            user_id: row.user_id,
            last_accessed_time: row.last_accessed_time,
        }
    }
}

impl PgSessionStore {
    pub async fn connect(
        url: &str,
        max_connections: u32,
        idle_timeout: Option<Duration>,
    ) -> SessionStoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        Ok(Self::new(pool, idle_timeout))
    }

    pub fn new(pool: PgPool, idle_timeout: Option<Duration>) -> Self {
        Self { pool, idle_timeout }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn find_one_and_update_last_accessed_time(
        &self,
        token_key: &str,
    ) -> SessionStoreResult<Option<Session>> {
        // One statement, so the row lock covers both the match and the touch.
        // GREATEST keeps the timestamp from moving backwards when requests race.
        // Rows idle for longer than the timeout are treated as gone.
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            UPDATE sessions
            SET last_accessed_time = GREATEST(last_accessed_time, $2)
            WHERE token_key = $1
                AND ($3::float8 IS NULL OR last_accessed_time >= $2 - make_interval(secs => $3))
            RETURNING token_key, user_id, last_accessed_time
            "#,
        )
        .bind(token_key)
        .bind(Utc::now())
        .bind(self.idle_timeout.map(|d| d.as_secs_f64()))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Session::from))
    }
}
