/// Factory: build the session store selected by `Config`.
use std::sync::Arc;

use crate::config::{Config, SessionStoreBackend};
use crate::services::session::{
    postgres::PgSessionStore,
    store::{SessionStore, SessionStoreResult},
    valkey::ValkeySessionStore,
};

pub async fn build_session_store(config: &Config) -> SessionStoreResult<Arc<dyn SessionStore>> {
    let store: Arc<dyn SessionStore> = match &config.session_store {
        SessionStoreBackend::Postgres {
            url,
            max_connections,
        } => Arc::new(
            PgSessionStore::connect(url, *max_connections, config.session_idle_timeout).await?,
        ),
        SessionStoreBackend::Valkey { url, key_prefix } => Arc::new(
            ValkeySessionStore::connect(url, key_prefix.clone(), config.session_idle_timeout)
                .await?,
        ),
    };

    Ok(store)
}
