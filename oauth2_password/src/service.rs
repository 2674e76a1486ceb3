use std::sync::Arc;

use crate::config::AuthConfig;
use crate::coordination::CoordinationError;
use crate::handoff::HandoffCache;
use crate::oauth2::OAuth2Broker;
use crate::session::SessionManager;
use crate::storage::{connect_cache_store, connect_data_store};
use crate::userdb::AccountStore;

/// Entry point to every authentication flow.
///
/// Built once at startup from an [`AuthConfig`]. Cloning is cheap and all clones share
/// the same stores, so the service can be handed to a web framework as shared state.
#[derive(Clone)]
pub struct AuthService {
    pub(crate) inner: Arc<ServiceState>,
}

pub(crate) struct ServiceState {
    pub(crate) config: AuthConfig,
    pub(crate) accounts: AccountStore,
    pub(crate) sessions: SessionManager,
    pub(crate) handoff: HandoffCache,
    pub(crate) broker: OAuth2Broker,
}

impl AuthService {
    /// Connect the stores, create missing tables and generate the OAuth2 state nonce.
    pub async fn init(config: AuthConfig) -> Result<Self, CoordinationError> {
        let data_store = connect_data_store(&config.store)?;
        let cache = connect_cache_store(&config.store).await?;

        let accounts = AccountStore::new(data_store, &config.store.table_prefix);
        accounts.init().await?;

        let sessions = SessionManager::new(cache.clone(), config.session.clone());
        let handoff = HandoffCache::new(cache, config.handoff.ttl);
        let broker = OAuth2Broker::new(config.oauth2.clone())?;

        tracing::info!("Authentication service initialized");

        Ok(Self {
            inner: Arc::new(ServiceState {
                config,
                accounts,
                sessions,
                handoff,
                broker,
            }),
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.inner.config
    }
}
