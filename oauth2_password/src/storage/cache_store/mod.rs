mod memory;
mod redis;
mod types;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::StoreConfig;
use crate::storage::errors::StorageError;

pub(crate) use types::{CacheStore, InMemoryCacheStore, RedisCacheStore};

/// Cache store handle shared by the session manager and the handoff cache.
pub(crate) type SharedCacheStore = Arc<Mutex<Box<dyn CacheStore>>>;

pub(crate) async fn connect_cache_store(
    config: &StoreConfig,
) -> Result<SharedCacheStore, StorageError> {
    let store_type = config.cache_store_type.as_str();

    tracing::info!("Initializing cache store with type: {}", store_type);

    let store: Box<dyn CacheStore> = match store_type {
        "memory" => Box::new(InMemoryCacheStore::new()),
        "redis" => {
            let client = ::redis::Client::open(config.cache_store_url.as_str())?;
            Box::new(RedisCacheStore { client })
        }
        t => {
            tracing::error!(
                "Unsupported cache store type: {t}. Supported types are 'memory' and 'redis'"
            );
            return Err(StorageError::UnsupportedType(t.to_string()));
        }
    };

    store.init().await?;

    tracing::info!("Connected to cache store: type={}", store_type);

    Ok(Arc::new(Mutex::new(store)))
}
