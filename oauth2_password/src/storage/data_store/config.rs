use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{PgPool, Pool, Postgres, Sqlite, SqlitePool};
use std::{str::FromStr, sync::Arc};

use crate::config::StoreConfig;
use crate::storage::errors::StorageError;

/// Handle on the account database.
///
/// The account store asks for the pool of its backend and runs the matching
/// dialect; exactly one of the accessors returns `Some`.
pub(crate) trait DataStore: Send + Sync {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>>;
    fn as_postgres(&self) -> Option<&Pool<Postgres>>;
}

#[derive(Clone, Debug)]
struct SqliteDataStore {
    pool: SqlitePool,
}

#[derive(Clone, Debug)]
struct PostgresDataStore {
    pool: PgPool,
}

impl DataStore for SqliteDataStore {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        Some(&self.pool)
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        None
    }
}

impl DataStore for PostgresDataStore {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        None
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        Some(&self.pool)
    }
}

/// Open a lazily connecting pool for the configured database.
pub(crate) fn connect_data_store(config: &StoreConfig) -> Result<Arc<dyn DataStore>, StorageError> {
    let store_type = config.data_store_type.as_str();
    let store_url = config.data_store_url.as_str();

    tracing::info!("Initializing data store with type: {}", store_type);

    let store: Arc<dyn DataStore> = match store_type {
        "sqlite" => {
            let options = SqliteConnectOptions::from_str(store_url)?.create_if_missing(true);
            let pool = if store_url.contains(":memory:") {
                // Each in-memory connection is its own database; keep exactly one alive
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_lazy_with(options)
            } else {
                SqlitePoolOptions::new().connect_lazy_with(options)
            };
            Arc::new(SqliteDataStore { pool })
        }
        "postgres" => {
            let pool = PgPool::connect_lazy(store_url)?;
            Arc::new(PostgresDataStore { pool })
        }
        t => {
            tracing::error!("Unsupported data store type: {t}. Supported types are 'sqlite' and 'postgres'");
            return Err(StorageError::UnsupportedType(t.to_string()));
        }
    };

    tracing::info!("Connected to data store: type={}", store_type);

    Ok(store)
}
