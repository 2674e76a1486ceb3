mod cache_store;
mod data_store;
mod errors;
mod types;

pub(crate) use cache_store::{SharedCacheStore, connect_cache_store};
pub(crate) use data_store::{DataStore, connect_data_store};
pub use errors::StorageError;
pub(crate) use types::CacheData;

#[cfg(test)]
pub(crate) use cache_store::{CacheStore, InMemoryCacheStore};
