mod config;

pub(crate) use config::{DataStore, connect_data_store};
