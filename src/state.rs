use std::sync::Arc;

use crate::config::Config;
use crate::session::SessionHandle;
use crate::store::{JsonFileStore, MemoryStore, RouteStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: SessionHandle,
}

impl AppState {
    /// State backed by JSON files under `config.data_dir`.
    pub fn new(config: Config) -> Self {
        let store = JsonFileStore::new(config.data_dir.clone());
        Self::with_store(config, Box::new(store))
    }

    /// State backed by a throwaway in-memory store.
    pub fn in_memory(config: Config) -> Self {
        Self::with_store(config, Box::new(MemoryStore::new()))
    }

    pub fn with_store(config: Config, store: Box<dyn RouteStore>) -> Self {
        let session = SessionHandle::spawn(store, &config);
        Self {
            config: Arc::new(config),
            session,
        }
    }
}
