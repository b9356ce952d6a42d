use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;
use crate::types::marker::Marker;
use crate::types::route::Route;

pub const ROUTES_KEY: &str = "monotrack_routes_v2";
pub const MARKERS_KEY: &str = "monotrack_markers";

/// Durable storage for finished routes and saved markers. Every call is
/// treated as durable once it returns.
pub trait RouteStore: Send + Sync {
    fn load_routes(&self) -> Result<Vec<Route>, StoreError>;
    fn save_routes(&self, routes: &[Route]) -> Result<(), StoreError>;
    fn load_markers(&self) -> Result<Vec<Marker>, StoreError>;
    fn save_markers(&self, markers: &[Marker]) -> Result<(), StoreError>;
    fn clear_routes(&self) -> Result<(), StoreError>;
}

/// One JSON array per storage key, written through a temp file and renamed
/// into place.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read<T: DeserializeOwned>(&self, key: &'static str) -> Result<Vec<T>, StoreError> {
        let path = self.path_for(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { key, source }),
        };

        let values = match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(values)) => values,
            Ok(_) => {
                tracing::warn!("Stored {} is not a list, ignoring it", key);
                return Ok(Vec::new());
            }
            Err(e) => {
                tracing::warn!("Stored {} is corrupt, ignoring it: {}", key, e);
                return Ok(Vec::new());
            }
        };

        Ok(decode_entries(key, values))
    }

    fn write<T: Serialize>(&self, key: &'static str, items: &[T]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io { key, source })?;

        let bytes =
            serde_json::to_vec_pretty(items).map_err(|source| StoreError::Json { key, source })?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(|source| StoreError::Io { key, source })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io { key, source })?;

        tracing::debug!("Wrote {} {} entries to {}", items.len(), key, path.display());
        Ok(())
    }
}

impl RouteStore for JsonFileStore {
    fn load_routes(&self) -> Result<Vec<Route>, StoreError> {
        self.read(ROUTES_KEY)
    }

    fn save_routes(&self, routes: &[Route]) -> Result<(), StoreError> {
        self.write(ROUTES_KEY, routes)
    }

    fn load_markers(&self) -> Result<Vec<Marker>, StoreError> {
        self.read(MARKERS_KEY)
    }

    fn save_markers(&self, markers: &[Marker]) -> Result<(), StoreError> {
        self.write(MARKERS_KEY, markers)
    }

    fn clear_routes(&self) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(ROUTES_KEY)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                key: ROUTES_KEY,
                source,
            }),
        }
    }
}

/// Entries that do not decode at all (wrong shape, not an object) are
/// skipped; field-level damage is left for the sanitizer.
fn decode_entries<T: DeserializeOwned>(key: &str, values: Vec<Value>) -> Vec<T> {
    let total = values.len();
    let decoded: Vec<T> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();

    if decoded.len() != total {
        tracing::warn!(
            "Skipped {} undecodable {} entries",
            total - decoded.len(),
            key
        );
    }
    decoded
}

#[derive(Debug, Default)]
struct MemoryData {
    routes: Vec<Route>,
    markers: Vec<Marker>,
    route_saves: usize,
    marker_saves: usize,
}

/// In-process store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(routes: Vec<Route>, markers: Vec<Marker>) -> Self {
        let store = Self::new();
        {
            let mut data = store.lock();
            data.routes = routes;
            data.markers = markers;
        }
        store
    }

    pub fn routes(&self) -> Vec<Route> {
        self.lock().routes.clone()
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.lock().markers.clone()
    }

    pub fn route_saves(&self) -> usize {
        self.lock().route_saves
    }

    pub fn marker_saves(&self) -> usize {
        self.lock().marker_saves
    }

    fn lock(&self) -> MutexGuard<'_, MemoryData> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RouteStore for MemoryStore {
    fn load_routes(&self) -> Result<Vec<Route>, StoreError> {
        Ok(self.routes())
    }

    fn save_routes(&self, routes: &[Route]) -> Result<(), StoreError> {
        let mut data = self.lock();
        data.routes = routes.to_vec();
        data.route_saves += 1;
        Ok(())
    }

    fn load_markers(&self) -> Result<Vec<Marker>, StoreError> {
        Ok(self.markers())
    }

    fn save_markers(&self, markers: &[Marker]) -> Result<(), StoreError> {
        let mut data = self.lock();
        data.markers = markers.to_vec();
        data.marker_saves += 1;
        Ok(())
    }

    fn clear_routes(&self) -> Result<(), StoreError> {
        self.lock().routes.clear();
        Ok(())
    }
}
